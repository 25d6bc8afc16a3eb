use thiserror::Error;

use crate::common::types::RecordIndex;
use crate::nif::types::RecordKind;

/// Lookup failures of the record table. Everything that can go wrong when following an index
/// from one record to another ends up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record index {index} is out of range, the file only contains {len} records")]
    OutOfRange { index: RecordIndex, len: usize },

    #[error("Record {index} is a {found}, but a {expected} was expected")]
    KindMismatch {
        index: RecordIndex,
        expected: RecordKind,
        found: RecordKind,
    },

    /// A slot handed out by [`nif::builder::NifFileBuilder::reserve`] has never been filled.
    #[error("Record slot {index} was reserved but never filled")]
    Unfilled { index: RecordIndex },
}

pub mod common;
pub mod nif;

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::types::RecordIndex;
use crate::nif::types::{Record, RecordKind, RecordType};
use crate::RecordError;

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a [`NifFile`], unique for the lifetime of the process. Names are chosen by the
/// host and may repeat, ids don't. Clones of a file share its id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FileId(u64);

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "file {}", self.0)
    }
}

/// The parsed record table of a single file. Records reference each other by [`RecordIndex`],
/// every lookup is bounds- and kind-checked. The table is immutable once built.
#[derive(Debug, Clone)]
pub struct NifFile {
    id: FileId,
    name: String,
    records: Vec<Record>,
    roots: Vec<RecordIndex>,
}

impl NifFile {
    pub fn new(name: impl Into<String>, records: Vec<Record>, roots: Vec<RecordIndex>) -> Self {
        Self {
            id: FileId(NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            records,
            roots,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn roots(&self) -> &[RecordIndex] {
        &self.roots
    }

    pub fn root(&self, n: usize) -> Option<RecordIndex> {
        self.roots.get(n).copied()
    }

    pub fn get_record(&self, index: RecordIndex) -> Result<&Record, RecordError> {
        self.records
            .get(index.as_usize())
            .ok_or(RecordError::OutOfRange {
                index,
                len: self.records.len(),
            })
    }

    /// Untyped lookup that still insists on a specific kind.
    pub fn get_kind(&self, index: RecordIndex, expected: RecordKind) -> Result<&Record, RecordError> {
        let record = self.get_record(index)?;
        if record.kind() != expected {
            return Err(RecordError::KindMismatch {
                index,
                expected,
                found: record.kind(),
            });
        }

        Ok(record)
    }

    pub fn get<T: RecordType>(&self, index: RecordIndex) -> Result<&T, RecordError> {
        let record = self.get_record(index)?;
        T::from_record(record).ok_or(RecordError::KindMismatch {
            index,
            expected: T::KIND,
            found: record.kind(),
        })
    }

    /// Follows an optional reference, an empty reference is not an error.
    pub fn get_optional<T: RecordType>(&self, index: Option<RecordIndex>) -> Result<Option<&T>, RecordError> {
        index.map(|index| self.get::<T>(index)).transpose()
    }
}

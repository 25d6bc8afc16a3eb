use nifscene_files::common::types::RecordIndex;
use nifscene_files::nif::types::RecordKind;
use nifscene_files::RecordError;
use thiserror::Error;

/// Fatal problems with the shape of a file. Anything that only costs a feature (an unsupported
/// property, a broken key group, a missing texture) is logged as a warning instead.
#[derive(Error, Debug)]
pub enum StructuralError {
    #[error("{file}: the file does not have a root record")]
    NoRoot { file: String },
    #[error("{file}: root record {index} is a {kind}, not a node")]
    RootNotANode {
        file: String,
        index: RecordIndex,
        kind: RecordKind,
    },
    #[error("{file}: {source}")]
    Record { file: String, source: RecordError },
    #[error("{file}: record {child} is a child of {parent} and one of its ancestors at the same time")]
    Cycle {
        file: String,
        parent: RecordIndex,
        child: RecordIndex,
    },
    #[error("{file}: node {index} is nested deeper than {limit} levels")]
    TooDeep {
        file: String,
        index: RecordIndex,
        limit: usize,
    },
    #[error("{file}: the controller chain loops back to controller {index}")]
    ControllerCycle { file: String, index: RecordIndex },
    #[error("{file}: the skin of shape {shape} uses bone {bone} ({name}), which is not part of the skeleton")]
    MissingBone {
        file: String,
        shape: RecordIndex,
        bone: RecordIndex,
        name: String,
    },
}

pub mod demos;
pub mod loader;
pub mod scene;
pub mod textures;

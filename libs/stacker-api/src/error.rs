/// Error raised while validating input or packing a block.
///
/// Per-partition failures travel inside the partition's output stream as
/// `Err` items; the runtime decides whether the whole job fails.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("invalid block size {0}: must be a positive integer")]
    InvalidBlockSize(i64),

    #[error("schema mismatch: expected tuple of arity {expected}, found {found}")]
    SchemaMismatch { expected: usize, found: String },

    #[error("unexpected record: expected {expected}, found {found}")]
    UnexpectedRecord {
        expected: &'static str,
        found: &'static str,
    },

    #[error("mixed sparsity: element {index} disagrees with the first element")]
    MixedSparsity { index: usize },

    #[error("ragged array: element {index} does not have shape {expected:?}")]
    RaggedArray { index: usize, expected: Vec<usize> },

    #[error("shape mismatch: row {row} has {found} columns, expected {expected}")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid sparse row: {0}")]
    InvalidSparseRow(String),

    #[error("column '{column}' is not supported: {reason}")]
    UnsupportedColumn { column: String, reason: String },

    #[error("collection: {0}")]
    Collection(String),

    #[error("arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub mod block;
pub mod collection;
pub mod error;
pub mod size;
pub mod sparse;
pub mod value;

pub use block::{Block, BlockKind, BlockResult, DenseArray};
pub use collection::{DistributedCollection, Partition};
pub use error::BlockError;
pub use size::BlockSize;
pub use sparse::{CsrMatrix, SparseRow};
pub use value::Value;

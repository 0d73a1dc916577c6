pub mod blocker;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod local;
pub mod pack;
pub mod tuple;

pub use blocker::{Accumulator, Blocker, RowAccumulator, block_partition};
pub use config::BlockConfig;
pub use dispatch::{Blocked, RecordKind, block};
pub use error::EngineError;
pub use input::{Layout, read_records};
pub use local::LocalCollection;
pub use pack::{Packer, pack_accumulated, pack_dense, pack_sparse, pack_table};
pub use tuple::{ColumnAccumulator, block_tuples};

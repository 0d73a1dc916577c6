use stacker_api::{
    BlockError, BlockResult, BlockSize, DistributedCollection, Partition, Value,
};

use crate::blocker::block_partition;
use crate::pack::{pack_dense, pack_sparse, pack_table};
use crate::tuple::block_tuples;

/// Structural variant of a record, decided once from a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Tuple,
    Mapping,
    Sparse,
    /// Scalars, arrays and anything else.
    Dense,
}

impl RecordKind {
    pub fn detect(record: &Value) -> Self {
        match record {
            Value::Tuple(_) => RecordKind::Tuple,
            Value::Map(_) => RecordKind::Mapping,
            Value::Sparse(_) => RecordKind::Sparse,
            _ => RecordKind::Dense,
        }
    }

    /// Block one partition with the strategy for this kind.
    pub fn block_partition(
        self,
        records: Partition<Value>,
        block_size: Option<BlockSize>,
    ) -> Partition<BlockResult> {
        match self {
            RecordKind::Tuple => Box::new(block_tuples(records, block_size)),
            RecordKind::Mapping => Box::new(block_partition(records, block_size, pack_table)),
            RecordKind::Sparse => Box::new(block_partition(records, block_size, pack_sparse)),
            RecordKind::Dense => Box::new(block_partition(records, block_size, pack_dense)),
        }
    }
}

/// Outcome of `block`.
pub enum Blocked<C: DistributedCollection> {
    /// The collection had no records and is returned as it was.
    Unchanged(C),
    /// One stream of blocks per input partition.
    Blocks(C::Mapped<BlockResult>),
}

impl<C: DistributedCollection> Blocked<C> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Blocked::Unchanged(_))
    }

    pub fn into_blocks(self) -> Option<C::Mapped<BlockResult>> {
        match self {
            Blocked::Blocks(blocks) => Some(blocks),
            Blocked::Unchanged(_) => None,
        }
    }
}

/// Turn a collection of records into a collection of blocks.
///
/// The record kind is detected from one sampled record and the matching
/// strategy is applied to every partition. An empty collection is returned
/// unchanged. With no `block_size` each partition becomes a single block.
pub fn block<C>(collection: C, block_size: Option<BlockSize>) -> Result<Blocked<C>, BlockError>
where
    C: DistributedCollection<Item = Value>,
{
    let Some(sample) = collection.sample_one()? else {
        tracing::debug!("collection is empty, nothing to block");
        return Ok(Blocked::Unchanged(collection));
    };

    let kind = RecordKind::detect(&sample);
    tracing::debug!(
        ?kind,
        sample = sample.kind_name(),
        block_size = block_size.map(BlockSize::get),
        "blocking collection"
    );

    let blocks =
        collection.map_partitions(move |records| kind.block_partition(records, block_size));
    Ok(Blocked::Blocks(blocks))
}

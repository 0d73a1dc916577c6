use crate::error::BlockError;

/// One partition's record stream. Finite, ordered, consumed exactly once.
pub type Partition<T> = Box<dyn Iterator<Item = T> + Send>;

/// The two capabilities blocking needs from a partitioned dataset.
///
/// The collection owns scheduling, placement and retries. Blocking never
/// sees more than one partition at a time and never shares state between
/// partitions.
pub trait DistributedCollection: Sized {
    type Item: Send + 'static;

    /// Collection type produced by `map_partitions`.
    type Mapped<U: Send + 'static>;

    /// One representative element, or `None` if the collection is empty.
    ///
    /// May have to compute part of the dataset; called once per `block`.
    fn sample_one(&self) -> Result<Option<Self::Item>, BlockError>;

    /// Apply `f` independently to every partition.
    ///
    /// The result holds, per partition, the values yielded by `f` in order.
    fn map_partitions<U, F>(self, f: F) -> Self::Mapped<U>
    where
        U: Send + 'static,
        F: Fn(Partition<Self::Item>) -> Partition<U> + Send + Sync + 'static;
}

use rayon::prelude::*;

use stacker_api::{BlockError, DistributedCollection, Partition};

/// In-process partitioned collection.
///
/// `map_partitions` runs every partition on the rayon pool and keeps the
/// output partitions in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCollection<T> {
    partitions: Vec<Vec<T>>,
}

impl<T> LocalCollection<T> {
    pub fn new(partitions: Vec<Vec<T>>) -> Self {
        Self { partitions }
    }

    /// Split `records` into `num_partitions` contiguous slices of near-equal
    /// length. Partition `i` holds `records[i*n/p .. (i+1)*n/p]`.
    pub fn from_records(records: Vec<T>, num_partitions: usize) -> Self {
        let p = num_partitions.max(1);
        let n = records.len();
        let mut records = records.into_iter();
        let partitions = (0..p)
            .map(|i| {
                let len = (i + 1) * n / p - i * n / p;
                records.by_ref().take(len).collect()
            })
            .collect();
        Self { partitions }
    }

    pub fn partitions(&self) -> &[Vec<T>] {
        &self.partitions
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of records over all partitions.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    pub fn into_partitions(self) -> Vec<Vec<T>> {
        self.partitions
    }

    /// All records, partition after partition.
    pub fn collect(self) -> Vec<T> {
        self.partitions.into_iter().flatten().collect()
    }
}

impl<T> DistributedCollection for LocalCollection<T>
where
    T: Clone + Send + 'static,
{
    type Item = T;
    type Mapped<U: Send + 'static> = LocalCollection<U>;

    fn sample_one(&self) -> Result<Option<T>, BlockError> {
        Ok(self.partitions.iter().flatten().next().cloned())
    }

    fn map_partitions<U, F>(self, f: F) -> LocalCollection<U>
    where
        U: Send + 'static,
        F: Fn(Partition<T>) -> Partition<U> + Send + Sync + 'static,
    {
        tracing::debug!(partitions = self.partitions.len(), "mapping partitions");
        let partitions = self
            .partitions
            .into_par_iter()
            .map(|partition| f(Box::new(partition.into_iter())).collect())
            .collect();
        LocalCollection { partitions }
    }
}

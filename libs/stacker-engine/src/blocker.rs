use std::iter::FusedIterator;

use stacker_api::{BlockError, BlockResult, BlockSize, Value};

use crate::pack::Packer;

/// Per-partition buffer that records are appended to and flushed from.
pub trait Accumulator {
    /// Records accumulated since the last flush.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, record: Value) -> Result<(), BlockError>;

    /// Pack everything accumulated so far and start over empty.
    fn flush(&mut self) -> BlockResult;
}

/// Lazy chunker over one partition's records.
///
/// Before appending a record, a full accumulator (`len == block_size`) is
/// flushed. When the records run out, whatever is left is flushed, even if
/// nothing is, so every partition yields at least one block.
///
/// After the first error the iterator is finished.
pub struct Blocker<I, A> {
    records: I,
    block_size: Option<BlockSize>,
    acc: A,
    /// Error from the record that follows a just-emitted block.
    pending: Option<BlockError>,
    emitted: usize,
    done: bool,
}

impl<I, A> Blocker<I, A> {
    pub fn new(records: I, block_size: Option<BlockSize>, acc: A) -> Self {
        Self {
            records,
            block_size,
            acc,
            pending: None,
            emitted: 0,
            done: false,
        }
    }
}

impl<I, A> Blocker<I, A>
where
    A: Accumulator,
{
    fn emit(&mut self) -> BlockResult {
        let block = self.acc.flush();
        match &block {
            Ok(b) => tracing::trace!(index = self.emitted, rows = b.len(), "block packed"),
            Err(e) => {
                tracing::debug!(index = self.emitted, error = %e, "block packing failed");
                self.done = true;
            }
        }
        self.emitted += 1;
        block
    }
}

impl<I, A> Iterator for Blocker<I, A>
where
    I: Iterator<Item = Value>,
    A: Accumulator,
{
    type Item = BlockResult;

    fn next(&mut self) -> Option<BlockResult> {
        if self.done {
            return None;
        }
        if let Some(err) = self.pending.take() {
            self.done = true;
            return Some(Err(err));
        }

        while let Some(record) = self.records.next() {
            let full = self
                .block_size
                .is_some_and(|size| self.acc.len() >= size.get());
            if !full {
                if let Err(err) = self.acc.push(record) {
                    self.done = true;
                    return Some(Err(err));
                }
                continue;
            }

            let block = self.emit();
            if block.is_ok() {
                if let Err(err) = self.acc.push(record) {
                    self.pending = Some(err);
                }
            }
            return Some(block);
        }

        self.done = true;
        Some(self.emit())
    }
}

impl<I, A> FusedIterator for Blocker<I, A>
where
    I: Iterator<Item = Value>,
    A: Accumulator,
{
}

/// Row-wise accumulator for map, sparse and dense records.
pub struct RowAccumulator {
    rows: Vec<Value>,
    capacity: usize,
    pack: Packer,
}

impl RowAccumulator {
    pub fn new(block_size: Option<BlockSize>, pack: Packer) -> Self {
        let capacity = block_size.map_or(0, BlockSize::get);
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
            pack,
        }
    }
}

impl Accumulator for RowAccumulator {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn push(&mut self, record: Value) -> Result<(), BlockError> {
        self.rows.push(record);
        Ok(())
    }

    fn flush(&mut self) -> BlockResult {
        let rows = std::mem::replace(&mut self.rows, Vec::with_capacity(self.capacity));
        (self.pack)(rows)
    }
}

/// Block one partition, packing every chunk with `pack`.
pub fn block_partition<I>(
    records: I,
    block_size: Option<BlockSize>,
    pack: Packer,
) -> Blocker<I::IntoIter, RowAccumulator>
where
    I: IntoIterator<Item = Value>,
{
    Blocker::new(records.into_iter(), block_size, RowAccumulator::new(block_size, pack))
}

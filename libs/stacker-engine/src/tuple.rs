use stacker_api::{Block, BlockError, BlockResult, BlockSize, Value};

use crate::blocker::{Accumulator, Blocker};
use crate::pack::pack_accumulated;

/// Column-wise accumulator for tuple records.
///
/// One buffer per field position, allocated when the first record arrives
/// and sized by its arity. All buffers share a single row counter, so they
/// are always flushed at the same boundary.
pub struct ColumnAccumulator {
    columns: Option<Vec<Vec<Value>>>,
    rows: usize,
    capacity: usize,
}

impl ColumnAccumulator {
    pub fn new(block_size: Option<BlockSize>) -> Self {
        Self {
            columns: None,
            rows: 0,
            capacity: block_size.map_or(0, BlockSize::get),
        }
    }

    /// Arity fixed by the first record, if one has been seen.
    pub fn arity(&self) -> Option<usize> {
        self.columns.as_ref().map(Vec::len)
    }
}

impl Accumulator for ColumnAccumulator {
    fn len(&self) -> usize {
        self.rows
    }

    fn push(&mut self, record: Value) -> Result<(), BlockError> {
        let fields = match record {
            Value::Tuple(fields) => fields,
            other => {
                return Err(BlockError::UnexpectedRecord {
                    expected: "tuple",
                    found: other.kind_name(),
                });
            }
        };
        // A block of zero fields could not report how many rows it holds.
        if self.columns.is_none() && fields.is_empty() {
            return Err(BlockError::UnexpectedRecord {
                expected: "tuple with at least one field",
                found: "empty tuple",
            });
        }
        let capacity = self.capacity;
        let columns = self.columns.get_or_insert_with(|| {
            (0..fields.len())
                .map(|_| Vec::with_capacity(capacity))
                .collect()
        });
        if fields.len() != columns.len() {
            tracing::warn!(
                expected = columns.len(),
                found = fields.len(),
                row = self.rows,
                "tuple arity changed within partition"
            );
            return Err(BlockError::SchemaMismatch {
                expected: columns.len(),
                found: format!("arity {}", fields.len()),
            });
        }
        for (column, field) in columns.iter_mut().zip(fields) {
            column.push(field);
        }
        self.rows += 1;
        Ok(())
    }

    fn flush(&mut self) -> BlockResult {
        self.rows = 0;
        let Some(columns) = self.columns.as_mut() else {
            // No record seen yet: the partition is empty and has no arity.
            return Ok(Block::Tuple(Vec::new()));
        };
        let fields = columns
            .iter_mut()
            .map(|column| {
                pack_accumulated(std::mem::replace(
                    column,
                    Vec::with_capacity(self.capacity),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block::Tuple(fields))
    }
}

/// Block one partition of tuple records field by field.
pub fn block_tuples<I>(
    records: I,
    block_size: Option<BlockSize>,
) -> Blocker<I::IntoIter, ColumnAccumulator>
where
    I: IntoIterator<Item = Value>,
{
    Blocker::new(records.into_iter(), block_size, ColumnAccumulator::new(block_size))
}

use arrow::record_batch::RecordBatch;
use ndarray::ArrayD;

use crate::error::BlockError;
use crate::sparse::CsrMatrix;
use crate::value::Value;

/// Dense n-dimensional block. Axis 0 indexes records.
pub type DenseArray = ArrayD<Value>;

/// What a partition function yields for each block.
pub type BlockResult = Result<Block, BlockError>;

/// Aggregated container of up to `block_size` records of one variant.
#[derive(Debug, Clone)]
pub enum Block {
    Dense(DenseArray),
    Sparse(CsrMatrix),
    Table(RecordBatch),
    /// One container per field, in field order. Every field has the same length.
    Tuple(Vec<Block>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Dense,
    Sparse,
    Table,
    Tuple,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Dense => "dense",
            BlockKind::Sparse => "sparse",
            BlockKind::Table => "table",
            BlockKind::Tuple => "tuple",
        }
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Dense(_) => BlockKind::Dense,
            Block::Sparse(_) => BlockKind::Sparse,
            Block::Table(_) => BlockKind::Table,
            Block::Tuple(_) => BlockKind::Tuple,
        }
    }

    /// Number of records packed into this block.
    pub fn len(&self) -> usize {
        match self {
            Block::Dense(a) => a.shape().first().copied().unwrap_or(0),
            Block::Sparse(m) => m.nrows(),
            Block::Table(t) => t.num_rows(),
            Block::Tuple(fields) => fields.first().map_or(0, Block::len),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Container shape. A tuple reports `[rows, arity]`.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Block::Dense(a) => a.shape().to_vec(),
            Block::Sparse(m) => vec![m.nrows(), m.ncols()],
            Block::Table(t) => vec![t.num_rows(), t.num_columns()],
            Block::Tuple(fields) => vec![self.len(), fields.len()],
        }
    }

    pub fn as_dense(&self) -> Option<&DenseArray> {
        match self {
            Block::Dense(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&CsrMatrix> {
        match self {
            Block::Sparse(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&RecordBatch> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Block]> {
        match self {
            Block::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// Numeric copy of a dense block, for handing to vectorized math.
    ///
    /// Fails with `UnexpectedRecord` on the first non-numeric element.
    pub fn to_f64(&self) -> Result<ArrayD<f64>, BlockError> {
        let dense = match self {
            Block::Dense(a) => a,
            Block::Sparse(m) => return Ok(m.to_dense().into_dyn()),
            other => {
                return Err(BlockError::UnexpectedRecord {
                    expected: "dense or sparse block",
                    found: other.kind().as_str(),
                });
            }
        };
        let data = dense
            .iter()
            .map(|v| {
                v.as_f64().ok_or(BlockError::UnexpectedRecord {
                    expected: "numeric element",
                    found: v.kind_name(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(ArrayD::from_shape_vec(dense.raw_dim(), data)?)
    }
}

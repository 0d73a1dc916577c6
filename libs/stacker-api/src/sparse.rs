use ndarray::Array2;
use serde::Deserialize;

use crate::error::BlockError;

/// A 1×N sparse row: sorted column indices and their values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSparseRow")]
pub struct SparseRow {
    ncols: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSparseRow {
    ncols: usize,
    #[serde(default)]
    indices: Vec<usize>,
    #[serde(default)]
    values: Vec<f64>,
}

impl TryFrom<RawSparseRow> for SparseRow {
    type Error = BlockError;

    fn try_from(raw: RawSparseRow) -> Result<Self, Self::Error> {
        SparseRow::new(raw.ncols, raw.indices, raw.values)
    }
}

impl SparseRow {
    /// Indices must be strictly increasing and below `ncols`.
    pub fn new(ncols: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self, BlockError> {
        if indices.len() != values.len() {
            return Err(BlockError::InvalidSparseRow(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some(w) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(BlockError::InvalidSparseRow(format!(
                "indices not strictly increasing at {} -> {}",
                w[0], w[1]
            )));
        }
        if let Some(&last) = indices.last() {
            if last >= ncols {
                return Err(BlockError::InvalidSparseRow(format!(
                    "index {last} out of bounds for {ncols} columns"
                )));
            }
        }
        Ok(Self {
            ncols,
            indices,
            values,
        })
    }

    /// Keep the non-zero entries of a dense row.
    pub fn from_dense(row: &[f64]) -> Self {
        let (indices, values) = row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .unzip();
        Self {
            ncols: row.len(),
            indices,
            values,
        }
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Compressed sparse row matrix built by stacking `SparseRow`s.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    pub fn empty(ncols: usize) -> Self {
        Self {
            nrows: 0,
            ncols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Stack rows vertically, keeping their order.
    ///
    /// The column count comes from the first row; every other row must match.
    /// No rows gives a 0×0 matrix.
    pub fn vstack(rows: impl IntoIterator<Item = SparseRow>) -> Result<Self, BlockError> {
        let mut rows = rows.into_iter().peekable();
        let ncols = rows.peek().map_or(0, SparseRow::ncols);
        let mut matrix = Self::empty(ncols);
        for (row, sparse) in rows.enumerate() {
            matrix.push_row(row, sparse)?;
        }
        Ok(matrix)
    }

    fn push_row(&mut self, row: usize, sparse: SparseRow) -> Result<(), BlockError> {
        if sparse.ncols != self.ncols {
            return Err(BlockError::ShapeMismatch {
                row,
                expected: self.ncols,
                found: sparse.ncols,
            });
        }
        self.indices.extend(sparse.indices);
        self.data.extend(sparse.values);
        self.indptr.push(self.indices.len());
        self.nrows += 1;
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> Option<(&[usize], &[f64])> {
        if i >= self.nrows {
            return None;
        }
        let range = self.indptr[i]..self.indptr[i + 1];
        Some((&self.indices[range.clone()], &self.data[range]))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)
            .and_then(|(indices, data)| indices.binary_search(&col).ok().map(|pos| data[pos]))
            .unwrap_or(0.0)
    }

    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.nrows, self.ncols));
        for r in 0..self.nrows {
            for k in self.indptr[r]..self.indptr[r + 1] {
                dense[[r, self.indices[k]]] = self.data[k];
            }
        }
        dense
    }
}

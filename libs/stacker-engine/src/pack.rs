use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, NullArray, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use ndarray::{ArrayD, IxDyn};

use stacker_api::{Block, BlockError, BlockResult, CsrMatrix, Value};

/// Container constructor: packs one accumulated sequence into a block.
pub type Packer = fn(Vec<Value>) -> BlockResult;

/// Pack a sequence whose container is decided by its first element:
/// a sparse row stacks, anything else (or nothing) goes dense.
pub fn pack_accumulated(values: Vec<Value>) -> BlockResult {
    match values.first() {
        Some(Value::Sparse(_)) => pack_sparse(values),
        _ => pack_dense(values),
    }
}

// ═══════════════════════════════════════════════════════════════
//  Dense
// ═══════════════════════════════════════════════════════════════

/// Build an n-dimensional array; nested arrays and tuples become axes.
///
/// Shape is `[len] ++ shape(first)`. Every element must have the first
/// element's shape, and none may be a sparse row.
pub fn pack_dense(values: Vec<Value>) -> BlockResult {
    let inner = values.first().map(nested_shape).unwrap_or_default();
    let mut shape = Vec::with_capacity(inner.len() + 1);
    shape.push(values.len());
    shape.extend_from_slice(&inner);

    let mut flat = Vec::with_capacity(shape.iter().product());
    for (index, value) in values.into_iter().enumerate() {
        if value.is_sparse() {
            return Err(BlockError::MixedSparsity { index });
        }
        if !flatten_into(value, &inner, &mut flat) {
            return Err(BlockError::RaggedArray {
                index,
                expected: inner,
            });
        }
    }
    Ok(Block::Dense(ArrayD::from_shape_vec(IxDyn(&shape), flat)?))
}

fn nested_shape(value: &Value) -> Vec<usize> {
    match value {
        Value::Array(items) | Value::Tuple(items) => {
            let mut shape = vec![items.len()];
            if let Some(first) = items.first() {
                shape.extend(nested_shape(first));
            }
            shape
        }
        _ => Vec::new(),
    }
}

/// Append the leaves of `value` in row-major order. False if it doesn't have `shape`.
fn flatten_into(value: Value, shape: &[usize], out: &mut Vec<Value>) -> bool {
    match (shape.split_first(), value) {
        (None, Value::Array(_) | Value::Tuple(_)) => false,
        (None, leaf) => {
            out.push(leaf);
            true
        }
        (Some((&len, rest)), Value::Array(items) | Value::Tuple(items)) if items.len() == len => {
            items.into_iter().all(|item| flatten_into(item, rest, out))
        }
        (Some(_), _) => false,
    }
}

// ═══════════════════════════════════════════════════════════════
//  Sparse
// ═══════════════════════════════════════════════════════════════

/// Stack sparse rows vertically. Every element must be a sparse row.
pub fn pack_sparse(values: Vec<Value>) -> BlockResult {
    let rows = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Sparse(row) => Ok(row),
            _ => Err(BlockError::MixedSparsity { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Block::Sparse(CsrMatrix::vstack(rows)?))
}

// ═══════════════════════════════════════════════════════════════
//  Table
// ═══════════════════════════════════════════════════════════════

/// Build a record batch from map records.
///
/// Columns appear in first-seen key order. A key missing from a record is
/// null in that row; a key repeated within one record keeps the last value.
pub fn pack_table(values: Vec<Value>) -> BlockResult {
    let nrows = values.len();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();

    for (row, value) in values.into_iter().enumerate() {
        let entries = match value {
            Value::Map(entries) => entries,
            other => {
                return Err(BlockError::UnexpectedRecord {
                    expected: "map",
                    found: other.kind_name(),
                });
            }
        };
        for (key, v) in entries {
            let pos = match positions.get(&key) {
                Some(&pos) => pos,
                None => {
                    positions.insert(key.clone(), columns.len());
                    columns.push((key, vec![Value::Null; row]));
                    columns.len() - 1
                }
            };
            let column = &mut columns[pos].1;
            if column.len() > row {
                column[row] = v;
            } else {
                column.push(v);
            }
        }
        for (_, column) in &mut columns {
            if column.len() == row {
                column.push(Value::Null);
            }
        }
    }

    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());
    for (name, values) in columns {
        let dtype = column_type(&name, &values)?;
        arrays.push(build_column(&dtype, values));
        fields.push(Field::new(name, dtype, true));
    }

    let options = RecordBatchOptions::new().with_row_count(Some(nrows));
    let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
    Ok(Block::Table(batch))
}

/// Infer one Arrow type over the non-null values of a column.
fn column_type(name: &str, values: &[Value]) -> Result<DataType, BlockError> {
    let unsupported = |reason: String| BlockError::UnsupportedColumn {
        column: name.to_string(),
        reason,
    };

    let mut dtype = DataType::Null;
    for value in values {
        let next = match value {
            Value::Null => continue,
            Value::Bool(_) => DataType::Boolean,
            Value::Int64(_) => DataType::Int64,
            Value::Float64(_) => DataType::Float64,
            Value::String(_) => DataType::Utf8,
            other => {
                return Err(unsupported(format!(
                    "{} values cannot form a column",
                    other.kind_name()
                )));
            }
        };
        dtype = match (dtype, next) {
            (DataType::Null, next) => next,
            (current, next) if current == next => current,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            (current, next) => return Err(unsupported(format!("mixes {current} and {next}"))),
        };
    }
    Ok(dtype)
}

fn build_column(dtype: &DataType, values: Vec<Value>) -> ArrayRef {
    match dtype {
        DataType::Boolean => {
            let mut b = BooleanBuilder::with_capacity(values.len());
            for v in values {
                match v {
                    Value::Bool(x) => b.append_value(x),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Int64 => {
            let mut b = Int64Builder::with_capacity(values.len());
            for v in values {
                match v {
                    Value::Int64(x) => b.append_value(x),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        DataType::Float64 => {
            let mut b = Float64Builder::with_capacity(values.len());
            for v in values {
                b.append_option(v.as_f64());
            }
            Arc::new(b.finish())
        }
        DataType::Utf8 => {
            let mut b = StringBuilder::with_capacity(values.len(), 0);
            for v in values {
                match v {
                    Value::String(s) => b.append_value(s),
                    _ => b.append_null(),
                }
            }
            Arc::new(b.finish())
        }
        _ => Arc::new(NullArray::new(values.len())),
    }
}

//! End-to-end blocking through the in-process runtime.

use arrow::array::{Array, Int64Array};
use stacker_api::{Block, BlockError, BlockResult, BlockSize, SparseRow, Value};
use stacker_engine::{Blocked, LocalCollection, block};

fn size(n: usize) -> Option<BlockSize> {
    Some(BlockSize::new(n).unwrap())
}

fn blocks_of(collection: LocalCollection<Value>, block_size: Option<BlockSize>) -> Vec<Vec<Block>> {
    block(collection, block_size)
        .unwrap()
        .into_blocks()
        .expect("collection should not be empty")
        .into_partitions()
        .into_iter()
        .map(|p| p.into_iter().collect::<Result<Vec<_>, _>>().unwrap())
        .collect()
}

fn ints(block: &Block) -> Vec<i64> {
    block
        .as_dense()
        .unwrap()
        .iter()
        .map(|v| match v {
            Value::Int64(i) => *i,
            other => panic!("unexpected {other:?}"),
        })
        .collect()
}

#[test]
fn scalars_chunk_per_partition() {
    let collection = LocalCollection::new(vec![
        (1..=5).map(Value::Int64).collect(),
        vec![],
    ]);
    let partitions = blocks_of(collection, size(2));

    let first: Vec<Vec<i64>> = partitions[0].iter().map(ints).collect();
    assert_eq!(first, vec![vec![1, 2], vec![3, 4], vec![5]]);

    // The empty partition still yields one empty block.
    assert_eq!(partitions[1].len(), 1);
    assert!(partitions[1][0].is_empty());
}

#[test]
fn tuples_chunk_field_wise() {
    let records = vec![
        Value::Tuple(vec![Value::Int64(1), Value::from("a")]),
        Value::Tuple(vec![Value::Int64(2), Value::from("b")]),
        Value::Tuple(vec![Value::Int64(3), Value::from("c")]),
    ];
    let partitions = blocks_of(LocalCollection::new(vec![records]), size(2));
    let blocks = &partitions[0];

    assert_eq!(blocks.len(), 2);
    let fields = blocks[0].as_tuple().unwrap();
    assert_eq!(ints(&fields[0]), vec![1, 2]);
    let labels: Vec<&str> = fields[1]
        .as_dense()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(labels, ["a", "b"]);

    let fields = blocks[1].as_tuple().unwrap();
    assert_eq!(ints(&fields[0]), vec![3]);
    assert_eq!(fields[1].len(), 1);
}

#[test]
fn maps_become_one_table_without_block_size() {
    let records = vec![
        Value::map([("x", Value::Int64(1))]),
        Value::map([("x", Value::Int64(2))]),
    ];
    let partitions = blocks_of(LocalCollection::new(vec![records]), None);

    assert_eq!(partitions[0].len(), 1);
    let table = partitions[0][0].as_table().unwrap();
    assert_eq!(table.num_rows(), 2);
    let x = table
        .column_by_name("x")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(x.value(0), 1);
    assert_eq!(x.value(1), 2);
}

#[test]
fn sparse_rows_stack() {
    let n = 6;
    let rows: Vec<Value> = (0..3)
        .map(|i| Value::Sparse(SparseRow::new(n, vec![i * 2], vec![i as f64 + 1.0]).unwrap()))
        .collect();
    let partitions = blocks_of(LocalCollection::new(vec![rows]), size(2));
    let blocks = &partitions[0];

    assert_eq!(blocks.len(), 2);
    let first = blocks[0].as_sparse().unwrap();
    assert_eq!(first.shape(), (2, n));
    assert_eq!(first.get(0, 0), 1.0);
    assert_eq!(first.get(1, 2), 2.0);
    let second = blocks[1].as_sparse().unwrap();
    assert_eq!(second.shape(), (1, n));
    assert_eq!(second.get(0, 4), 3.0);
}

#[test]
fn empty_collection_is_returned_unchanged() {
    let collection: LocalCollection<Value> = LocalCollection::new(vec![vec![], vec![], vec![]]);
    let original = collection.clone();

    let outcome = block(collection, size(3)).unwrap();
    assert!(outcome.is_unchanged());
    match outcome {
        Blocked::Unchanged(c) => assert_eq!(c, original),
        Blocked::Blocks(_) => panic!("empty collection must not be blocked"),
    }
}

#[test]
fn every_partition_uses_the_sampled_strategy() {
    // The sample is a map, so every partition is packed as a table,
    // including the empty one.
    let collection = LocalCollection::new(vec![
        vec![],
        vec![Value::map([("k", Value::from("v"))])],
    ]);
    let partitions = blocks_of(collection, None);

    assert!(partitions.iter().all(|p| p.len() == 1));
    let empty = partitions[0][0].as_table().unwrap();
    assert_eq!(empty.num_rows(), 0);
    assert_eq!(partitions[1][0].as_table().unwrap().num_rows(), 1);
}

#[test]
fn partition_failures_surface_as_items() {
    let records = vec![
        Value::Tuple(vec![Value::Int64(1), Value::Int64(2)]),
        Value::Tuple(vec![Value::Int64(3)]),
    ];
    let healthy = vec![Value::Tuple(vec![Value::Int64(4), Value::Int64(5)])];
    let outcome = block(LocalCollection::new(vec![records, healthy]), None).unwrap();
    let partitions: Vec<Vec<BlockResult>> = outcome.into_blocks().unwrap().into_partitions();

    assert_eq!(partitions[0].len(), 1);
    assert!(matches!(
        partitions[0][0],
        Err(BlockError::SchemaMismatch { expected: 2, .. })
    ));
    assert!(partitions[1][0].is_ok());
}

#[test]
fn empty_tuple_records_are_rejected() {
    let collection = LocalCollection::new(vec![vec![Value::Tuple(vec![]); 5]]);
    let partitions = block(collection, size(2)).unwrap().into_blocks().unwrap().into_partitions();

    assert_eq!(partitions[0].len(), 1);
    assert!(matches!(
        partitions[0][0],
        Err(BlockError::UnexpectedRecord { found: "empty tuple", .. })
    ));
}

#[test]
fn matrix_records_keep_their_axes() {
    let record = |a: i64, b: i64| Value::Array(vec![Value::Int64(a), Value::Int64(b)]);
    let collection = LocalCollection::from_records(
        vec![record(1, 2), record(3, 4), record(5, 6), record(7, 8)],
        2,
    );
    let partitions = blocks_of(collection, None);

    for partition in &partitions {
        assert_eq!(partition.len(), 1);
        assert_eq!(partition[0].shape(), vec![2, 2]);
    }
    let numeric = partitions[1][0].to_f64().unwrap();
    assert_eq!(numeric.as_slice().unwrap(), &[5.0, 6.0, 7.0, 8.0]);
}

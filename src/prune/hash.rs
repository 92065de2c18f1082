//! Per-dimension hash-bucket pruning.

use roaring::RoaringBitmap;

use crate::key::encode_column_value;
use crate::partition::{HashDimension, PartitionSchema};
use crate::predicate::ColumnPredicate;
use crate::scan::ScanSpec;
use crate::schema::Schema;
use crate::value::ColumnValue;

/// True when every column of the dimension carries an equality or in-list
/// predicate, i.e. the scan touches a computable set of buckets.
pub(crate) fn is_dimension_constrained(
    dimension: &HashDimension,
    schema: &Schema,
    scan_spec: &ScanSpec,
) -> bool {
    dimension.column_ids.iter().all(|id| {
        let column = schema
            .column_by_id(*id)
            .expect("hash column resolved at partition-schema construction");
        scan_spec
            .predicates()
            .get(column.name())
            .is_some_and(ColumnPredicate::constrains_hash_bucket)
    })
}

/// The buckets a constrained dimension can hash matching rows into.
///
/// Enumerates the cross-product of the equality / in-list values across the
/// dimension's columns, composite-encodes each tuple exactly as rows are
/// placed, and collects the resulting buckets.
pub(crate) fn prune_hash_component(
    dimension: &HashDimension,
    schema: &Schema,
    scan_spec: &ScanSpec,
) -> RoaringBitmap {
    let mut encoded_tuples: Vec<Vec<u8>> = vec![Vec::new()];
    for (col_offset, column_id) in dimension.column_ids.iter().enumerate() {
        let column = schema
            .column_by_id(*column_id)
            .expect("hash column resolved at partition-schema construction");
        let predicate = scan_spec
            .predicates()
            .get(column.name())
            .expect("constrained dimension carries a predicate per column");
        let values: Vec<&ColumnValue> = match predicate {
            ColumnPredicate::Equality(value) => vec![value],
            ColumnPredicate::InList(values) => values.iter().collect(),
            _ => unreachable!("dimension gated on equality / in-list predicates"),
        };
        let is_last = col_offset + 1 == dimension.column_ids.len();
        let mut next = Vec::with_capacity(encoded_tuples.len() * values.len());
        for tuple in &encoded_tuples {
            for value in &values {
                let mut encoded = tuple.clone();
                encode_column_value(value, is_last, &mut encoded);
                next.push(encoded);
            }
        }
        encoded_tuples = next;
    }

    let mut buckets = RoaringBitmap::new();
    for tuple in &encoded_tuples {
        buckets.insert(PartitionSchema::hash_bucket(dimension, tuple));
    }
    buckets
}

/// Every bucket survives.
pub(crate) fn full_bucket_set(num_buckets: u32) -> RoaringBitmap {
    let mut buckets = RoaringBitmap::new();
    buckets.insert_range(0..num_buckets);
    buckets
}

//! Derivation of the scan's bounds over the range-partition columns.

use crate::key::KeyRow;
use crate::partition::PartitionSchema;
use crate::scan::ScanSpec;
use crate::schema::{ColumnId, Schema};

use super::RangeBounds;

/// The encoded `[lower, upper)` the scan implies over the range columns.
///
/// When the range columns are a prefix of the primary key, the scan's
/// primary-key bounds project onto them; otherwise the bounds come from the
/// per-column predicates. Either side may come back empty (unbounded).
pub(crate) fn scan_range_bounds(
    schema: &Schema,
    partition_schema: &PartitionSchema,
    scan_spec: &ScanSpec,
) -> RangeBounds {
    let range_columns = &partition_schema.range_schema().column_ids;
    if range_columns.is_empty() {
        return RangeBounds::default();
    }
    if range_columns_are_pk_prefix(schema, range_columns) {
        range_keys_from_pk_bounds(schema, scan_spec, range_columns.len())
    } else {
        range_keys_from_predicates(schema, scan_spec, range_columns)
    }
}

/// True if the range columns are a prefix of the primary key columns.
fn range_columns_are_pk_prefix(schema: &Schema, range_columns: &[ColumnId]) -> bool {
    assert!(range_columns.len() <= schema.num_key_columns());
    range_columns
        .iter()
        .enumerate()
        .all(|(idx, id)| schema.column_id(idx) == *id)
}

/// Projects the scan's primary-key bounds onto the range prefix.
fn range_keys_from_pk_bounds(
    schema: &Schema,
    scan_spec: &ScanSpec,
    num_range_columns: usize,
) -> RangeBounds {
    let mut bounds = RangeBounds::default();
    if scan_spec.lower_bound_key().is_none() && scan_spec.exclusive_upper_bound_key().is_none() {
        return bounds;
    }

    if num_range_columns == schema.num_key_columns() {
        // The range key is the whole primary key.
        if let Some(lower) = scan_spec.lower_bound_key() {
            bounds.lower = lower.encoded().to_vec();
        }
        if let Some(upper) = scan_spec.exclusive_upper_bound_key() {
            bounds.upper = upper.encoded().to_vec();
        }
        return bounds;
    }

    let col_idxs: Vec<usize> = (0..num_range_columns).collect();

    if let Some(lower) = scan_spec.lower_bound_key() {
        let mut row = KeyRow::new(schema);
        for &idx in &col_idxs {
            row.set(idx, lower.values()[idx].clone());
        }
        row.encode(&col_idxs, &mut bounds.lower);
    }

    if let Some(upper) = scan_spec.exclusive_upper_bound_key() {
        let mut row = KeyRow::new(schema);
        for &idx in &col_idxs {
            row.set(idx, upper.values()[idx].clone());
        }
        // A minimum-valued suffix means the range prefix of the exclusive
        // upper bound is itself already exclusive; otherwise the prefix
        // must be incremented to convert from inclusive.
        let min_suffix = (num_range_columns..schema.num_key_columns())
            .all(|idx| upper.values()[idx].is_min_value());
        if !min_suffix && !row.increment_key(&col_idxs) {
            // The prefix was the maximum possible value: unbounded above.
            return bounds;
        }
        row.encode(&col_idxs, &mut bounds.upper);
    }

    bounds
}

/// Pushes the predicates on the range columns into encoded bounds.
fn range_keys_from_predicates(
    schema: &Schema,
    scan_spec: &ScanSpec,
    range_columns: &[ColumnId],
) -> RangeBounds {
    let col_idxs: Vec<usize> = range_columns
        .iter()
        .map(|id| {
            let idx = schema
                .find_column_by_id(*id)
                .expect("range column resolved at partition-schema construction");
            assert!(
                idx < schema.num_key_columns(),
                "range column {id} is not a key column"
            );
            idx
        })
        .collect();

    let mut bounds = RangeBounds::default();

    let mut row = KeyRow::new(schema);
    if row.push_lower_bound_predicates(&col_idxs, scan_spec.predicates()) > 0 {
        row.encode(&col_idxs, &mut bounds.lower);
    }

    let mut row = KeyRow::new(schema);
    if row.push_upper_bound_predicates(&col_idxs, scan_spec.predicates()) > 0 {
        row.encode(&col_idxs, &mut bounds.upper);
    }

    bounds
}

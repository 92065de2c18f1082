//! Construction of the partition-key ranges a scan must visit.

use roaring::RoaringBitmap;

use crate::partition::HashDimension;
use crate::scan::ScanSpec;
use crate::schema::Schema;

use super::{hash, PartitionKeyRange, RangeBounds};

/// Builds the ascending set of partition-key ranges covering the scan for
/// one hash schema and one pair of range bounds.
///
/// Dimensions after the final constrained component are truncated from the
/// keys. On the final constrained dimension, when no range bound follows,
/// each bucket's upper bound is `bucket + 1` to turn the inclusive bucket
/// into an exclusive key; `bucket + 1 == num_buckets` is emitted without
/// carry and still compares above every valid bucket encoding.
pub(crate) fn construct_partition_key_ranges(
    schema: &Schema,
    scan_spec: &ScanSpec,
    hash_schema: &[HashDimension],
    range_bounds: &RangeBounds,
) -> Vec<PartitionKeyRange> {
    // Surviving buckets per hash dimension.
    let bucket_sets: Vec<RoaringBitmap> = hash_schema
        .iter()
        .map(|dimension| {
            if hash::is_dimension_constrained(dimension, schema, scan_spec) {
                hash::prune_hash_component(dimension, schema, scan_spec)
            } else {
                hash::full_bucket_set(dimension.num_buckets)
            }
        })
        .collect();

    // One past the last constrained component of the partition key.
    let constrained_index = if !range_bounds.lower.is_empty() || !range_bounds.upper.is_empty() {
        hash_schema.len()
    } else {
        hash_schema.len()
            - bucket_sets
                .iter()
                .zip(hash_schema)
                .rev()
                .take_while(|(buckets, dimension)| {
                    buckets.len() == u64::from(dimension.num_buckets)
                })
                .count()
    };

    // Each constrained dimension appends its surviving bucket numbers to
    // every range built so far. The result size is the product of the
    // surviving bucket counts up to `constrained_index`.
    // TODO: cap the fan-out and fall back to keeping every range once the
    // product of unconstrained bucket counts gets large.
    let mut ranges = vec![PartitionKeyRange::default()];
    for (hash_idx, buckets) in bucket_sets.iter().enumerate().take(constrained_index) {
        let is_last = hash_idx + 1 == constrained_index && range_bounds.upper.is_empty();
        let mut next = Vec::with_capacity(ranges.len() * buckets.len() as usize);
        for range in &ranges {
            for bucket in buckets.iter() {
                let bucket_upper = if is_last { bucket + 1 } else { bucket };
                let mut start = range.start.clone();
                let mut end = range.end.clone();
                start.extend_from_slice(&bucket.to_be_bytes());
                end.extend_from_slice(&bucket_upper.to_be_bytes());
                next.push(PartitionKeyRange { start, end });
            }
        }
        ranges = next;
    }

    for range in &mut ranges {
        range.start.extend_from_slice(&range_bounds.lower);
        range.end.extend_from_slice(&range_bounds.upper);
    }

    // Drop or clamp ranges past the scan's exclusive upper bound.
    let upper_bound = scan_spec.exclusive_upper_bound_partition_key();
    if !upper_bound.is_empty() {
        while let Some(last) = ranges.last_mut() {
            if !last.end.is_empty() && upper_bound >= last.end.as_slice() {
                break;
            }
            if upper_bound <= last.start.as_slice() {
                ranges.pop();
            } else {
                last.end = upper_bound.to_vec();
                break;
            }
        }
    }

    ranges
}

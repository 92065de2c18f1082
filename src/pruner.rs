use tracing::{debug, trace};

use crate::partition::{Partition, PartitionSchema, RangeSegment};
use crate::prune::{range_key, ranges, RangeBounds, SegmentRanges};
use crate::scan::ScanSpec;
use crate::schema::Schema;

/// Supplies encoded partition-key ranges to a scanner so that tablets
/// outside the surviving ranges are skipped entirely.
///
/// The scanner drives the pruner as a cursor: [`next_partition_key`]
/// names the inclusive lower bound of the next tablet to visit, and
/// [`advance_past`] retires everything below a tablet's exclusive upper
/// bound once it has been scanned. [`should_prune`] answers the same
/// question for a single catalog partition.
///
/// A pruner is single-use: construct it, [`init`] it once for a scan, then
/// iterate. It holds its byte strings by value; the schema, partition
/// schema, and scan spec are only borrowed for the duration of `init`.
///
/// [`init`]: PartitionPruner::init
/// [`next_partition_key`]: PartitionPruner::next_partition_key
/// [`advance_past`]: PartitionPruner::advance_past
/// [`should_prune`]: PartitionPruner::should_prune
///
/// # Examples
///
/// ```
/// use swath::{
///     ColumnId, ColumnPredicate, ColumnSchema, ColumnType, ColumnValue, HashDimension,
///     PartitionPruner, PartitionSchema, RangeSchema, ScanSpec, Schema,
/// };
///
/// # fn main() -> Result<(), swath::SwathError> {
/// let schema = Schema::try_new(
///     vec![
///         ColumnSchema::new(ColumnId(0), "host", ColumnType::String),
///         ColumnSchema::new(ColumnId(1), "metric", ColumnType::String),
///     ],
///     2,
/// )?;
/// let partition_schema = PartitionSchema::try_new(
///     &schema,
///     vec![HashDimension {
///         column_ids: vec![ColumnId(0)],
///         num_buckets: 8,
///         seed: 0,
///     }],
///     RangeSchema::default(),
///     vec![],
/// )?;
///
/// let mut scan_spec = ScanSpec::new();
/// scan_spec.set_predicate(
///     "host",
///     ColumnPredicate::Equality(ColumnValue::String("a17".to_string())),
/// );
///
/// let mut pruner = PartitionPruner::new();
/// pruner.init(&schema, &partition_schema, &scan_spec);
///
/// // One bucket of eight survives.
/// assert_eq!(pruner.num_ranges_remaining(), 1);
/// let bucket = pruner.next_partition_key().to_vec();
///
/// // After scanning the tablets in [bucket, bucket + 1), retire the range.
/// let bucket_end = (u32::from_be_bytes(bucket[..4].try_into().unwrap()) + 1).to_be_bytes();
/// pruner.advance_past(&bucket_end);
/// assert!(!pruner.has_more());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PartitionPruner {
    segment_ranges: Vec<SegmentRanges>,
}

impl PartitionPruner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the pruner for a new scan. The scan spec should already
    /// be optimized: no statically-false predicates, and the lower
    /// primary-key bound below the upper one.
    pub fn init(
        &mut self,
        schema: &Schema,
        partition_schema: &PartitionSchema,
        scan_spec: &ScanSpec,
    ) {
        self.segment_ranges.clear();
        if scan_spec.can_short_circuit() {
            debug!("scan short-circuits, skipping partition pruning");
            return;
        }

        let scan_bounds = range_key::scan_range_bounds(schema, partition_schema, scan_spec);

        if partition_schema.ranges_with_hash_schemas().is_empty() {
            // One segment covering the whole range-key space, using the
            // table-wide hash schema.
            let mut partition_key_ranges = ranges::construct_partition_key_ranges(
                schema,
                scan_spec,
                partition_schema.hash_schema(),
                &scan_bounds,
            );
            partition_key_ranges.reverse();
            self.segment_ranges.push(SegmentRanges {
                range_bounds: RangeBounds::default(),
                partition_key_ranges,
            });
        } else {
            for segment in partition_schema.ranges_with_hash_schemas() {
                if !segment_overlaps_scan(segment, &scan_bounds) {
                    continue;
                }
                // An explicitly bounded scan overrides the segment's own
                // bounds; otherwise the segment covers itself.
                let bounds = if scan_bounds.lower.is_empty() && scan_bounds.upper.is_empty() {
                    RangeBounds {
                        lower: segment.lower().to_vec(),
                        upper: segment.upper().to_vec(),
                    }
                } else {
                    scan_bounds.clone()
                };
                let mut partition_key_ranges = ranges::construct_partition_key_ranges(
                    schema,
                    scan_spec,
                    segment.hash_schema(),
                    &bounds,
                );
                partition_key_ranges.reverse();
                self.segment_ranges.push(SegmentRanges {
                    range_bounds: RangeBounds {
                        lower: segment.lower().to_vec(),
                        upper: segment.upper().to_vec(),
                    },
                    partition_key_ranges,
                });
            }
        }

        if !scan_spec.lower_bound_partition_key().is_empty() {
            self.advance_past(scan_spec.lower_bound_partition_key());
        }

        trace!(
            num_ranges = self.num_ranges_remaining(),
            "partition pruner initialized"
        );
    }

    /// True while at least one partition key range remains.
    pub fn has_more(&self) -> bool {
        self.num_ranges_remaining() != 0
    }

    /// The inclusive lower bound partition key of the next tablet to scan.
    ///
    /// Does not advance the cursor; call [`advance_past`] with the scanned
    /// tablet's upper bound when done.
    ///
    /// # Panics
    ///
    /// Panics when no ranges remain.
    ///
    /// [`advance_past`]: PartitionPruner::advance_past
    pub fn next_partition_key(&self) -> &[u8] {
        assert!(self.has_more(), "no partition key ranges remain");
        self.segment_ranges
            .iter()
            .rev()
            .find_map(|segment| segment.partition_key_ranges.last())
            .map(|range| range.start.as_slice())
            .expect("a non-empty segment exists while has_more holds")
    }

    /// Removes every range up to the exclusive `upper_bound` partition key,
    /// clamping a range the bound falls inside. An empty bound clears the
    /// cursor.
    pub fn advance_past(&mut self, upper_bound: &[u8]) {
        if upper_bound.is_empty() {
            self.segment_ranges.clear();
            return;
        }
        for segment in &mut self.segment_ranges {
            let ranges = &mut segment.partition_key_ranges;
            while let Some(last) = ranges.last_mut() {
                if upper_bound <= last.start.as_slice() {
                    break;
                }
                if last.end.is_empty() || upper_bound < last.end.as_slice() {
                    last.start = upper_bound.to_vec();
                    break;
                }
                ranges.pop();
            }
        }
    }

    /// True if no surviving range can intersect the partition.
    pub fn should_prune(&self, partition: &Partition) -> bool {
        for segment in &self.segment_ranges {
            let range_bounds = &segment.range_bounds;
            // A partition is skipped as belonging to another range segment
            // only when both of its range keys differ from both segment
            // bounds.
            if !range_bounds.lower.is_empty()
                && partition.range_key_start() != range_bounds.lower.as_slice()
                && !range_bounds.upper.is_empty()
                && partition.range_key_end() != range_bounds.upper.as_slice()
            {
                continue;
            }

            // Ranges are stored descending by start, so the ranges ending
            // above the partition's start form a prefix; the last of them
            // is the first range, in ascending order, the partition could
            // reach.
            let ranges = &segment.partition_key_ranges;
            let prefix_len = ranges.partition_point(|range| {
                range.end.is_empty() || range.end.as_slice() > partition.partition_key_start()
            });
            if prefix_len > 0 {
                let range = &ranges[prefix_len - 1];
                let wholly_before = !partition.partition_key_end().is_empty()
                    && partition.partition_key_end() <= range.start.as_slice();
                if !wholly_before {
                    return false;
                }
            }
        }
        true
    }

    /// The number of partition key ranges left in the cursor.
    pub fn num_ranges_remaining(&self) -> usize {
        self.segment_ranges
            .iter()
            .map(|segment| segment.partition_key_ranges.len())
            .sum()
    }

    /// Renders the surviving ranges in ascending order for debugging,
    /// substituting `<start>` and `<end>` for unbounded sides.
    pub fn debug_string(&self, schema: &Schema, partition_schema: &PartitionSchema) -> String {
        let mut rendered = Vec::new();
        for segment in &self.segment_ranges {
            for range in segment.partition_key_ranges.iter().rev() {
                rendered.push(format!(
                    "[({}), ({}))",
                    render_bound(&range.start, "<start>", schema, partition_schema),
                    render_bound(&range.end, "<end>", schema, partition_schema),
                ));
            }
        }
        rendered.join(", ")
    }
}

fn render_bound(
    bound: &[u8],
    unbounded: &str,
    schema: &Schema,
    partition_schema: &PartitionSchema,
) -> String {
    if bound.is_empty() {
        unbounded.to_string()
    } else {
        partition_schema.partition_key_debug_string(bound, schema)
    }
}

/// Half-open overlap test between a range segment and the scan's range
/// bounds, with empty meaning unbounded on that side.
fn segment_overlaps_scan(segment: &RangeSegment, scan: &RangeBounds) -> bool {
    if scan.lower.is_empty() && scan.upper.is_empty() {
        return true;
    }
    if scan.lower.is_empty() {
        return scan.upper.as_slice() > segment.lower();
    }
    if scan.upper.is_empty() {
        return segment.upper().is_empty() || scan.lower.as_slice() < segment.upper();
    }
    (segment.upper().is_empty() || scan.lower.as_slice() < segment.upper())
        && scan.upper.as_slice() > segment.lower()
}

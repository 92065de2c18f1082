use std::io::Cursor;

use crate::error::SwathError;
use crate::key::decode_column_value;
use crate::schema::{ColumnId, Schema};

/// One hash dimension of a partition schema: a tuple of key columns hashed
/// into a fixed number of buckets. Every partition key carries one 4-byte
/// big-endian bucket index per dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct HashDimension {
    pub column_ids: Vec<ColumnId>,
    pub num_buckets: u32,
    pub seed: u32,
}

/// The ordered hash dimensions of a table or range segment.
pub type HashSchema = Vec<HashDimension>;

/// The range dimension: an ordered prefix of key columns whose encoding
/// forms the tail of the partition key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeSchema {
    pub column_ids: Vec<ColumnId>,
}

/// A contiguous interval of the range-key space with its own hash schema,
/// overriding the table-wide one. Empty bounds are unbounded.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeSegment {
    lower: Vec<u8>,
    upper: Vec<u8>,
    hash_schema: HashSchema,
}

impl RangeSegment {
    pub fn new(lower: Vec<u8>, upper: Vec<u8>, hash_schema: HashSchema) -> Self {
        Self {
            lower,
            upper,
            hash_schema,
        }
    }

    /// Inclusive encoded lower bound; empty means unbounded.
    pub fn lower(&self) -> &[u8] {
        &self.lower
    }

    /// Exclusive encoded upper bound; empty means unbounded.
    pub fn upper(&self) -> &[u8] {
        &self.upper
    }

    pub fn hash_schema(&self) -> &HashSchema {
        &self.hash_schema
    }
}

/// How a table maps rows to tablets: hash dimensions followed by an
/// optional range dimension, optionally overridden per range segment.
#[derive(Clone, Debug)]
pub struct PartitionSchema {
    hash_schema: HashSchema,
    range_schema: RangeSchema,
    ranges_with_hash_schemas: Vec<RangeSegment>,
}

impl PartitionSchema {
    /// Validates the partition schema against the table schema.
    ///
    /// # Errors
    ///
    /// Every hash and range column id must resolve to a key column; hash
    /// dimensions need at least one column and two buckets; range segments
    /// must be well-formed, sorted ascending, and non-overlapping.
    pub fn try_new(
        schema: &Schema,
        hash_schema: HashSchema,
        range_schema: RangeSchema,
        ranges_with_hash_schemas: Vec<RangeSegment>,
    ) -> Result<Self, SwathError> {
        validate_hash_schema(schema, &hash_schema)?;
        for id in &range_schema.column_ids {
            validate_key_column(schema, *id)?;
        }
        for window in ranges_with_hash_schemas.windows(2) {
            let (previous, next) = (&window[0], &window[1]);
            if previous.upper.is_empty() || next.lower.is_empty() {
                return Err(SwathError::UnorderedRangeSegments);
            }
            if previous.upper > next.lower {
                return Err(SwathError::UnorderedRangeSegments);
            }
        }
        for segment in &ranges_with_hash_schemas {
            if !segment.lower.is_empty()
                && !segment.upper.is_empty()
                && segment.lower >= segment.upper
            {
                return Err(SwathError::InvalidRangeSegmentBounds);
            }
            validate_hash_schema(schema, &segment.hash_schema)?;
        }
        Ok(Self {
            hash_schema,
            range_schema,
            ranges_with_hash_schemas,
        })
    }

    pub fn hash_schema(&self) -> &HashSchema {
        &self.hash_schema
    }

    pub fn range_schema(&self) -> &RangeSchema {
        &self.range_schema
    }

    pub fn ranges_with_hash_schemas(&self) -> &[RangeSegment] {
        &self.ranges_with_hash_schemas
    }

    /// The bucket the storage layer places an encoded column tuple into.
    ///
    /// `encoded_columns` must be the composite encoding of the dimension's
    /// columns, final column marked, byte-identical to how rows are placed.
    pub fn hash_bucket(dimension: &HashDimension, encoded_columns: &[u8]) -> u32 {
        let hash = murmur3::murmur3_32(&mut Cursor::new(encoded_columns), dimension.seed)
            .expect("hashing an in-memory buffer cannot fail");
        hash % dimension.num_buckets
    }

    /// Renders an encoded partition key for debugging: the leading bucket
    /// indices per table-wide hash dimension, then the range columns.
    /// Tolerates truncated keys and the `bucket == num_buckets` byte
    /// pattern that exclusive upper bounds carry.
    pub fn partition_key_debug_string(&self, key: &[u8], schema: &Schema) -> String {
        let mut parts = Vec::new();
        let mut rest = key;
        for _ in &self.hash_schema {
            if rest.is_empty() {
                break;
            }
            let Some((bucket, tail)) = rest.split_first_chunk::<4>() else {
                parts.push("bucket=<truncated>".to_string());
                rest = &[];
                break;
            };
            parts.push(format!("bucket={}", u32::from_be_bytes(*bucket)));
            rest = tail;
        }
        let range_ids = &self.range_schema.column_ids;
        for (pos, id) in range_ids.iter().enumerate() {
            if rest.is_empty() {
                break;
            }
            let Some(idx) = schema.find_column_by_id(*id) else {
                break;
            };
            let column = schema.column(idx);
            match decode_column_value(column.column_type(), pos + 1 == range_ids.len(), rest) {
                Some((value, tail)) => {
                    parts.push(format!("{}={}", column.name(), value));
                    rest = tail;
                }
                None => {
                    parts.push(format!("{}=<truncated>", column.name()));
                    rest = &[];
                }
            }
        }
        parts.join(", ")
    }
}

/// A catalog partition: the encoded range-key interval it belongs to and
/// the partition-key interval its tablet owns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    range_key_start: Vec<u8>,
    range_key_end: Vec<u8>,
    partition_key_start: Vec<u8>,
    partition_key_end: Vec<u8>,
}

impl Partition {
    pub fn new(
        range_key_start: Vec<u8>,
        range_key_end: Vec<u8>,
        partition_key_start: Vec<u8>,
        partition_key_end: Vec<u8>,
    ) -> Self {
        Self {
            range_key_start,
            range_key_end,
            partition_key_start,
            partition_key_end,
        }
    }

    pub fn range_key_start(&self) -> &[u8] {
        &self.range_key_start
    }

    pub fn range_key_end(&self) -> &[u8] {
        &self.range_key_end
    }

    pub fn partition_key_start(&self) -> &[u8] {
        &self.partition_key_start
    }

    pub fn partition_key_end(&self) -> &[u8] {
        &self.partition_key_end
    }
}

fn validate_hash_schema(schema: &Schema, hash_schema: &HashSchema) -> Result<(), SwathError> {
    for dimension in hash_schema {
        if dimension.column_ids.is_empty() {
            return Err(SwathError::EmptyHashDimension);
        }
        if dimension.num_buckets < 2 {
            return Err(SwathError::TooFewHashBuckets {
                num_buckets: dimension.num_buckets,
            });
        }
        for id in &dimension.column_ids {
            validate_key_column(schema, *id)?;
        }
    }
    Ok(())
}

fn validate_key_column(schema: &Schema, id: ColumnId) -> Result<(), SwathError> {
    match schema.find_column_by_id(id) {
        None => Err(SwathError::UnknownColumnId { id }),
        Some(idx) if idx >= schema.num_key_columns() => Err(SwathError::NotAKeyColumn { id }),
        Some(_) => Ok(()),
    }
}

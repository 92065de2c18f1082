//! Partition-key range pruning for hash- and range-partitioned table scans.
//!
//! A partitioned table spreads its rows over tablets, each owning a
//! contiguous interval of encoded partition keys. A partition key is the
//! concatenation of one 4-byte big-endian bucket index per hash dimension
//! and the order-preserving encoding of the range columns, so tablet
//! placement order is plain byte order.
//!
//! [`PartitionPruner`] intersects a scan's column predicates, primary-key
//! bounds, and partition-key bounds with the table's [`PartitionSchema`]
//! and hands the scanner the minimal ascending set of encoded
//! partition-key ranges it has to visit. Tablets outside those ranges are
//! never contacted.
//!
//! The crate is a planning component: it performs no I/O, holds no locks,
//! and a pruner instance serves exactly one scan.
//!
//! # Examples
//!
//! ```
//! use swath::{
//!     ColumnId, ColumnPredicate, ColumnSchema, ColumnType, ColumnValue, HashDimension,
//!     PartitionPruner, PartitionSchema, RangeSchema, ScanSpec, Schema,
//! };
//!
//! # fn main() -> Result<(), swath::SwathError> {
//! // CREATE TABLE metrics (host STRING, time INT64, value INT64)
//! //   PRIMARY KEY (host, time)
//! //   HASH (host) INTO 4 BUCKETS, RANGE (time)  -- conceptually
//! let schema = Schema::try_new(
//!     vec![
//!         ColumnSchema::new(ColumnId(0), "host", ColumnType::String),
//!         ColumnSchema::new(ColumnId(1), "time", ColumnType::Int64),
//!         ColumnSchema::new(ColumnId(2), "value", ColumnType::Int64),
//!     ],
//!     2,
//! )?;
//! let partition_schema = PartitionSchema::try_new(
//!     &schema,
//!     vec![HashDimension {
//!         column_ids: vec![ColumnId(0)],
//!         num_buckets: 4,
//!         seed: 0,
//!     }],
//!     RangeSchema { column_ids: vec![ColumnId(1)] },
//!     vec![],
//! )?;
//!
//! // SELECT * FROM metrics WHERE host = 'a17' AND time >= 1000 AND time < 2000
//! let mut scan_spec = ScanSpec::new();
//! scan_spec.set_predicate(
//!     "host",
//!     ColumnPredicate::Equality(ColumnValue::String("a17".to_string())),
//! );
//! scan_spec.set_predicate(
//!     "time",
//!     ColumnPredicate::Range {
//!         lower: Some(ColumnValue::Int64(1000)),
//!         upper: Some(ColumnValue::Int64(2000)),
//!     },
//! );
//!
//! let mut pruner = PartitionPruner::new();
//! pruner.init(&schema, &partition_schema, &scan_spec);
//!
//! // Only host's bucket survives, clipped to the scanned time interval.
//! assert_eq!(pruner.num_ranges_remaining(), 1);
//! let key = pruner.next_partition_key();
//! assert!(!key.is_empty());
//!
//! // The scanner retires each range through its exclusive upper bound as
//! // it goes; an empty bound drains the cursor.
//! pruner.advance_past(&[]);
//! assert!(!pruner.has_more());
//! # Ok(())
//! # }
//! ```

mod error;
mod key;
mod partition;
mod predicate;
mod prune;
mod pruner;
mod scan;
mod schema;
mod value;

pub use error::SwathError;
pub use key::{encode_column_value, encode_key_values, EncodedKey};
pub use partition::{
    HashDimension, HashSchema, Partition, PartitionSchema, RangeSchema, RangeSegment,
};
pub use predicate::ColumnPredicate;
pub use pruner::PartitionPruner;
pub use scan::ScanSpec;
pub use schema::{ColumnId, ColumnSchema, Schema};
pub use value::{ColumnType, ColumnValue};

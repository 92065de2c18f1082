use thiserror::Error;

use crate::schema::ColumnId;
use crate::value::ColumnType;

/// Errors raised while assembling schemas, encoded keys, and partition
/// schemas.
///
/// Pruning itself never fails: an empty cursor is a normal outcome, and
/// precondition violations (such as reading past the end of the cursor)
/// abort instead of surfacing here.
#[derive(Debug, Error, Clone)]
pub enum SwathError {
    /// The schema has no columns at all
    #[error("schema must have at least one column")]
    EmptySchema,

    /// The schema declares no key columns
    #[error("schema must declare at least one key column")]
    NoKeyColumns,

    /// More key columns declared than columns present
    #[error("schema declares {num_key_columns} key columns but only has {num_columns} columns")]
    KeyColumnCount {
        /// Declared key column count
        num_key_columns: usize,
        /// Total column count
        num_columns: usize,
    },

    /// Two columns share a name
    #[error("duplicate column name '{name}'")]
    DuplicateColumnName {
        /// The repeated name
        name: String,
    },

    /// Two columns share an id
    #[error("duplicate column id {id}")]
    DuplicateColumnId {
        /// The repeated id
        id: ColumnId,
    },

    /// A key was built with the wrong number of values
    #[error("key has {found} values but the schema has {expected} key columns")]
    KeyValueCount {
        /// Key columns in the schema
        expected: usize,
        /// Values supplied
        found: usize,
    },

    /// A key value does not match its column's type
    #[error("column '{column}' expects {expected:?}, got {found:?}")]
    TypeMismatch {
        /// Name of the mismatched column
        column: String,
        /// Declared column type
        expected: ColumnType,
        /// Type of the supplied value
        found: ColumnType,
    },

    /// A hash dimension lists no columns
    #[error("hash dimension has no columns")]
    EmptyHashDimension,

    /// A hash dimension cannot spread rows over fewer than two buckets
    #[error("hash dimension must have at least two buckets, got {num_buckets}")]
    TooFewHashBuckets {
        /// Declared bucket count
        num_buckets: u32,
    },

    /// A partition-schema column id is not present in the schema
    #[error("column id {id} not found in schema")]
    UnknownColumnId {
        /// The unresolved id
        id: ColumnId,
    },

    /// Hash and range columns must be drawn from the key columns
    #[error("column id {id} is not a key column")]
    NotAKeyColumn {
        /// The offending id
        id: ColumnId,
    },

    /// A bounded range segment whose lower bound is not below its upper
    #[error("range segment lower bound is not below its upper bound")]
    InvalidRangeSegmentBounds,

    /// Range segments must be sorted ascending and non-overlapping
    #[error("range segments overlap or are out of order")]
    UnorderedRangeSegments,
}

//! Key encoding and predicate push-down utilities.

mod encoder;
mod util;

pub use encoder::{encode_column_value, encode_key_values};
pub(crate) use encoder::decode_column_value;
pub(crate) use util::KeyRow;

use crate::error::SwathError;
use crate::schema::Schema;
use crate::value::ColumnValue;

/// A primary-key bound: the per-column values alongside their composite
/// encoding, so both the byte form and the column projections are
/// available without re-decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedKey {
    values: Vec<ColumnValue>,
    encoded: Vec<u8>,
}

impl EncodedKey {
    /// Encodes a full primary-key tuple.
    ///
    /// # Errors
    ///
    /// The values must match the schema's key columns in arity and type.
    pub fn new(schema: &Schema, values: Vec<ColumnValue>) -> Result<Self, SwathError> {
        if values.len() != schema.num_key_columns() {
            return Err(SwathError::KeyValueCount {
                expected: schema.num_key_columns(),
                found: values.len(),
            });
        }
        for (idx, value) in values.iter().enumerate() {
            let column = schema.column(idx);
            if value.column_type() != column.column_type() {
                return Err(SwathError::TypeMismatch {
                    column: column.name().to_string(),
                    expected: column.column_type(),
                    found: value.column_type(),
                });
            }
        }
        let encoded = encode_key_values(&values);
        Ok(Self { values, encoded })
    }

    /// The composite encoding of the whole key.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// The per-column values, in key-column order.
    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }
}

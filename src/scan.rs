use std::collections::HashMap;

use crate::key::EncodedKey;
use crate::predicate::ColumnPredicate;

/// What a scan asks for: per-column predicates plus optional encoded
/// primary-key and partition-key bounds.
///
/// The spec is expected to have been optimized upstream: statically-false
/// predicates eliminated, the lower primary-key bound below the upper, and
/// `short_circuit` set when the scan provably matches no rows.
#[derive(Debug, Default)]
pub struct ScanSpec {
    predicates: HashMap<String, ColumnPredicate>,
    lower_bound_key: Option<EncodedKey>,
    exclusive_upper_bound_key: Option<EncodedKey>,
    lower_bound_partition_key: Vec<u8>,
    exclusive_upper_bound_partition_key: Vec<u8>,
    short_circuit: bool,
}

impl ScanSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a predicate to a column, replacing any previous one.
    pub fn set_predicate(&mut self, column: impl Into<String>, predicate: ColumnPredicate) {
        self.predicates.insert(column.into(), predicate);
    }

    /// Inclusive primary-key lower bound.
    pub fn set_lower_bound_key(&mut self, key: EncodedKey) {
        self.lower_bound_key = Some(key);
    }

    /// Exclusive primary-key upper bound.
    pub fn set_exclusive_upper_bound_key(&mut self, key: EncodedKey) {
        self.exclusive_upper_bound_key = Some(key);
    }

    /// Inclusive partition-key lower bound, already encoded.
    pub fn set_lower_bound_partition_key(&mut self, key: Vec<u8>) {
        self.lower_bound_partition_key = key;
    }

    /// Exclusive partition-key upper bound, already encoded.
    pub fn set_exclusive_upper_bound_partition_key(&mut self, key: Vec<u8>) {
        self.exclusive_upper_bound_partition_key = key;
    }

    /// Marks the scan as statically empty.
    pub fn set_short_circuit(&mut self, short_circuit: bool) {
        self.short_circuit = short_circuit;
    }

    pub fn predicates(&self) -> &HashMap<String, ColumnPredicate> {
        &self.predicates
    }

    pub fn lower_bound_key(&self) -> Option<&EncodedKey> {
        self.lower_bound_key.as_ref()
    }

    pub fn exclusive_upper_bound_key(&self) -> Option<&EncodedKey> {
        self.exclusive_upper_bound_key.as_ref()
    }

    pub fn lower_bound_partition_key(&self) -> &[u8] {
        &self.lower_bound_partition_key
    }

    pub fn exclusive_upper_bound_partition_key(&self) -> &[u8] {
        &self.exclusive_upper_bound_partition_key
    }

    pub fn can_short_circuit(&self) -> bool {
        self.short_circuit
    }
}

use crate::value::ColumnValue;

/// A per-column constraint attached to a scan.
///
/// Equality and in-list predicates can pin a hash dimension to a subset of
/// its buckets; any kind carrying a bound can tighten the range portion of
/// the partition key.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnPredicate {
    /// The column equals the value.
    Equality(ColumnValue),
    /// The column equals one of the values. Callers supply the values
    /// sorted ascending and deduplicated.
    InList(Vec<ColumnValue>),
    /// Inclusive lower and exclusive upper bound; either side may be open.
    Range {
        lower: Option<ColumnValue>,
        upper: Option<ColumnValue>,
    },
    IsNotNull,
    IsNull,
    /// Statically unsatisfiable. The scan-spec optimizer eliminates these
    /// before the pruner runs.
    None,
}

impl ColumnPredicate {
    /// True for the kinds that pin a hash dimension to specific buckets.
    pub(crate) fn constrains_hash_bucket(&self) -> bool {
        matches!(
            self,
            ColumnPredicate::Equality(_) | ColumnPredicate::InList(_)
        )
    }
}

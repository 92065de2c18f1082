//! Predicate push-down into key rows.

use std::collections::HashMap;

use crate::predicate::ColumnPredicate;
use crate::schema::Schema;
use crate::value::ColumnValue;

use super::encoder::encode_column_value;

/// A row over the key columns, initialized to each column's minimum value
/// so that unpushed trailing columns encode as the tightest possible fill.
pub(crate) struct KeyRow<'a> {
    schema: &'a Schema,
    values: Vec<ColumnValue>,
}

impl<'a> KeyRow<'a> {
    pub(crate) fn new(schema: &'a Schema) -> Self {
        let values = (0..schema.num_key_columns())
            .map(|idx| schema.column(idx).column_type().min_value())
            .collect();
        Self { schema, values }
    }

    pub(crate) fn set(&mut self, idx: usize, value: ColumnValue) {
        self.values[idx] = value;
    }

    /// Writes the tightest lower-bound value of each column's predicate
    /// into the row, in `col_idxs` order, and returns the contiguous count
    /// pushed from the front.
    ///
    /// An equality predicate pins the column exactly, so later columns can
    /// still tighten the bound; in-list and range bounds are not points,
    /// so they are pushed and then the walk stops. Any column without a
    /// usable bound stops the walk.
    pub(crate) fn push_lower_bound_predicates(
        &mut self,
        col_idxs: &[usize],
        predicates: &HashMap<String, ColumnPredicate>,
    ) -> usize {
        let mut pushed = 0;
        for &idx in col_idxs {
            let column = self.schema.column(idx);
            let Some(predicate) = predicates.get(column.name()) else {
                break;
            };
            match predicate {
                ColumnPredicate::Equality(value) => {
                    self.values[idx] = value.clone();
                    pushed += 1;
                }
                ColumnPredicate::InList(values) if !values.is_empty() => {
                    self.values[idx] = values[0].clone();
                    pushed += 1;
                    break;
                }
                ColumnPredicate::Range {
                    lower: Some(lower), ..
                } => {
                    self.values[idx] = lower.clone();
                    pushed += 1;
                    break;
                }
                _ => break,
            }
        }
        pushed
    }

    /// Writes the tightest upper-bound value of each column's predicate
    /// into the row and returns the contiguous count pushed from the front.
    ///
    /// Equality and in-list bounds are inclusive, so a walk that ends on
    /// them increments the pushed prefix to make the bound exclusive; a
    /// range upper bound is already exclusive. Returns 0 when the increment
    /// overflows: the bound covers the maximum key and prunes nothing.
    pub(crate) fn push_upper_bound_predicates(
        &mut self,
        col_idxs: &[usize],
        predicates: &HashMap<String, ColumnPredicate>,
    ) -> usize {
        let mut pushed = 0;
        let mut inclusive = true;
        for &idx in col_idxs {
            let column = self.schema.column(idx);
            let Some(predicate) = predicates.get(column.name()) else {
                break;
            };
            match predicate {
                ColumnPredicate::Equality(value) => {
                    self.values[idx] = value.clone();
                    pushed += 1;
                }
                ColumnPredicate::InList(values) if !values.is_empty() => {
                    self.values[idx] = values[values.len() - 1].clone();
                    pushed += 1;
                    break;
                }
                ColumnPredicate::Range {
                    upper: Some(upper), ..
                } => {
                    self.values[idx] = upper.clone();
                    pushed += 1;
                    inclusive = false;
                    break;
                }
                _ => break,
            }
        }
        if pushed == 0 {
            return 0;
        }
        if inclusive && !self.increment_key(&col_idxs[..pushed]) {
            return 0;
        }
        pushed
    }

    /// Lexicographic successor of the columns named by `col_idxs`, rippling
    /// the carry backwards from the last column. False iff every column
    /// wrapped, i.e. the key was already the maximum.
    pub(crate) fn increment_key(&mut self, col_idxs: &[usize]) -> bool {
        for &idx in col_idxs.iter().rev() {
            if self.values[idx].increment() {
                return true;
            }
        }
        false
    }

    /// Composite-encodes the columns named by `col_idxs`.
    pub(crate) fn encode(&self, col_idxs: &[usize], buf: &mut Vec<u8>) {
        for (pos, &idx) in col_idxs.iter().enumerate() {
            encode_column_value(&self.values[idx], pos + 1 == col_idxs.len(), buf);
        }
    }
}

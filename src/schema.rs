use std::collections::HashSet;
use std::fmt;

use crate::error::SwathError;
use crate::value::ColumnType;

/// Stable identifier of a column, independent of its position.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ColumnId(pub u32);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One column of a table schema.
#[derive(Clone, Debug)]
pub struct ColumnSchema {
    id: ColumnId,
    name: String,
    column_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(id: ColumnId, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id,
            name: name.into(),
            column_type,
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// A table schema: columns in declaration order, with the first
/// `num_key_columns` forming the primary key.
#[derive(Clone, Debug)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
    num_key_columns: usize,
}

impl Schema {
    /// Validates and builds a schema.
    ///
    /// # Errors
    ///
    /// Rejects empty schemas, zero or out-of-range key column counts, and
    /// duplicate column names or ids.
    pub fn try_new(
        columns: Vec<ColumnSchema>,
        num_key_columns: usize,
    ) -> Result<Self, SwathError> {
        if columns.is_empty() {
            return Err(SwathError::EmptySchema);
        }
        if num_key_columns == 0 {
            return Err(SwathError::NoKeyColumns);
        }
        if num_key_columns > columns.len() {
            return Err(SwathError::KeyColumnCount {
                num_key_columns,
                num_columns: columns.len(),
            });
        }
        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(SwathError::DuplicateColumnName {
                    name: column.name.clone(),
                });
            }
            if !ids.insert(column.id) {
                return Err(SwathError::DuplicateColumnId { id: column.id });
            }
        }
        Ok(Self {
            columns,
            num_key_columns,
        })
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_key_columns(&self) -> usize {
        self.num_key_columns
    }

    /// The column at `idx`. Panics when out of range.
    pub fn column(&self, idx: usize) -> &ColumnSchema {
        &self.columns[idx]
    }

    /// The id of the column at `idx`. Panics when out of range.
    pub fn column_id(&self, idx: usize) -> ColumnId {
        self.columns[idx].id
    }

    /// Position of the column with the given id.
    pub fn find_column_by_id(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| column.id == id)
    }

    /// The column with the given id.
    pub fn column_by_id(&self, id: ColumnId) -> Option<&ColumnSchema> {
        self.columns.iter().find(|column| column.id == id)
    }
}

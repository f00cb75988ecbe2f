use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::select::{Select, Value};

/// Query execution error.
///
/// These are **storage errors** (missing tables/columns, driver failures) as
/// opposed to catalog-level errors (bad arguments, unresolved scope).
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("type mismatch for column {column}: expected {expected}")]
    TypeMismatch { column: String, expected: &'static str },

    #[error("storage error: {0}")]
    Storage(String),
}

/// One result row: ordered column/value pairs with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, used when registering fixture rows.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn int(&self, column: &str) -> Result<i64, ExecutorError> {
        match self.get(column) {
            Some(Value::Int(value)) => Ok(*value),
            Some(_) => Err(ExecutorError::TypeMismatch {
                column: column.to_string(),
                expected: "integer",
            }),
            None => Err(ExecutorError::UnknownColumn(column.to_string())),
        }
    }

    /// Float accessor; integer columns coerce.
    pub fn float(&self, column: &str) -> Result<f64, ExecutorError> {
        match self.get(column) {
            Some(Value::Float(value)) => Ok(*value),
            Some(Value::Int(value)) => Ok(*value as f64),
            Some(_) => Err(ExecutorError::TypeMismatch {
                column: column.to_string(),
                expected: "float",
            }),
            None => Err(ExecutorError::UnknownColumn(column.to_string())),
        }
    }

    pub fn str(&self, column: &str) -> Result<&str, ExecutorError> {
        match self.get(column) {
            Some(Value::Str(value)) => Ok(value.as_str()),
            Some(_) => Err(ExecutorError::TypeMismatch {
                column: column.to_string(),
                expected: "string",
            }),
            None => Err(ExecutorError::UnknownColumn(column.to_string())),
        }
    }
}

/// Read-only query executor.
///
/// Implementations must evaluate the full [`Select`] semantics (projection,
/// inner joins, predicates, group-by dedup, distinct, ordering, limit) and
/// must not retry on failure; retry policy belongs to callers.
pub trait QueryExecutor: Send + Sync {
    /// Execute a query description and return its flat row sequence.
    fn fetch(&self, select: &Select) -> Result<Vec<Row>, ExecutorError>;

    /// Fetch one column as a flat value sequence, in row order.
    fn fetch_column(&self, select: &Select, column: &str) -> Result<Vec<Value>, ExecutorError> {
        let rows = self.fetch(select)?;
        rows.iter()
            .map(|row| {
                row.get(column)
                    .cloned()
                    .ok_or_else(|| ExecutorError::UnknownColumn(column.to_string()))
            })
            .collect()
    }

    /// Fetch one integer column as a flat id sequence, in row order.
    fn fetch_ids(&self, select: &Select, column: &str) -> Result<Vec<i64>, ExecutorError> {
        let rows = self.fetch(select)?;
        rows.iter().map(|row| row.int(column)).collect()
    }

    /// Fetch two integer columns as a key/value mapping.
    ///
    /// Same-key rows overwrite, so the result holds exactly one value per
    /// key; callers use this as a dedup.
    fn fetch_keyed(
        &self,
        select: &Select,
        key_column: &str,
        value_column: &str,
    ) -> Result<HashMap<i64, i64>, ExecutorError> {
        let rows = self.fetch(select)?;
        let mut keyed = HashMap::with_capacity(rows.len());
        for row in &rows {
            keyed.insert(row.int(key_column)?, row.int(value_column)?);
        }
        Ok(keyed)
    }
}

impl<E> QueryExecutor for Arc<E>
where
    E: QueryExecutor + ?Sized,
{
    fn fetch(&self, select: &Select) -> Result<Vec<Row>, ExecutorError> {
        (**self).fetch(select)
    }
}

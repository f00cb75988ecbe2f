//! Postgres-backed query executor.
//!
//! Renders the query description to parameterized SQL and executes it on a
//! SQLx connection pool. The executor trait is synchronous, so the async
//! driver is bridged with the current tokio runtime handle.

use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row as _, TypeInfo};
use tracing::debug;

use crate::select::{Select, Value};
use crate::sql;

use super::r#trait::{ExecutorError, QueryExecutor, Row};

pub struct PostgresExecutor {
    pool: Arc<PgPool>,
}

impl PostgresExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn column_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "INT2" => row
            .try_get::<i16, _>(index)
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),
        "INT4" => row
            .try_get::<i32, _>(index)
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),
        "INT8" => row
            .try_get::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),
        "FLOAT4" => row
            .try_get::<f32, _>(index)
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),
        "FLOAT8" => row
            .try_get::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "BOOL" => row
            .try_get::<bool, _>(index)
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => row
            .try_get::<String, _>(index)
            .map(Value::Str)
            .unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

impl QueryExecutor for PostgresExecutor {
    fn fetch(&self, select: &Select) -> Result<Vec<Row>, ExecutorError> {
        let statement = sql::render(select);
        debug!(table = %select.table, sql = %statement.sql, "executing catalog query");

        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| ExecutorError::Storage("no tokio runtime available".to_string()))?;
        let pool = self.pool.clone();

        handle.block_on(async {
            let mut query = sqlx::query(&statement.sql);
            for value in &statement.params {
                query = match value {
                    Value::Int(v) => query.bind(*v),
                    Value::Float(v) => query.bind(*v),
                    Value::Str(v) => query.bind(v.as_str()),
                    Value::Null => query.bind(Option::<i64>::None),
                };
            }

            let pg_rows = query
                .fetch_all(&*pool)
                .await
                .map_err(|e| ExecutorError::Storage(e.to_string()))?;

            Ok(pg_rows
                .iter()
                .map(|pg_row| {
                    let mut row = Row::new();
                    for (index, column) in pg_row.columns().iter().enumerate() {
                        row = row.set(
                            column.name(),
                            column_value(pg_row, index, column.type_info().name()),
                        );
                    }
                    row
                })
                .collect())
        })
    }
}

//! `vitrine-query` — declarative query descriptions and their executors.
//!
//! A [`Select`] is an immutable value describing a store query (projection,
//! joins, predicates, grouping, ordering, limit). Executors turn it into
//! rows without the caller knowing whether storage is a SQL server or an
//! in-memory fixture.

pub mod executor;
pub mod select;
pub mod sql;

pub use executor::{ExecutorError, InMemoryExecutor, PostgresExecutor, QueryExecutor, Row};
pub use select::{Join, Predicate, Select, Value};

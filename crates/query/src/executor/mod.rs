//! Query execution boundary.
//!
//! This module defines the seam between query descriptions and storage
//! without making any storage assumptions: the same [`Select`] runs against
//! an in-memory fixture or a Postgres pool.
//!
//! [`Select`]: crate::select::Select

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryExecutor;
pub use postgres::PostgresExecutor;
pub use r#trait::{ExecutorError, QueryExecutor, Row};

//! `vitrine-catalog` — store-scoped catalog read layer.
//!
//! Composes batched lookups against the normalized catalog schema and folds
//! flat row sets back into per-entity groupings. Writes, caching and
//! attribute-level EAV resolution are out of scope; this crate only defines
//! what batched reads return and how they are shaped.

pub mod batch;
pub mod config;
pub mod context;
pub mod error;
pub mod product;

#[cfg(test)]
mod integration_tests;

pub use batch::Grouped;
pub use config::{ProductConfig, StoreConfig, load_store_config};
pub use context::{FixedContext, StoreContext, resolve_scope};
pub use error::{CatalogError, CatalogResult};
pub use product::{ConfigurableOption, PriceRow, ProductQuery, ProductRecord, RelationRow};

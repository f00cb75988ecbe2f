//! `vitrine-core` — catalog domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage concerns).

pub mod error;
pub mod id;
pub mod scope;
pub mod types;

pub use error::{DomainError, DomainResult};
pub use id::{AttributeId, CategoryId, CustomerGroupId, ProductId, StoreId, WebsiteId};
pub use scope::StoreScope;
pub use types::{LinkType, ProductType, visibility};

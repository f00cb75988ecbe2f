//! Typed store configuration.
//!
//! One `store_config` row exists per store; the loader reads it field by
//! field into an explicit struct. A missing row is a hard error carrying the
//! scope identifier, so operators can spot unconfigured stores.

use serde::{Deserialize, Serialize};

use vitrine_core::StoreScope;
use vitrine_query::{Predicate, QueryExecutor, Select};

use crate::error::{CatalogError, CatalogResult};

/// Product-presentation knobs used by higher-level consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Per-product cap for related-product links.
    pub related_limit: u64,
    /// Per-product cap for upsell links.
    pub upsell_limit: u64,
}

/// Store-level configuration singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub locale: String,
    pub currency_code: String,
    pub copyright: String,
    pub no_route_page_id: i64,
    pub product: ProductConfig,
}

fn limit_field(value: i64, field: &str) -> CatalogResult<u64> {
    u64::try_from(value)
        .map_err(|_| CatalogError::configuration(format!("{field} must be non-negative")))
}

/// Load the configuration row for the scope's store.
pub fn load_store_config<E: QueryExecutor>(
    executor: &E,
    scope: &StoreScope,
) -> CatalogResult<StoreConfig> {
    let select = Select::from_table("store_config", "c")
        .filter(Predicate::eq("store_id", scope.store_id));
    let rows = executor.fetch(&select)?;
    let row = rows
        .first()
        .ok_or_else(|| CatalogError::not_found("store config", scope.store_id))?;

    Ok(StoreConfig {
        locale: row.str("locale")?.to_string(),
        currency_code: row.str("currency_code")?.to_string(),
        copyright: row.str("copyright")?.to_string(),
        no_route_page_id: row.int("no_route_page_id")?,
        product: ProductConfig {
            related_limit: limit_field(row.int("related_limit")?, "related_limit")?,
            upsell_limit: limit_field(row.int("upsell_limit")?, "upsell_limit")?,
        },
    })
}

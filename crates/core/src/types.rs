//! Product and link type taxonomy.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Product type as stored in the entity table.
///
/// Composite products are assembled from other products and must sort after
/// the concrete, directly sellable types wherever ordering matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Simple,
    Virtual,
    Downloadable,
    Configurable,
}

impl ProductType {
    /// The fixed, ordered list of queryable types. Composite types last.
    pub const ALLOWED: [ProductType; 4] = [
        ProductType::Simple,
        ProductType::Virtual,
        ProductType::Downloadable,
        ProductType::Configurable,
    ];

    /// The composite subset of [`ProductType::ALLOWED`].
    pub const COMPOSITE: [ProductType; 1] = [ProductType::Configurable];

    pub fn is_composite(&self) -> bool {
        Self::COMPOSITE.contains(self)
    }

    /// Position in the allowed-types order. Composites rank last, ties among
    /// concrete types keep the fixed order. Used as an explicit sort key.
    pub fn priority(&self) -> usize {
        Self::ALLOWED
            .iter()
            .position(|t| t == self)
            .unwrap_or(Self::ALLOWED.len())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Simple => "simple",
            ProductType::Virtual => "virtual",
            ProductType::Downloadable => "downloadable",
            ProductType::Configurable => "configurable",
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(ProductType::Simple),
            "virtual" => Ok(ProductType::Virtual),
            "downloadable" => Ok(ProductType::Downloadable),
            "configurable" => Ok(ProductType::Configurable),
            other => Err(DomainError::UnknownProductType(other.to_string())),
        }
    }
}

/// Product-to-product link relation, with its fixed storage code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Related,
    Upsell,
}

impl LinkType {
    /// Numeric link type code as stored in the link table.
    pub fn code(&self) -> i64 {
        match self {
            LinkType::Related => 1,
            LinkType::Upsell => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Related => "related",
            LinkType::Upsell => "upsell",
        }
    }
}

impl core::fmt::Display for LinkType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "related" => Ok(LinkType::Related),
            "upsell" => Ok(LinkType::Upsell),
            other => Err(DomainError::UnknownLinkType(other.to_string())),
        }
    }
}

/// Category visibility codes surfaced by the category/product index.
pub mod visibility {
    /// Visible in catalog listings only.
    pub const CATALOG: i64 = 2;

    /// Visible in both catalog and search.
    pub const CATALOG_SEARCH: i64 = 4;

    /// The visibility codes that make a row catalog-visible.
    pub const CATALOG_VISIBLE: [i64; 2] = [CATALOG, CATALOG_SEARCH];
}

//! Batched, store-scoped product queries.
//!
//! Each operation translates a business question about a batch of
//! identifiers into a query description, executes it, and folds the flat
//! rows back into the caller-facing shape. Every operation is a pure read:
//! no caching, no mutation, no retries.

use std::collections::HashMap;

use tracing::debug;

use vitrine_core::{
    AttributeId, CategoryId, CustomerGroupId, LinkType, ProductId, ProductType, StoreScope,
    visibility,
};
use vitrine_query::{ExecutorError, Predicate, QueryExecutor, Row, Select};

use crate::batch::Grouped;
use crate::error::{CatalogError, CatalogResult};

/// Hydrated product row: the identity columns of the entity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub entity_id: ProductId,
    pub attribute_set_id: i64,
    pub type_id: ProductType,
    pub sku: String,
}

impl ProductRecord {
    fn from_row(row: &Row) -> Result<Self, ExecutorError> {
        Ok(Self {
            entity_id: ProductId::new(row.int("entity_id")?),
            attribute_set_id: row.int("attribute_set_id")?,
            type_id: row
                .str("type_id")?
                .parse::<ProductType>()
                .map_err(|_| ExecutorError::TypeMismatch {
                    column: "type_id".to_string(),
                    expected: "allowed product type",
                })?,
            sku: row.str("sku")?.to_string(),
        })
    }
}

/// One pricing-index row: one per (product, customer group) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub entity_id: ProductId,
    pub customer_group_id: CustomerGroupId,
    pub price: f64,
    pub final_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceRow {
    fn from_row(row: &Row) -> Result<Self, ExecutorError> {
        Ok(Self {
            entity_id: ProductId::new(row.int("entity_id")?),
            customer_group_id: CustomerGroupId::new(row.int("customer_group_id")?),
            price: row.float("price")?,
            final_price: row.float("final_price")?,
            min_price: row.float("min_price")?,
            max_price: row.float("max_price")?,
        })
    }
}

/// Composite parent/child relation edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRow {
    pub parent_id: ProductId,
    pub child_id: ProductId,
}

/// One configurable option row, in declared position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurableOption {
    pub product_id: ProductId,
    pub attribute_id: AttributeId,
    pub code: String,
    pub label: String,
}

fn ensure_batch<T>(ids: &[T], what: &str) -> CatalogResult<()> {
    if ids.is_empty() {
        return Err(CatalogError::invalid_argument(format!("empty {what} batch")));
    }
    Ok(())
}

fn ensure_limit(limit: u64) -> CatalogResult<()> {
    if limit == 0 {
        return Err(CatalogError::invalid_argument("limit must be positive"));
    }
    Ok(())
}

/// Catalog query service over a batch of product identifiers.
pub struct ProductQuery<E> {
    executor: E,
}

impl<E: QueryExecutor> ProductQuery<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The fixed ordered list of queryable types; composite types last.
    pub fn allowed_types(&self) -> &'static [ProductType] {
        &ProductType::ALLOWED
    }

    /// Map each child id to its composite parent id.
    ///
    /// Raw relational lookup: existence of the edge is enough, no
    /// availability filter on either side.
    pub fn parents_of(&self, child_ids: &[ProductId]) -> CatalogResult<HashMap<ProductId, ProductId>> {
        ensure_batch(child_ids, "child id")?;
        let keyed =
            self.executor
                .fetch_keyed(&Self::parents_select(child_ids), "child_id", "parent_id")?;
        Ok(keyed
            .into_iter()
            .map(|(child, parent)| (ProductId::new(child), ProductId::new(parent)))
            .collect())
    }

    fn parents_select(child_ids: &[ProductId]) -> Select {
        Select::from_table("catalog_product_relation", "rel")
            .filter(Predicate::in_list("child_id", child_ids.iter().copied()))
    }

    /// Product ids matching the given SKUs. Existence lookup only.
    pub fn ids_for_skus(&self, skus: &[&str]) -> CatalogResult<Vec<ProductId>> {
        ensure_batch(skus, "sku")?;
        let ids = self
            .executor
            .fetch_ids(&Self::ids_for_skus_select(skus), "entity_id")?;
        Ok(ids.into_iter().map(ProductId::new).collect())
    }

    fn ids_for_skus_select(skus: &[&str]) -> Select {
        Select::from_table("catalog_product_entity", "p")
            .columns(["entity_id"])
            .filter(Predicate::in_list("sku", skus.iter().copied()))
    }

    /// One page of available product ids, ascending, strictly after
    /// `after_id` when given. Pages stitched on the last id of the previous
    /// page reproduce the full available set without overlap or gaps.
    pub fn available_ids_page(
        &self,
        scope: &StoreScope,
        limit: u64,
        after_id: Option<ProductId>,
    ) -> CatalogResult<Vec<ProductId>> {
        ensure_limit(limit)?;
        debug!(limit, after_id = ?after_id, "paging available product ids");
        let mut select = Self::available_template(scope)
            .order_by("e.entity_id")
            .limit(limit);
        if let Some(after_id) = after_id {
            select = select.filter(Predicate::gt("e.entity_id", after_id));
        }
        let ids = self.executor.fetch_ids(&select, "entity_id")?;
        Ok(ids.into_iter().map(ProductId::new).collect())
    }

    /// The subset of `ids` that is available in the active scope.
    pub fn available_ids_among(
        &self,
        scope: &StoreScope,
        ids: &[ProductId],
    ) -> CatalogResult<Vec<ProductId>> {
        ensure_batch(ids, "product id")?;
        let select = Self::available_template(scope)
            .filter(Predicate::in_list("e.entity_id", ids.iter().copied()));
        let ids = self.executor.fetch_ids(&select, "entity_id")?;
        Ok(ids.into_iter().map(ProductId::new).collect())
    }

    /// Available ≡ allowed type, on the active website, present in the
    /// pricing index for that website.
    fn available_template(scope: &StoreScope) -> Select {
        Self::batch_template(scope).columns(["entity_id"]).distinct().join(
            "catalog_product_index_price",
            "price",
            &[
                ("price.entity_id", "e.entity_id"),
                ("price.website_id", "pw.website_id"),
            ],
        )
    }

    fn batch_template(scope: &StoreScope) -> Select {
        Select::from_table("catalog_product_entity", "e")
            .join(
                "catalog_product_website",
                "pw",
                &[("pw.product_id", "e.entity_id")],
            )
            .filter(Predicate::eq("pw.website_id", scope.website_id))
            .filter(Predicate::in_list("e.type_id", ProductType::ALLOWED))
    }

    /// Hydrate a batch of ids into identity records, ordered by the fixed
    /// type priority (concrete types first, composites last). The ordering
    /// comes from an explicit comparator, not from storage.
    pub fn hydrate_batch(
        &self,
        scope: &StoreScope,
        ids: &[ProductId],
    ) -> CatalogResult<Vec<ProductRecord>> {
        ensure_batch(ids, "product id")?;
        let select = Self::batch_template(scope)
            .columns(["entity_id", "attribute_set_id", "type_id", "sku"])
            .filter(Predicate::in_list("e.entity_id", ids.iter().copied()));
        let rows = self.executor.fetch(&select)?;
        let mut records = rows
            .iter()
            .map(ProductRecord::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(|record| record.type_id.priority());
        Ok(records)
    }

    /// Parent/child edges for the given parents, restricted to parents
    /// whose stored type is composite. The type filter tolerates stale
    /// relation rows pointing at non-composite parents.
    pub fn children_relations_of(
        &self,
        parent_ids: &[ProductId],
    ) -> CatalogResult<Vec<RelationRow>> {
        ensure_batch(parent_ids, "parent id")?;
        let rows = self
            .executor
            .fetch(&Self::children_relations_select(parent_ids))?;
        rows.iter()
            .map(|row| {
                Ok(RelationRow {
                    parent_id: ProductId::new(row.int("parent_id")?),
                    child_id: ProductId::new(row.int("child_id")?),
                })
            })
            .collect::<Result<Vec<_>, ExecutorError>>()
            .map_err(Into::into)
    }

    fn children_relations_select(parent_ids: &[ProductId]) -> Select {
        Select::from_table("catalog_product_relation", "rel")
            .join(
                "catalog_product_entity",
                "p",
                &[("rel.parent_id", "p.entity_id")],
            )
            .filter(Predicate::in_list("rel.parent_id", parent_ids.iter().copied()))
            .filter(Predicate::in_list("p.type_id", ProductType::COMPOSITE))
    }

    /// All pricing-index rows for the given ids on the active website,
    /// ordered by (entity id, customer group id).
    pub fn prices_of(&self, scope: &StoreScope, ids: &[ProductId]) -> CatalogResult<Vec<PriceRow>> {
        ensure_batch(ids, "product id")?;
        let select = Select::from_table("catalog_product_index_price", "price")
            .columns([
                "entity_id",
                "customer_group_id",
                "price",
                "final_price",
                "min_price",
                "max_price",
            ])
            .filter(Predicate::eq("website_id", scope.website_id))
            .filter(Predicate::in_list("entity_id", ids.iter().copied()))
            .order_by("entity_id")
            .order_by("customer_group_id");
        let rows = self.executor.fetch(&select)?;
        rows.iter()
            .map(PriceRow::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Configurable option rows, ordered by (product id, declared position).
    pub fn configurable_options_of(
        &self,
        ids: &[ProductId],
    ) -> CatalogResult<Vec<ConfigurableOption>> {
        ensure_batch(ids, "product id")?;
        let select = Select::from_table("catalog_product_super_attribute", "o")
            .columns(["product_id", "attribute_id"])
            .join_columns(
                "eav_attribute",
                "a",
                &[("o.attribute_id", "a.attribute_id")],
                &[("attribute_code", "code"), ("frontend_label", "label")],
            )
            .filter(Predicate::in_list("o.product_id", ids.iter().copied()))
            .order_by("o.product_id")
            .order_by("o.position");
        let rows = self.executor.fetch(&select)?;
        rows.iter()
            .map(|row| {
                Ok(ConfigurableOption {
                    product_id: ProductId::new(row.int("product_id")?),
                    attribute_id: AttributeId::new(row.int("attribute_id")?),
                    code: row.str("code")?.to_string(),
                    label: row.str("label")?.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ExecutorError>>()
            .map_err(Into::into)
    }

    /// Catalog-visible category memberships per product, from the
    /// store-specific index, ancestors first (category level order).
    pub fn categories_of(
        &self,
        scope: &StoreScope,
        ids: &[ProductId],
    ) -> CatalogResult<HashMap<ProductId, Vec<CategoryId>>> {
        ensure_batch(ids, "product id")?;
        let rows = self.executor.fetch(&Self::categories_select(scope, ids))?;
        let mut grouped = Grouped::new();
        for row in &rows {
            grouped.push(
                ProductId::new(row.int("product_id")?),
                CategoryId::new(row.int("category_id")?),
            );
        }
        Ok(grouped.into_map())
    }

    fn categories_select(scope: &StoreScope, ids: &[ProductId]) -> Select {
        let table = format!("catalog_category_product_index_store{}", scope.store_id);
        Select::from_table(table, "i")
            .columns(["category_id", "product_id"])
            .join(
                "catalog_category_entity",
                "ce",
                &[("ce.entity_id", "i.category_id")],
            )
            .filter(Predicate::eq("store_id", scope.store_id))
            .filter(Predicate::in_list("visibility", visibility::CATALOG_VISIBLE))
            .filter(Predicate::in_list("product_id", ids.iter().copied()))
            .order_by("ce.level")
    }

    /// Up to `limit` linked product ids per source product.
    ///
    /// Targets must be present in the pricing index for the active website;
    /// (source, target) pairs are deduplicated, and the per-source limit is
    /// applied after dedup, keeping first-seen order.
    pub fn linked_products_of(
        &self,
        scope: &StoreScope,
        ids: &[ProductId],
        link_type: LinkType,
        limit: u64,
    ) -> CatalogResult<HashMap<ProductId, Vec<ProductId>>> {
        ensure_batch(ids, "product id")?;
        ensure_limit(limit)?;
        debug!(link_type = %link_type, limit, "collecting linked products");
        let rows = self
            .executor
            .fetch(&Self::linked_products_select(scope, ids, link_type))?;
        let mut grouped = Grouped::with_limit(limit as usize).dedup();
        for row in &rows {
            grouped.push(
                ProductId::new(row.int("product_id")?),
                ProductId::new(row.int("linked_product_id")?),
            );
        }
        Ok(grouped.into_map())
    }

    fn linked_products_select(scope: &StoreScope, ids: &[ProductId], link_type: LinkType) -> Select {
        Select::from_table("catalog_product_link", "l")
            .columns(["product_id", "linked_product_id"])
            // Filter N/A products
            .join(
                "catalog_product_index_price",
                "price",
                &[("price.entity_id", "l.linked_product_id")],
            )
            .filter(Predicate::eq("price.website_id", scope.website_id))
            .filter(Predicate::eq("link_type_id", link_type.code()))
            .filter(Predicate::in_list("l.product_id", ids.iter().copied()))
            .group_by(["l.product_id", "l.linked_product_id"])
    }

    /// Reverse link lookup: which products link to each of the given ids.
    /// Raw link rows, no availability filter.
    pub fn related_parents_of(
        &self,
        ids: &[ProductId],
    ) -> CatalogResult<HashMap<ProductId, ProductId>> {
        ensure_batch(ids, "product id")?;
        let select = Select::from_table("catalog_product_link", "l")
            .columns(["product_id", "linked_product_id"])
            .filter(Predicate::in_list("linked_product_id", ids.iter().copied()));
        let keyed = self
            .executor
            .fetch_keyed(&select, "linked_product_id", "product_id")?;
        Ok(keyed
            .into_iter()
            .map(|(linked, source)| (ProductId::new(linked), ProductId::new(source)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_query::InMemoryExecutor;

    fn pid(id: i64) -> ProductId {
        ProductId::new(id)
    }

    fn scope() -> StoreScope {
        StoreScope::new(1, 1)
    }

    fn product_row(id: i64, sku: &str, type_id: &str) -> Row {
        Row::new()
            .set("entity_id", id)
            .set("attribute_set_id", 4i64)
            .set("type_id", type_id)
            .set("sku", sku)
    }

    fn price_row(id: i64, group: i64, website: i64, price: f64) -> Row {
        Row::new()
            .set("entity_id", id)
            .set("customer_group_id", group)
            .set("website_id", website)
            .set("price", price)
            .set("final_price", price)
            .set("min_price", price)
            .set("max_price", price)
    }

    /// Website 1 carries products 1-5 and 7; product 6 lives on website 2;
    /// product 7 has no pricing-index row, so it is never available.
    fn fixture() -> ProductQuery<InMemoryExecutor> {
        let executor = InMemoryExecutor::new();

        executor.insert_rows(
            "catalog_product_entity",
            [
                product_row(1, "SIMPLE-1", "simple"),
                product_row(2, "SIMPLE-2", "simple"),
                product_row(3, "CONF-3", "configurable"),
                product_row(4, "VIRT-4", "virtual"),
                product_row(5, "SIMPLE-5", "simple"),
                product_row(6, "DOWN-6", "downloadable"),
                product_row(7, "SIMPLE-7", "simple"),
            ],
        );
        executor.insert_rows(
            "catalog_product_website",
            [
                Row::new().set("product_id", 1i64).set("website_id", 1i64),
                Row::new().set("product_id", 2i64).set("website_id", 1i64),
                Row::new().set("product_id", 3i64).set("website_id", 1i64),
                Row::new().set("product_id", 4i64).set("website_id", 1i64),
                Row::new().set("product_id", 5i64).set("website_id", 1i64),
                Row::new().set("product_id", 7i64).set("website_id", 1i64),
                Row::new().set("product_id", 6i64).set("website_id", 2i64),
            ],
        );
        executor.insert_rows(
            "catalog_product_index_price",
            [
                price_row(1, 0, 1, 10.0),
                price_row(2, 0, 1, 20.0),
                price_row(2, 1, 1, 18.0),
                price_row(3, 0, 1, 30.0),
                price_row(4, 0, 1, 40.0),
                price_row(5, 0, 1, 50.0),
                price_row(6, 0, 2, 60.0),
            ],
        );
        executor.insert_rows(
            "catalog_product_relation",
            [
                Row::new().set("parent_id", 3i64).set("child_id", 1i64),
                Row::new().set("parent_id", 3i64).set("child_id", 2i64),
                // Stale edge: parent 2 is simple, not composite.
                Row::new().set("parent_id", 2i64).set("child_id", 5i64),
            ],
        );
        executor.insert_rows(
            "catalog_product_link",
            [
                Row::new()
                    .set("product_id", 1i64)
                    .set("linked_product_id", 2i64)
                    .set("link_type_id", 4i64),
                Row::new()
                    .set("product_id", 1i64)
                    .set("linked_product_id", 2i64)
                    .set("link_type_id", 4i64),
                Row::new()
                    .set("product_id", 1i64)
                    .set("linked_product_id", 4i64)
                    .set("link_type_id", 4i64),
                Row::new()
                    .set("product_id", 1i64)
                    .set("linked_product_id", 7i64)
                    .set("link_type_id", 4i64),
                Row::new()
                    .set("product_id", 2i64)
                    .set("linked_product_id", 1i64)
                    .set("link_type_id", 1i64),
            ],
        );
        executor.insert_rows(
            "catalog_category_product_index_store1",
            [
                Row::new()
                    .set("category_id", 10i64)
                    .set("product_id", 5i64)
                    .set("store_id", 1i64)
                    .set("visibility", 2i64),
                Row::new()
                    .set("category_id", 11i64)
                    .set("product_id", 5i64)
                    .set("store_id", 1i64)
                    .set("visibility", 1i64),
                Row::new()
                    .set("category_id", 12i64)
                    .set("product_id", 1i64)
                    .set("store_id", 1i64)
                    .set("visibility", 4i64),
                Row::new()
                    .set("category_id", 10i64)
                    .set("product_id", 1i64)
                    .set("store_id", 1i64)
                    .set("visibility", 2i64),
            ],
        );
        executor.insert_rows(
            "catalog_category_entity",
            [
                Row::new().set("entity_id", 10i64).set("level", 2i64),
                Row::new().set("entity_id", 11i64).set("level", 3i64),
                Row::new().set("entity_id", 12i64).set("level", 3i64),
            ],
        );
        executor.insert_rows(
            "catalog_product_super_attribute",
            [
                Row::new()
                    .set("product_id", 3i64)
                    .set("attribute_id", 90i64)
                    .set("position", 1i64),
                Row::new()
                    .set("product_id", 3i64)
                    .set("attribute_id", 91i64)
                    .set("position", 0i64),
            ],
        );
        executor.insert_rows(
            "eav_attribute",
            [
                Row::new()
                    .set("attribute_id", 90i64)
                    .set("attribute_code", "color")
                    .set("frontend_label", "Color"),
                Row::new()
                    .set("attribute_id", 91i64)
                    .set("attribute_code", "size")
                    .set("frontend_label", "Size"),
            ],
        );

        ProductQuery::new(executor)
    }

    #[test]
    fn empty_batches_are_rejected() {
        let query = fixture();
        assert!(matches!(
            query.parents_of(&[]).unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
        assert!(matches!(
            query.available_ids_among(&scope(), &[]).unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
        assert!(matches!(
            query.ids_for_skus(&[]).unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
    }

    #[test]
    fn zero_limits_are_rejected() {
        let query = fixture();
        assert!(matches!(
            query.available_ids_page(&scope(), 0, None).unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
        assert!(matches!(
            query
                .linked_products_of(&scope(), &[pid(1)], LinkType::Upsell, 0)
                .unwrap_err(),
            CatalogError::InvalidArgument(_)
        ));
    }

    #[test]
    fn available_ids_is_a_subset_filtered_by_website_and_price() {
        let query = fixture();
        let ids: Vec<i64> = (1..=7).collect();
        let ids: Vec<ProductId> = ids.into_iter().map(ProductId::new).collect();

        let available = query.available_ids_among(&scope(), &ids).unwrap();
        // 6 is on another website, 7 has no pricing-index row.
        assert_eq!(available, vec![pid(1), pid(2), pid(3), pid(4), pid(5)]);
    }

    #[test]
    fn available_page_is_ascending_and_strictly_after_cursor() {
        let query = fixture();

        let first = query.available_ids_page(&scope(), 2, None).unwrap();
        assert_eq!(first, vec![pid(1), pid(2)]);

        let second = query
            .available_ids_page(&scope(), 2, first.last().copied())
            .unwrap();
        assert_eq!(second, vec![pid(3), pid(4)]);

        let third = query
            .available_ids_page(&scope(), 2, second.last().copied())
            .unwrap();
        assert_eq!(third, vec![pid(5)]);
    }

    #[test]
    fn hydrate_orders_composites_last() {
        let query = fixture();
        let records = query
            .hydrate_batch(&scope(), &[pid(3), pid(1), pid(4)])
            .unwrap();

        let types: Vec<ProductType> = records.iter().map(|r| r.type_id).collect();
        assert_eq!(
            types,
            vec![
                ProductType::Simple,
                ProductType::Virtual,
                ProductType::Configurable
            ]
        );
        assert_eq!(records[0].sku, "SIMPLE-1");
        assert_eq!(records[0].entity_id, pid(1));
    }

    #[test]
    fn hydrate_skips_products_outside_the_website() {
        let query = fixture();
        let records = query.hydrate_batch(&scope(), &[pid(6)]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn ids_for_skus_is_existence_only() {
        let query = fixture();
        let mut ids = query.ids_for_skus(&["SIMPLE-7", "DOWN-6", "NOPE"]).unwrap();
        ids.sort();
        // 7 is unavailable and 6 is off-website, but both exist.
        assert_eq!(ids, vec![pid(6), pid(7)]);
    }

    #[test]
    fn parents_are_raw_relation_edges() {
        let query = fixture();
        let parents = query.parents_of(&[pid(1), pid(5)]).unwrap();
        assert_eq!(parents[&pid(1)], pid(3));
        // Edge from a non-composite parent still resolves.
        assert_eq!(parents[&pid(5)], pid(2));
    }

    #[test]
    fn children_relations_filter_non_composite_parents() {
        let query = fixture();
        let mut relations = query.children_relations_of(&[pid(3), pid(2)]).unwrap();
        relations.sort_by_key(|r| r.child_id);

        assert_eq!(
            relations,
            vec![
                RelationRow { parent_id: pid(3), child_id: pid(1) },
                RelationRow { parent_id: pid(3), child_id: pid(2) },
            ]
        );
    }

    #[test]
    fn prices_are_ordered_by_entity_then_group() {
        let query = fixture();
        let prices = query.prices_of(&scope(), &[pid(2), pid(1)]).unwrap();

        let keys: Vec<(ProductId, CustomerGroupId)> = prices
            .iter()
            .map(|p| (p.entity_id, p.customer_group_id))
            .collect();
        assert_eq!(
            keys,
            vec![
                (pid(1), CustomerGroupId::new(0)),
                (pid(2), CustomerGroupId::new(0)),
                (pid(2), CustomerGroupId::new(1)),
            ]
        );
        assert_eq!(prices[0].final_price, 10.0);
    }

    #[test]
    fn prices_exclude_other_websites() {
        let query = fixture();
        let prices = query.prices_of(&scope(), &[pid(6)]).unwrap();
        assert!(prices.is_empty());
    }

    #[test]
    fn configurable_options_follow_declared_positions() {
        let query = fixture();
        let options = query.configurable_options_of(&[pid(3)]).unwrap();

        let codes: Vec<&str> = options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["size", "color"]);
        assert_eq!(options[0].label, "Size");
        assert_eq!(options[0].attribute_id, AttributeId::new(91));
    }

    #[test]
    fn categories_exclude_invisible_rows() {
        // Scenario: (10, 5, vis 2) and (11, 5, vis 1) in store 1.
        let query = fixture();
        let categories = query.categories_of(&scope(), &[pid(5)]).unwrap();
        assert_eq!(categories[&pid(5)], vec![CategoryId::new(10)]);
    }

    #[test]
    fn categories_surface_ancestors_first() {
        let query = fixture();
        let categories = query.categories_of(&scope(), &[pid(1)]).unwrap();
        // Category 10 is level 2, category 12 is level 3.
        assert_eq!(
            categories[&pid(1)],
            vec![CategoryId::new(10), CategoryId::new(12)]
        );
    }

    #[test]
    fn linked_products_dedup_then_truncate() {
        // Scenario: duplicate (1 -> 2) rows plus (1 -> 3-ish) with limit 1.
        let query = fixture();
        let linked = query
            .linked_products_of(&scope(), &[pid(1)], LinkType::Upsell, 1)
            .unwrap();
        assert_eq!(linked[&pid(1)], vec![pid(2)]);
    }

    #[test]
    fn linked_products_filter_unavailable_targets() {
        let query = fixture();
        let linked = query
            .linked_products_of(&scope(), &[pid(1)], LinkType::Upsell, 10)
            .unwrap();
        // 7 has no pricing-index row and never appears.
        assert_eq!(linked[&pid(1)], vec![pid(2), pid(4)]);
    }

    #[test]
    fn linked_products_respect_link_type_codes() {
        let query = fixture();
        let related = query
            .linked_products_of(&scope(), &[pid(1), pid(2)], LinkType::Related, 10)
            .unwrap();
        assert!(!related.contains_key(&pid(1)));
        assert_eq!(related[&pid(2)], vec![pid(1)]);
    }

    #[test]
    fn related_parents_are_raw_reverse_edges() {
        let query = fixture();
        let sources = query.related_parents_of(&[pid(2), pid(5)]).unwrap();
        assert_eq!(sources[&pid(2)], pid(1));
        assert!(!sources.contains_key(&pid(5)));
    }

    #[test]
    fn allowed_types_keep_the_fixed_order() {
        let query = fixture();
        assert_eq!(
            query.allowed_types(),
            &[
                ProductType::Simple,
                ProductType::Virtual,
                ProductType::Downloadable,
                ProductType::Configurable
            ]
        );
    }

    #[test]
    fn reads_are_idempotent() {
        let query = fixture();
        let ids = [pid(1), pid(2), pid(3)];
        assert_eq!(
            query.available_ids_among(&scope(), &ids).unwrap(),
            query.available_ids_among(&scope(), &ids).unwrap()
        );
        assert_eq!(
            query.hydrate_batch(&scope(), &ids).unwrap(),
            query.hydrate_batch(&scope(), &ids).unwrap()
        );
    }
}

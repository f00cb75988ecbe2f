//! Cross-module flows exercised against the in-memory executor.

use std::collections::BTreeSet;

use proptest::prelude::*;

use vitrine_core::{LinkType, ProductId, StoreScope};
use vitrine_query::{InMemoryExecutor, Row};

use crate::config::load_store_config;
use crate::context::{FixedContext, resolve_scope};
use crate::product::ProductQuery;

/// All products are simple and on website 1; only `priced` ids get a
/// pricing-index row, so `priced` is exactly the available set.
fn catalog_with_priced(ids: &BTreeSet<i64>, priced: &BTreeSet<i64>) -> ProductQuery<InMemoryExecutor> {
    let executor = InMemoryExecutor::new();
    executor.register_table("catalog_product_index_price");
    for id in ids {
        executor.insert(
            "catalog_product_entity",
            Row::new()
                .set("entity_id", *id)
                .set("attribute_set_id", 4i64)
                .set("type_id", "simple")
                .set("sku", format!("SKU-{id}")),
        );
        executor.insert(
            "catalog_product_website",
            Row::new().set("product_id", *id).set("website_id", 1i64),
        );
        if priced.contains(id) {
            executor.insert(
                "catalog_product_index_price",
                Row::new()
                    .set("entity_id", *id)
                    .set("customer_group_id", 0i64)
                    .set("website_id", 1i64)
                    .set("price", 9.5)
                    .set("final_price", 9.5)
                    .set("min_price", 9.5)
                    .set("max_price", 9.5),
            );
        }
    }
    ProductQuery::new(executor)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Stitching pages on the previous page's last id reproduces the full
    /// available set, ascending, without overlap or gaps.
    #[test]
    fn stitched_pages_reproduce_the_available_set(
        ids in prop::collection::btree_set(1i64..60, 1..25),
        priced_mask in prop::collection::vec(any::<bool>(), 25),
        page_size in 1u64..7,
    ) {
        let priced: BTreeSet<i64> = ids
            .iter()
            .zip(priced_mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(id, _)| *id)
            .collect();
        let query = catalog_with_priced(&ids, &priced);
        let scope = StoreScope::new(1, 1);

        let mut stitched = Vec::new();
        let mut cursor = None;
        loop {
            let page = query.available_ids_page(&scope, page_size, cursor).unwrap();
            prop_assert!(page.len() as u64 <= page_size);
            if let Some(first) = page.first() {
                if let Some(cursor) = cursor {
                    prop_assert!(*first > cursor);
                }
            }
            if page.is_empty() {
                break;
            }
            cursor = page.last().copied();
            stitched.extend(page);
        }

        let expected: Vec<ProductId> = priced.iter().map(|id| ProductId::new(*id)).collect();
        prop_assert_eq!(stitched, expected);
    }
}

#[test]
fn config_drives_link_limits() {
    vitrine_observability::init_with_filter("warn");

    let ids: BTreeSet<i64> = (1..=5).collect();
    let query = catalog_with_priced(&ids, &ids);
    query.executor().insert(
        "store_config",
        Row::new()
            .set("store_id", 1i64)
            .set("locale", "en_US")
            .set("currency_code", "USD")
            .set("copyright", "")
            .set("no_route_page_id", 3i64)
            .set("related_limit", 8i64)
            .set("upsell_limit", 2i64),
    );
    for linked in [2i64, 3, 4, 5] {
        query.executor().insert(
            "catalog_product_link",
            Row::new()
                .set("product_id", 1i64)
                .set("linked_product_id", linked)
                .set("link_type_id", 4i64),
        );
    }

    let context = FixedContext::new(StoreScope::new(1, 1));
    let scope = resolve_scope(&context).unwrap();
    let config = load_store_config(query.executor(), &scope).unwrap();

    let linked = query
        .linked_products_of(&scope, &[ProductId::new(1)], LinkType::Upsell, config.product.upsell_limit)
        .unwrap();
    assert_eq!(
        linked[&ProductId::new(1)],
        vec![ProductId::new(2), ProductId::new(3)]
    );
}

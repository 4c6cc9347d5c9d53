//! Commerce products and variants.
//!
//! Both loaders are registered whether or not the commerce extension is
//! installed. While it is inactive they return nothing without touching the
//! store, since the commerce tables may not exist.

use std::collections::BTreeSet;

use tracing::trace;

use super::{DisplayLoader, LoadContext, non_blank};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};

const PRODUCT_ICON: &str = "shopping-cart";
const VARIANT_ICON: &str = "list";

#[derive(Debug, Clone, Copy)]
pub struct ProductLoader {
    active: bool,
}

impl ProductLoader {
    #[must_use]
    pub const fn new(active: bool) -> Self {
        Self { active }
    }
}

impl DisplayLoader for ProductLoader {
    fn name(&self) -> &'static str {
        "commerce_products"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        if !self.active {
            trace!(count = ids.len(), "commerce inactive, skipping products");
            return Ok(Vec::new());
        }

        query_batched(
            cx.conn,
            "SELECT x.id, COALESCE(t.title, ''), x.type_handle \
             FROM commerce_products x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             JOIN element_titles t ON t.element_id = x.id AND t.site_id = ?1 \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            Some(cx.site),
            ids,
            |row| {
                let id: ElementId = row.get(0)?;
                let type_handle: String = row.get(2)?;
                Ok(DisplayRecord {
                    id,
                    kind: kinds::COMMERCE_PRODUCT.to_string(),
                    icon: PRODUCT_ICON.to_string(),
                    title: row.get(1)?,
                    url: Some(product_url(cx, &type_handle, id)),
                })
            },
        )
    }
}

/// Variants are edited on their product's page, so they link there. Titles
/// fall back to the SKU.
#[derive(Debug, Clone, Copy)]
pub struct VariantLoader {
    active: bool,
}

impl VariantLoader {
    #[must_use]
    pub const fn new(active: bool) -> Self {
        Self { active }
    }
}

impl DisplayLoader for VariantLoader {
    fn name(&self) -> &'static str {
        "commerce_variants"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        if !self.active {
            trace!(count = ids.len(), "commerce inactive, skipping variants");
            return Ok(Vec::new());
        }

        query_batched(
            cx.conn,
            "SELECT x.id, t.title, x.sku, p.id, p.type_handle \
             FROM commerce_variants x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             JOIN commerce_products p ON p.id = x.product_id \
             LEFT JOIN element_titles t ON t.element_id = x.id AND t.site_id = ?1 \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            Some(cx.site),
            ids,
            |row| {
                let sku: String = row.get(2)?;
                let product_id: ElementId = row.get(3)?;
                let type_handle: String = row.get(4)?;
                Ok(DisplayRecord {
                    id: row.get(0)?,
                    kind: kinds::COMMERCE_VARIANT.to_string(),
                    icon: VARIANT_ICON.to_string(),
                    title: non_blank(row.get(1)?).unwrap_or(sku),
                    url: Some(product_url(cx, &type_handle, product_id)),
                })
            },
        )
    }
}

fn product_url(cx: &LoadContext<'_>, type_handle: &str, product_id: ElementId) -> String {
    cx.urls
        .cp(&format!("commerce/products/{type_handle}/{product_id}"))
}

#[cfg(test)]
mod tests {
    use super::{ProductLoader, VariantLoader};
    use crate::db::schema::{self, SchemaOptions};
    use crate::loaders::fixtures::{ids, store};
    use crate::loaders::{DisplayLoader, LoadContext};
    use crate::urls::UrlBuilder;
    use rusqlite::Connection;

    fn seed(conn: &Connection) {
        conn.execute_batch(
            "INSERT INTO elements (id, kind) VALUES
                (30, 'commerce_product'), (31, 'commerce_variant'), (32, 'commerce_variant');
             INSERT INTO commerce_products (id, type_handle) VALUES (30, 'clothing');
             INSERT INTO commerce_variants (id, product_id, sku) VALUES
                (31, 30, 'TEE-S'), (32, 30, 'TEE-M');
             INSERT INTO element_titles (element_id, site_id, title) VALUES
                (30, 1, 'Tee'), (31, 1, 'Tee small');",
        )
        .expect("seed");
    }

    #[test]
    fn products_and_variants_link_to_product_page() {
        let conn = store();
        seed(&conn);

        let urls = UrlBuilder::default();
        let cx = LoadContext { conn: &conn, site: 1, urls: &urls };

        let products = ProductLoader::new(true).load(&cx, &ids(&[30])).expect("load");
        assert_eq!(products[0].title, "Tee");
        assert_eq!(
            products[0].url.as_deref(),
            Some("/admin/commerce/products/clothing/30")
        );

        let variants = VariantLoader::new(true).load(&cx, &ids(&[31, 32])).expect("load");
        let titles: Vec<&str> = variants.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Tee small", "TEE-M"]);
        assert!(variants
            .iter()
            .all(|r| r.url.as_deref() == Some("/admin/commerce/products/clothing/30")));
    }

    #[test]
    fn inactive_loaders_return_nothing_without_tables() {
        let conn = Connection::open_in_memory().expect("open");
        schema::apply(&conn, SchemaOptions::default()).expect("schema");

        let urls = UrlBuilder::default();
        let cx = LoadContext { conn: &conn, site: 1, urls: &urls };
        assert!(ProductLoader::new(false).load(&cx, &ids(&[30])).expect("no-op").is_empty());
        assert!(VariantLoader::new(false).load(&cx, &ids(&[31])).expect("no-op").is_empty());
    }
}

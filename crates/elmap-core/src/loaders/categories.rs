use std::collections::BTreeSet;

use super::{DisplayLoader, LoadContext};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};

const ICON: &str = "folder";

#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryLoader;

impl DisplayLoader for CategoryLoader {
    fn name(&self) -> &'static str {
        "categories"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        query_batched(
            cx.conn,
            "SELECT x.id, COALESCE(t.title, ''), x.group_handle \
             FROM categories x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             JOIN element_titles t ON t.element_id = x.id AND t.site_id = ?1 \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            Some(cx.site),
            ids,
            |row| {
                let id: ElementId = row.get(0)?;
                let group: String = row.get(2)?;
                Ok(DisplayRecord {
                    id,
                    kind: kinds::CATEGORY.to_string(),
                    icon: ICON.to_string(),
                    title: row.get(1)?,
                    url: Some(cx.urls.cp(&format!("categories/{group}/{id}"))),
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryLoader;
    use crate::loaders::fixtures::{ids, store};
    use crate::loaders::{DisplayLoader, LoadContext};
    use crate::urls::UrlBuilder;

    #[test]
    fn loads_categories_in_site() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO elements (id, kind) VALUES (8, 'category');
             INSERT INTO categories (id, group_handle) VALUES (8, 'topics');
             INSERT INTO element_titles (element_id, site_id, title) VALUES (8, 2, 'Sujets');",
        )
        .expect("seed");

        let urls = UrlBuilder::default();
        let cx = LoadContext { conn: &conn, site: 2, urls: &urls };
        let records = CategoryLoader.load(&cx, &ids(&[8])).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Sujets");
        assert_eq!(records[0].url.as_deref(), Some("/admin/categories/topics/8"));

        let cx = LoadContext { conn: &conn, site: 1, urls: &urls };
        assert!(CategoryLoader.load(&cx, &ids(&[8])).expect("load").is_empty());
    }
}

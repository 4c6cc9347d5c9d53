use std::collections::BTreeSet;

use super::{DisplayLoader, LoadContext};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};

const ICON: &str = "newspaper";

/// Section entries: per-site title, edit link under their section.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryLoader;

impl DisplayLoader for EntryLoader {
    fn name(&self) -> &'static str {
        "entries"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        query_batched(
            cx.conn,
            "SELECT x.id, COALESCE(t.title, ''), x.section_handle \
             FROM entries x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             JOIN element_titles t ON t.element_id = x.id AND t.site_id = ?1 \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            Some(cx.site),
            ids,
            |row| {
                let id: ElementId = row.get(0)?;
                let section: String = row.get(2)?;
                Ok(DisplayRecord {
                    id,
                    kind: kinds::ENTRY.to_string(),
                    icon: ICON.to_string(),
                    title: row.get(1)?,
                    url: Some(cx.urls.cp(&format!("entries/{section}/{id}"))),
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::EntryLoader;
    use crate::loaders::fixtures::{ids, store};
    use crate::loaders::{DisplayLoader, LoadContext};
    use crate::urls::UrlBuilder;

    #[test]
    fn loads_site_titles_and_edit_links() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO elements (id, kind) VALUES (1, 'entry'), (2, 'entry'), (3, 'entry');
             INSERT INTO entries (id, section_handle) VALUES (1, 'news'), (2, 'blog'), (3, 'news');
             INSERT INTO element_titles (element_id, site_id, title) VALUES
                (1, 1, 'Launch'), (1, 2, 'Lancement'), (2, 1, NULL), (3, 2, 'Seulement');",
        )
        .expect("seed");

        let urls = UrlBuilder::new("/cp");
        let cx = LoadContext { conn: &conn, site: 1, urls: &urls };
        let records = EntryLoader.load(&cx, &ids(&[1, 2, 3])).expect("load");

        assert_eq!(records.len(), 2, "entry 3 is not in site 1");
        assert_eq!(records[0].title, "Launch");
        assert_eq!(records[0].url.as_deref(), Some("/cp/entries/news/1"));
        assert_eq!(records[0].icon, "newspaper");
        assert_eq!(records[1].title, "");
        assert_eq!(records[1].url.as_deref(), Some("/cp/entries/blog/2"));
    }
}

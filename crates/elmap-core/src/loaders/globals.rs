use std::collections::BTreeSet;

use super::{DisplayLoader, LoadContext};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};

const ICON: &str = "globe";

/// Global sets have a `name` rather than a title and are not site-scoped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalSetLoader;

impl DisplayLoader for GlobalSetLoader {
    fn name(&self) -> &'static str {
        "global_sets"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        query_batched(
            cx.conn,
            "SELECT x.id, x.name, x.handle \
             FROM global_sets x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            None,
            ids,
            |row| {
                let handle: String = row.get(2)?;
                Ok(DisplayRecord {
                    id: row.get(0)?,
                    kind: kinds::GLOBAL_SET.to_string(),
                    icon: ICON.to_string(),
                    title: row.get(1)?,
                    url: Some(cx.urls.cp(&format!("globals/{handle}"))),
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::GlobalSetLoader;
    use crate::loaders::fixtures::{ids, store};
    use crate::loaders::{DisplayLoader, LoadContext};
    use crate::urls::UrlBuilder;

    #[test]
    fn ignores_site_and_uses_name() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO elements (id, kind) VALUES (5, 'global_set');
             INSERT INTO global_sets (id, name, handle) VALUES (5, 'Footer', 'footer');",
        )
        .expect("seed");

        let urls = UrlBuilder::default();
        for site in [1, 2, 77] {
            let cx = LoadContext { conn: &conn, site, urls: &urls };
            let records = GlobalSetLoader.load(&cx, &ids(&[5])).expect("load");
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].title, "Footer");
            assert_eq!(records[0].url.as_deref(), Some("/admin/globals/footer"));
        }
    }
}

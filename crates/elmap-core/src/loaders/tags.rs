use std::collections::BTreeSet;

use super::{DisplayLoader, LoadContext};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};

const ICON: &str = "tags";

/// Tags have no edit page of their own, so they link to their group's
/// settings screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagLoader;

impl DisplayLoader for TagLoader {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        query_batched(
            cx.conn,
            "SELECT x.id, COALESCE(t.title, ''), x.group_id \
             FROM tags x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             JOIN element_titles t ON t.element_id = x.id AND t.site_id = ?1 \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            Some(cx.site),
            ids,
            |row| {
                let group_id: i64 = row.get(2)?;
                Ok(DisplayRecord {
                    id: row.get(0)?,
                    kind: kinds::TAG.to_string(),
                    icon: ICON.to_string(),
                    title: row.get(1)?,
                    url: Some(cx.urls.cp(&format!("settings/tags/{group_id}"))),
                })
            },
        )
    }
}

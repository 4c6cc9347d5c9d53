use std::collections::BTreeSet;

use super::{DisplayLoader, LoadContext, non_blank};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};
use crate::urls::public_file_url;

const ICON: &str = "photo";

/// Assets link to the public file when their volume serves URLs, otherwise
/// to the volume's settings screen. Titles fall back to the filename.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetLoader;

impl DisplayLoader for AssetLoader {
    fn name(&self) -> &'static str {
        "assets"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        query_batched(
            cx.conn,
            "SELECT x.id, t.title, x.filename, x.folder_path, x.volume_id, \
                    v.has_urls, v.base_url \
             FROM assets x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             JOIN volumes v ON v.id = x.volume_id \
             LEFT JOIN element_titles t ON t.element_id = x.id AND t.site_id = ?1 \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            Some(cx.site),
            ids,
            |row| {
                let filename: String = row.get(2)?;
                let folder_path: String = row.get(3)?;
                let volume_id: i64 = row.get(4)?;
                let has_urls: bool = row.get(5)?;
                let base_url: Option<String> = non_blank(row.get(6)?);

                let url = match base_url {
                    Some(base) if has_urls => public_file_url(&base, &folder_path, &filename),
                    _ => cx
                        .urls
                        .cp(&format!("settings/assets/volumes/{volume_id}")),
                };

                Ok(DisplayRecord {
                    id: row.get(0)?,
                    kind: kinds::ASSET.to_string(),
                    icon: ICON.to_string(),
                    title: non_blank(row.get(1)?).unwrap_or(filename),
                    url: Some(url),
                })
            },
        )
    }
}

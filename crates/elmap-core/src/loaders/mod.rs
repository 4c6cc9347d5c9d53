//! Display loaders: one per addressable element kind.
//!
//! A loader turns a batch of ids of its kind into [`DisplayRecord`]s with a
//! title, an icon tag, and a link. Each loader issues one query per chunk of
//! ids and returns rows ordered by id; final ordering is applied by map
//! assembly.
//!
//! Site-scoped kinds only yield elements that have a title row for the
//! requested site. Global kinds (global sets, users) ignore the site.

mod assets;
mod categories;
mod commerce;
mod entries;
mod globals;
mod tags;
mod users;

use rusqlite::Connection;
use std::collections::BTreeSet;

use crate::model::{DisplayRecord, ElementId, SiteId};
use crate::urls::UrlBuilder;

pub use assets::AssetLoader;
pub use categories::CategoryLoader;
pub use commerce::{ProductLoader, VariantLoader};
pub use entries::EntryLoader;
pub use globals::GlobalSetLoader;
pub use tags::TagLoader;
pub use users::UserLoader;

/// Per-resolution inputs shared by every loader call.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    pub conn: &'a Connection,
    pub site: SiteId,
    pub urls: &'a UrlBuilder,
}

/// Batch loader for one addressable kind.
pub trait DisplayLoader: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Load display records for `ids`.
    ///
    /// Ids with no matching live row are skipped.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged if the query fails.
    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>>;
}

/// Trimmed title, or `None` if it is missing or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared in-memory store for loader tests.

    use crate::db::schema::{self, SchemaOptions};
    use rusqlite::Connection;
    use std::collections::BTreeSet;

    pub fn store() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        schema::apply(&conn, SchemaOptions::all()).expect("schema");
        conn.execute_batch(
            "INSERT INTO sites (id, handle, name, is_primary) VALUES
                (1, 'en', 'English', 1), (2, 'fr', 'French', 0);",
        )
        .expect("sites");
        conn
    }

    pub fn ids(values: &[i64]) -> BTreeSet<i64> {
        values.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::non_blank;

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank(Some("  Hi ".to_string())), Some("Hi".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}

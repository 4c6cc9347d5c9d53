use std::collections::BTreeSet;

use super::{DisplayLoader, LoadContext, non_blank};
use crate::db::query::query_batched;
use crate::kinds;
use crate::model::{DisplayRecord, ElementId};

const ICON: &str = "user";

/// Users are global. Full name when set, otherwise the username.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserLoader;

impl DisplayLoader for UserLoader {
    fn name(&self) -> &'static str {
        "users"
    }

    fn load(
        &self,
        cx: &LoadContext<'_>,
        ids: &BTreeSet<ElementId>,
    ) -> rusqlite::Result<Vec<DisplayRecord>> {
        query_batched(
            cx.conn,
            "SELECT x.id, x.username, x.first_name, x.last_name \
             FROM users x \
             JOIN elements e ON e.id = x.id AND e.date_deleted IS NULL \
             WHERE x.id IN ({ids}) \
             ORDER BY x.id",
            None,
            ids,
            |row| {
                let id: ElementId = row.get(0)?;
                let username: String = row.get(1)?;
                let full_name = [non_blank(row.get(2)?), non_blank(row.get(3)?)]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");

                Ok(DisplayRecord {
                    id,
                    kind: kinds::USER.to_string(),
                    icon: ICON.to_string(),
                    title: if full_name.is_empty() { username } else { full_name },
                    url: Some(cx.urls.cp(&format!("users/{id}"))),
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::UserLoader;
    use crate::loaders::fixtures::{ids, store};
    use crate::loaders::{DisplayLoader, LoadContext};
    use crate::urls::UrlBuilder;

    #[test]
    fn prefers_full_name_over_username() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO elements (id, kind) VALUES (70, 'user'), (71, 'user'), (72, 'user');
             INSERT INTO users (id, username, first_name, last_name) VALUES
                (70, 'ada', 'Ada', 'Lovelace'),
                (71, 'grace', NULL, NULL),
                (72, 'linus', 'Linus', '');",
        )
        .expect("seed");

        let urls = UrlBuilder::default();
        let cx = LoadContext { conn: &conn, site: 2, urls: &urls };
        let records = UserLoader.load(&cx, &ids(&[70, 71, 72])).expect("load");
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Ada Lovelace", "grace", "Linus"]);
        assert_eq!(records[1].url.as_deref(), Some("/admin/users/71"));
    }
}

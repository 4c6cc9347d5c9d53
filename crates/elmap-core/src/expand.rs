//! Frontier expansion: one hop across the relationship table.
//!
//! [`expand`] turns a set of seed ids into the kind-partitioned set of
//! elements on the other end of their edges. [`owned_containers`] computes
//! the outgoing seed closure: everything stored inside the seeds' containers
//! counts as the seeds' own outgoing references.

use rusqlite::Connection;
use std::collections::BTreeSet;
use tracing::debug;

use crate::db::query;
use crate::group::KindGroup;
use crate::model::{Direction, ElementId, SiteId};
use crate::registry::KindRegistry;

/// Related elements of `seeds` in `direction`, visible at `site`.
///
/// Dangling edges (far end missing or deleted) are dropped by the query.
///
/// # Errors
///
/// Returns the store error unchanged if the relationship query fails.
pub fn expand(
    conn: &Connection,
    seeds: &BTreeSet<ElementId>,
    site: SiteId,
    direction: Direction,
) -> rusqlite::Result<KindGroup> {
    let related = query::related_elements(conn, seeds, site, direction)?;
    let group: KindGroup = related.into_iter().collect();
    debug!(
        %direction,
        seeds = seeds.len(),
        kinds = group.kind_count(),
        ids = group.id_count(),
        "expanded frontier"
    );
    Ok(group)
}

/// Every container owned by `roots`, directly or through other containers,
/// across all registered container kinds.
///
/// Repeats until a pass finds no new container. Roots are never reported
/// as their own containers.
///
/// # Errors
///
/// Returns the store error unchanged if a container query fails.
pub fn owned_containers(
    conn: &Connection,
    registry: &KindRegistry,
    roots: &BTreeSet<ElementId>,
    site: SiteId,
) -> rusqlite::Result<BTreeSet<ElementId>> {
    let mut found: BTreeSet<ElementId> = BTreeSet::new();
    let mut frontier = roots.clone();
    let mut passes = 0_usize;

    while !frontier.is_empty() {
        passes += 1;
        let mut next = BTreeSet::new();
        for spec in registry.containers() {
            for id in query::containers_owned_by(conn, spec, &frontier, site)? {
                if !roots.contains(&id) && found.insert(id) {
                    next.insert(id);
                }
            }
        }
        frontier = next;
    }

    debug!(roots = roots.len(), containers = found.len(), passes, "collected owned containers");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::{expand, owned_containers};
    use crate::capabilities::Extensions;
    use crate::db::schema::{self, SchemaOptions};
    use crate::model::Direction;
    use crate::registry::KindRegistry;
    use rusqlite::Connection;
    use std::collections::BTreeSet;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        schema::apply(&conn, SchemaOptions::all()).expect("schema");
        conn.execute_batch(
            "INSERT INTO elements (id, kind) VALUES
                (1, 'entry'), (2, 'entry'), (3, 'asset'),
                (10, 'matrix_block'), (11, 'super_table_block'), (12, 'matrix_block'),
                (13, 'matrix_block');
             INSERT INTO matrix_blocks (id, owner_id, owner_site_id) VALUES
                (10, 1, NULL), (12, 11, NULL), (13, 1, 2);
             INSERT INTO super_table_blocks (id, owner_id, owner_site_id) VALUES (11, 10, NULL);
             INSERT INTO relations (source_id, target_id, source_site_id) VALUES
                (1, 2, NULL), (1, 3, NULL), (2, 3, NULL);",
        )
        .expect("seed");
        conn
    }

    #[test]
    fn expand_partitions_by_kind() {
        let conn = store();
        let group = expand(&conn, &BTreeSet::from([1]), 1, Direction::Outgoing).expect("expand");

        assert_eq!(group.ids("entry"), Some(&BTreeSet::from([2])));
        assert_eq!(group.ids("asset"), Some(&BTreeSet::from([3])));

        let incoming = expand(&conn, &BTreeSet::from([3]), 1, Direction::Incoming).expect("expand");
        assert_eq!(incoming.ids("entry"), Some(&BTreeSet::from([1, 2])));
    }

    #[test]
    fn closure_walks_through_every_container_kind() {
        let conn = store();
        let registry = KindRegistry::standard(&Extensions::all(), &[]).expect("registry");

        let found =
            owned_containers(&conn, &registry, &BTreeSet::from([1]), 1).expect("closure");
        assert_eq!(found, BTreeSet::from([10, 11, 12]), "block 13 belongs to site 2");

        let found =
            owned_containers(&conn, &registry, &BTreeSet::from([1]), 2).expect("closure");
        assert_eq!(found, BTreeSet::from([10, 11, 12, 13]));
    }

    #[test]
    fn closure_skips_inactive_container_kinds() {
        let conn = store();
        let registry = KindRegistry::standard(&Extensions::none(), &[]).expect("registry");

        let found =
            owned_containers(&conn, &registry, &BTreeSet::from([1]), 1).expect("closure");
        assert_eq!(found, BTreeSet::from([10]));
    }
}

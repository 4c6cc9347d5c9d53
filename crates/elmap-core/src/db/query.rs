//! `SQLite` query helpers over the host store.
//!
//! Covers the lookups the resolver consumes: relationship expansion,
//! single-element kind lookup, container owners, containers by owner, and sibling
//! lookup. Every multi-id query is batched, and batches are chunked so no
//! statement binds more than [`MAX_BATCH_PARAMS`] ids.
//!
//! Soft-deleted elements (`elements.date_deleted IS NOT NULL`) resolve to no
//! kind, so they fall out of every join here exactly like ids that were never
//! in the store.
//!
//! Errors are returned as raw `rusqlite::Error`; callers wrap them without
//! altering them.

use rusqlite::{Connection, Row, params, params_from_iter};
use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::model::{Direction, ElementId, ElementRef, SiteId};
use crate::registry::{ContainerSpec, SiblingRule};

/// Upper bound on ids bound into a single `IN (...)` list.
pub const MAX_BATCH_PARAMS: usize = 500;

/// Placeholder in batched SQL templates replaced by `?N, ?N+1, ...`.
const IDS_TOKEN: &str = "{ids}";

// ---------------------------------------------------------------------------
// Batching
// ---------------------------------------------------------------------------

/// Run `sql` once per chunk of `ids` and collect the mapped rows.
///
/// `sql` must contain `{ids}`. When `site` is given it binds to `?1` and the
/// ids start at `?2`; otherwise the ids start at `?1`.
pub(crate) fn query_batched<T, F>(
    conn: &Connection,
    sql: &str,
    site: Option<SiteId>,
    ids: &BTreeSet<ElementId>,
    mut map: F,
) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut out = Vec::new();
    if ids.is_empty() {
        return Ok(out);
    }

    let first_index = if site.is_some() { 2 } else { 1 };
    let ids: Vec<ElementId> = ids.iter().copied().collect();

    for chunk in ids.chunks(MAX_BATCH_PARAMS) {
        let statement = sql.replace(IDS_TOKEN, &placeholders(first_index, chunk.len()));
        let mut stmt = conn.prepare(&statement)?;
        let bound = site.into_iter().chain(chunk.iter().copied());
        let rows = stmt.query_map(params_from_iter(bound), &mut map)?;
        for row in rows {
            out.push(row?);
        }
    }

    Ok(out)
}

fn placeholders(first_index: usize, count: usize) -> String {
    let mut out = String::with_capacity(count * 5);
    for offset in 0..count {
        if offset > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "?{}", first_index + offset);
    }
    out
}

// ---------------------------------------------------------------------------
// Relationship store
// ---------------------------------------------------------------------------

/// Elements on the far side of every edge touching `frontier` in
/// `direction`, visible at `site`.
///
/// An edge is visible when its `source_site_id` is NULL or equals `site`.
/// Edges whose far end has no live element are dropped.
///
/// # Errors
///
/// Returns an error if the relationship query fails.
pub fn related_elements(
    conn: &Connection,
    frontier: &BTreeSet<ElementId>,
    site: SiteId,
    direction: Direction,
) -> rusqlite::Result<Vec<ElementRef>> {
    let sql = format!(
        "SELECT DISTINCT r.{opposite}, e.kind \
         FROM relations r \
         JOIN elements e ON e.id = r.{opposite} AND e.date_deleted IS NULL \
         WHERE r.{facing} IN ({IDS_TOKEN}) \
           AND (r.source_site_id IS NULL OR r.source_site_id = ?1)",
        opposite = direction.opposite_column(),
        facing = direction.frontier_column(),
    );

    query_batched(conn, &sql, Some(site), frontier, row_to_element_ref)
}

// ---------------------------------------------------------------------------
// Element-kind index
// ---------------------------------------------------------------------------

/// Kind of a single live element.
///
/// # Errors
///
/// Returns an error if the lookup query fails.
pub fn element_kind(conn: &Connection, id: ElementId) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT kind FROM elements WHERE id = ?1 AND date_deleted IS NULL",
    )?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// Owning elements of the given containers at `site`, one query per chunk.
///
/// Distinct owners are returned once each. A container whose owner is gone,
/// or which is localized to another site, contributes nothing.
///
/// # Errors
///
/// Returns an error if the owner query fails.
pub fn container_owners(
    conn: &Connection,
    spec: &ContainerSpec,
    container_ids: &BTreeSet<ElementId>,
    site: SiteId,
) -> rusqlite::Result<Vec<ElementRef>> {
    let sql = format!(
        "SELECT DISTINCT c.{owner}, e.kind \
         FROM {table} c \
         JOIN elements e ON e.id = c.{owner} AND e.date_deleted IS NULL \
         WHERE c.id IN ({IDS_TOKEN}){site_predicate}",
        owner = spec.owner_column,
        table = spec.table,
        site_predicate = owner_site_predicate(spec),
    );

    let site = spec.owner_site_column.as_ref().map(|_| site);
    query_batched(conn, &sql, site, container_ids, row_to_element_ref)
}

/// Live containers of one kind directly owned by any of `owner_ids` at
/// `site`.
///
/// # Errors
///
/// Returns an error if the container query fails.
pub fn containers_owned_by(
    conn: &Connection,
    spec: &ContainerSpec,
    owner_ids: &BTreeSet<ElementId>,
    site: SiteId,
) -> rusqlite::Result<Vec<ElementId>> {
    let sql = format!(
        "SELECT c.id \
         FROM {table} c \
         JOIN elements e ON e.id = c.id AND e.date_deleted IS NULL \
         WHERE c.{owner} IN ({IDS_TOKEN}){site_predicate}",
        table = spec.table,
        owner = spec.owner_column,
        site_predicate = owner_site_predicate(spec),
    );

    let site = spec.owner_site_column.as_ref().map(|_| site);
    query_batched(conn, &sql, site, owner_ids, |row| row.get(0))
}

/// Ownership filter shared by both container directions. When the container
/// table has an owner-site column, rows with a NULL owner site or one equal
/// to `?1` are kept.
fn owner_site_predicate(spec: &ContainerSpec) -> String {
    spec.owner_site_column
        .as_deref()
        .map_or_else(String::new, |col| {
            format!(" AND (c.{col} IS NULL OR c.{col} = ?1)")
        })
}

// ---------------------------------------------------------------------------
// Siblings and sites
// ---------------------------------------------------------------------------

/// Live sibling elements hanging off `parent_id` through `rule`.
///
/// # Errors
///
/// Returns an error if the sibling query fails.
pub fn sibling_ids(
    conn: &Connection,
    rule: &SiblingRule,
    parent_id: ElementId,
) -> rusqlite::Result<Vec<ElementId>> {
    let sql = format!(
        "SELECT s.id \
         FROM {table} s \
         JOIN elements e ON e.id = s.id AND e.date_deleted IS NULL \
         WHERE s.{parent} = ?1 \
         ORDER BY s.id",
        table = rule.table,
        parent = rule.parent_column,
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![parent_id], |row| row.get(0))?;
    rows.collect()
}

/// Id of the primary site, used when a caller has no site context.
///
/// # Errors
///
/// Returns an error if the sites query fails.
pub fn primary_site_id(conn: &Connection) -> rusqlite::Result<Option<SiteId>> {
    let mut stmt =
        conn.prepare_cached("SELECT id FROM sites ORDER BY is_primary DESC, id ASC LIMIT 1")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

fn row_to_element_ref(row: &Row<'_>) -> rusqlite::Result<ElementRef> {
    Ok(ElementRef {
        id: row.get(0)?,
        kind: row.get(1)?,
    })
}

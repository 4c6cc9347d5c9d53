//! Seeding helpers shared by the integration tests and benches.
//!
//! Every helper inserts through plain SQL so the tests exercise the same
//! schema the resolver reads in production.

#![allow(dead_code)]

use elmap_core::db::schema::{self, SchemaOptions};
use elmap_core::kinds;
use rusqlite::{Connection, params};

pub const SITE_EN: i64 = 1;
pub const SITE_FR: i64 = 2;

/// In-memory store with every extension's tables and two sites.
pub fn store() -> Connection {
    store_with(SchemaOptions::all())
}

pub fn store_with(options: SchemaOptions) -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory store");
    schema::apply(&conn, options).expect("apply schema");
    conn.execute_batch(
        "INSERT INTO sites (id, handle, name, is_primary) VALUES
            (1, 'en', 'English', 1), (2, 'fr', 'French', 0);
         INSERT INTO volumes (id, handle, has_urls, base_url) VALUES
            (1, 'uploads', 1, 'https://cdn.example.com/uploads'),
            (2, 'private', 0, NULL);",
    )
    .expect("seed sites");
    conn
}

fn element(conn: &Connection, id: i64, kind: &str) {
    conn.execute(
        "INSERT INTO elements (id, kind) VALUES (?1, ?2)",
        params![id, kind],
    )
    .expect("insert element");
}

pub fn title(conn: &Connection, id: i64, site: i64, title: &str) {
    conn.execute(
        "INSERT INTO element_titles (element_id, site_id, title) VALUES (?1, ?2, ?3)",
        params![id, site, title],
    )
    .expect("insert title");
}

/// Entry in section `news` titled at both sites.
pub fn entry(conn: &Connection, id: i64, name: &str) {
    element(conn, id, kinds::ENTRY);
    conn.execute(
        "INSERT INTO entries (id, section_handle) VALUES (?1, 'news')",
        params![id],
    )
    .expect("insert entry");
    title(conn, id, SITE_EN, name);
    title(conn, id, SITE_FR, name);
}

pub fn asset(conn: &Connection, id: i64, name: &str) {
    element(conn, id, kinds::ASSET);
    conn.execute(
        "INSERT INTO assets (id, volume_id, folder_path, filename) VALUES (?1, 1, '', ?2)",
        params![id, format!("{id}.jpg")],
    )
    .expect("insert asset");
    title(conn, id, SITE_EN, name);
    title(conn, id, SITE_FR, name);
}

pub fn matrix_block(conn: &Connection, id: i64, owner: i64) {
    element(conn, id, kinds::MATRIX_BLOCK);
    conn.execute(
        "INSERT INTO matrix_blocks (id, owner_id, owner_site_id) VALUES (?1, ?2, NULL)",
        params![id, owner],
    )
    .expect("insert matrix block");
}

pub fn super_table_block(conn: &Connection, id: i64, owner: i64) {
    element(conn, id, kinds::SUPER_TABLE_BLOCK);
    conn.execute(
        "INSERT INTO super_table_blocks (id, owner_id, owner_site_id) VALUES (?1, ?2, NULL)",
        params![id, owner],
    )
    .expect("insert super table block");
}

/// Pin an existing matrix block to one site's copy of its owner.
pub fn localize_matrix_block(conn: &Connection, id: i64, site: i64) {
    conn.execute(
        "UPDATE matrix_blocks SET owner_site_id = ?2 WHERE id = ?1",
        params![id, site],
    )
    .expect("localize matrix block");
}

pub fn product(conn: &Connection, id: i64, name: &str) {
    element(conn, id, kinds::COMMERCE_PRODUCT);
    conn.execute(
        "INSERT INTO commerce_products (id, type_handle) VALUES (?1, 'clothing')",
        params![id],
    )
    .expect("insert product");
    title(conn, id, SITE_EN, name);
}

pub fn variant(conn: &Connection, id: i64, product_id: i64, sku: &str) {
    element(conn, id, kinds::COMMERCE_VARIANT);
    conn.execute(
        "INSERT INTO commerce_variants (id, product_id, sku) VALUES (?1, ?2, ?3)",
        params![id, product_id, sku],
    )
    .expect("insert variant");
}

pub fn relate(conn: &Connection, source: i64, target: i64, site: Option<i64>) {
    conn.execute(
        "INSERT INTO relations (source_id, target_id, source_site_id) VALUES (?1, ?2, ?3)",
        params![source, target, site],
    )
    .expect("insert relation");
}

pub fn soft_delete(conn: &Connection, id: i64) {
    conn.execute(
        "UPDATE elements SET date_deleted = 1700000000 WHERE id = ?1",
        params![id],
    )
    .expect("soft delete");
}

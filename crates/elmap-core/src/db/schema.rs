//! Host store schema consumed by the resolver.
//!
//! The host application owns these tables; element-map only reads them.
//! The DDL lives here so fixtures, benches, and `elmap init-demo` can build
//! a store with the exact shape the queries expect:
//! - `elements` is the polymorphic kind index shared by every element
//! - `relations` holds directed edges with an optional source site
//! - `matrix_blocks` is the built-in container table
//! - per-kind tables carry the fields display loaders read

/// Core host tables, always present.
pub const CORE_SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY,
    handle TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    is_primary INTEGER NOT NULL DEFAULT 0 CHECK (is_primary IN (0, 1))
);

CREATE TABLE IF NOT EXISTS elements (
    id INTEGER PRIMARY KEY,
    kind TEXT NOT NULL CHECK (length(trim(kind)) > 0),
    date_deleted INTEGER
);

CREATE TABLE IF NOT EXISTS element_titles (
    element_id INTEGER NOT NULL REFERENCES elements(id) ON DELETE CASCADE,
    site_id INTEGER NOT NULL REFERENCES sites(id) ON DELETE CASCADE,
    title TEXT,
    PRIMARY KEY (element_id, site_id)
);

CREATE TABLE IF NOT EXISTS relations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL,
    target_id INTEGER NOT NULL,
    source_site_id INTEGER
);

CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    section_handle TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    group_handle TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    group_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS global_sets (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    handle TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    username TEXT NOT NULL,
    first_name TEXT,
    last_name TEXT
);

CREATE TABLE IF NOT EXISTS volumes (
    id INTEGER PRIMARY KEY,
    handle TEXT NOT NULL,
    has_urls INTEGER NOT NULL DEFAULT 0 CHECK (has_urls IN (0, 1)),
    base_url TEXT
);

CREATE TABLE IF NOT EXISTS assets (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    volume_id INTEGER NOT NULL REFERENCES volumes(id),
    folder_path TEXT NOT NULL DEFAULT '',
    filename TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS matrix_blocks (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    owner_id INTEGER NOT NULL,
    owner_site_id INTEGER
);

CREATE INDEX IF NOT EXISTS idx_relations_source_site
    ON relations(source_id, source_site_id);

CREATE INDEX IF NOT EXISTS idx_relations_target_site
    ON relations(target_id, source_site_id);

CREATE INDEX IF NOT EXISTS idx_matrix_blocks_owner
    ON matrix_blocks(owner_id, owner_site_id);
";

/// Tables installed by the nested-block extension.
pub const NESTED_BLOCKS_SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS super_table_blocks (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    owner_id INTEGER NOT NULL,
    owner_site_id INTEGER
);

CREATE INDEX IF NOT EXISTS idx_super_table_blocks_owner
    ON super_table_blocks(owner_id, owner_site_id);
";

/// Tables installed by the commerce extension.
pub const COMMERCE_SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS commerce_products (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    type_handle TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS commerce_variants (
    id INTEGER PRIMARY KEY REFERENCES elements(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL REFERENCES commerce_products(id) ON DELETE CASCADE,
    sku TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_commerce_variants_product
    ON commerce_variants(product_id);
";

/// Tables every host store must have for resolution to work.
pub const REQUIRED_TABLES: &[&str] = &[
    "sites",
    "elements",
    "element_titles",
    "relations",
    "entries",
    "categories",
    "tags",
    "global_sets",
    "users",
    "volumes",
    "assets",
    "matrix_blocks",
];

/// Which optional table groups [`apply`] installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaOptions {
    pub nested_blocks: bool,
    pub commerce: bool,
}

impl SchemaOptions {
    /// Core tables plus every optional extension.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            nested_blocks: true,
            commerce: true,
        }
    }
}

/// Install the host schema into `conn`.
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn apply(conn: &rusqlite::Connection, options: SchemaOptions) -> rusqlite::Result<()> {
    conn.execute_batch(CORE_SCHEMA_SQL)?;
    if options.nested_blocks {
        conn.execute_batch(NESTED_BLOCKS_SCHEMA_SQL)?;
    }
    if options.commerce {
        conn.execute_batch(COMMERCE_SCHEMA_SQL)?;
    }
    Ok(())
}

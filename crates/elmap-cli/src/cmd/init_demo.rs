use anyhow::{Context, Result};
use clap::Args;
use elmap_core::db::{self, schema::SchemaOptions};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::output::{self, OutputMode};

/// Arguments for `elmap init-demo`.
#[derive(Args, Debug)]
pub struct InitDemoArgs {
    /// Where to create the SQLite host store.
    pub path: PathBuf,

    /// Leave out the commerce extension tables.
    #[arg(long)]
    pub no_commerce: bool,

    /// Leave out the nested-block extension tables.
    #[arg(long)]
    pub no_nested_blocks: bool,

    /// Seed a small site with entries, blocks, and assets.
    #[arg(long)]
    pub sample: bool,
}

#[derive(Debug, Serialize)]
struct InitDemoReport {
    path: PathBuf,
    commerce: bool,
    nested_blocks: bool,
    sample: bool,
}

/// Sample content. `INSERT OR IGNORE` keeps re-runs harmless.
///
/// Home (1) embeds a matrix block (10) that shows the team photo (4). About
/// us (2) links to Home, Home links to the blog post (3), which is filed
/// under News (5) and tagged (7). The footer global (8) links to About us.
const SAMPLE_SQL: &str = r"
INSERT OR IGNORE INTO sites (id, handle, name, is_primary) VALUES
    (1, 'en', 'English', 1), (2, 'fr', 'French', 0);
INSERT OR IGNORE INTO volumes (id, handle, has_urls, base_url) VALUES
    (1, 'uploads', 1, 'https://cdn.example.com/uploads');
INSERT OR IGNORE INTO elements (id, kind) VALUES
    (1, 'entry'), (2, 'entry'), (3, 'entry'), (4, 'asset'), (5, 'category'),
    (6, 'user'), (7, 'tag'), (8, 'global_set'), (10, 'matrix_block');
INSERT OR IGNORE INTO entries (id, section_handle) VALUES
    (1, 'pages'), (2, 'pages'), (3, 'blog');
INSERT OR IGNORE INTO categories (id, group_handle) VALUES (5, 'topics');
INSERT OR IGNORE INTO tags (id, group_id) VALUES (7, 1);
INSERT OR IGNORE INTO users (id, username, first_name, last_name) VALUES
    (6, 'admin', 'Ada', 'Admin');
INSERT OR IGNORE INTO global_sets (id, name, handle) VALUES (8, 'Footer', 'footer');
INSERT OR IGNORE INTO assets (id, volume_id, folder_path, filename) VALUES
    (4, 1, 'team', 'team.jpg');
INSERT OR IGNORE INTO matrix_blocks (id, owner_id, owner_site_id) VALUES (10, 1, NULL);
INSERT OR IGNORE INTO element_titles (element_id, site_id, title) VALUES
    (1, 1, 'Home'), (1, 2, 'Accueil'),
    (2, 1, 'About us'), (2, 2, 'À propos'),
    (3, 1, 'Launch week'), (3, 2, 'Semaine de lancement'),
    (4, 1, 'Team photo'), (4, 2, 'Photo d''équipe'),
    (5, 1, 'News'), (5, 2, 'Actualités'),
    (7, 1, 'release'), (7, 2, 'release');
INSERT INTO relations (source_id, target_id, source_site_id)
    SELECT s, t, site FROM (
        SELECT 10 AS s, 4 AS t, NULL AS site
        UNION ALL SELECT 2, 1, NULL
        UNION ALL SELECT 1, 3, NULL
        UNION ALL SELECT 3, 5, NULL
        UNION ALL SELECT 3, 7, 1
        UNION ALL SELECT 3, 6, NULL
        UNION ALL SELECT 8, 2, NULL
    )
    WHERE NOT EXISTS (SELECT 1 FROM relations);
";

/// Product (20) with one variant (21); the blog post links to the variant.
const SAMPLE_COMMERCE_SQL: &str = r"
INSERT OR IGNORE INTO elements (id, kind) VALUES
    (20, 'commerce_product'), (21, 'commerce_variant');
INSERT OR IGNORE INTO commerce_products (id, type_handle) VALUES (20, 'apparel');
INSERT OR IGNORE INTO commerce_variants (id, product_id, sku) VALUES (21, 20, 'TEE-S');
INSERT OR IGNORE INTO element_titles (element_id, site_id, title) VALUES
    (20, 1, 'Launch tee'), (20, 2, 'T-shirt de lancement');
INSERT INTO relations (source_id, target_id, source_site_id)
    SELECT 3, 21, NULL
    WHERE NOT EXISTS (SELECT 1 FROM relations WHERE source_id = 3 AND target_id = 21);
";

/// Create a host store with the schema, optionally seeded.
pub fn run_init_demo(args: &InitDemoArgs, mode: OutputMode) -> Result<()> {
    let options = SchemaOptions {
        nested_blocks: !args.no_nested_blocks,
        commerce: !args.no_commerce,
    };
    let conn = db::create_store(&args.path, options)?;

    if args.sample {
        seed_sample(&conn, options)?;
    }
    info!(path = %args.path.display(), sample = args.sample, "initialized demo store");

    let report = InitDemoReport {
        path: args.path.clone(),
        commerce: options.commerce,
        nested_blocks: options.nested_blocks,
        sample: args.sample,
    };
    output::render_mode(
        mode,
        &report,
        |report, w| writeln!(w, "{}", report.path.display()),
        |report, w| {
            writeln!(w, "Created host store at {}", report.path.display())?;
            output::pretty_kv(w, "commerce", on_off(report.commerce))?;
            output::pretty_kv(w, "nested", on_off(report.nested_blocks))?;
            if report.sample {
                writeln!(w, "\nTry: elmap --db {} map 1", report.path.display())?;
            }
            Ok(())
        },
    )
}

fn seed_sample(conn: &rusqlite::Connection, options: SchemaOptions) -> Result<()> {
    conn.execute_batch(SAMPLE_SQL).context("seed sample content")?;
    if options.commerce {
        conn.execute_batch(SAMPLE_COMMERCE_SQL)
            .context("seed sample commerce content")?;
    }
    Ok(())
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

//! Command handlers and the store/config plumbing they share.

pub mod completions;
pub mod extensions;
pub mod init_demo;
pub mod map;
pub mod refs;

use anyhow::{Context, Result, anyhow};
use elmap_core::db::{self, query};
use elmap_core::{ElementMapper, ErrorCode, MapConfig, SiteId, detect_extensions};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Open the host store named by `--db` / `ELMAP_DB`.
pub fn open_store(db: Option<&Path>) -> Result<Connection> {
    let path = db
        .ok_or_else(|| anyhow!("no host store given"))
        .context(ErrorCode::StoreNotFound)?;
    if !path.is_file() {
        return Err(anyhow!("{} does not exist", path.display())).context(ErrorCode::StoreNotFound);
    }
    db::open_store(path).context(ErrorCode::StoreNotFound)
}

/// Load `--config`, or the default config file when present.
pub fn load_config(config: Option<&Path>) -> Result<MapConfig> {
    elmap_core::load_effective_config(config).context(ErrorCode::ConfigParseError)
}

/// Build a mapper for `conn` from configuration and detected extensions.
pub fn build_mapper(conn: &Connection, config: &MapConfig) -> Result<ElementMapper> {
    let mapper = ElementMapper::from_config(config, detect_extensions(conn))?;
    Ok(mapper)
}

/// The requested site, or the store's primary site.
pub fn resolve_site(conn: &Connection, site: Option<SiteId>) -> Result<SiteId> {
    if let Some(site) = site {
        return Ok(site);
    }
    let primary = query::primary_site_id(conn)?
        .ok_or_else(|| anyhow!("host store has no sites; pass --site"))?;
    debug!(site = primary, "defaulting to primary site");
    Ok(primary)
}

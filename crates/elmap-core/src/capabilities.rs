//! Optional-extension detection for the host store.
//!
//! Some element and container kinds only exist when a host extension is
//! installed. This module probes the store once, up front, and produces an
//! [`Extensions`] value that is handed to the registry and map assembly.
//! Nothing downstream probes again, and nothing relies on a failed query to
//! discover that an extension is missing.
//!
//! Every probe is infallible from the caller's perspective: it returns a
//! `bool`, logs the outcome at `debug!` level, and never propagates errors.
//!
//! # Usage
//!
//! ```rust,no_run
//! use elmap_core::capabilities::{describe_extensions, detect_extensions};
//! use elmap_core::db::open_store;
//! use std::path::Path;
//!
//! let conn = open_store(Path::new("craft.sqlite3"))?;
//! let extensions = detect_extensions(&conn);
//! for status in describe_extensions(&extensions) {
//!     if !status.active {
//!         eprintln!("[{}] inactive: {}", status.name, status.effect);
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::debug;

use crate::config::{ExtensionMode, ExtensionsConfig};

/// Tables whose presence means the commerce extension is installed.
const COMMERCE_TABLES: &[&str] = &["commerce_products", "commerce_variants"];

/// Tables whose presence means the nested-block extension is installed.
const NESTED_BLOCK_TABLES: &[&str] = &["super_table_blocks"];

/// Which optional host extensions take part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Extensions {
    /// Products and variants are loadable, and a product's variants count as
    /// the product itself.
    pub commerce: bool,
    /// Super-table blocks are registered as a container kind.
    pub nested_blocks: bool,
}

impl Extensions {
    /// Core kinds only.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            commerce: false,
            nested_blocks: false,
        }
    }

    /// Every optional extension.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            commerce: true,
            nested_blocks: true,
        }
    }

    /// Apply configured overrides on top of detected presence.
    #[must_use]
    pub const fn apply(self, config: &ExtensionsConfig) -> Self {
        Self {
            commerce: config.commerce.resolve(self.commerce),
            nested_blocks: config.nested_blocks.resolve(self.nested_blocks),
        }
    }

    /// Extensions that `config` forces on although the probe did not find
    /// them. Queries against their tables will fail.
    #[must_use]
    pub fn forced_without_tables(self, config: &ExtensionsConfig) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if config.commerce == ExtensionMode::On && !self.commerce {
            missing.push("commerce");
        }
        if config.nested_blocks == ExtensionMode::On && !self.nested_blocks {
            missing.push("nested_blocks");
        }
        missing
    }
}

impl ExtensionMode {
    /// Combine this setting with what the store probe found.
    #[must_use]
    pub const fn resolve(self, detected: bool) -> bool {
        match self {
            Self::Auto => detected,
            Self::On => true,
            Self::Off => false,
        }
    }
}

/// Status of a single extension for user-visible display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionStatus {
    /// Short machine-readable name of the extension.
    pub name: &'static str,
    /// Whether the extension participates in resolution.
    pub active: bool,
    /// What the map does when the extension is inactive.
    pub effect: &'static str,
}

/// Probe the store for installed extensions.
#[must_use]
pub fn detect_extensions(conn: &Connection) -> Extensions {
    let extensions = Extensions {
        commerce: probe_tables(conn, COMMERCE_TABLES),
        nested_blocks: probe_tables(conn, NESTED_BLOCK_TABLES),
    };
    debug!(?extensions, "extension detection complete");
    extensions
}

/// Describe extension state in a stable order.
#[must_use]
pub fn describe_extensions(extensions: &Extensions) -> Vec<ExtensionStatus> {
    vec![
        ExtensionStatus {
            name: "commerce",
            active: extensions.commerce,
            effect: "product and variant references are dropped from maps",
        },
        ExtensionStatus {
            name: "nested_blocks",
            active: extensions.nested_blocks,
            effect: "super-table blocks are not unwrapped to their owners",
        },
    ]
}

fn probe_tables(conn: &Connection, tables: &[&str]) -> bool {
    for table in tables {
        let result = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get::<_, i64>(0),
        );
        match result {
            Ok(count) if count > 0 => {}
            Ok(_) => {
                debug!(table, "extension probe: table missing");
                return false;
            }
            Err(e) => {
                debug!(table, error = %e, "extension probe failed");
                return false;
            }
        }
    }
    true
}

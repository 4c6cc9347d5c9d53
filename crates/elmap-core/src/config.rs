use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::registry::ContainerSpec;
use crate::urls::{DEFAULT_CP_BASE, UrlBuilder};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub urls: UrlConfig,
    #[serde(default)]
    pub extensions: ExtensionsConfig,
    /// Container kinds contributed by host extensions this crate has no
    /// built-in knowledge of.
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

impl MapConfig {
    #[must_use]
    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(self.urls.cp_base.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    #[serde(default = "default_cp_base")]
    pub cp_base: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            cp_base: default_cp_base(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtensionsConfig {
    #[serde(default)]
    pub commerce: ExtensionMode,
    #[serde(default)]
    pub nested_blocks: ExtensionMode,
}

/// Whether an optional extension follows store detection or is forced.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionMode {
    #[default]
    Auto,
    On,
    Off,
}

/// Per-user config location: `<config dir>/element-map/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("element-map/config.toml"))
}

/// Load config from an explicit file. The file must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`MapConfig`].
pub fn load_config(path: &Path) -> Result<MapConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<MapConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the config in effect: the explicit path if given, else the
/// per-user file if it exists, else defaults.
///
/// # Errors
///
/// Returns an error if a config file is chosen but cannot be loaded.
pub fn load_effective_config(explicit: Option<&Path>) -> Result<MapConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(MapConfig::default()),
    }
}

fn default_cp_base() -> String {
    DEFAULT_CP_BASE.to_string()
}

#[cfg(test)]
mod tests {
    use super::{ExtensionMode, MapConfig, load_config, load_effective_config};
    use tempfile::TempDir;

    #[test]
    fn empty_file_uses_defaults() {
        let config: MapConfig = toml::from_str("").expect("parse");
        assert_eq!(config.urls.cp_base, "/admin");
        assert_eq!(config.extensions.commerce, ExtensionMode::Auto);
        assert!(config.containers.is_empty());
    }

    #[test]
    fn parses_overrides_and_extra_containers() {
        let config: MapConfig = toml::from_str(
            r#"
[urls]
cp_base = "https://cms.example.com/admin/"

[extensions]
commerce = "off"
nested_blocks = "on"

[[containers]]
kind = "neo_block"
table = "neo_blocks"
owner_site_column = "owner_site_id"
nests_in = ["neo_block"]
"#,
        )
        .expect("parse");

        assert_eq!(config.extensions.commerce, ExtensionMode::Off);
        assert_eq!(config.extensions.nested_blocks, ExtensionMode::On);
        assert_eq!(config.containers.len(), 1);
        assert_eq!(config.containers[0].owner_column, "owner_id");
        assert_eq!(config.containers[0].nests_in, vec!["neo_block".to_string()]);
        assert_eq!(
            config.url_builder().cp("users/1"),
            "https://cms.example.com/admin/users/1"
        );
    }

    #[test]
    fn bad_mode_is_a_parse_error() {
        let result = toml::from_str::<MapConfig>("[extensions]\ncommerce = \"maybe\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nope.toml");
        assert!(load_config(&path).is_err());
        assert!(load_effective_config(Some(&path)).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[urls]\ncp_base = \"/cp\"\n").expect("write");

        let config = load_effective_config(Some(&path)).expect("load");
        assert_eq!(config.urls.cp_base, "/cp");
    }
}

//! Link construction for display records.

/// Control-panel base used when config does not set one.
pub const DEFAULT_CP_BASE: &str = "/admin";

/// Builds control-panel and public links from configured bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    cp_base: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CP_BASE)
    }
}

impl UrlBuilder {
    pub fn new(cp_base: impl Into<String>) -> Self {
        let mut cp_base = cp_base.into();
        while cp_base.ends_with('/') {
            cp_base.pop();
        }
        Self { cp_base }
    }

    #[must_use]
    pub fn cp_base(&self) -> &str {
        &self.cp_base
    }

    /// Control-panel link for `path`, e.g. `entries/news/12`.
    #[must_use]
    pub fn cp(&self, path: &str) -> String {
        format!("{}/{}", self.cp_base, path.trim_start_matches('/'))
    }
}

/// Public link for a file in a volume that serves URLs.
#[must_use]
pub fn public_file_url(base_url: &str, folder_path: &str, filename: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let folder = folder_path.trim_matches('/');
    if folder.is_empty() {
        format!("{base}/{filename}")
    } else {
        format!("{base}/{folder}/{filename}")
    }
}

//! Map assembly: the single entry point the presentation layer calls.
//!
//! An [`ElementMapper`] is built once from configuration and the detected
//! extensions, then used for any number of requests. Each request passes its
//! own connection and site; nothing is cached between calls.
//!
//! For an element `E` at site `S`:
//! 1. roots are `E` plus its siblings (a product's variants)
//! 2. incoming seeds are the roots
//! 3. outgoing seeds are the roots plus every container they own,
//!    transitively, across all container kinds
//! 4. each direction is expanded one hop, resolved through containers, and
//!    sorted by title

use rusqlite::Connection;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::capabilities::Extensions;
use crate::config::MapConfig;
use crate::db::query;
use crate::error::MapError;
use crate::expand::{expand, owned_containers};
use crate::loaders::LoadContext;
use crate::model::{
    Direction, DisplayRecord, ElementId, ElementMap, ReferenceCounts, SiteId, sort_by_title,
};
use crate::registry::KindRegistry;
use crate::resolve::resolve;
use crate::urls::UrlBuilder;

/// Builds element maps against a host store.
#[derive(Debug)]
pub struct ElementMapper {
    registry: KindRegistry,
    urls: UrlBuilder,
    extensions: Extensions,
}

impl ElementMapper {
    /// `extensions` must be the same value `registry` was built from.
    #[must_use]
    pub const fn new(registry: KindRegistry, urls: UrlBuilder, extensions: Extensions) -> Self {
        Self {
            registry,
            urls,
            extensions,
        }
    }

    /// Build a mapper from configuration and the extensions detected in the
    /// store. Configured overrides win over detection.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Registry`] if the configured container kinds are
    /// invalid.
    pub fn from_config(config: &MapConfig, detected: Extensions) -> Result<Self, MapError> {
        for extension in detected.forced_without_tables(&config.extensions) {
            warn!(
                extension,
                "extension forced on by config but its tables were not found; \
                 queries against them will fail"
            );
        }
        let extensions = detected.apply(&config.extensions);
        let registry = KindRegistry::standard(&extensions, &config.containers)?;
        debug!(
            ?extensions,
            extra_containers = config.containers.len(),
            "element mapper ready"
        );
        Ok(Self::new(registry, config.url_builder(), extensions))
    }

    #[must_use]
    pub const fn extensions(&self) -> Extensions {
        self.extensions
    }

    #[must_use]
    pub const fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Incoming and outgoing references of `element_id` at `site`.
    ///
    /// Returns `Ok(None)` without touching the store when `element_id` is
    /// not a positive id.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Store`] if any store query fails.
    pub fn build_map(
        &self,
        conn: &Connection,
        element_id: ElementId,
        site: SiteId,
    ) -> Result<Option<ElementMap>, MapError> {
        if element_id <= 0 {
            return Ok(None);
        }

        let roots = self.roots(conn, element_id)?;
        let map = ElementMap {
            incoming: self.resolve_direction(conn, &roots, site, Direction::Incoming)?,
            outgoing: self.resolve_direction(conn, &roots, site, Direction::Outgoing)?,
        };

        info!(
            element_id,
            site,
            incoming = map.incoming.len(),
            outgoing = map.outgoing.len(),
            "built element map"
        );
        Ok(Some(map))
    }

    /// Elements referencing `element_id`, sorted by title.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Store`] if any store query fails.
    pub fn incoming(
        &self,
        conn: &Connection,
        element_id: ElementId,
        site: SiteId,
    ) -> Result<Vec<DisplayRecord>, MapError> {
        self.one_direction(conn, element_id, site, Direction::Incoming)
    }

    /// Elements referenced by `element_id`, sorted by title.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Store`] if any store query fails.
    pub fn outgoing(
        &self,
        conn: &Connection,
        element_id: ElementId,
        site: SiteId,
    ) -> Result<Vec<DisplayRecord>, MapError> {
        self.one_direction(conn, element_id, site, Direction::Outgoing)
    }

    /// Number of distinct elements on each side, for list columns.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Store`] if any store query fails.
    pub fn reference_counts(
        &self,
        conn: &Connection,
        element_id: ElementId,
        site: SiteId,
    ) -> Result<ReferenceCounts, MapError> {
        Ok(self
            .build_map(conn, element_id, site)?
            .as_ref()
            .map(ReferenceCounts::from)
            .unwrap_or_default())
    }

    fn one_direction(
        &self,
        conn: &Connection,
        element_id: ElementId,
        site: SiteId,
        direction: Direction,
    ) -> Result<Vec<DisplayRecord>, MapError> {
        if element_id <= 0 {
            return Ok(Vec::new());
        }
        let roots = self.roots(conn, element_id)?;
        self.resolve_direction(conn, &roots, site, direction)
    }

    /// The element plus any siblings sharing its editor surface.
    fn roots(
        &self,
        conn: &Connection,
        element_id: ElementId,
    ) -> Result<BTreeSet<ElementId>, MapError> {
        let mut roots = BTreeSet::from([element_id]);

        let Some(kind) = query::element_kind(conn, element_id)? else {
            return Ok(roots);
        };
        if let Some(rule) = self.registry.sibling_rule(&kind) {
            let siblings = query::sibling_ids(conn, rule, element_id)?;
            debug!(
                element_id,
                kind = kind.as_str(),
                siblings = siblings.len(),
                "added siblings"
            );
            roots.extend(siblings);
        }

        Ok(roots)
    }

    fn resolve_direction(
        &self,
        conn: &Connection,
        roots: &BTreeSet<ElementId>,
        site: SiteId,
        direction: Direction,
    ) -> Result<Vec<DisplayRecord>, MapError> {
        let seeds = match direction {
            Direction::Incoming => roots.clone(),
            Direction::Outgoing => {
                let mut seeds = roots.clone();
                seeds.extend(owned_containers(conn, &self.registry, roots, site)?);
                seeds
            }
        };

        let group = expand(conn, &seeds, site, direction)?;
        let cx = LoadContext {
            conn,
            site,
            urls: &self.urls,
        };
        let mut records = resolve(&self.registry, &cx, group)?;
        sort_by_title(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::ElementMapper;
    use crate::capabilities::Extensions;
    use crate::config::MapConfig;
    use rusqlite::Connection;

    #[test]
    fn zero_and_negative_ids_short_circuit_without_tables() {
        let conn = Connection::open_in_memory().expect("open");
        let mapper = ElementMapper::from_config(&MapConfig::default(), Extensions::all())
            .expect("mapper");

        assert_eq!(mapper.build_map(&conn, 0, 1).expect("no query"), None);
        assert_eq!(mapper.build_map(&conn, -4, 1).expect("no query"), None);
        assert!(mapper.incoming(&conn, 0, 1).expect("no query").is_empty());
        assert_eq!(mapper.reference_counts(&conn, 0, 1).expect("no query").incoming, 0);
    }

    #[test]
    fn store_errors_propagate() {
        let conn = Connection::open_in_memory().expect("open");
        let mapper = ElementMapper::from_config(&MapConfig::default(), Extensions::none())
            .expect("mapper");

        let err = mapper.build_map(&conn, 1, 1).expect_err("no elements table");
        assert!(matches!(err, crate::error::MapError::Store(_)));
    }

    #[test]
    fn config_overrides_detected_extensions() {
        let mut config = MapConfig::default();
        config.extensions.commerce = crate::config::ExtensionMode::Off;

        let mapper = ElementMapper::from_config(&config, Extensions::all()).expect("mapper");
        assert!(!mapper.extensions().commerce);
        assert!(mapper.extensions().nested_blocks);
    }

    #[test]
    fn forcing_missing_extension_still_builds_mapper() {
        let mut config = MapConfig::default();
        config.extensions.nested_blocks = crate::config::ExtensionMode::On;

        let detected = Extensions::none();
        assert_eq!(detected.forced_without_tables(&config.extensions), vec!["nested_blocks"]);
        let mapper = ElementMapper::from_config(&config, detected).expect("mapper");
        assert!(mapper.extensions().nested_blocks);
    }
}

//! Container resolution: turn a kind group into display records.
//!
//! The resolver is a work-list over `(kind, ids)` buckets. Each step takes
//! one bucket out of the group:
//! - container kinds are replaced by their owners, which go back into the
//!   group under their own kinds (an owner that is itself a container is
//!   picked up by a later step)
//! - display kinds are loaded through their registered loader
//! - anything else is dropped
//!
//! Containers are always drained before the first load, so every display
//! kind is loaded exactly once. Each container id is unwrapped at most once,
//! which bounds the loop even if the store holds an ownership cycle.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::db::query;
use crate::error::MapError;
use crate::group::KindGroup;
use crate::loaders::LoadContext;
use crate::model::{DisplayRecord, ElementId};
use crate::registry::{KindHandler, KindRegistry};

/// Resolve `group` to display records for addressable kinds only.
///
/// Records come back grouped by kind in kind order, ids ascending within a
/// kind. Callers sort for presentation.
///
/// # Errors
///
/// Returns [`MapError::Store`] if an owner lookup or a loader query fails.
pub fn resolve(
    registry: &KindRegistry,
    cx: &LoadContext<'_>,
    mut group: KindGroup,
) -> Result<Vec<DisplayRecord>, MapError> {
    let mut records = Vec::new();
    let mut unwrapped: HashMap<String, BTreeSet<ElementId>> = HashMap::new();

    while let Some(kind) = registry.next_kind(&group) {
        let Some(ids) = group.take(&kind) else {
            break;
        };

        match registry.handler(&kind) {
            Some(KindHandler::Container(spec)) => {
                let seen = unwrapped.entry(kind.clone()).or_default();
                let fresh: BTreeSet<ElementId> = ids.difference(seen).copied().collect();
                if fresh.is_empty() {
                    trace!(kind = kind.as_str(), "containers already unwrapped");
                    continue;
                }
                seen.extend(&fresh);

                let owners = query::container_owners(cx.conn, spec, &fresh, cx.site)?;
                debug!(
                    kind = kind.as_str(),
                    containers = fresh.len(),
                    owners = owners.len(),
                    "unwrapped containers"
                );
                group.extend(owners);
            }
            Some(KindHandler::Display(loader)) => {
                let loaded = loader.load(cx, &ids)?;
                debug!(
                    kind = kind.as_str(),
                    loader = loader.name(),
                    requested = ids.len(),
                    loaded = loaded.len(),
                    "loaded display records"
                );
                records.extend(loaded);
            }
            None => {
                trace!(kind = kind.as_str(), count = ids.len(), "dropping unrecognized kind");
            }
        }
    }

    Ok(records)
}

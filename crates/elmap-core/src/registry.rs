//! Kind registry: what to do with each element kind during resolution.
//!
//! Every kind the resolver can act on maps to exactly one [`KindHandler`]:
//! - a **container** is unwrapped to its owning element and never shown
//! - a **display** kind is batch-loaded into [`DisplayRecord`]s
//!
//! A kind with no handler is dropped by the resolver. That is a registry
//! miss, not an error.
//!
//! # Validation
//!
//! [`RegistryBuilder::build`] rejects configurations the resolver cannot
//! handle: duplicate kinds, `nests_in` targets that are not containers,
//! unsafe table or column names, and container kinds that own each other.
//! A container nesting within its own kind is allowed; that is how blocks
//! nest to arbitrary depth.
//!
//! [`DisplayRecord`]: crate::model::DisplayRecord

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::capabilities::Extensions;
use crate::error::RegistryError;
use crate::group::KindGroup;
use crate::kinds;
use crate::loaders::{
    AssetLoader, CategoryLoader, DisplayLoader, EntryLoader, GlobalSetLoader, ProductLoader,
    TagLoader, UserLoader, VariantLoader,
};

// ---------------------------------------------------------------------------
// Specs
// ---------------------------------------------------------------------------

/// How to find the owner of a container kind, and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Value of `elements.kind` for rows of this container.
    pub kind: String,
    /// Table holding one row per container, keyed by element id.
    pub table: String,
    #[serde(default = "default_owner_column")]
    pub owner_column: String,
    /// Column restricting the owner's site, if the table has one.
    #[serde(default)]
    pub owner_site_column: Option<String>,
    /// Container kinds that may own containers of this kind.
    #[serde(default)]
    pub nests_in: Vec<String>,
}

impl ContainerSpec {
    /// Built-in matrix blocks.
    #[must_use]
    pub fn matrix_blocks() -> Self {
        Self {
            kind: kinds::MATRIX_BLOCK.to_string(),
            table: "matrix_blocks".to_string(),
            owner_column: default_owner_column(),
            owner_site_column: Some("owner_site_id".to_string()),
            nests_in: Vec::new(),
        }
    }

    /// Super-table blocks from the nested-block extension. A super-table
    /// field may sit inside a matrix block.
    #[must_use]
    pub fn super_table_blocks() -> Self {
        Self {
            kind: kinds::SUPER_TABLE_BLOCK.to_string(),
            table: "super_table_blocks".to_string(),
            owner_column: default_owner_column(),
            owner_site_column: Some("owner_site_id".to_string()),
            nests_in: vec![kinds::MATRIX_BLOCK.to_string()],
        }
    }

    fn identifiers(&self) -> impl Iterator<Item = &str> {
        [self.table.as_str(), self.owner_column.as_str()]
            .into_iter()
            .chain(self.owner_site_column.as_deref())
    }
}

/// Elements of one kind that share the editor surface of another element,
/// found through a parent column (a product's variants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingRule {
    pub table: String,
    pub parent_column: String,
}

impl SiblingRule {
    #[must_use]
    pub fn commerce_variants() -> Self {
        Self {
            table: "commerce_variants".to_string(),
            parent_column: "product_id".to_string(),
        }
    }
}

fn default_owner_column() -> String {
    "owner_id".to_string()
}

/// What the resolver does with one kind.
pub enum KindHandler {
    Container(ContainerSpec),
    Display(Box<dyn DisplayLoader>),
}

impl fmt::Debug for KindHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container(spec) => f.debug_tuple("Container").field(spec).finish(),
            Self::Display(loader) => f.debug_tuple("Display").field(&loader.name()).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Validated kind table shared by every resolution.
#[derive(Debug)]
pub struct KindRegistry {
    handlers: HashMap<String, KindHandler>,
    /// Container kinds, innermost first.
    container_order: Vec<String>,
    siblings: HashMap<String, SiblingRule>,
}

impl KindRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry for the built-in kinds, the active extensions, and any
    /// extra container kinds from configuration.
    ///
    /// Commerce loaders are always registered; they return nothing while the
    /// extension is inactive.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if an extra container spec conflicts with
    /// the built-in kinds or closes an ownership cycle.
    pub fn standard(
        extensions: &Extensions,
        extra_containers: &[ContainerSpec],
    ) -> Result<Self, RegistryError> {
        let mut builder = Self::builder()
            .loader(kinds::ENTRY, Box::new(EntryLoader))
            .loader(kinds::GLOBAL_SET, Box::new(GlobalSetLoader))
            .loader(kinds::CATEGORY, Box::new(CategoryLoader))
            .loader(kinds::TAG, Box::new(TagLoader))
            .loader(kinds::ASSET, Box::new(AssetLoader))
            .loader(kinds::USER, Box::new(UserLoader))
            .loader(
                kinds::COMMERCE_PRODUCT,
                Box::new(ProductLoader::new(extensions.commerce)),
            )
            .loader(
                kinds::COMMERCE_VARIANT,
                Box::new(VariantLoader::new(extensions.commerce)),
            )
            .container(ContainerSpec::matrix_blocks());

        if extensions.nested_blocks {
            builder = builder.container(ContainerSpec::super_table_blocks());
        }
        if extensions.commerce {
            builder = builder.sibling(kinds::COMMERCE_PRODUCT, SiblingRule::commerce_variants());
        }
        for spec in extra_containers {
            builder = builder.container(spec.clone());
        }

        builder.build()
    }

    #[must_use]
    pub fn handler(&self, kind: &str) -> Option<&KindHandler> {
        self.handlers.get(kind)
    }

    #[must_use]
    pub fn is_container(&self, kind: &str) -> bool {
        matches!(self.handlers.get(kind), Some(KindHandler::Container(_)))
    }

    /// Container specs, innermost first.
    pub fn containers(&self) -> impl Iterator<Item = &ContainerSpec> {
        self.container_order
            .iter()
            .filter_map(|kind| match self.handlers.get(kind) {
                Some(KindHandler::Container(spec)) => Some(spec),
                _ => None,
            })
    }

    #[must_use]
    pub fn sibling_rule(&self, kind: &str) -> Option<&SiblingRule> {
        self.siblings.get(kind)
    }

    /// Next kind to process: the innermost container kind still present,
    /// otherwise the first remaining kind in sorted order.
    ///
    /// Draining every container before loading anything means each
    /// addressable kind is loaded once per resolution.
    #[must_use]
    pub fn next_kind(&self, group: &KindGroup) -> Option<String> {
        self.container_order
            .iter()
            .find(|kind| group.contains_kind(kind))
            .cloned()
            .or_else(|| group.kinds().next().map(str::to_string))
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RegistryBuilder {
    handlers: Vec<(String, KindHandler)>,
    siblings: Vec<(String, SiblingRule)>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn container(mut self, spec: ContainerSpec) -> Self {
        self.handlers
            .push((spec.kind.clone(), KindHandler::Container(spec)));
        self
    }

    #[must_use]
    pub fn loader(mut self, kind: &str, loader: Box<dyn DisplayLoader>) -> Self {
        self.handlers.push((kind.to_string(), KindHandler::Display(loader)));
        self
    }

    #[must_use]
    pub fn sibling(mut self, kind: &str, rule: SiblingRule) -> Self {
        self.siblings.push((kind.to_string(), rule));
        self
    }

    /// Validate and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] for duplicate kinds, unsafe identifiers,
    /// unknown nesting targets, or container kinds that own each other.
    pub fn build(self) -> Result<KindRegistry, RegistryError> {
        let mut handlers: HashMap<String, KindHandler> = HashMap::new();
        for (kind, handler) in self.handlers {
            if handlers.contains_key(&kind) {
                return Err(RegistryError::DuplicateKind(kind));
            }
            handlers.insert(kind, handler);
        }

        let specs: BTreeMap<&str, &ContainerSpec> = handlers
            .iter()
            .filter_map(|(kind, handler)| match handler {
                KindHandler::Container(spec) => Some((kind.as_str(), spec)),
                KindHandler::Display(_) => None,
            })
            .collect();

        for spec in specs.values() {
            if let Some(bad) = spec.identifiers().find(|ident| !is_sql_identifier(ident)) {
                return Err(RegistryError::InvalidIdentifier {
                    kind: spec.kind.clone(),
                    ident: bad.to_string(),
                });
            }
            if let Some(target) = spec.nests_in.iter().find(|t| !specs.contains_key(t.as_str())) {
                return Err(RegistryError::UnknownNestingTarget {
                    kind: spec.kind.clone(),
                    target: target.clone(),
                });
            }
        }

        for (kind, rule) in &self.siblings {
            if let Some(bad) = [rule.table.as_str(), rule.parent_column.as_str()]
                .into_iter()
                .find(|ident| !is_sql_identifier(ident))
            {
                return Err(RegistryError::InvalidIdentifier {
                    kind: kind.clone(),
                    ident: bad.to_string(),
                });
            }
        }

        let container_order = container_order(&specs)?;

        Ok(KindRegistry {
            handlers,
            container_order,
            siblings: self.siblings.into_iter().collect(),
        })
    }
}

/// Order container kinds innermost first.
///
/// Edges run `child -> owner`. Self-nesting is legal and left out of the
/// graph; any other strongly connected component is a fatal cycle.
fn container_order(specs: &BTreeMap<&str, &ContainerSpec>) -> Result<Vec<String>, RegistryError> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for kind in specs.keys().copied() {
        nodes.insert(kind, graph.add_node(kind.to_string()));
    }

    for (kind, spec) in specs {
        for owner in &spec.nests_in {
            if owner == kind {
                continue;
            }
            graph.update_edge(nodes[kind], nodes[owner.as_str()], ());
        }
    }

    if let Some(component) = tarjan_scc(&graph).into_iter().find(|c| c.len() > 1) {
        let mut path: Vec<String> = component.iter().map(|idx| graph[*idx].clone()).collect();
        path.sort_unstable();
        path.push(path[0].clone());
        return Err(RegistryError::ContainerCycle(path));
    }

    toposort(&graph, None)
        .map(|order| order.into_iter().map(|idx| graph[idx].clone()).collect())
        .map_err(|cycle| RegistryError::ContainerCycle(vec![graph[cycle.node_id()].clone()]))
}

fn is_sql_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

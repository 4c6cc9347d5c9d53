//! elmap-core library.
//!
//! Computes the reference map of a CMS element: which addressable elements
//! point at it and which it points at, with container elements (matrix
//! blocks, super-table blocks) flattened to the pages that own them.
//!
//! The entry point is [`ElementMapper`]. Build one from a [`MapConfig`] and
//! the [`Extensions`] detected in the store, then call
//! [`ElementMapper::build_map`] with a connection opened by
//! [`db::open_store`].
//!
//! # Conventions
//!
//! - **Errors**: library operations return [`MapError`]; store errors pass
//!   through unchanged. Configuration loading uses `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `debug!`, `trace!`).

pub mod capabilities;
pub mod config;
pub mod db;
pub mod error;
pub mod expand;
pub mod group;
pub mod kinds;
pub mod loaders;
pub mod map;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod urls;

pub use capabilities::{Extensions, detect_extensions};
pub use config::{MapConfig, load_effective_config};
pub use error::{ErrorCode, MapError, RegistryError};
pub use map::ElementMapper;
pub use model::{Direction, DisplayRecord, ElementId, ElementMap, ReferenceCounts, SiteId};
pub use registry::{ContainerSpec, KindRegistry};

use anyhow::Result;
use clap::Args;
use elmap_core::db::query;
use elmap_core::{DisplayRecord, ElementId, ElementMap, ErrorCode, SiteId};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use crate::output::{self, OutputMode};

/// Arguments for `elmap map`.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Element to map.
    pub element_id: ElementId,

    /// Site to resolve titles and edges for. Defaults to the primary site.
    #[arg(long)]
    pub site: Option<SiteId>,
}

#[derive(Debug, Serialize)]
struct MapReport {
    element_id: ElementId,
    site: SiteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    incoming: Vec<DisplayRecord>,
    outgoing: Vec<DisplayRecord>,
}

/// Print both reference lists of an element.
pub fn run_map(
    args: &MapArgs,
    db: Option<&Path>,
    config: Option<&Path>,
    mode: OutputMode,
) -> Result<()> {
    let conn = super::open_store(db)?;
    let config = super::load_config(config)?;
    let mapper = super::build_mapper(&conn, &config)?;
    let site = super::resolve_site(&conn, args.site)?;

    let kind = if args.element_id > 0 {
        query::element_kind(&conn, args.element_id)?
    } else {
        None
    };
    if kind.is_none() {
        warn!(
            code = %ErrorCode::ElementNotFound,
            element_id = args.element_id,
            "element is not in the store; showing dangling edges only"
        );
    }

    let ElementMap { incoming, outgoing } = mapper
        .build_map(&conn, args.element_id, site)?
        .unwrap_or_default();

    let report = MapReport {
        element_id: args.element_id,
        site,
        kind,
        incoming,
        outgoing,
    };

    output::render_mode(
        mode,
        &report,
        |report, w| {
            for record in &report.incoming {
                output::text_record(w, "incoming", record)?;
            }
            for record in &report.outgoing {
                output::text_record(w, "outgoing", record)?;
            }
            Ok(())
        },
        |report, w| {
            output::pretty_kv(w, "Element", report.element_id.to_string())?;
            output::pretty_kv(w, "Kind", report.kind.as_deref().unwrap_or("unknown"))?;
            output::pretty_kv(w, "Site", report.site.to_string())?;
            writeln!(w)?;
            output::pretty_records(w, "Referenced by", &report.incoming)?;
            output::pretty_records(w, "References", &report.outgoing)
        },
    )
}

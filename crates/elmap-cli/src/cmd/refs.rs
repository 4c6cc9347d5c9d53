use anyhow::Result;
use clap::Args;
use elmap_core::{Direction, DisplayRecord, ElementId, SiteId};
use serde::Serialize;
use std::path::Path;

use crate::output::{self, OutputMode};

/// Arguments for `elmap refs`.
#[derive(Args, Debug)]
pub struct RefsArgs {
    /// Element whose references to list.
    pub element_id: ElementId,

    /// Which side to list: `incoming` (referenced by) or `outgoing` (references).
    #[arg(long, short, default_value = "incoming")]
    pub direction: Direction,

    /// Print only the number of references.
    #[arg(long)]
    pub count: bool,

    /// Site to resolve titles and edges for. Defaults to the primary site.
    #[arg(long)]
    pub site: Option<SiteId>,
}

#[derive(Debug, Serialize)]
struct RefsReport {
    element_id: ElementId,
    site: SiteId,
    direction: String,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<DisplayRecord>>,
}

/// Print one side of an element's map.
pub fn run_refs(
    args: &RefsArgs,
    db: Option<&Path>,
    config: Option<&Path>,
    mode: OutputMode,
) -> Result<()> {
    let conn = super::open_store(db)?;
    let config = super::load_config(config)?;
    let mapper = super::build_mapper(&conn, &config)?;
    let site = super::resolve_site(&conn, args.site)?;

    let records = match args.direction {
        Direction::Incoming => mapper.incoming(&conn, args.element_id, site)?,
        Direction::Outgoing => mapper.outgoing(&conn, args.element_id, site)?,
    };

    let report = RefsReport {
        element_id: args.element_id,
        site,
        direction: args.direction.to_string(),
        count: records.len(),
        records: (!args.count).then_some(records),
    };

    output::render_mode(
        mode,
        &report,
        |report, w| match &report.records {
            None => writeln!(w, "{}", report.count),
            Some(records) => {
                for record in records {
                    output::text_record(w, &report.direction, record)?;
                }
                Ok(())
            }
        },
        |report, w| match &report.records {
            None => output::pretty_kv(w, &report.direction, report.count.to_string()),
            Some(records) => output::pretty_records(w, &report.direction, records),
        },
    )
}

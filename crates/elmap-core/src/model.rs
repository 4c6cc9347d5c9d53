//! Value types shared by the expander, resolver, and map assembly.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Primary key of a row in the host `elements` table.
pub type ElementId = i64;

/// Primary key of a row in the host `sites` table.
pub type SiteId = i64;

/// An element identifier paired with its polymorphic kind.
///
/// Ids share one numeric space across kinds, so a bare id is never enough to
/// pick a loader; the kind always travels with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef {
    pub id: ElementId,
    pub kind: String,
}

impl ElementRef {
    pub fn new(id: ElementId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

/// Which side of a relationship faces the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges whose target is in the frontier; yields their sources.
    Incoming,
    /// Edges whose source is in the frontier; yields their targets.
    Outgoing,
}

impl Direction {
    /// `relations` column matched against the frontier ids.
    #[must_use]
    pub const fn frontier_column(self) -> &'static str {
        match self {
            Self::Incoming => "target_id",
            Self::Outgoing => "source_id",
        }
    }

    /// `relations` column holding the ids to report.
    #[must_use]
    pub const fn opposite_column(self) -> &'static str {
        match self {
            Self::Incoming => "source_id",
            Self::Outgoing => "target_id",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => f.write_str("incoming"),
            Self::Outgoing => f.write_str("outgoing"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incoming" | "in" | "from" => Ok(Self::Incoming),
            "outgoing" | "out" | "to" => Ok(Self::Outgoing),
            other => Err(format!(
                "unknown direction '{other}': expected incoming or outgoing"
            )),
        }
    }
}

/// One caller-visible row of an element map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub id: ElementId,
    pub kind: String,
    /// Icon name the presentation layer uses to tag the row.
    pub icon: String,
    pub title: String,
    /// Edit or public link. `None` when the kind has nowhere to point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DisplayRecord {
    /// Title ordering used for every map list: ordinal, case-sensitive.
    #[must_use]
    pub fn cmp_title(&self, other: &Self) -> Ordering {
        self.title.cmp(&other.title)
    }
}

/// Sort records by title. The sort is stable, so equal titles keep their
/// resolution order.
pub fn sort_by_title(records: &mut [DisplayRecord]) {
    records.sort_by(DisplayRecord::cmp_title);
}

/// The two reference lists for a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ElementMap {
    /// Elements that reference the subject.
    pub incoming: Vec<DisplayRecord>,
    /// Elements the subject references.
    pub outgoing: Vec<DisplayRecord>,
}

impl ElementMap {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty() && self.outgoing.is_empty()
    }
}

/// Reference totals for list columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceCounts {
    pub incoming: usize,
    pub outgoing: usize,
}

impl From<&ElementMap> for ReferenceCounts {
    fn from(map: &ElementMap) -> Self {
        Self {
            incoming: map.incoming.len(),
            outgoing: map.outgoing.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, DisplayRecord, sort_by_title};

    #[test]
    fn direction_parses_aliases() {
        assert_eq!("IN".parse::<Direction>(), Ok(Direction::Incoming));
        assert_eq!("outgoing".parse::<Direction>(), Ok(Direction::Outgoing));
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::Incoming.frontier_column(), "target_id");
        assert_eq!(Direction::Outgoing.opposite_column(), "target_id");
    }

    fn record(id: i64, title: &str) -> DisplayRecord {
        DisplayRecord {
            id,
            kind: "entry".to_string(),
            icon: "newspaper".to_string(),
            title: title.to_string(),
            url: None,
        }
    }

    #[test]
    fn title_sort_is_case_sensitive_ordinal() {
        let mut records = vec![record(1, "banana"), record(2, "Cherry"), record(3, "apple")];
        sort_by_title(&mut records);

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Cherry", "apple", "banana"]);
    }

    #[test]
    fn title_sort_is_stable_for_ties() {
        let mut records = vec![record(9, "Same"), record(3, "Same"), record(5, "A")];
        sort_by_title(&mut records);

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 9, 3]);
    }

    #[test]
    fn records_serialize_without_missing_urls() {
        let mut linked = record(1, "Home");
        linked.url = Some("/admin/entries/pages/1".to_string());

        let json = serde_json::to_value([record(2, "Draft"), linked]).expect("serialize");
        assert!(json[0].get("url").is_none());
        assert_eq!(json[1]["url"], "/admin/entries/pages/1");
        assert_eq!(json[1]["icon"], "newspaper");
    }
}

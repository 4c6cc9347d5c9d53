//! Error types for element-map.
//!
//! Store failures pass through untouched: the core performs no retry and no
//! partial-result suppression. Registry errors are configuration mistakes
//! detected once, when the kind registry is built.

use std::fmt;

/// Errors returned by resolution and map assembly.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The host store rejected or failed a query.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),

    /// The kind registry could not be built.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl MapError {
    /// Stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Store(_) => ErrorCode::StoreQueryFailed,
            Self::Registry(e) => e.code(),
        }
    }
}

/// Misconfigurations rejected while building a kind registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same kind was registered more than once.
    #[error("kind '{0}' is registered more than once")]
    DuplicateKind(String),

    /// A container declares it may nest inside a kind that is not a
    /// registered container.
    #[error("container kind '{kind}' nests in '{target}', which is not a registered container kind")]
    UnknownNestingTarget { kind: String, target: String },

    /// Two or more container kinds own each other.
    #[error("container kinds own each other: {}", .0.join(" -> "))]
    ContainerCycle(Vec<String>),

    /// A table or column name is not a plain SQL identifier.
    #[error("container kind '{kind}' uses invalid identifier '{ident}'")]
    InvalidIdentifier { kind: String, ident: String },
}

impl RegistryError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateKind(_) => ErrorCode::DuplicateKind,
            Self::UnknownNestingTarget { .. } => ErrorCode::UnknownNestingTarget,
            Self::ContainerCycle(_) => ErrorCode::ContainerCycle,
            Self::InvalidIdentifier { .. } => ErrorCode::InvalidIdentifier,
        }
    }
}

/// Machine-readable error codes for CLI and host-side reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    StoreNotFound,
    ConfigParseError,
    StoreQueryFailed,
    ElementNotFound,
    DuplicateKind,
    UnknownNestingTarget,
    ContainerCycle,
    InvalidIdentifier,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::StoreNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::StoreQueryFailed => "E2001",
            Self::ElementNotFound => "E2002",
            Self::DuplicateKind => "E3001",
            Self::UnknownNestingTarget => "E3002",
            Self::ContainerCycle => "E3003",
            Self::InvalidIdentifier => "E3004",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StoreNotFound => "Host store not found",
            Self::ConfigParseError => "Config file parse error",
            Self::StoreQueryFailed => "Host store query failed",
            Self::ElementNotFound => "Element not found",
            Self::DuplicateKind => "Kind registered twice",
            Self::UnknownNestingTarget => "Unknown container nesting target",
            Self::ContainerCycle => "Container kinds own each other",
            Self::InvalidIdentifier => "Invalid table or column name",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::StoreNotFound => Some("Pass --db or set ELMAP_DB to the host SQLite file."),
            Self::ConfigParseError => Some("Fix syntax in the element-map config.toml and retry."),
            Self::StoreQueryFailed => Some("Check that the host schema matches the expected tables."),
            Self::ElementNotFound => None,
            Self::DuplicateKind => Some("Remove the duplicate [[containers]] entry."),
            Self::UnknownNestingTarget => {
                Some("List only registered container kinds in `nests_in`.")
            }
            Self::ContainerCycle => {
                Some("Drop one direction of the `nests_in` declarations so nesting is one-way.")
            }
            Self::InvalidIdentifier => Some("Use letters, digits and underscores only."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

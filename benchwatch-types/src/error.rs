use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a stored record could not be read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorKind {
    /// No file exists for the id.
    Missing,
    /// The file exists but does not decode into a record.
    Corrupt,
    /// The process lacks permission to read or write the file.
    PermissionDenied,
    /// Any other I/O failure (disk full, rename failure, ...).
    Io,
}

impl core::fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Missing => "missing",
            Self::Corrupt => "corrupt",
            Self::PermissionDenied => "permission denied",
            Self::Io => "io",
        };
        f.write_str(s)
    }
}

/// Unified error type for the benchwatch workspace.
///
/// Fetch-side variants (`Fetch`, `MissingCredential`, `NoData`, `SourceTimeout`,
/// `RetriesExhausted`, `UnsupportedSource`) all mean "no data for this commodity"
/// to the orchestrator. None of them is fatal to a batch.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BenchError {
    /// A raw date string matched none of the known formats.
    #[error("unable to parse date: {raw:?}")]
    DateParse {
        /// The offending input, trimmed.
        raw: String,
    },

    /// An upstream source failed (HTTP status, transport, malformed payload).
    #[error("{source_name} fetch failed: {msg}")]
    Fetch {
        /// Source label, e.g. "FRED".
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A source requires an API key that is not configured.
    #[error("{source_name} requires {var}")]
    MissingCredential {
        /// Source label.
        source_name: String,
        /// Environment variable that should carry the key.
        var: String,
    },

    /// A fetch completed but produced no usable observations.
    #[error("no data fetched: {what}")]
    NoData {
        /// Description of the request, e.g. "FRED series DHHNGSP".
        what: String,
    },

    /// A single fetch attempt exceeded its timeout.
    #[error("{source_name} timed out")]
    SourceTimeout {
        /// Source label.
        source_name: String,
    },

    /// The retry wrapper gave up after `attempts` tries.
    #[error("{source_name} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Source label.
        source_name: String,
        /// Number of attempts made.
        attempts: u32,
        /// The error returned by the final attempt.
        last: Box<BenchError>,
    },

    /// No source is registered for the requested kind.
    #[error("no source registered for {kind}")]
    UnsupportedSource {
        /// Source label of the missing kind.
        kind: String,
    },

    /// A record cannot be built from an empty history.
    #[error("empty history for {id}")]
    EmptyHistory {
        /// Commodity id.
        id: String,
    },

    /// Reading or writing a stored record failed.
    #[error("storage {kind} for {id}: {msg}")]
    Storage {
        /// Commodity id.
        id: String,
        /// Failure classification.
        kind: StorageErrorKind,
        /// Underlying error text.
        msg: String,
    },

    /// A commodity or resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource.
        what: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl BenchError {
    /// Helper: build a `DateParse` error.
    pub fn date_parse(raw: impl Into<String>) -> Self {
        Self::DateParse { raw: raw.into() }
    }

    /// Helper: build a `Fetch` error tagged with the source label.
    pub fn fetch(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `MissingCredential` error.
    pub fn missing_credential(source_name: impl Into<String>, var: impl Into<String>) -> Self {
        Self::MissingCredential {
            source_name: source_name.into(),
            var: var.into(),
        }
    }

    /// Helper: build a `NoData` error.
    pub fn no_data(what: impl Into<String>) -> Self {
        Self::NoData { what: what.into() }
    }

    /// Helper: build a `SourceTimeout` error.
    pub fn source_timeout(source_name: impl Into<String>) -> Self {
        Self::SourceTimeout {
            source_name: source_name.into(),
        }
    }

    /// Helper: build a `Storage` error.
    pub fn storage(id: impl Into<String>, kind: StorageErrorKind, msg: impl Into<String>) -> Self {
        Self::Storage {
            id: id.into(),
            kind,
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// True for every variant that means "the upstream produced nothing usable".
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. }
                | Self::MissingCredential { .. }
                | Self::NoData { .. }
                | Self::SourceTimeout { .. }
                | Self::RetriesExhausted { .. }
                | Self::UnsupportedSource { .. }
        )
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Missing credentials, unknown sources, and empty payloads are stable
    /// conditions; transport failures and timeouts are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::SourceTimeout { .. })
    }

    /// Storage classification, if this is a storage error.
    #[must_use]
    pub const fn storage_kind(&self) -> Option<StorageErrorKind> {
        match self {
            Self::Storage { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::BenchError;

/// Upstream data source families.
///
/// Each variant maps to exactly one fetch implementation registered with the
/// orchestrator; dispatch goes through this tag instead of free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SourceKind {
    /// Federal Reserve Economic Data (St. Louis Fed).
    #[serde(rename = "FRED")]
    Fred,
    /// U.S. Energy Information Administration API v2.
    #[serde(rename = "EIA")]
    Eia,
    /// freegoldapi.com CSV feed.
    #[serde(rename = "FREEGOLD")]
    FreeGold,
    /// Yahoo Finance chart API.
    #[serde(rename = "YAHOO")]
    Yahoo,
    /// Synthetic placeholder series; never treated as ground truth.
    #[serde(rename = "SIMULATED")]
    Simulated,
}

impl SourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Fred,
        Self::Eia,
        Self::FreeGold,
        Self::Yahoo,
        Self::Simulated,
    ];

    /// Stable upper-case label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fred => "FRED",
            Self::Eia => "EIA",
            Self::FreeGold => "FREEGOLD",
            Self::Yahoo => "YAHOO",
            Self::Simulated => "SIMULATED",
        }
    }

    /// Provenance class recorded alongside every record from this source.
    #[must_use]
    pub const fn source_class(self) -> SourceClass {
        match self {
            Self::Fred | Self::Eia => SourceClass::OfficialBenchmark,
            _ => SourceClass::PublicMarketReference,
        }
    }

    /// Whether data from this source must be flagged as simulated.
    #[must_use]
    pub const fn is_simulated(self) -> bool {
        matches!(self, Self::Simulated)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BenchError::InvalidArg(format!("unknown source type '{s}'")))
    }
}

/// Provenance classification of a record's source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceClass {
    /// Published by a statistical agency (FRED, EIA).
    OfficialBenchmark,
    /// Market or aggregator reference price.
    PublicMarketReference,
}

impl fmt::Display for SourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OfficialBenchmark => "official_benchmark",
            Self::PublicMarketReference => "public_market_reference",
        })
    }
}

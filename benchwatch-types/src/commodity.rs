//! Static commodity catalog entries.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BenchError, SourceKind};

/// Commodity grouping used for listing and bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Crude, products, gas.
    Energy,
    /// Base and industrial metals.
    Metal,
    /// Gold, silver, platinum.
    Precious,
    /// Grains, softs, livestock.
    Agricultural,
}

impl Category {
    /// Lower-case label, identical to the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Metal => "metal",
            Self::Precious => "precious",
            Self::Agricultural => "agricultural",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BenchError;

    /// Accepts the canonical labels plus the plural forms used by chat commands
    /// (`metals`, `agriculture`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "energy" => Ok(Self::Energy),
            "metal" | "metals" => Ok(Self::Metal),
            "precious" => Ok(Self::Precious),
            "agricultural" | "agriculture" => Ok(Self::Agricultural),
            other => Err(BenchError::InvalidArg(format!("unknown category '{other}'"))),
        }
    }
}

/// Source-specific request parameters, tagged by `source_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source_type")]
#[non_exhaustive]
pub enum SourceParams {
    /// FRED series observations.
    #[serde(rename = "FRED")]
    Fred {
        /// FRED series id, e.g. `DHHNGSP`.
        series_id: String,
    },
    /// EIA v2 data endpoint with facet filters.
    #[serde(rename = "EIA")]
    Eia {
        /// Full endpoint URL, e.g. `https://api.eia.gov/v2/petroleum/pri/spt/data/`.
        url: String,
        /// Facet filters, each sent as `facets[key][]=value`.
        #[serde(default)]
        facets: BTreeMap<String, Vec<String>>,
    },
    /// freegoldapi.com CSV.
    #[serde(rename = "FREEGOLD")]
    FreeGold {
        /// Dataset label; only `gold` is published today.
        #[serde(default = "default_data_type")]
        data_type: String,
    },
    /// Yahoo Finance chart for a futures symbol.
    #[serde(rename = "YAHOO")]
    Yahoo {
        /// Ticker symbol, e.g. `SI=F`.
        symbol: String,
    },
    /// Synthetic random walk around `base_price`.
    #[serde(rename = "SIMULATED")]
    Simulated {
        /// Starting level of the walk.
        #[serde(with = "rust_decimal::serde::float")]
        base_price: Decimal,
    },
}

fn default_data_type() -> String {
    "gold".to_string()
}

impl SourceParams {
    /// The source family these parameters belong to.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Fred { .. } => SourceKind::Fred,
            Self::Eia { .. } => SourceKind::Eia,
            Self::FreeGold { .. } => SourceKind::FreeGold,
            Self::Yahoo { .. } => SourceKind::Yahoo,
            Self::Simulated { .. } => SourceKind::Simulated,
        }
    }

    /// Short description used in log lines and `NoData` errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Fred { series_id } => format!("FRED series {series_id}"),
            Self::Eia { facets, .. } => {
                let series = facets
                    .get("series")
                    .map(|v| v.join(","))
                    .unwrap_or_default();
                format!("EIA series {series}")
            }
            Self::FreeGold { data_type } => format!("FreeGoldAPI {data_type}"),
            Self::Yahoo { symbol } => format!("Yahoo {symbol}"),
            Self::Simulated { .. } => "simulated walk".to_string(),
        }
    }
}

/// One catalog entry: identity plus how to fetch it. Never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityConfig {
    /// Stable identifier; also the stored file name.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grouping.
    pub category: Category,
    /// Quoting unit, e.g. `barrel`.
    pub unit: String,
    /// Quote currency.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Display name of the provider; defaults to the source label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    /// Human-facing page documenting the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_info_url: Option<String>,
    /// Fetch parameters.
    pub source: SourceParams,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl CommodityConfig {
    /// Construct an entry quoted in USD with no explicit provider name.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        unit: impl Into<String>,
        source: SourceParams,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            unit: unit.into(),
            currency: default_currency(),
            source_name: None,
            source_info_url: None,
            source,
        }
    }

    /// Set the provider display name.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Set the provenance URL.
    #[must_use]
    pub fn with_info_url(mut self, url: impl Into<String>) -> Self {
        self.source_info_url = Some(url.into());
        self
    }

    /// Source family of this entry.
    #[must_use]
    pub const fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Provider display name, falling back to the source label.
    #[must_use]
    pub fn effective_source_name(&self) -> String {
        self.source_name
            .clone()
            .unwrap_or_else(|| self.source_kind().as_str().to_string())
    }
}

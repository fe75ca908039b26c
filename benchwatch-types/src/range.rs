use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Display window applied to a history on the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayRange {
    /// Last 7 days.
    #[serde(rename = "1W")]
    OneWeek,
    /// Last 30 days.
    #[serde(rename = "1M")]
    OneMonth,
    /// Last 90 days.
    #[serde(rename = "3M")]
    ThreeMonths,
    /// Last 180 days.
    #[serde(rename = "6M")]
    SixMonths,
    /// Last 365 days.
    #[serde(rename = "1Y")]
    OneYear,
    /// Entire stored history.
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl DisplayRange {
    /// Width of the window in calendar days; `None` for [`DisplayRange::All`].
    #[must_use]
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::OneWeek => Some(7),
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::SixMonths => Some(180),
            Self::OneYear => Some(365),
            Self::All => None,
        }
    }

    /// Short label (`1W`, `1M`, ..., `ALL`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::All => "ALL",
        }
    }

    /// Case-insensitive parse; unrecognized labels fall back to `All`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "1W" => Self::OneWeek,
            "1M" => Self::OneMonth,
            "3M" => Self::ThreeMonths,
            "6M" => Self::SixMonths,
            "1Y" => Self::OneYear,
            _ => Self::All,
        }
    }
}

impl FromStr for DisplayRange {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for DisplayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

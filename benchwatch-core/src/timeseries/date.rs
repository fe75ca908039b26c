use chrono::{NaiveDate, NaiveDateTime};

use crate::BenchError;

/// Date layouts understood by [`DateNormalizer`], in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateFormat {
    IsoDate,
    IsoDateTime,
    SpaceDateTime,
    SlashYmd,
    UsMdy,
    EuDmy,
    Compact,
}

impl DateFormat {
    const PRIORITY: [Self; 7] = [
        Self::IsoDate,
        Self::IsoDateTime,
        Self::SpaceDateTime,
        Self::SlashYmd,
        Self::UsMdy,
        Self::EuDmy,
        Self::Compact,
    ];

    fn parse(self, s: &str) -> Option<NaiveDate> {
        match self {
            Self::IsoDate => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            Self::IsoDateTime => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date()),
            Self::SpaceDateTime => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date()),
            Self::SlashYmd => NaiveDate::parse_from_str(s, "%Y/%m/%d").ok(),
            Self::UsMdy => NaiveDate::parse_from_str(s, "%m/%d/%Y").ok(),
            Self::EuDmy => NaiveDate::parse_from_str(s, "%d/%m/%Y").ok(),
            Self::Compact => parse_compact(s),
        }
    }
}

/// `YYYYMMDD`, exactly eight ASCII digits.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalizes heterogeneous upstream date strings to calendar dates.
///
/// Formats are tried in a fixed priority order: ISO date, ISO datetime,
/// space-separated datetime, `Y/M/D`, US `M/D/Y`, EU `D/M/Y`, compact
/// `YYYYMMDD`. The first match wins, so an ambiguous `03/04/2024` is read
/// as March 4th.
///
/// Each instance remembers the last format that worked and tries it first on
/// the next call. A hinted match is only accepted when no higher-priority
/// format also parses the input, so results are identical to a cold scan.
/// Use one normalizer per fetch; they are cheap.
#[derive(Debug, Clone, Default)]
pub struct DateNormalizer {
    last_format: Option<usize>,
}

impl DateNormalizer {
    /// A normalizer with no format hint.
    #[must_use]
    pub const fn new() -> Self {
        Self { last_format: None }
    }

    /// Parse `raw` (surrounding whitespace ignored) into a calendar date.
    ///
    /// # Errors
    /// Returns [`BenchError::DateParse`] when no known format matches.
    pub fn normalize(&mut self, raw: &str) -> Result<NaiveDate, BenchError> {
        let s = raw.trim();

        if let Some(hint) = self.last_format
            && let Some(date) = DateFormat::PRIORITY[hint].parse(s)
            && DateFormat::PRIORITY[..hint]
                .iter()
                .all(|f| f.parse(s).is_none())
        {
            return Ok(date);
        }

        for (idx, fmt) in DateFormat::PRIORITY.iter().enumerate() {
            if let Some(date) = fmt.parse(s) {
                self.last_format = Some(idx);
                return Ok(date);
            }
        }
        Err(BenchError::date_parse(s))
    }

    /// Like [`DateNormalizer::normalize`] but returns the canonical `YYYY-MM-DD` string.
    ///
    /// # Errors
    /// Returns [`BenchError::DateParse`] when no known format matches.
    pub fn normalize_to_string(&mut self, raw: &str) -> Result<String, BenchError> {
        self.normalize(raw).map(|d| d.format("%Y-%m-%d").to_string())
    }
}

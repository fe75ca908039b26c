use chrono::NaiveDate;
use core::fmt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::History;

/// Offsets, in observations, for which percentage change is reported.
pub const PCT_OFFSETS: [usize; 3] = [1, 30, 365];

/// Coarse trend label over the last 30 observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Change above +1.0%.
    Up,
    /// Change below -1.0%.
    Down,
    /// Within the deadband, or not enough observations.
    #[default]
    Flat,
}

impl Direction {
    /// Classify a percentage change with a ±1.0 deadband; inclusive bounds are flat.
    #[must_use]
    pub fn from_pct(pct: Option<Decimal>) -> Self {
        match pct {
            Some(p) if p > Decimal::ONE => Self::Up,
            Some(p) if p < Decimal::NEGATIVE_ONE => Self::Down,
            _ => Self::Flat,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        })
    }
}

/// Descriptive statistics computed once per history state.
///
/// Every `*_obs` field compares the latest observation with the one N
/// positions earlier and is absent when the history has N or fewer entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Price of the latest observation.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub latest_price: Option<Decimal>,
    /// Number of observations in the history.
    #[serde(default)]
    pub observations: usize,
    /// Date of the latest observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_observation_date: Option<NaiveDate>,
    /// Latest minus previous price, 4 dp.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub abs_change_1_obs: Option<Decimal>,
    /// Percent change vs. the previous observation, 2 dp.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pct_change_1_obs: Option<Decimal>,
    /// Percent change vs. 30 observations back, 2 dp.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pct_change_30_obs: Option<Decimal>,
    /// Percent change vs. 365 observations back, 2 dp.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub pct_change_365_obs: Option<Decimal>,
    /// Trend label from `pct_change_30_obs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction_30_obs: Option<Direction>,
}

impl MetricsSnapshot {
    /// True for the snapshot of an empty history.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.observations == 0
    }

    /// Percentage change for one of the reported offsets.
    #[must_use]
    pub const fn pct_change(&self, offset: usize) -> Option<Decimal> {
        match offset {
            1 => self.pct_change_1_obs,
            30 => self.pct_change_30_obs,
            365 => self.pct_change_365_obs,
            _ => None,
        }
    }
}

/// `(latest / base - 1) * 100` at 2 dp, or `None` when `base` is zero.
fn pct_change(latest: Decimal, base: Decimal) -> Option<Decimal> {
    if base.is_zero() {
        return None;
    }
    let ratio = latest.checked_div(base)?;
    (ratio - Decimal::ONE)
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|p| p.round_dp(2))
}

/// Compute the observation-indexed statistics for `history`.
///
/// An empty history yields [`MetricsSnapshot::default`]. Calendar spacing
/// between observations is ignored.
#[must_use]
pub fn compute_metrics(history: &History) -> MetricsSnapshot {
    let Some(latest) = history.latest() else {
        return MetricsSnapshot::default();
    };

    let pct_back = |k: usize| {
        history
            .back(k)
            .and_then(|base| pct_change(latest.price, base.price))
    };
    let pct_change_30_obs = pct_back(30);

    MetricsSnapshot {
        latest_price: Some(latest.price),
        observations: history.len(),
        latest_observation_date: Some(latest.date),
        abs_change_1_obs: history
            .back(1)
            .map(|prev| (latest.price - prev.price).round_dp(4)),
        pct_change_1_obs: pct_back(1),
        pct_change_30_obs,
        pct_change_365_obs: pct_back(365),
        direction_30_obs: Some(Direction::from_pct(pct_change_30_obs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pct_change_rounds_half_even() {
        // 100 -> 100.125 is exactly 0.125%; half-even keeps 0.12
        assert_eq!(pct_change(dec!(100.125), dec!(100)), Some(dec!(0.12)));
        assert_eq!(pct_change(dec!(100.135), dec!(100)), Some(dec!(0.14)));
    }

    #[test]
    fn pct_change_zero_base_is_absent() {
        assert_eq!(pct_change(dec!(5), Decimal::ZERO), None);
    }

    #[test]
    fn direction_deadband() {
        assert_eq!(Direction::from_pct(Some(dec!(1.0))), Direction::Flat);
        assert_eq!(Direction::from_pct(Some(dec!(1.01))), Direction::Up);
        assert_eq!(Direction::from_pct(Some(dec!(-1.0))), Direction::Flat);
        assert_eq!(Direction::from_pct(Some(dec!(-1.01))), Direction::Down);
        assert_eq!(Direction::from_pct(None), Direction::Flat);
    }
}

use async_trait::async_trait;
use benchwatch_core::{BenchError, PriceSource, RawObservation, SourceKind, SourceParams};
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const NAME: &str = "SIMULATED";
const DEFAULT_DAYS: usize = 90;
/// Largest daily move, in percent.
const MAX_STEP_PCT: i64 = 2;

/// Placeholder feed for commodities without a free upstream.
///
/// Produces a bounded random walk of daily closes ending today, staying within
/// half and one and a half times `base_price`. Records built from it are
/// flagged simulated and never seed a later merge.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    days: usize,
    seed: Option<u64>,
    end: Option<NaiveDate>,
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSource {
    /// 90-day walk ending today, seeded from the thread RNG.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: DEFAULT_DAYS,
            seed: None,
            end: None,
        }
    }

    /// Deterministic walk.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of daily observations to produce.
    #[must_use]
    pub const fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Last date of the walk instead of today.
    #[must_use]
    pub const fn ending_on(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    fn walk(&self, base: Decimal) -> Vec<RawObservation> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let end = self.end.unwrap_or_else(|| Utc::now().date_naive());
        let floor = base / Decimal::TWO;
        let ceiling = base * Decimal::new(15, 1);
        let hundred = Decimal::ONE_HUNDRED;

        let mut price = base;
        let mut out = Vec::with_capacity(self.days);
        for offset in (0..self.days).rev() {
            // hundredths of a percent, -2.00 ..= 2.00
            let bp = rng.random_range(-MAX_STEP_PCT * 100..=MAX_STEP_PCT * 100);
            let step = Decimal::new(bp, 2) / hundred;
            price = (price * (Decimal::ONE + step)).clamp(floor, ceiling).round_dp(2);
            let date = end - Duration::days(offset as i64);
            out.push(RawObservation::new(date.format("%Y-%m-%d").to_string(), price));
        }
        out
    }
}

#[async_trait]
impl PriceSource for SimulatedSource {
    fn name(&self) -> &'static str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Simulated
    }

    async fn fetch(&self, params: &SourceParams) -> Result<Vec<RawObservation>, BenchError> {
        match params {
            SourceParams::Simulated { base_price } if *base_price > Decimal::ZERO => {
                Ok(self.walk(*base_price))
            }
            SourceParams::Simulated { base_price } => Err(BenchError::InvalidArg(format!(
                "simulated base price must be positive, got {base_price}"
            ))),
            other => Err(BenchError::InvalidArg(format!(
                "SIMULATED cannot serve {} params",
                other.kind()
            ))),
        }
    }
}

use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;

use benchwatch_core::RawObservation;

struct Fixture {
    key: &'static str,
    first: (i32, u32, u32),
    start_cents: i64,
    step_cents: i64,
    count: usize,
    monthly: bool,
}

const fn daily(key: &'static str, start_cents: i64, step_cents: i64) -> Fixture {
    Fixture {
        key,
        first: (2024, 1, 2),
        start_cents,
        step_cents,
        count: 40,
        monthly: false,
    }
}

const FIXTURES: &[Fixture] = &[
    daily("DCOILBRENTEU", 7_800, 25),
    daily("RBRTE", 7_810, 20),
    daily("RWTC", 7_250, -15),
    daily("DHHNGSP", 250, 1),
    daily("gold", 205_000, 300),
    daily("SI=F", 2_300, 5),
    daily("PL=F", 95_000, -250),
    Fixture {
        key: "PCOPPUSDM",
        first: (2022, 1, 1),
        start_cents: 980_000,
        step_cents: 5_000,
        count: 24,
        monthly: true,
    },
];

/// Deterministic oldest-first series for a known key.
pub fn series(key: &str) -> Option<Vec<RawObservation>> {
    let fx = FIXTURES.iter().find(|f| f.key == key)?;
    let (y, m, d) = fx.first;
    let first = NaiveDate::from_ymd_opt(y, m, d)?;
    (0..fx.count)
        .map(|i| {
            let date = if fx.monthly {
                first.checked_add_months(Months::new(u32::try_from(i).ok()?))?
            } else {
                first + Duration::days(i64::try_from(i).ok()?)
            };
            let cents = fx.start_cents + fx.step_cents * i64::try_from(i).ok()?;
            Some(RawObservation::new(
                date.format("%Y-%m-%d").to_string(),
                Decimal::new(cents, 2),
            ))
        })
        .collect()
}

/// Keys with built-in fixtures.
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    FIXTURES.iter().map(|f| f.key)
}

#![allow(dead_code)]

use std::sync::Arc;

use benchwatch::{BackoffConfig, Category, CommodityConfig, SourceParams, Watcher};
use benchwatch_core::{PriceSource, RawObservation};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub fn fred(id: &str, name: &str, series_id: &str) -> CommodityConfig {
    CommodityConfig::new(
        id,
        name,
        Category::Energy,
        "barrel",
        SourceParams::Fred {
            series_id: series_id.to_string(),
        },
    )
}

pub fn simulated(id: &str) -> CommodityConfig {
    CommodityConfig::new(
        id,
        "Demo Commodity",
        Category::Metal,
        "metric ton",
        SourceParams::Simulated {
            base_price: Decimal::from(100),
        },
    )
}

pub fn rows(points: &[(&str, i64)]) -> Vec<RawObservation> {
    points
        .iter()
        .map(|(d, cents)| RawObservation::new(*d, Decimal::new(*cents, 2)))
        .collect()
}

pub fn watcher(tmp: &TempDir, sources: Vec<Arc<dyn PriceSource>>) -> Watcher {
    Watcher::builder()
        .with_sources(sources)
        .data_dir(tmp.path())
        .backoff(BackoffConfig::immediate(1))
        .build()
        .unwrap()
}

use benchwatch_core::{
    BenchError, Category, CommodityConfig, CommodityRecord, History, Observation, SourceClass,
    SourceKind, SourceParams, build_record, compute_metrics,
};
use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

fn cfg(source: SourceParams) -> CommodityConfig {
    CommodityConfig::new("brent_oil", "Brent Crude Oil", Category::Energy, "barrel", source)
}

fn history() -> History {
    History::from_observations([
        Observation::new("2024-03-01".parse().unwrap(), dec!(81.5)),
        Observation::new("2024-03-04".parse().unwrap(), dec!(82.25)),
    ])
}

#[test]
fn record_takes_latest_observation_and_provenance() {
    let config = cfg(SourceParams::Eia {
        url: "https://api.eia.gov/v2/petroleum/pri/spt/data/".into(),
        facets: Default::default(),
    })
    .with_info_url("https://www.eia.gov/dnav/pet/hist/RBRTED.htm");
    let h = history();
    let metrics = compute_metrics(&h);
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 6, 0, 0).unwrap();

    let rec = build_record(&config, h.clone(), metrics.clone(), false, at).unwrap();
    assert_eq!(rec.price, dec!(82.25));
    assert_eq!(rec.date, "2024-03-04".parse().unwrap());
    assert_eq!(rec.source_type, SourceKind::Eia);
    assert_eq!(rec.source_class, SourceClass::OfficialBenchmark);
    assert_eq!(rec.source_name, "EIA");
    assert_eq!(rec.source_url, "https://www.eia.gov/dnav/pet/hist/RBRTED.htm");
    assert_eq!(rec.currency, "USD");
    assert!(!rec.simulated);
    assert_eq!(rec.history, h);
    assert_eq!(rec.metrics, metrics);
    assert_eq!(rec.updated_at, at);
}

#[test]
fn non_agency_sources_are_market_references() {
    let config = cfg(SourceParams::Yahoo {
        symbol: "BZ=F".into(),
    })
    .with_source_name("Yahoo Finance");
    let rec = build_record(&config, history(), Default::default(), false, Utc::now()).unwrap();
    assert_eq!(rec.source_class, SourceClass::PublicMarketReference);
    assert_eq!(rec.source_name, "Yahoo Finance");
    assert_eq!(rec.source_url, "");
}

#[test]
fn empty_history_is_rejected() {
    let config = cfg(SourceParams::Fred {
        series_id: "DCOILBRENTEU".into(),
    });
    let err = build_record(&config, History::new(), Default::default(), false, Utc::now())
        .unwrap_err();
    assert_eq!(
        err,
        BenchError::EmptyHistory {
            id: "brent_oil".into()
        }
    );
}

#[test]
fn record_json_shape() {
    let config = cfg(SourceParams::Fred {
        series_id: "DCOILBRENTEU".into(),
    });
    let h = history();
    let m = compute_metrics(&h);
    let at = Utc.with_ymd_and_hms(2024, 3, 5, 6, 0, 0).unwrap();
    let rec = build_record(&config, h, m, false, at).unwrap();

    let json = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["price"], 82.25);
    assert_eq!(json["date"], "2024-03-04");
    assert_eq!(json["source_type"], "FRED");
    assert_eq!(json["source_class"], "official_benchmark");
    assert_eq!(json["category"], "energy");
    assert_eq!(json["history"][0]["date"], "2024-03-01");
    assert_eq!(json["metrics"]["observations"], 2);
    assert_eq!(json["metrics"]["abs_change_1_obs"], 0.75);

    let back: CommodityRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, rec);
}

const LEGACY_RECORD: &str = r#"{
  "id": "gold",
  "name": "Gold",
  "category": "precious",
  "price": 2310.0,
  "currency": "USD",
  "unit": "troy oz",
  "date": "2024-05-02",
  "source_name": "FreeGoldAPI (World Bank/Yahoo)",
  "source_url": "https://freegoldapi.com",
  "source_type": "FREEGOLD",
  "source_class": "public_market_reference",
  "simulated": false,
  "metrics": {
    "latest_price": 2310.0,
    "observations": 2,
    "latest_observation_date": "2024-05-02",
    "abs_change_1_obs": 8.51,
    "pct_change_1_obs": 0.37,
    "pct_change_30_obs": null,
    "pct_change_365_obs": null,
    "direction_30_obs": "flat",
    "change_1d": 8.51,
    "pct_1d": 0.37,
    "pct_30d": null,
    "pct_1y": null,
    "trend": "flat"
  },
  "derived": {"descriptive_stats": {"latest_price": 2310.0}},
  "history": [
    {"date": "2024-05-01", "price": 2301.49},
    {"date": "2024-05-02", "price": 2310.0}
  ],
  "updated_at": "2024-05-02T18:04:11.512034"
}"#;

#[test]
fn records_with_naive_timestamps_and_legacy_keys_decode() {
    let rec: CommodityRecord = serde_json::from_str(LEGACY_RECORD).unwrap();
    assert_eq!(rec.history.len(), 2);
    assert_eq!(rec.metrics.pct_change_30_obs, None);
    assert_eq!(rec.metrics.pct_change_1_obs, Some(dec!(0.37)));
    assert_eq!(
        rec.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2024-05-02 18:04:11"
    );

    let rfc = LEGACY_RECORD.replace("2024-05-02T18:04:11.512034", "2024-05-02T20:04:11+02:00");
    let rec: CommodityRecord = serde_json::from_str(&rfc).unwrap();
    assert_eq!(rec.updated_at, Utc.with_ymd_and_hms(2024, 5, 2, 18, 4, 11).unwrap());

    let bad = LEGACY_RECORD.replace("2024-05-02T18:04:11.512034", "yesterday");
    assert!(serde_json::from_str::<CommodityRecord>(&bad).is_err());
}

mod common;

use benchwatch::read::{
    format_price_line, get_commodity, list_commodities, search_commodity, top_movers,
};
use benchwatch::{Category, DisplayRange, ListFilter, RecordStore, catalog};
use benchwatch_mock::MockSource;
use chrono::Duration;
use rust_decimal_macros::dec;
use tempfile::TempDir;

const IDS: &[&str] = &[
    "brent_oil",
    "wti_oil",
    "natural_gas",
    "gold",
    "silver",
    "platinum",
    "copper",
];

async fn populated() -> (TempDir, RecordStore) {
    let tmp = TempDir::new().unwrap();
    let w = common::watcher(&tmp, MockSource::all_kinds());
    let ids: Vec<String> = IDS.iter().map(ToString::to_string).collect();
    let configs = catalog::select(catalog::default_catalog(), &ids).unwrap();
    let report = w.update_all(&configs).await.unwrap();
    assert_eq!(report.success_count(), IDS.len(), "{:?}", report.failed);
    let store = RecordStore::new(tmp.path());
    (tmp, store)
}

#[tokio::test]
async fn list_is_sorted_by_name_and_filterable() {
    let (_tmp, store) = populated().await;

    let all = list_commodities(&store, ListFilter::default());
    let names: Vec<&str> = all.iter().map(|v| v.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(all.len(), IDS.len());

    let metals = list_commodities(
        &store,
        ListFilter {
            category: Some(Category::Metal),
            range: DisplayRange::All,
        },
    );
    assert_eq!(metals.len(), 1);
    assert_eq!(metals[0].id, "copper");
    assert_eq!(metals[0].display_history.len(), 24);
}

#[tokio::test]
async fn display_range_is_anchored_at_latest_observation() {
    let (_tmp, store) = populated().await;
    let week = list_commodities(
        &store,
        ListFilter {
            category: None,
            range: DisplayRange::OneWeek,
        },
    );

    let gold = week.iter().find(|v| v.id == "gold").unwrap();
    assert!(gold.display_history.len() < 40);
    assert!(
        gold.display_history
            .iter()
            .all(|o| o.date >= gold.date - Duration::days(7))
    );

    // Monthly series still show their newest point
    let copper = week.iter().find(|v| v.id == "copper").unwrap();
    assert_eq!(copper.display_history.len(), 1);
}

#[tokio::test]
async fn search_uses_alias_then_id_then_name() {
    let (_tmp, store) = populated().await;

    assert_eq!(search_commodity(&store, "crude").unwrap().id, "brent_oil");
    assert_eq!(search_commodity(&store, "WTI").unwrap().id, "wti_oil");
    assert_eq!(search_commodity(&store, "gold").unwrap().id, "gold");
    assert_eq!(search_commodity(&store, "plat").unwrap().id, "platinum");
    assert!(search_commodity(&store, "unobtainium").is_none());
    assert!(search_commodity(&store, "   ").is_none());

    assert!(get_commodity(&store, "../gold").is_none());
    assert_eq!(get_commodity(&store, "gold").unwrap().range, DisplayRange::All);
}

#[tokio::test]
async fn top_movers_split_gainers_and_losers() {
    let (_tmp, store) = populated().await;
    let (gainers, losers) = top_movers(&store, 2);

    let up: Vec<&str> = gainers.iter().map(|v| v.id.as_str()).collect();
    let down: Vec<&str> = losers.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(up, vec!["copper", "natural_gas"]);
    assert_eq!(down, vec!["platinum", "wti_oil"]);
}

#[tokio::test]
async fn price_line_is_grouped_and_signed() {
    let (_tmp, store) = populated().await;
    let gold = get_commodity(&store, "gold").unwrap();

    assert_eq!(gold.price, dec!(2167.00));
    assert_eq!(
        format_price_line(&gold),
        "Gold: $2,167.00 (+0.14%) as of 2024-02-10"
    );
}

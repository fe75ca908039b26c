use benchwatch_core::{History, Observation, merge_history};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 plus up to ~30 years; a narrow range forces collisions.
    (0i64..400).prop_map(|d| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Duration::days(d * 27)
    })
}

fn arb_obs() -> impl Strategy<Value = Observation> {
    (arb_date(), 0i64..10_000_000i64).prop_map(|(date, cents)| Observation {
        date,
        price: Decimal::new(cents, 2),
    })
}

fn arb_batch() -> impl Strategy<Value = Vec<Observation>> {
    proptest::collection::vec(arb_obs(), 0..120)
}

fn arb_history() -> impl Strategy<Value = History> {
    arb_batch().prop_map(History::from_observations)
}

proptest! {
    #[test]
    fn merge_is_idempotent(h in arb_history(), a in arb_batch()) {
        let once = merge_history(h, a.clone());
        let twice = merge_history(once.clone(), a);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_output_strictly_increasing(h in arb_history(), a in arb_batch()) {
        let merged = merge_history(h, a);
        for w in merged.as_slice().windows(2) {
            prop_assert!(w[0].date < w[1].date);
        }
    }

    #[test]
    fn last_merged_value_wins(h in arb_history(), a in arb_batch()) {
        let mut expected: BTreeMap<NaiveDate, Decimal> =
            h.iter().map(|o| (o.date, o.price)).collect();
        for o in &a {
            expected.insert(o.date, o.price);
        }
        let merged = merge_history(h, a);
        prop_assert_eq!(merged.len(), expected.len());
        for o in &merged {
            prop_assert_eq!(Some(&o.price), expected.get(&o.date));
        }
    }

    #[test]
    fn retain_recent_keeps_tail(h in arb_history(), n in 0usize..150) {
        let mut kept = h.clone();
        kept.retain_recent(n);
        prop_assert_eq!(kept.len(), h.len().min(n));
        let tail = &h.as_slice()[h.len() - kept.len()..];
        prop_assert_eq!(kept.as_slice(), tail);
    }
}

#[test]
fn history_json_is_normalized_on_load() {
    let raw = r#"[
        {"date":"2024-01-03","price":3.0},
        {"date":"2024-01-01","price":1.0},
        {"date":"2024-01-03","price":3.5}
    ]"#;
    let h: History = serde_json::from_str(raw).unwrap();
    assert_eq!(h.len(), 2);
    assert_eq!(h.latest().unwrap().price, Decimal::new(35, 1));
    let out = serde_json::to_value(&h).unwrap();
    assert_eq!(out[0]["date"], "2024-01-01");
    assert_eq!(out[1]["price"], 3.5);
}

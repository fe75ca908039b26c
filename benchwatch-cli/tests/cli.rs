use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GOLD: &str = r#"{
  "id": "gold",
  "name": "Gold",
  "category": "precious",
  "unit": "troy oz",
  "currency": "USD",
  "price": 2310.0,
  "date": "2024-05-02",
  "source_name": "FreeGoldAPI (World Bank/Yahoo)",
  "source_type": "FREEGOLD",
  "source_class": "public_market_reference",
  "source_url": "https://freegoldapi.com",
  "history": [
    {"date": "2024-05-01", "price": 2301.49},
    {"date": "2024-05-02", "price": 2310.0}
  ],
  "metrics": {
    "latest_price": 2310.0,
    "observations": 2,
    "latest_observation_date": "2024-05-02",
    "abs_change_1_obs": 8.51,
    "pct_change_1_obs": 0.37
  },
  "updated_at": "2024-05-02T18:00:00Z"
}"#;

const WHEAT: &str = r#"{
  "id": "wheat",
  "name": "Wheat",
  "category": "agricultural",
  "unit": "metric ton",
  "currency": "USD",
  "price": 240.0,
  "date": "2024-04-01",
  "source_name": "FRED",
  "source_type": "FRED",
  "source_class": "official_benchmark",
  "history": [
    {"date": "2024-03-01", "price": 250.0},
    {"date": "2024-04-01", "price": 240.0}
  ],
  "metrics": {"observations": 2, "pct_change_1_obs": -4.0},
  "updated_at": "2024-05-02T18:00:00Z"
}"#;

fn seeded() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("gold.json"), GOLD).unwrap();
    fs::write(tmp.path().join("wheat.json"), WHEAT).unwrap();
    tmp
}

fn benchwatch(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("benchwatch").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("FRED_API_KEY")
        .env_remove("EIA_API_KEY")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn price_prints_a_formatted_line() {
    let tmp = seeded();
    benchwatch(tmp.path())
        .args(["price", "gold"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Gold: $2,310.00 (+0.37%) as of 2024-05-02",
        ))
        .stdout(predicate::str::contains("public_market_reference"));
}

#[test]
fn price_for_unknown_commodity_fails() {
    let tmp = seeded();
    benchwatch(tmp.path())
        .args(["price", "unobtainium"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no commodity matches"));
}

#[test]
fn list_filters_by_category() {
    let tmp = seeded();
    benchwatch(tmp.path())
        .args(["list", "--category", "agriculture"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wheat"))
        .stdout(predicate::str::contains("Gold").not());
}

#[test]
fn list_json_is_machine_readable() {
    let tmp = seeded();
    let out = benchwatch(tmp.path())
        .args(["list", "--json", "--range", "1W"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let views: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let views = views.as_array().unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0]["id"], "gold");
    assert_eq!(views[0]["range"], "1W");
}

#[test]
fn prices_for_empty_category_fails() {
    let tmp = seeded();
    benchwatch(tmp.path())
        .args(["prices", "energy"])
        .assert()
        .failure();
    benchwatch(tmp.path())
        .args(["prices", "precious"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gold: $2,310.00"));
}

#[test]
fn top_splits_gainers_and_losers() {
    let tmp = seeded();
    benchwatch(tmp.path())
        .args(["top", "--limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)Top gainers:\n  Gold.*Top losers:\n  Wheat").unwrap());
}

#[test]
fn empty_data_dir_lists_nothing() {
    let tmp = TempDir::new().unwrap();
    benchwatch(&tmp.path().join("missing"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no commodities"));
}

#[test]
fn update_rejects_a_bad_catalog() {
    let tmp = TempDir::new().unwrap();
    let catalog = tmp.path().join("catalog.json");
    fs::write(&catalog, "{ not json").unwrap();
    benchwatch(&tmp.path().join("data"))
        .arg("update")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog"));
}

#[test]
fn update_rejects_unknown_only_ids() {
    let tmp = TempDir::new().unwrap();
    benchwatch(tmp.path())
        .args(["update", "--only", "unobtainium"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unobtainium"));
}

#[test]
fn update_runs_offline_with_a_simulated_catalog() {
    let tmp = TempDir::new().unwrap();
    let catalog = tmp.path().join("catalog.json");
    fs::write(
        &catalog,
        r#"[{"id":"demo_metal","name":"Demo Metal","category":"metal","unit":"metric ton",
             "source":{"source_type":"SIMULATED","base_price":100.0}}]"#,
    )
    .unwrap();
    let data = tmp.path().join("data");

    benchwatch(&data)
        .arg("update")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated 1/1 commodities"));

    assert!(data.join("demo_metal.json").exists());
    benchwatch(&data)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[simulated]"));
}

fn simulated_catalog(dir: &Path) -> std::path::PathBuf {
    let catalog = dir.join("catalog.json");
    fs::write(
        &catalog,
        r#"[{"id":"demo_metal","name":"Demo Metal","category":"metal","unit":"metric ton",
             "source":{"source_type":"SIMULATED","base_price":100.0}}]"#,
    )
    .unwrap();
    catalog
}

#[test]
fn api_keys_are_read_from_dotenv_file() {
    let tmp = TempDir::new().unwrap();
    let catalog = simulated_catalog(tmp.path());
    fs::write(tmp.path().join(".env"), "FRED_API_KEY=test-fred\nEIA_API_KEY=test-eia\n").unwrap();

    benchwatch(&tmp.path().join("data"))
        .current_dir(tmp.path())
        .arg("update")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stderr(predicate::str::contains("FRED_API_KEY not set").not())
        .stderr(predicate::str::contains("EIA_API_KEY not set").not());
}

#[test]
fn missing_keys_are_warned_about() {
    let tmp = TempDir::new().unwrap();
    let catalog = simulated_catalog(tmp.path());

    benchwatch(&tmp.path().join("data"))
        .current_dir(tmp.path())
        .arg("update")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stderr(predicate::str::contains("FRED_API_KEY not set"));
}

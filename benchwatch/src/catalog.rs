//! The built-in commodity catalog and catalog file loading.

use std::collections::BTreeMap;
use std::path::Path;

use benchwatch_core::{BenchError, Category, CommodityConfig, SourceParams};

use crate::store::validate_id;
use crate::update::ensure_unique_ids;

const EIA_SPOT_URL: &str = "https://api.eia.gov/v2/petroleum/pri/spt/data/";
const EIA_INFO_URL: &str = "https://www.eia.gov/petroleum/gasdiesel/";

fn fred(id: &str, name: &str, category: Category, unit: &str, series_id: &str) -> CommodityConfig {
    CommodityConfig::new(
        id,
        name,
        category,
        unit,
        SourceParams::Fred {
            series_id: series_id.to_string(),
        },
    )
    .with_info_url(format!("https://fred.stlouisfed.org/series/{series_id}"))
}

fn eia_spot(id: &str, name: &str, unit: &str, series: &str) -> CommodityConfig {
    let mut facets = BTreeMap::new();
    facets.insert("series".to_string(), vec![series.to_string()]);
    CommodityConfig::new(
        id,
        name,
        Category::Energy,
        unit,
        SourceParams::Eia {
            url: EIA_SPOT_URL.to_string(),
            facets,
        },
    )
    .with_info_url(EIA_INFO_URL)
}

fn yahoo(id: &str, name: &str, symbol: &str, source_name: &str) -> CommodityConfig {
    CommodityConfig::new(
        id,
        name,
        Category::Precious,
        "troy oz",
        SourceParams::Yahoo {
            symbol: symbol.to_string(),
        },
    )
    .with_source_name(source_name)
    .with_info_url(format!("https://finance.yahoo.com/quote/{symbol}"))
}

/// The 29 tracked commodities.
#[must_use]
pub fn default_catalog() -> Vec<CommodityConfig> {
    use Category::{Agricultural, Energy, Metal};

    vec![
        // Energy
        eia_spot("brent_oil", "Brent Crude Oil", "barrel", "RBRTE"),
        eia_spot("wti_oil", "WTI Crude Oil", "barrel", "RWTC"),
        fred("natural_gas", "Natural Gas (Henry Hub)", Energy, "MMBtu", "DHHNGSP"),
        eia_spot("heating_oil", "Heating Oil", "gallon", "EER_EPD2F_PF4_Y35NY_DPG"),
        eia_spot("jet_fuel", "Jet Fuel", "gallon", "EER_EPJK_PF4_RGC_DPG"),
        fred("gasoline", "Gasoline (Gulf Coast)", Energy, "gallon", "DGASUSGULF"),
        eia_spot("propane", "Propane (Mont Belvieu)", "gallon", "EER_EPLLPA_PF4_Y44MB_DPG"),
        // Metals (monthly World Bank / IMF series)
        fred("copper", "Copper", Metal, "metric ton", "PCOPPUSDM"),
        fred("iron_ore", "Iron Ore", Metal, "metric ton", "PIORECRUSDM"),
        fred("aluminum", "Aluminum", Metal, "metric ton", "PALUMUSDM"),
        fred("zinc", "Zinc", Metal, "metric ton", "PZINCUSDM"),
        fred("nickel", "Nickel", Metal, "metric ton", "PNICKUSDM"),
        fred("lead", "Lead", Metal, "metric ton", "PLEADUSDM"),
        fred("tin", "Tin", Metal, "metric ton", "PTINUSDM"),
        // Precious
        CommodityConfig::new(
            "gold",
            "Gold",
            Category::Precious,
            "troy oz",
            SourceParams::FreeGold {
                data_type: "gold".to_string(),
            },
        )
        .with_source_name("FreeGoldAPI (World Bank/Yahoo)")
        .with_info_url("https://freegoldapi.com"),
        yahoo("silver", "Silver", "SI=F", "Yahoo Finance (COMEX Futures)"),
        yahoo("platinum", "Platinum", "PL=F", "Yahoo Finance (NYMEX Futures)"),
        // Agricultural
        fred("wheat", "Wheat", Agricultural, "metric ton", "PWHEAMTUSDM"),
        fred("corn", "Corn (Maize)", Agricultural, "metric ton", "PMAIZMTUSDM"),
        fred("soybeans", "Soybeans", Agricultural, "metric ton", "PSOYBUSDM"),
        fred("rice", "Rice (Average Price)", Agricultural, "pound", "APU0000701312"),
        fred("sugar", "Sugar", Agricultural, "kg", "PSUGAISAUSDM"),
        fred("coffee", "Coffee (Arabica)", Agricultural, "kg", "PCOFFOTMUSDM"),
        fred("cocoa", "Cocoa", Agricultural, "kg", "PCOCOUSDM"),
        fred("cotton", "Cotton", Agricultural, "kg", "PCOTTINDUSDM"),
        fred("rubber", "Rubber (Natural)", Agricultural, "kg", "PRUBBUSDM"),
        fred("palm_oil", "Palm Oil", Agricultural, "metric ton", "PPOILUSDM"),
        fred("beef", "Beef (Global Price)", Agricultural, "pound", "PBEEFUSDM"),
        fred("chicken", "Poultry (Chicken)", Agricultural, "kg", "PPOULTUSDM"),
    ]
}

/// Check ids are well formed and unique.
///
/// # Errors
/// `InvalidArg` for the first malformed or duplicate id.
pub fn validate_catalog(configs: &[CommodityConfig]) -> Result<(), BenchError> {
    for c in configs {
        validate_id(&c.id)?;
    }
    ensure_unique_ids(configs)
}

/// Load a JSON array of commodity configs from `path`.
///
/// # Errors
/// `Storage` if the file cannot be read, `InvalidArg` if it does not parse or
/// fails [`validate_catalog`].
pub fn load_catalog(path: &Path) -> Result<Vec<CommodityConfig>, BenchError> {
    let label = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| {
        let kind = match e.kind() {
            std::io::ErrorKind::NotFound => benchwatch_core::StorageErrorKind::Missing,
            std::io::ErrorKind::PermissionDenied => {
                benchwatch_core::StorageErrorKind::PermissionDenied
            }
            _ => benchwatch_core::StorageErrorKind::Io,
        };
        BenchError::storage(&label, kind, e.to_string())
    })?;
    let configs: Vec<CommodityConfig> = serde_json::from_str(&text)
        .map_err(|e| BenchError::InvalidArg(format!("catalog {label}: {e}")))?;
    validate_catalog(&configs)?;
    Ok(configs)
}

/// Restrict `catalog` to `ids`, keeping catalog order.
///
/// # Errors
/// `NotFound` naming the first id that is not in the catalog.
pub fn select(catalog: Vec<CommodityConfig>, ids: &[String]) -> Result<Vec<CommodityConfig>, BenchError> {
    if let Some(missing) = ids.iter().find(|id| !catalog.iter().any(|c| &c.id == *id)) {
        return Err(BenchError::not_found(format!("commodity '{missing}'")));
    }
    Ok(catalog
        .into_iter()
        .filter(|c| ids.iter().any(|id| *id == c.id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchwatch_core::{SourceClass, SourceKind};

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 29);
        validate_catalog(&catalog).unwrap();
        assert!(catalog.iter().all(|c| c.currency == "USD"));
        assert!(catalog.iter().all(|c| c.source_info_url.is_some()));
    }

    #[test]
    fn catalog_covers_every_live_source() {
        let catalog = default_catalog();
        for kind in [SourceKind::Fred, SourceKind::Eia, SourceKind::FreeGold, SourceKind::Yahoo] {
            assert!(catalog.iter().any(|c| c.source_kind() == kind), "{kind}");
        }
        let gold = catalog.iter().find(|c| c.id == "gold").unwrap();
        assert_eq!(gold.source_kind().source_class(), SourceClass::PublicMarketReference);
    }

    #[test]
    fn select_keeps_order_and_rejects_unknown() {
        let picked = select(default_catalog(), &["gold".into(), "brent_oil".into()]).unwrap();
        let ids: Vec<&str> = picked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["brent_oil", "gold"]);
        assert!(matches!(
            select(default_catalog(), &["unobtainium".into()]),
            Err(BenchError::NotFound { .. })
        ));
    }

    #[test]
    fn load_catalog_rejects_duplicates() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        let entry = r#"{"id":"gold","name":"Gold","category":"precious","unit":"troy oz",
                        "source":{"source_type":"FREEGOLD"}}"#;
        std::fs::write(&path, format!("[{entry},{entry}]")).unwrap();
        assert!(matches!(load_catalog(&path), Err(BenchError::InvalidArg(_))));

        std::fs::write(&path, format!("[{entry}]")).unwrap();
        let loaded = load_catalog(&path).unwrap();
        assert_eq!(loaded[0].source, SourceParams::FreeGold { data_type: "gold".into() });
    }
}

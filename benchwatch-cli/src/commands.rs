use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use benchwatch::read::{
    CommodityView, format_price_line, list_commodities, search_commodity, top_movers,
};
use benchwatch::{Category, DisplayRange, ListFilter, RecordStore, Watcher, catalog};
use benchwatch_sources::{Credentials, default_sources};

pub struct UpdateArgs {
    pub data_dir: PathBuf,
    pub catalog: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub only: Vec<String>,
    pub fred_api_key: Option<String>,
    pub eia_api_key: Option<String>,
}

/// Run the batch. Per-commodity failures are logged, not returned.
pub async fn update(args: UpdateArgs) -> Result<()> {
    let mut configs = match &args.catalog {
        Some(path) => catalog::load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => catalog::default_catalog(),
    };
    if !args.only.is_empty() {
        configs = catalog::select(configs, &args.only)?;
    }

    RecordStore::open(&args.data_dir)
        .with_context(|| format!("opening data dir {}", args.data_dir.display()))?;

    let creds = Credentials {
        fred_api_key: args.fred_api_key.filter(|k| !k.trim().is_empty()),
        eia_api_key: args.eia_api_key.filter(|k| !k.trim().is_empty()),
    };
    if creds.fred_api_key.is_none() {
        tracing::warn!("FRED_API_KEY not set; FRED commodities will fail");
    }
    if creds.eia_api_key.is_none() {
        tracing::warn!("EIA_API_KEY not set; EIA commodities will fail");
    }

    let mut builder = Watcher::builder()
        .with_sources(default_sources(creds))
        .data_dir(&args.data_dir);
    if let Some(n) = args.concurrency {
        builder = builder.concurrency(n);
    }
    let watcher = builder.build()?;

    tracing::info!(commodities = configs.len(), dir = %args.data_dir.display(), "starting update");
    let report = watcher.update_all(&configs).await?;

    println!(
        "Updated {}/{} commodities",
        report.success_count(),
        report.total()
    );
    for failed in &report.failed {
        println!("  failed: {} ({})", failed.name, failed.reason);
    }
    Ok(())
}

fn print_table(views: &[CommodityView]) {
    for v in views {
        let pct = v.change_percent.map_or_else(
            || "-".to_string(),
            |p| {
                let sign = if p.is_sign_positive() && !p.is_zero() { "+" } else { "" };
                format!("{sign}{:.2}%", p)
            },
        );
        let price = format!("{:.2}", v.price);
        let tag = if v.simulated { " [simulated]" } else { "" };
        println!(
            "{:<14} {:<26} {price:>12} {:<4} {pct:>8}  {}  {}{tag}",
            v.id, v.name, v.currency, v.date, v.unit
        );
    }
}

pub fn list(
    data_dir: &Path,
    category: Option<Category>,
    range: DisplayRange,
    json: bool,
) -> Result<()> {
    let store = RecordStore::new(data_dir);
    let views = list_commodities(&store, ListFilter { category, range });
    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else if views.is_empty() {
        println!("no commodities in {}", data_dir.display());
    } else {
        print_table(&views);
    }
    Ok(())
}

pub fn price(data_dir: &Path, query: &str, json: bool) -> Result<()> {
    let store = RecordStore::new(data_dir);
    let Some(view) = search_commodity(&store, query) else {
        bail!("no commodity matches '{query}'");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", format_price_line(&view));
        println!("  source: {} ({})", view.source_name, view.source_class);
    }
    Ok(())
}

pub fn prices(data_dir: &Path, category: Category) -> Result<()> {
    let store = RecordStore::new(data_dir);
    let views = list_commodities(
        &store,
        ListFilter {
            category: Some(category),
            range: DisplayRange::All,
        },
    );
    if views.is_empty() {
        bail!("no {category} commodities in {}", data_dir.display());
    }
    for v in &views {
        println!("{}", format_price_line(v));
    }
    Ok(())
}

pub fn top(data_dir: &Path, limit: usize) -> Result<()> {
    let store = RecordStore::new(data_dir);
    let (gainers, losers) = top_movers(&store, limit);
    println!("Top gainers:");
    if gainers.is_empty() {
        println!("  none");
    }
    for v in &gainers {
        println!("  {}", format_price_line(v));
    }
    println!("Top losers:");
    if losers.is_empty() {
        println!("  none");
    }
    for v in &losers {
        println!("  {}", format_price_line(v));
    }
    Ok(())
}

//! # Handset Report
//!
//! Prints dashboard and analytics sections as pretty JSON.
//!
//! ## Usage
//! ```bash
//! # Everything, over the configured lookback window
//! cargo run -p handset-store --bin handset-report
//!
//! # Last 30 days of sales only
//! cargo run -p handset-store --bin handset-report -- --section sales --days 30
//!
//! # Explicit config file
//! cargo run -p handset-store --bin handset-report -- --config ./handset.toml
//! ```
//!
//! Logs go to stderr so stdout stays valid JSON. `RUST_LOG` overrides the
//! default filter.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use handset_store::{Database, ShopConfig};
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "handset-report", about = "Phone shop back-office reports")]
struct Cli {
    /// Path to handset.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lookback window in days (defaults to [insights].lookback_days)
    #[arg(long)]
    days: Option<u32>,

    /// Which section to print
    #[arg(long, value_enum, default_value_t = Section::All)]
    section: Section,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    Dashboard,
    Sales,
    Insights,
    Reorder,
    Warranty,
    All,
}

impl Section {
    fn includes(self, other: Section) -> bool {
        self == Section::All || self == other
    }
}

/// Installs the fmt subscriber writing to stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - Default: INFO, DEBUG for the handset crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,handset=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = ShopConfig::load(cli.config)?;
    let days = cli.days.unwrap_or(config.insights.lookback_days);
    info!(shop = %config.shop.name, days, section = ?cli.section, "Building report");

    let db = Database::new(config)?;
    let mut report = Map::new();

    if cli.section.includes(Section::Dashboard) {
        let dashboard = db.insights().dashboard().await;
        report.insert("dashboard".into(), serde_json::to_value(dashboard)?);
    }
    if cli.section.includes(Section::Sales) {
        let sales = db.insights().sales_report(days).await;
        report.insert("sales".into(), serde_json::to_value(sales)?);
    }
    if cli.section.includes(Section::Insights) {
        let insights = db.insights().business_insights(days).await;
        report.insert("insights".into(), serde_json::to_value(insights)?);
    }
    if cli.section.includes(Section::Reorder) {
        let suggestions = db.supplier_orders().get_suggested_items().await;
        report.insert("reorder".into(), serde_json::to_value(suggestions)?);
    }
    if cli.section.includes(Section::Warranty) {
        let stats = db.warranty_claims().claim_statistics().await;
        report.insert("warranty".into(), serde_json::to_value(stats)?);
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(report))?);
    Ok(())
}

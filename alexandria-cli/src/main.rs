//! alexandria — cultural heritage data collection CLI
//!
//! # Subcommands
//! - `collect` — run a full collection cycle across all configured sources
//! - `report`  — print the summary report over the existing store
//! - `health`  — check that the persistent store is reachable

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use alexandria_core::models::RunResult;
use alexandria_core::report::{generate_report, CollectionReport};
use alexandria_core::{db, AlexandriaConfig};
use alexandria_ingest::sources::{MetMuseumAdapter, NewsMonitor, SourceAdapter, UnescoAdapter};

#[derive(Debug, Parser)]
#[command(
    name = "alexandria",
    version,
    about = "Digital Alexandria — cultural heritage data collector"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "alexandria.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full collection cycle across all configured sources
    Collect,

    /// Print the summary report over the existing store
    Report {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the persistent store is reachable
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match AlexandriaConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    let pool = match db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };
    db::init_schema(&pool).await?;

    match cli.command {
        Commands::Collect => {
            let adapters: Vec<Box<dyn SourceAdapter>> = vec![
                Box::new(MetMuseumAdapter::new(&config.sources)?),
                Box::new(UnescoAdapter::new(&config.sources)?),
            ];
            let news = NewsMonitor::new(&config)?;

            let result = alexandria_ingest::run_collection(&pool, &config, &adapters, &news).await?;
            print_run_summary(&result);

            let report = generate_report(&pool).await?;
            print_report(&report);
        }
        Commands::Report { json } => {
            let report = generate_report(&pool).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Health => match db::health_check(&pool).await {
            Ok(version) => {
                println!("✅ SQLite connected: {}", version);
                println!("✅ Alexandria store health check passed");
            }
            Err(e) => {
                println!("❌ SQLite connection failed: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_run_summary(result: &RunResult) {
    let duration = result.finished_at - result.started_at;

    println!();
    println!("📊 COLLECTION SUMMARY");
    println!(
        "⏱️  Duration: {:.1} minutes",
        duration.num_milliseconds() as f64 / 60_000.0
    );
    println!("📦 Total items collected: {}", result.total_items_collected);
    println!("🆕 New items: {}", result.new_items);
    println!("🔄 Updated items: {}", result.updated_items);
    println!("⚠️  Threats detected: {}", result.threats_detected);
    println!("❌ Errors: {}", result.errors.len());
    for error in &result.errors {
        println!("  • {}", error);
    }
}

fn print_report(report: &CollectionReport) {
    println!();
    println!("🗃️  DATABASE OVERVIEW");
    println!("📚 Total heritage items: {}", report.total_items);

    println!("📊 By source:");
    for (source, summary) in &report.sources {
        println!(
            "  • {}: {} items (avg significance: {:.1})",
            source, summary.count, summary.avg_significance
        );
    }

    println!("⚠️  Threat levels:");
    for (level, count) in &report.threat_distribution {
        println!("  • {}: {} items", level.as_str(), count);
    }

    println!("🚨 Recent threats (7 days): {}", report.recent_threats);

    if !report.top_locations.is_empty() {
        println!("📍 Top locations:");
        for entry in &report.top_locations {
            println!("  • {}: {}", entry.location, entry.count);
        }
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod filter;
mod loader;
mod models;
mod page;
mod parse;
mod risk;
mod server;
mod summary;
mod svg;
mod table;
mod trend;
mod view;

use config::{Aggregation, DashboardConfig, Layout};

#[derive(Parser)]
#[command(name = "ast-ewis")]
#[command(version, about = "Biometric update early-warning dashboard", long_about = None)]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Directory holding the processed CSV exports
    #[arg(long, global = true, default_value = "data/processed")]
    data_dir: PathBuf,
    /// Override the monthly state table
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,
    /// Override the district anomaly table
    #[arg(long, global = true)]
    district_file: Option<PathBuf>,
    /// Override the top warnings table
    #[arg(long, global = true)]
    warning_file: Option<PathBuf>,
    /// How flagged district rows are ranked
    #[arg(long, global = true, value_enum, default_value_t = Aggregation::MeanSeverity)]
    aggregation: Aggregation,
    /// Number of districts in the ranking chart
    #[arg(long, global = true, default_value_t = config::DEFAULT_TOP_N)]
    top_n: usize,
    /// Browser page title
    #[arg(long, global = true, default_value = config::DEFAULT_TITLE)]
    title: String,
    #[arg(long, global = true, value_enum, default_value_t = Layout::Wide)]
    layout: Layout,
}

impl InputArgs {
    fn into_config(self) -> DashboardConfig {
        let mut config = DashboardConfig::new(&self.data_dir)
            .with_aggregation(self.aggregation)
            .with_top_n(self.top_n);
        config.page_title = self.title;
        config.layout = self.layout;
        if let Some(path) = self.state_file {
            config.inputs.state = path;
        }
        if let Some(path) = self.district_file {
            config.inputs.district = path;
        }
        if let Some(path) = self.warning_file {
            config.inputs.warning = path;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8501")]
        bind: String,
    },
    /// Write one render of the dashboard to an HTML file
    Render {
        #[arg(long)]
        state: Option<String>,
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
    },
    /// Print KPIs, the trend and the district ranking
    Summary {
        #[arg(long)]
        state: Option<String>,
    },
    /// Verify the inputs exist and parse
    Check,
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
    );

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    let config = cli.inputs.into_config();

    // Nothing is rendered unless all three inputs are present.
    if let Err(err) = loader::ensure_inputs(&config.inputs) {
        error!(error = %err, "startup check failed");
        return Err(err.into());
    }

    match cli.command {
        Commands::Serve { bind } => {
            server::serve(config, &bind).await?;
        }
        Commands::Render { state, out } => {
            let dataset = loader::load(&config.inputs)?;
            let view = view::render(&dataset, state.as_deref(), &config);
            let html = page::build_page(&view, &config);
            std::fs::write(&out, html)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "dashboard written");
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Summary { state } => {
            let dataset = loader::load(&config.inputs)?;
            let view = view::render(&dataset, state.as_deref(), &config);
            print_summary(&view);
        }
        Commands::Check => {
            let dataset = loader::load(&config.inputs).context("input check failed")?;
            println!(
                "Inputs OK: {} state rows, {} district rows, {} warnings.",
                dataset.states.len(),
                dataset.districts.len(),
                dataset.warnings.len()
            );
        }
    }

    Ok(())
}

fn print_summary(view: &view::ViewModel) {
    println!("Total updates: {}", summary::thousands(view.kpis.total_updates));
    println!("Warnings detected: {}", view.kpis.total_warnings);
    println!(
        "Latest month: {}",
        view.kpis.latest_month.as_deref().unwrap_or("n/a")
    );

    let Some(state) = view.filter.selected() else {
        println!("No states found in the monthly table.");
        return;
    };

    println!();
    println!("Monthly trend for {state}:");
    if view.trend.is_empty() {
        println!("{}", page::NO_TREND_DATA);
    }
    for point in &view.trend {
        println!("- {} {}", point.date, summary::thousands(point.total_bio_updates));
    }

    println!();
    println!("Top districts for {state}:");
    if view.districts.is_empty() {
        println!("{}", page::NO_WARNING_DISTRICTS);
        return;
    }
    for bar in &view.districts {
        match (view.aggregation, bar.risk) {
            (Aggregation::MeanSeverity, Some(risk)) => {
                println!(
                    "- {} severity {:.2} ({:?}, latest {})",
                    bar.district, bar.value, risk, bar.latest_warning
                )
            }
            _ => println!(
                "- {} {:.0} warnings (latest {})",
                bar.district, bar.value, bar.latest_warning
            ),
        }
    }
}

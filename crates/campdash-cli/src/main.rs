mod campaigns;
mod flows;
mod format;

use campdash_core::SortKey;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "campdash")]
#[command(about = "Campaign and flow performance reports from the MoEngage Stats API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Report campaign performance for a date range
    Campaigns {
        /// First day of the range (YYYY-MM-DD); defaults to 7 days ago
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the range (YYYY-MM-DD); defaults to yesterday
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Metric used for the top/worst rankings (conversions, clicks, ctr, ctc-rate, ...)
        #[arg(long, default_value = "conversions")]
        sort_by: SortKey,
        /// Number of campaigns in each ranking
        #[arg(long, default_value = "10")]
        top: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report flow performance (sample data)
    Flows {
        /// Only show the flow with this name
        #[arg(long)]
        name: Option<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Campaigns {
            start,
            end,
            sort_by,
            top,
            json,
        }) => {
            let config = campdash_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            let today = chrono::Local::now().date_naive();
            let range = campaigns::resolve_range(start, end, today)?;
            campaigns::run_campaigns(&config, range, sort_by, top, json).await?;
        }
        Some(Commands::Flows { name, json }) => {
            init_tracing(&campdash_core::load_log_level())?;
            flows::run_flows(name.as_deref(), json)?;
        }
        None => println!("campdash: choose a report with `campaigns` or `flows` (see --help)"),
    }

    Ok(())
}

#![doc = include_str!("../README.md")]

use std::path::PathBuf;
use std::time::Duration;

use clap::{command, Parser};
use tracing::{error, info, subscriber::set_global_default};
use tracing_subscriber::filter::EnvFilter;

use pgen_client::pipeline::{self, PipelineConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Beacon API base URL to download the inputs from
    #[arg(
        long,
        env = "BEACON_API_URL",
        default_value = "https://docs-demo.quiknode.pro/",
        conflicts_with_all = ["header_path", "state_path"]
    )]
    url: String,
    /// Path to a locally stored block header JSON file
    #[arg(long, requires = "state_path")]
    header_path: Option<PathBuf>,
    /// Path to a locally stored state summary JSON file
    #[arg(long, requires = "header_path")]
    state_path: Option<PathBuf>,
    /// HTTP request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,
    /// Directory fetched inputs are snapshotted to
    #[arg(long, default_value = ".")]
    snapshot_dir: PathBuf,
    /// Logging level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber_builder =
        tracing_subscriber::fmt::Subscriber::builder().with_env_filter(env_filter);

    let subscriber = subscriber_builder.with_writer(std::io::stderr).finish();
    set_global_default(subscriber).expect("Failed to set subscriber");
}

async fn run(config: PipelineConfig) -> Result<(), anyhow::Error> {
    let record = pipeline::run(config).await?;
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = PipelineConfig {
        url: Some(cli.url),
        header_path: cli.header_path,
        state_path: cli.state_path,
        timeout: Duration::from_secs(cli.timeout),
        snapshot_dir: cli.snapshot_dir,
    };

    match run(config).await {
        Ok(_) => {
            info!("Proof generator has exited without errors");
            std::process::exit(0);
        }
        Err(err) => {
            error!("Proof generator has exited with error: {}", err);
            std::process::exit(1);
        }
    }
}

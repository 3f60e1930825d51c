use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use media_savant_scanner::catalog::OmdbClient;
use media_savant_scanner::config::{self, ConfigBuilder};
use media_savant_scanner::library;

#[derive(Parser)]
#[command(name = "media-savant-scanner", version, about = "Collect movie metadata for a video library into a JSON file")]
struct Cli {
    /// Root directory of the movie library
    library: PathBuf,

    /// Output JSON document
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Catalog API key
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Catalog endpoint
    #[arg(long, env = "OMDB_API_URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Thumbnails fit in a square of this many pixels
    #[arg(long, default_value_t = config::DEFAULT_THUMBNAIL_SIZE)]
    thumbnail_size: u32,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = ConfigBuilder::new()
        .library_root(&cli.library)
        .output_path(&cli.output)
        .api_key(cli.api_key)
        .api_url(cli.api_url)
        .timeout(Duration::from_secs(cli.timeout))
        .thumbnail_size(cli.thumbnail_size)
        .build()?;

    let client = OmdbClient::new(&config)?;
    let summary = library::run(&config, &client, &client)?;

    println!("===================");
    println!(
        "Summary: {} of {} files matched a catalog entry",
        summary.records_added, summary.files_seen
    );
    println!("Metadata written to {}", config.output_path.display());

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt, EnvFilter};
use url::Url;

use crate::config::Config;

mod config;
mod driver;

/// Fetch gzip-compressed tar archives and unpack them into a directory
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Urls of the `.tar.gz` archives to unpack. They are processed in order and processing stops
    /// at the first failure.
    #[arg(required = true, value_name = "URL")]
    urls: Vec<Url>,

    /// Log progress to standard error
    #[arg(short, long)]
    verbose: bool,

    /// The directory to unpack into [default: the current directory]
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    directory: Option<PathBuf>,
}

/// Entry point of the `tzfetch` cli.
fn main() -> miette::Result<()> {
    // Parse the command line arguments
    let cli = Cli::parse();
    let config = Config::new(cli.directory, cli.verbose)?;

    init_logging(&config)?;

    let client = driver::http_client()?;
    driver::run(&config, client, &cli.urls)
}

/// Installs a subscriber that writes log events to stderr. Only warnings and errors are shown
/// unless verbose output was requested.
fn init_logging(config: &Config) -> miette::Result<()> {
    use miette::IntoDiagnostic;

    // Setup default logging level
    let default_filter = LevelFilter::WARN;

    let mut env_filter = EnvFilter::builder()
        .with_default_directive(default_filter.into())
        .parse_lossy("");
    if config.verbose {
        env_filter = env_filter
            .add_directive("tzfetch=debug".parse().into_diagnostic()?)
            .add_directive("tzfetch_streaming=debug".parse().into_diagnostic()?);
    }

    // Setup the tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish()
        .try_init()
        .into_diagnostic()
}

use clap::Parser;
use std::path::PathBuf;

/// Immoweb.be mass scraper driven by search result URLs
#[derive(Parser, Debug)]
#[command(name = "immoweb-scout", version, about)]
pub struct Cli {
    /// JSON settings file; defaults apply when it does not exist
    #[arg(long, default_value = "config/settings.json")]
    pub config: PathBuf,

    /// Text file with one search URL per line
    #[arg(long, default_value = "data/sample_input_urls.txt")]
    pub urls_file: PathBuf,

    /// Output path without extension; `.json`, `.csv`, `.xlsx` and `.summary.json` are appended
    #[arg(long, default_value = "data/output_sample")]
    pub output_prefix: PathBuf,

    /// Skip new/active/delisted annotation against the previous run
    #[arg(long)]
    pub no_delta: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

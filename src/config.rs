use anyhow::{anyhow, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::api::DEFAULT_API_URL;
use crate::hydrate::HydrationPolicy;
use crate::pagination::PageSize;

/// Pokedex - terminal catalog browser
///
/// Pages through the Pokémon catalog, looks entries up by name and filters by type.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal Pokémon catalog browser", long_about = None)]
pub struct CliArgs {
    /// Catalog API base URL
    #[arg(long, env = "POKEDEX_API_URL")]
    pub api_url: Option<String>,

    /// Items per page: 10, 20 or 50
    #[arg(short = 's', long, env = "PAGE_SIZE", value_parser = clap::value_parser!(PageSize))]
    pub page_size: Option<PageSize>,

    /// Page to open on startup (1-based)
    #[arg(short, long, env = "START_PAGE")]
    pub page: Option<u64>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Retry attempts for transient HTTP failures (0-10)
    #[arg(long, env = "HTTP_RETRIES")]
    pub http_retries: Option<u32>,

    /// Batch hydration policy: all (one failure fails the batch) or partial
    #[arg(long, env = "HYDRATION", value_parser = clap::value_parser!(HydrationPolicy))]
    pub hydration: Option<HydrationPolicy>,

    /// Drop responses from superseded requests (true/false)
    #[arg(long, env = "DISCARD_STALE")]
    pub discard_stale: Option<bool>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Write logs to this file (the TUI keeps stderr quiet otherwise)
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the start page to stdout and exit instead of opening the UI
    #[arg(long)]
    pub print: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub page_size: PageSize,
    pub start_page: u64,
    pub http_timeout_ms: u64,
    pub http_retries: u32,
    pub hydration: HydrationPolicy,
    pub discard_stale: bool,
    pub render_fps: u32,
    pub log_file: Option<PathBuf>,
    pub print: bool,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Load configuration from CLI args and environment variables
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Same as [`load`] with an explicit argv (first element is the program name)
pub fn load_from<I, T>(argv: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = CliArgs::try_parse_from(argv).map_err(|e| anyhow!("{e}"))?;
    from_args(args)
}

fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    validate_url(&api_url, "POKEDEX_API_URL")?;

    let start_page = validate_in_range(args.page.unwrap_or(1), 1, 100_000, "START_PAGE")?;

    let http_timeout_ms =
        validate_in_range(args.http_timeout_ms.unwrap_or(8000), 1000, 60000, "HTTP_TIMEOUT_MS")?;

    let http_retries = validate_in_range(args.http_retries.unwrap_or(0), 0, 10, "HTTP_RETRIES")?;

    let render_fps = validate_in_range(args.render_fps.unwrap_or(30), 1, 120, "RENDER_FPS")?;

    Ok(Config {
        api_url,
        page_size: args.page_size.unwrap_or_default(),
        start_page,
        http_timeout_ms,
        http_retries,
        hydration: args.hydration.unwrap_or_default(),
        discard_stale: args.discard_stale.unwrap_or(true),
        render_fps,
        log_file: args.log_file,
        print: args.print,
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl Config {
    pub fn log_summary(&self) {
        log::info!("Pokedex configuration:");
        log::info!("  API URL: {}", self.api_url);
        log::info!("  Page: {} (size {})", self.start_page, self.page_size);
        log::info!("  HTTP timeout: {}ms, retries: {}", self.http_timeout_ms, self.http_retries);
        log::info!("  Hydration: {}", self.hydration);
        log::info!("  Discard stale responses: {}", self.discard_stale);
        log::info!("  Render FPS: {}", self.render_fps);
    }
}

use apod_gallery::feed::{FeedClient, FeedLoader, FeedSource};
use apod_gallery::gallery::{DateRange, DateRangeError, Gallery};
use apod_gallery::{config, generate, output, trivia};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apod-gallery")]
#[command(about = "Static gallery for daily astronomy picture feeds")]
#[command(long_about = "\
Static gallery for daily astronomy picture feeds

Loads a JSON array of entries (date, title, explanation, media_type, url,
hdurl, thumbnail_url), keeps those inside the date range, and renders a
single HTML page with thumbnails and detail overlays.

The feed is read from --feed, the APOD_FEED_URL environment variable, or
feed.url in gallery.toml, in that order. It may be an http(s) URL or a
local file; the default is data.json.

Run 'apod-gallery gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Feed URL or file path
    #[arg(long, env = "APOD_FEED_URL", global = true)]
    feed: Option<String>,

    /// First date to include (YYYY-MM-DD); defaults to range_days before --end
    #[arg(long, global = true)]
    start: Option<String>,

    /// Last date to include (YYYY-MM-DD); defaults to today
    #[arg(long, global = true)]
    end: Option<String>,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log feed attempts and retries to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the feed and render the gallery page
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Load the feed and list the entries in range
    List,
    /// Show the details of one listed entry
    Show {
        /// Position in the listing, starting at 1
        index: usize,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.config)?;
    let today = Local::now().date_naive();
    let range = resolve_range(
        cli.start.as_deref(),
        cli.end.as_deref(),
        today,
        site_config.range_days,
    )?;
    let source = FeedSource::parse(cli.feed.as_deref().unwrap_or(&site_config.feed.url));

    let loader = FeedLoader::new(
        FeedClient::new(site_config.feed.timeout())?,
        site_config.feed.retry_policy(),
    );
    let mut gallery = Gallery::new();
    if gallery.begin_load() {
        output::print_status(gallery.view());
        let outcome = loader.load_or_empty(&source).await;
        gallery.finish_load(outcome, &range);
    }

    match cli.command {
        Command::Build { output: output_dir } => {
            let color_css = config::generate_color_css(&site_config.colors);
            let source_label = source.to_string();
            let page = generate::PageContext {
                title: &site_config.title,
                range: &range,
                source: &source_label,
                fact: trivia::pick_fact(&site_config.trivia.facts, today),
                color_css: &color_css,
            };
            let index_path = generate::generate(&gallery, &page, &output_dir)?;
            output::print_build_output(gallery.view(), &index_path);
        }
        Command::List => {
            output::print_list_output(gallery.view(), &range, &source);
        }
        Command::Show { index } => {
            if index == 0 || !gallery.select(index - 1) {
                output::print_status(gallery.view());
                return Err(format!("no entry #{index} in {} to {}", range.start(), range.end()).into());
            }
            output::print_overlay(&gallery.overlay().view());
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Fill in missing bounds: end defaults to today, start to `range_days`
/// before the end.
fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    range_days: u32,
) -> Result<DateRange, Box<dyn std::error::Error>> {
    let end_date = match end {
        Some(end) => NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d")
            .map_err(|_| DateRangeError::InvalidDate(end.to_string()))?,
        None => today,
    };
    let default = DateRange::ending_on(end_date, range_days);
    let range = DateRange::new(
        start.unwrap_or(default.start()),
        end.unwrap_or(default.end()),
    )?;
    Ok(range)
}

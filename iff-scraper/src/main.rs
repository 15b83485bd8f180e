mod cache;
mod cli;
mod fetch;
mod schedule;

use std::env;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use tokio::fs;

use crate::cache::Cache;
use crate::fetch::CachedFetcher;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "iff_scraper=info,iff_parser=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());
    setup_logging();

    let site = schedule::site()?;
    let fetcher = CachedFetcher::new(Cache::new(args.cache)).context("Failed to build HTTP client")?;

    let events =
        schedule::collect_events(&fetcher, &site, &schedule::day_pages(), args.delay).await?;

    let output = if args.json {
        serde_json::to_string_pretty(&events).context("Failed to serialize events")?
    } else {
        schedule::build_calendar(&site, &events, Utc::now()).serialize()
    };

    fs::write(&args.output, output)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Wrote {} events to {}", events.len(), args.output.display());
    Ok(())
}

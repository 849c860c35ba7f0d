use anyhow::Result;
use channel_analytics::config;
use channel_analytics::services::analytics::{build_report, TopMetric, DEFAULT_TOP_N};
use channel_analytics::services::presenter;
use channel_analytics::services::youtube::YouTubeClient;
use clap::Parser;
use log::error;
use std::path::PathBuf;

/// YouTube channel analytics over a trailing window of days.
#[derive(Parser, Debug)]
#[command(name = "analyze", about = "YouTube Channel Analytics")]
struct Args {
    /// YouTube channel URL, username, or @handle
    identifier: String,

    /// YouTube Data API key
    #[arg(long)]
    api_key: String,

    /// Number of days to analyze
    #[arg(long, default_value_t = 30)]
    days: i64,

    /// Output CSV file name for the raw per-video rows
    #[arg(long, default_value = "youtube_analytics.csv")]
    output: PathBuf,

    /// Leaderboard size for the top-video lists
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Print the JSON report instead of console tables
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_environment();
    config::init_logger();

    let args = Args::parse();
    let client = YouTubeClient::new(&args.api_key);

    println!("Analyzing channel: {}", args.identifier);
    let channel_id = match client.resolve_channel_id(&args.identifier).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            println!("Could not find channel ID. Please check the URL, username, or handle.");
            return Ok(());
        }
        Err(e) => {
            error!("Channel lookup failed: {e}");
            println!("Could not find channel ID. Please check the URL, username, or handle.");
            return Ok(());
        }
    };

    println!("Fetching videos from the past {} days...", args.days);
    let videos = match client.collect_channel_videos(&channel_id, args.days).await {
        Ok(videos) => videos,
        Err(e) => {
            error!("Fetching channel videos failed: {e}");
            Vec::new()
        }
    };
    if videos.is_empty() {
        println!("No videos found in the specified time period.");
        return Ok(());
    }

    // Raw rows land on disk before analysis, so a presenter failure cannot
    // lose the fetched data.
    presenter::write_csv(&args.output, &videos)?;
    println!("Raw data saved to {}", args.output.display());

    let report = build_report(&channel_id, args.days, videos, TopMetric::Views, args.top);
    if args.json {
        println!("{}", presenter::render_json(&report)?);
    } else {
        println!("{}", presenter::render_console(&report, args.top));
    }

    Ok(())
}

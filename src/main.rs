use std::io;

use anyhow::Context;
use public_holiday_tracker::{HolidayRepository, HttpFetcher, Menu, TrackerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = TrackerConfig::default();
    let fetcher = HttpFetcher::new(&config).context("failed to build HTTP client")?;
    let mut repo = HolidayRepository::new(fetcher, &config);

    println!("Downloading public holidays, please wait...");
    let report = repo.load_all().await;
    for (year, error) in report.failures() {
        println!("Could not load holidays for {year}: {error}");
    }
    println!("Done.\n");

    let stdin = io::stdin();
    let mut menu = Menu::new(&repo, stdin.lock(), io::stdout());
    menu.run().context("terminal I/O failed")?;

    Ok(())
}

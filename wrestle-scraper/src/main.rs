use wrestle_scraper::config::{self, ScraperConfig};
use wrestle_scraper::module::pipeline::Pipeline;
use wrestle_scraper::module::session::{self, Credentials};

use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file next to the binary
    dotenv::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let config = ScraperConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _logging_guard = wrestle_scraper::logging::init_logging(
        &config.log_dir,
        "wrestle-scraper",
        &config.log_level,
    )?;

    tracing::info!("WrestleStat scraper starting...");
    tracing::info!(
        "Seasons {}..={}, writing to {:?}",
        config.first_season,
        config.last_season,
        config.output_dir
    );

    let credentials = Credentials::from_env()?;
    let session = session::login(&config, &credentials)
        .await
        .context("Login failed")?;

    let run = Pipeline::new(session.as_ref(), &config).run().await;

    if let Some(reason) = &run.report.aborted {
        anyhow::bail!("Scrape stopped early: {}", reason);
    }

    tracing::info!(
        "Done: {} matches across {} seasons",
        run.dataset.len(),
        run.report.seasons.len()
    );
    Ok(())
}

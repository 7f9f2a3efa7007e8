#![allow(missing_docs)]

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tennis_coach_scraper::infrastructure::init_logging_with_config;
use tennis_coach_scraper::{run_batch, School, ScraperConfig};
use tracing::{error, info};

/// Optional path to a TOML/JSON configuration file
const CONFIG_PATH_ENV: &str = "COACH_SCRAPER_CONFIG";

fn load_config() -> Result<ScraperConfig> {
    let config = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => ScraperConfig::load(Some(Path::new(&path))),
        None => ScraperConfig::load_default_location(),
    };
    config.context("Failed to load configuration")
}

async fn read_schools(path: &Path) -> Result<Vec<School>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read school list {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse school list {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_logging_with_config(&config.logging)?;

    let Some(schools_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        anyhow::bail!("usage: tennis-coach-scraper <schools.json>");
    };
    let schools = read_schools(&schools_path).await?;
    info!("Loaded {} schools from {}", schools.len(), schools_path.display());

    let programs = match run_batch(&config, &schools).await {
        Ok(programs) => programs,
        Err(e) => {
            error!("Batch aborted: {:#}", e);
            return Err(e);
        }
    };

    let json = serde_json::to_string_pretty(&programs).context("Failed to serialize programs")?;
    println!("{json}");
    Ok(())
}

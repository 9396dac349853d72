//! Quest combat client binary.
//!
//! Runs one automated encounter against the configured quest and prints how
//! it ended.
//!
//! # Examples
//!
//! ```bash
//! COMBAT_QUEST_ID=2 COMBAT_HEROES=1,2,4 cargo run -p quest-combat
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};

use game_content::ContentFactory;
use quest_combat::{ClientConfig, logging, run_encounter};
use runtime::{CombatRuntime, OracleManager, Topic};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = ClientConfig::from_env()?;
    let _guard = logging::setup_logging()?;

    let factory = ContentFactory::new(&config.data_dir);
    let catalog = Arc::new(factory.load_catalog()?);
    config.runtime.game = factory.load_config()?;
    tracing::info!(data_dir = %config.data_dir.display(), quest = %config.quest, "Content loaded");

    let runtime = CombatRuntime::builder()
        .config(config.runtime.clone())
        .oracles(OracleManager::new(catalog))
        .build()
        .await
        .context("Failed to build combat runtime")?;

    let mut outcomes = runtime.subscribe(Topic::Outcome);
    let announcer = tokio::spawn(async move {
        while let Ok(event) = outcomes.recv().await {
            match event.to_json() {
                Ok(json) => tracing::info!("{json}"),
                Err(error) => tracing::warn!("Unprintable outcome event: {error}"),
            }
        }
    });

    let report = run_encounter(&runtime.handle(), &config).await;
    runtime.shutdown().await?;
    announcer.abort();

    let report = report?;
    println!("{report}");
    Ok(())
}

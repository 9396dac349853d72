//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`GameConfig::default`]; out-of-range values
    /// are clamped by [`GameConfig::normalized`].
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("combo_cap = 4\nstatus_intensity_cap = 9\n").unwrap();
        assert_eq!(config.combo_cap, 4);
        assert_eq!(config.status_intensity_cap, GameConfig::MAX_INTENSITY);
        assert_eq!(config.morale_baseline, GameConfig::DEFAULT_MORALE_BASELINE);
    }
}

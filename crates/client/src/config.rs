//! Client configuration structures and loaders.
use std::path::PathBuf;

use anyhow::{Context, Result};

use game_core::{HeroId, PlayerId, QuestId};
use runtime::RuntimeConfig;

/// Everything the client needs to run one encounter.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding the RON/TOML content files.
    pub data_dir: PathBuf,
    pub player: PlayerId,
    pub quest: QuestId,
    /// Party in roster order.
    pub heroes: Vec<HeroId>,
    /// Upper bound on commands issued before the client gives up.
    pub max_actions: usize,
    pub runtime: RuntimeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            player: PlayerId(1),
            quest: QuestId(1),
            heroes: vec![HeroId(1), HeroId(2)],
            max_actions: 500,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - Content directory (default: `data`)
    /// - `COMBAT_PLAYER_ID` - Player identity (default: 1)
    /// - `COMBAT_QUEST_ID` - Quest to run (default: 1)
    /// - `COMBAT_HEROES` - Comma-separated hero ids (default: `1,2`)
    /// - `COMBAT_SAVE_DIR` and the other `COMBAT_*` runtime variables, see
    ///   [`RuntimeConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self {
            runtime: RuntimeConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(dir) = lookup("COMBAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(player) = lookup("COMBAT_PLAYER_ID") {
            config.player = PlayerId(parse_id("COMBAT_PLAYER_ID", &player)?);
        }
        if let Some(quest) = lookup("COMBAT_QUEST_ID") {
            config.quest = QuestId(parse_id("COMBAT_QUEST_ID", &quest)?);
        }
        if let Some(heroes) = lookup("COMBAT_HEROES") {
            config.heroes = heroes
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| parse_id("COMBAT_HEROES", id).map(HeroId))
                .collect::<Result<_>>()?;
        }

        Ok(config)
    }
}

fn parse_id(key: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a numeric id, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_run_the_first_quest() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.quest, QuestId(1));
        assert_eq!(config.heroes, vec![HeroId(1), HeroId(2)]);
        assert!(config.runtime.save_dir.is_none());
    }

    #[test]
    fn reads_party_and_directories() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("COMBAT_DATA_DIR", "/srv/content"),
            ("COMBAT_SAVE_DIR", "/srv/saves"),
            ("COMBAT_QUEST_ID", "2"),
            ("COMBAT_PLAYER_ID", "9"),
            ("COMBAT_HEROES", " 4, 6,1 ,"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.runtime.save_dir, Some(PathBuf::from("/srv/saves")));
        assert_eq!(config.quest, QuestId(2));
        assert_eq!(config.player, PlayerId(9));
        assert_eq!(config.heroes, vec![HeroId(4), HeroId(6), HeroId(1)]);
    }

    #[test]
    fn rejects_non_numeric_heroes() {
        let err = ClientConfig::from_lookup(lookup(&[("COMBAT_HEROES", "1,two")])).unwrap_err();
        assert!(err.to_string().contains("COMBAT_HEROES"));
    }
}

//! Content factory for building a [`Catalog`] from data files.

use std::path::{Path, PathBuf};

use game_core::GameConfig;
use game_core::env::EnemyDefinition;

use crate::catalog::{Catalog, HeroRecord, ItemDefinition, Progression};
use crate::loaders::{
    AbilityLoader, ClassAbility, ComboCatalog, ComboLoader, ConfigLoader, EnemyLoader, HeroLoader,
    ItemLoader, LoadResult, ProgressionLoader, QuestEntry, QuestLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── progression.toml
/// ├── heroes.ron
/// ├── items.ron
/// ├── enemies.ron
/// ├── quests.ron
/// ├── abilities.ron
/// └── combos.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    pub fn load_progression(&self) -> LoadResult<Progression> {
        ProgressionLoader::load(&self.data_dir.join("progression.toml"))
    }

    pub fn load_heroes(&self) -> LoadResult<Vec<HeroRecord>> {
        HeroLoader::load(&self.data_dir.join("heroes.ron"))
    }

    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_enemies(&self) -> LoadResult<Vec<EnemyDefinition>> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    pub fn load_quests(&self) -> LoadResult<Vec<QuestEntry>> {
        QuestLoader::load(&self.data_dir.join("quests.ron"))
    }

    pub fn load_abilities(&self) -> LoadResult<Vec<ClassAbility>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    pub fn load_combos(&self) -> LoadResult<ComboCatalog> {
        ComboLoader::load(&self.data_dir.join("combos.ron"))
    }

    /// Loads every reference file and assembles a validated [`Catalog`].
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::new();
        catalog.set_progression(self.load_progression()?);

        for item in self.load_items()? {
            catalog.add_item(item);
        }
        for hero in self.load_heroes()? {
            catalog.add_hero(hero);
        }
        for enemy in self.load_enemies()? {
            catalog.add_enemy(enemy);
        }
        for entry in self.load_quests()? {
            let (quest, environment) = entry.into_parts();
            catalog.add_quest(quest, environment);
        }
        for ClassAbility { class, ability } in self.load_abilities()? {
            catalog.add_ability(class, ability);
        }

        let combos = self.load_combos()?;
        for combo in combos.combos {
            catalog.add_combo(combo);
        }
        for weakness in combos.weaknesses {
            catalog.add_weakness(weakness);
        }
        for discovery in combos.discoveries {
            catalog.discover(discovery.player, discovery.combo);
        }

        catalog
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e))?;
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use game_core::env::{
        AbilityOracle, ComboOracle, EnvironmentOracle, HeroClass, HeroOracle, QuestOracle,
    };
    use game_core::state::{ComboId, EnemyId, HeroId, PlayerId, QuestId};
    use strum::IntoEnumIterator;

    fn shipped_data() -> ContentFactory {
        ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data"))
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn shipped_data_builds_a_valid_catalog() {
        let factory = shipped_data();
        let config = factory.load_config().unwrap();
        assert_eq!(config, config.clone().normalized());

        let catalog = factory.load_catalog().unwrap();
        for class in HeroClass::iter() {
            assert!(catalog.ability(class).is_some(), "no ability for {class}");
        }
        assert!(catalog.hero(HeroId(1)).is_some());

        let quest = catalog.quest(QuestId(1)).unwrap();
        assert!(!quest.enemies.is_empty());
        for enemy in &quest.enemies {
            assert!(catalog.enemy(*enemy).is_some());
        }
        assert!(catalog.active_condition(QuestId(1)).is_none());
        assert!(catalog.active_condition(QuestId(2)).is_some());
    }

    #[test]
    fn shipped_data_declares_a_discovered_boss_weakness() {
        let catalog = shipped_data().load_catalog().unwrap();
        let weaknesses = catalog.weaknesses(EnemyId(3));
        assert!(!weaknesses.is_empty());
        assert!(catalog.is_discovered(PlayerId(1), ComboId(1)));
        assert!(catalog.enemy(EnemyId(3)).unwrap().is_boss());
    }

    #[test]
    fn dangling_reference_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let source = shipped_data();
        for name in [
            "config.toml",
            "progression.toml",
            "heroes.ron",
            "items.ron",
            "enemies.ron",
            "abilities.ron",
            "combos.ron",
        ] {
            std::fs::copy(source.data_dir().join(name), dir.path().join(name)).unwrap();
        }
        std::fs::write(
            dir.path().join("quests.ron"),
            r#"(quests: [(id: 9, name: "Nowhere", enemies: [999])])"#,
        )
        .unwrap();

        let error = ContentFactory::new(dir.path())
            .load_catalog()
            .unwrap_err()
            .to_string();
        assert!(error.contains("unknown enemy"), "{error}");
    }

    #[test]
    fn malformed_file_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("heroes.ron"), "(heroes: [ oops ])").unwrap();

        let error = ContentFactory::new(dir.path())
            .load_heroes()
            .unwrap_err()
            .to_string();
        assert!(error.starts_with("Failed to parse hero roster RON"), "{error}");
    }
}

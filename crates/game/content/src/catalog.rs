//! In-memory reference data implementing the `game-core` oracle traits.
//!
//! A [`Catalog`] is assembled once (usually by
//! [`ContentFactory`](crate::loaders::ContentFactory)) and shared read-only
//! across every session.

use std::collections::{BTreeMap, BTreeSet};

use game_core::env::{
    AbilityDefinition, AbilityOracle, BossWeakness, ComboOracle, EnemyDefinition,
    EnvironmentOracle, EnvironmentalCondition, HeroClass, HeroOracle, HeroProfile, PartyCombo,
    QuestDefinition, QuestOracle,
};
use game_core::state::{ComboId, EnemyId, HeroId, ItemId, PlayerId, QuestId};
use game_core::stats::{BaseAttributes, StatBonus, compute_combat_stats};

/// A hero as stored by the hero provider, before level and equipment are
/// folded into combat stats.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroRecord {
    pub id: HeroId,
    pub name: String,
    pub class: HeroClass,
    pub base: BaseAttributes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Vec<ItemId>,
}

/// Equipment granting stat bonuses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<StatBonus>,
}

/// Cumulative experience needed for each level above 1.
///
/// `thresholds[0]` reaches level 2, `thresholds[1]` level 3, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progression {
    pub thresholds: Vec<u64>,
}

impl Progression {
    pub fn level_for(&self, experience: u64) -> u32 {
        let reached = self
            .thresholds
            .iter()
            .take_while(|&&threshold| threshold <= experience)
            .count();
        1 + reached as u32
    }
}

/// Dangling reference found by [`Catalog::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("hero {hero} equips unknown item {item}")]
    UnknownItem { hero: HeroId, item: ItemId },

    #[error("quest {quest} references unknown enemy {enemy}")]
    UnknownEnemy { quest: QuestId, enemy: EnemyId },

    #[error("weakness against {enemy} references unknown combo {combo}")]
    UnknownCombo { enemy: EnemyId, combo: ComboId },

    #[error("class {0} has heroes but no special ability")]
    MissingAbility(HeroClass),

    #[error("progression thresholds must be strictly increasing")]
    UnsortedProgression,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    heroes: BTreeMap<HeroId, HeroRecord>,
    items: BTreeMap<ItemId, ItemDefinition>,
    enemies: BTreeMap<EnemyId, EnemyDefinition>,
    quests: BTreeMap<QuestId, QuestDefinition>,
    environments: BTreeMap<QuestId, EnvironmentalCondition>,
    abilities: BTreeMap<HeroClass, AbilityDefinition>,
    combos: BTreeMap<ComboId, PartyCombo>,
    weaknesses: Vec<BossWeakness>,
    discoveries: BTreeSet<(PlayerId, ComboId)>,
    progression: Progression,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hero(&mut self, hero: HeroRecord) {
        self.heroes.insert(hero.id, hero);
    }

    pub fn add_item(&mut self, item: ItemDefinition) {
        self.items.insert(item.id, item);
    }

    pub fn add_enemy(&mut self, enemy: EnemyDefinition) {
        self.enemies.insert(enemy.id, enemy);
    }

    /// Registers a quest together with its active environmental condition.
    pub fn add_quest(
        &mut self,
        quest: QuestDefinition,
        environment: Option<EnvironmentalCondition>,
    ) {
        match environment {
            Some(condition) => self.environments.insert(quest.id, condition),
            None => self.environments.remove(&quest.id),
        };
        self.quests.insert(quest.id, quest);
    }

    pub fn add_ability(&mut self, class: HeroClass, ability: AbilityDefinition) {
        self.abilities.insert(class, ability);
    }

    pub fn add_combo(&mut self, combo: PartyCombo) {
        self.combos.insert(combo.id, combo);
    }

    pub fn add_weakness(&mut self, weakness: BossWeakness) {
        self.weaknesses.push(weakness);
    }

    /// Marks `combo` as discovered by `player`.
    pub fn discover(&mut self, player: PlayerId, combo: ComboId) {
        self.discoveries.insert((player, combo));
    }

    pub fn set_progression(&mut self, progression: Progression) {
        self.progression = progression;
    }

    pub fn hero_record(&self, id: HeroId) -> Option<&HeroRecord> {
        self.heroes.get(&id)
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }

    pub fn hero_ids(&self) -> impl Iterator<Item = HeroId> + '_ {
        self.heroes.keys().copied()
    }

    pub fn quest_ids(&self) -> impl Iterator<Item = QuestId> + '_ {
        self.quests.keys().copied()
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Checks that every cross-reference resolves.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self
            .progression
            .thresholds
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return Err(CatalogError::UnsortedProgression);
        }
        for hero in self.heroes.values() {
            if let Some(&item) = hero
                .equipment
                .iter()
                .find(|item| !self.items.contains_key(item))
            {
                return Err(CatalogError::UnknownItem {
                    hero: hero.id,
                    item,
                });
            }
            if !self.abilities.contains_key(&hero.class) {
                return Err(CatalogError::MissingAbility(hero.class));
            }
        }
        for quest in self.quests.values() {
            if let Some(&enemy) = quest
                .enemies
                .iter()
                .find(|enemy| !self.enemies.contains_key(enemy))
            {
                return Err(CatalogError::UnknownEnemy {
                    quest: quest.id,
                    enemy,
                });
            }
        }
        if let Some(weakness) = self
            .weaknesses
            .iter()
            .find(|weakness| !self.combos.contains_key(&weakness.combo))
        {
            return Err(CatalogError::UnknownCombo {
                enemy: weakness.enemy,
                combo: weakness.combo,
            });
        }
        Ok(())
    }

    fn equipment_bonuses(&self, hero: &HeroRecord) -> Vec<StatBonus> {
        hero.equipment
            .iter()
            .filter_map(|item| self.items.get(item))
            .flat_map(|item| item.bonuses.iter().copied())
            .collect()
    }
}

impl HeroOracle for Catalog {
    fn hero(&self, id: HeroId) -> Option<HeroProfile> {
        let record = self.heroes.get(&id)?;
        let level = self.progression.level_for(record.experience);
        Some(HeroProfile {
            id,
            name: record.name.clone(),
            class: record.class,
            stats: compute_combat_stats(&record.base, level, &self.equipment_bonuses(record)),
            experience: record.experience,
        })
    }

    fn level_after(&self, id: HeroId, experience: u64) -> Option<u32> {
        let record = self.heroes.get(&id)?;
        let current = self.progression.level_for(record.experience);
        let next = self
            .progression
            .level_for(record.experience.saturating_add(experience));
        (next > current).then_some(next)
    }
}

impl QuestOracle for Catalog {
    fn quest(&self, id: QuestId) -> Option<QuestDefinition> {
        self.quests.get(&id).cloned()
    }

    fn enemy(&self, id: EnemyId) -> Option<EnemyDefinition> {
        self.enemies.get(&id).cloned()
    }
}

impl ComboOracle for Catalog {
    fn combo(&self, id: ComboId) -> Option<PartyCombo> {
        self.combos.get(&id).cloned()
    }

    fn weaknesses(&self, enemy: EnemyId) -> Vec<BossWeakness> {
        self.weaknesses
            .iter()
            .filter(|weakness| weakness.enemy == enemy)
            .copied()
            .collect()
    }

    fn is_discovered(&self, player: PlayerId, combo: ComboId) -> bool {
        self.discoveries.contains(&(player, combo))
    }
}

impl AbilityOracle for Catalog {
    fn ability(&self, class: HeroClass) -> Option<AbilityDefinition> {
        self.abilities.get(&class).cloned()
    }
}

impl EnvironmentOracle for Catalog {
    fn active_condition(&self, quest: QuestId) -> Option<EnvironmentalCondition> {
        self.environments.get(&quest).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::combat::DiceType;
    use game_core::env::{AbilityEffect, ClassSet, QuestReward};
    use game_core::stats::{Bonus, StatKind};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.set_progression(Progression {
            thresholds: vec![100, 300],
        });
        catalog.add_item(ItemDefinition {
            id: ItemId(1),
            name: "Iron Sword".into(),
            bonuses: vec![StatBonus {
                stat: StatKind::Attack,
                bonus: Bonus::Flat(4),
            }],
        });
        catalog.add_hero(HeroRecord {
            id: HeroId(1),
            name: "Aldric".into(),
            class: HeroClass::Warrior,
            base: BaseAttributes {
                attack: 10,
                defense: 4,
                health: 60,
            },
            experience: 120,
            equipment: vec![ItemId(1)],
        });
        catalog.add_ability(
            HeroClass::Warrior,
            AbilityDefinition {
                name: "Cleave".into(),
                effect: AbilityEffect::Strike { power_pct: 150 },
                cooldown: 2,
                rider: None,
            },
        );
        catalog.add_enemy(EnemyDefinition {
            id: EnemyId(1),
            name: "Goblin".into(),
            max_health: 30,
            power: 3,
            defense: 1,
            minimum_roll: 10,
            attack_die: DiceType::D6,
            boss: None,
            special: None,
        });
        catalog.add_quest(
            QuestDefinition {
                id: QuestId(1),
                name: "Goblin Cave".into(),
                enemies: vec![EnemyId(1)],
                reward: QuestReward::default(),
            },
            None,
        );
        catalog
    }

    #[test]
    fn hero_profile_folds_level_and_equipment() {
        let catalog = catalog();
        let profile = catalog.hero(HeroId(1)).unwrap();
        assert_eq!(profile.stats.level, 2);
        // 10 base + 2 per level + 4 from the sword.
        assert_eq!(profile.stats.attack, 16);
        assert_eq!(profile.stats.defense, 5);
        assert_eq!(profile.stats.max_health, 70);
    }

    #[test]
    fn level_after_reports_only_changes() {
        let catalog = catalog();
        assert_eq!(catalog.level_after(HeroId(1), 50), None);
        assert_eq!(catalog.level_after(HeroId(1), 180), Some(3));
        assert_eq!(catalog.level_after(HeroId(9), 1_000), None);
    }

    #[test]
    fn discoveries_are_per_player() {
        let mut catalog = catalog();
        catalog.add_combo(PartyCombo {
            id: ComboId(1),
            name: "Shield Wall".into(),
            required: ClassSet::WARRIOR,
        });
        catalog.discover(PlayerId(1), ComboId(1));
        assert!(catalog.is_discovered(PlayerId(1), ComboId(1)));
        assert!(!catalog.is_discovered(PlayerId(2), ComboId(1)));
    }

    #[test]
    fn validate_catches_dangling_references() {
        let mut catalog = catalog();
        assert_eq!(catalog.validate(), Ok(()));

        catalog.add_quest(
            QuestDefinition {
                id: QuestId(2),
                name: "Empty Crypt".into(),
                enemies: vec![EnemyId(7)],
                reward: QuestReward::default(),
            },
            None,
        );
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::UnknownEnemy {
                quest: QuestId(2),
                enemy: EnemyId(7)
            })
        );
    }
}

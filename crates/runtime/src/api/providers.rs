//! Asynchronous reward collaborator.
//!
//! A won session is turned into concrete grants by a [`RewardProvider`]. The
//! runtime calls it once per successful `CompleteCombat`, under the configured
//! timeout, and only marks the rewards claimed when it answers.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use game_content::Catalog;
use game_core::{HeroId, HeroOracle, ItemId, QuestId, QuestOracle, RewardClaim};

/// Concrete grants for one victory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    pub gold: u64,
    /// Experience granted to each surviving hero.
    pub experience: u64,
    pub items: Vec<ItemId>,
    /// Heroes whose level changes with this grant, and their new level.
    pub level_ups: Vec<(HeroId, u32)>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("quest {0} is unknown to the reward provider")]
    UnknownQuest(QuestId),

    #[error("reward provider unavailable: {0}")]
    Unavailable(String),
}

/// Trait for converting a reward claim into grants.
///
/// Different implementations can handle:
/// - Quest-table rewards from static content
/// - Remote economy services
/// - Testing fixtures (slow or failing providers)
#[async_trait]
pub trait RewardProvider: Send + Sync {
    async fn grant(&self, claim: &RewardClaim) -> Result<RewardGrant, ProviderError>;
}

/// Grants the quest's base rewards scaled by the claim's multipliers.
///
/// Gold follows the drop multiplier and experience the experience
/// multiplier. The quest's listed items drop as-is; there is no loot table.
pub struct QuestRewardProvider {
    catalog: Arc<Catalog>,
}

impl QuestRewardProvider {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

fn scale(value: u64, percent: u32) -> u64 {
    value.saturating_mul(u64::from(percent)) / 100
}

#[async_trait]
impl RewardProvider for QuestRewardProvider {
    async fn grant(&self, claim: &RewardClaim) -> Result<RewardGrant, ProviderError> {
        let quest = self
            .catalog
            .quest(claim.quest)
            .ok_or(ProviderError::UnknownQuest(claim.quest))?;

        let experience = scale(quest.reward.experience, claim.experience_multiplier_pct);
        let level_ups = claim
            .surviving_heroes
            .iter()
            .filter_map(|&hero| {
                self.catalog
                    .level_after(hero, experience)
                    .map(|level| (hero, level))
            })
            .collect();

        Ok(RewardGrant {
            gold: scale(quest.reward.gold, claim.drop_multiplier_pct),
            experience,
            items: quest.reward.items.clone(),
            level_ups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_content::{HeroRecord, Progression};
    use game_core::env::{HeroClass, QuestDefinition, QuestReward};
    use game_core::stats::BaseAttributes;
    use game_core::{EnemyId, PlayerId, SessionId};

    fn catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::new();
        catalog.set_progression(Progression {
            thresholds: vec![100, 300],
        });
        for (id, experience) in [(1, 50), (2, 0)] {
            catalog.add_hero(HeroRecord {
                id: HeroId(id),
                name: format!("hero {id}"),
                class: HeroClass::Warrior,
                base: BaseAttributes {
                    attack: 10,
                    defense: 2,
                    health: 40,
                },
                experience,
                equipment: Vec::new(),
            });
        }
        catalog.add_quest(
            QuestDefinition {
                id: QuestId(1),
                name: "Crypt".into(),
                enemies: vec![EnemyId(1)],
                reward: QuestReward {
                    gold: 40,
                    experience: 60,
                    items: vec![ItemId(9)],
                },
            },
            None,
        );
        Arc::new(catalog)
    }

    fn claim(quest: QuestId, drop_pct: u32, experience_pct: u32) -> RewardClaim {
        RewardClaim {
            session: SessionId(1),
            player: PlayerId(1),
            quest,
            heroes: vec![HeroId(1), HeroId(2)],
            surviving_heroes: vec![HeroId(1), HeroId(2)],
            defeated_enemies: vec![EnemyId(1)],
            turns: 3,
            drop_multiplier_pct: drop_pct,
            experience_multiplier_pct: experience_pct,
        }
    }

    #[tokio::test]
    async fn multipliers_scale_gold_and_experience() {
        let provider = QuestRewardProvider::new(catalog());
        let grant = provider.grant(&claim(QuestId(1), 200, 150)).await.unwrap();

        assert_eq!(grant.gold, 80);
        assert_eq!(grant.experience, 90);
        assert_eq!(grant.items, vec![ItemId(9)]);
        // 50 + 90 crosses the first threshold; 0 + 90 does not.
        assert_eq!(grant.level_ups, vec![(HeroId(1), 2)]);
    }

    #[tokio::test]
    async fn unknown_quest_is_a_provider_error() {
        let provider = QuestRewardProvider::new(catalog());
        let error = provider
            .grant(&claim(QuestId(7), 100, 100))
            .await
            .unwrap_err();
        assert!(matches!(error, ProviderError::UnknownQuest(QuestId(7))));
    }
}

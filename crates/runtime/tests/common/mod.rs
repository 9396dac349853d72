#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use game_content::{Catalog, ContentFactory};
use game_core::{
    DiceType, HeroId, PlayerId, QuestId, RngOracle, SessionId, SessionStatus, TurnSide,
};
use runtime::{CombatHandle, CombatRuntime, OracleManager, RewardProvider, RuntimeConfig};

pub const PLAYER: PlayerId = PlayerId(1);
pub const GOBLIN_WARREN: QuestId = QuestId(1);

pub fn party() -> Vec<HeroId> {
    vec![HeroId(1), HeroId(2)]
}

/// Every die lands on its highest face and no percentage check fires.
pub struct HighRolls;

impl RngOracle for HighRolls {
    fn next_u32(&self, _seed: u64) -> u32 {
        u32::MAX
    }

    fn roll_d100(&self, _seed: u64) -> u32 {
        100
    }

    fn roll_die(&self, _seed: u64, sides: u32) -> u32 {
        sides
    }
}

pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(
        ContentFactory::new(data_dir())
            .load_catalog()
            .expect("shipped content should load"),
    )
}

pub fn oracles() -> OracleManager {
    OracleManager::new(catalog()).with_rng(Arc::new(HighRolls))
}

pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        rng_seed: Some(7),
        ..RuntimeConfig::default()
    }
}

pub async fn runtime(config: RuntimeConfig) -> CombatRuntime {
    CombatRuntime::builder()
        .config(config)
        .oracles(oracles())
        .build()
        .await
        .expect("runtime should build")
}

pub async fn runtime_with_rewards(
    config: RuntimeConfig,
    rewards: Arc<dyn RewardProvider>,
) -> CombatRuntime {
    CombatRuntime::builder()
        .config(config)
        .oracles(oracles())
        .reward_provider(rewards)
        .build()
        .await
        .expect("runtime should build")
}

/// Alternates hero rolls and enemy attacks until the session ends.
pub async fn play_out(handle: &CombatHandle, session: SessionId) -> SessionStatus {
    for _ in 0..200 {
        let snapshot = handle.session(session).expect("session should exist");
        if snapshot.status != SessionStatus::InProgress {
            return snapshot.status;
        }
        match snapshot.turn {
            TurnSide::Hero => {
                handle
                    .roll_dice(session, DiceType::D20)
                    .await
                    .expect("roll should resolve");
            }
            TurnSide::Enemy => {
                handle
                    .enemy_attack(session)
                    .await
                    .expect("enemy attack should resolve");
            }
        }
    }
    panic!("session {session} did not finish");
}

/// Starts the Goblin Warren with the default party and plays it to the end.
pub async fn won_session(handle: &CombatHandle) -> SessionId {
    let started = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .expect("start should succeed");
    let id = started.session.id;
    assert_eq!(play_out(handle, id).await, SessionStatus::Victory);
    id
}

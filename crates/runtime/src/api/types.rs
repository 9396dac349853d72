//! Response shapes returned by [`CombatHandle`](super::CombatHandle).

use serde::{Deserialize, Serialize};

use game_core::{CombatSessionSnapshot, HeroId, ItemId, SessionStatus};

/// Command-specific outcome plus the session as persisted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    pub outcome: T,
    pub session: CombatSessionSnapshot,
}

/// How an encounter ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    /// The party withdrew: the session was cancelled.
    Fled,
    Defeated,
}

impl CombatOutcome {
    /// `None` while the session is still running.
    pub fn from_status(status: SessionStatus) -> Option<Self> {
        match status {
            SessionStatus::Victory => Some(Self::Victory),
            SessionStatus::Cancelled => Some(Self::Fled),
            SessionStatus::Defeat => Some(Self::Defeated),
            SessionStatus::Preparing | SessionStatus::InProgress => None,
        }
    }
}

/// Result of a successful `CompleteCombat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub status: CombatOutcome,
    pub gold_earned: u64,
    /// Experience granted to each surviving hero.
    pub experience_earned: u64,
    /// Highest new level reached by any hero, if anyone levelled up.
    pub hero_new_level: Option<u32>,
    pub level_ups: Vec<(HeroId, u32)>,
    pub dropped_items: Vec<ItemId>,
    pub message: String,
    pub session: CombatSessionSnapshot,
}

//! Event types for each topic.

use serde::{Deserialize, Serialize};

use game_core::{
    CombatEvent, ErrorKind, HeroId, ItemId, PlayerId, QuestId, SessionId, SessionStatus,
};

/// Events on [`Topic::Combat`](super::Topic::Combat).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A command resolved and its result was persisted.
    ActionResolved {
        session: SessionId,
        /// Session nonce after the command.
        nonce: u64,
        command: String,
        message: String,
        events: Vec<CombatEvent>,
    },

    /// A command was rejected; the session is unchanged.
    ActionRejected {
        session: SessionId,
        command: String,
        kind: ErrorKind,
        error: String,
    },
}

/// Events on [`Topic::Outcome`](super::Topic::Outcome).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutcomeEvent {
    /// Published exactly once per session, when it becomes terminal.
    SessionConcluded {
        session: SessionId,
        player: PlayerId,
        quest: QuestId,
        status: SessionStatus,
        turns: u32,
    },

    RewardsClaimed {
        session: SessionId,
        player: PlayerId,
        gold: u64,
        experience: u64,
        items: Vec<ItemId>,
        level_ups: Vec<(HeroId, u32)>,
    },
}

//! Async runtime for turn-based party combat.
//!
//! This crate wires the deterministic [`game_core::CombatEngine`] to content
//! oracles, durable repositories, a reward collaborator, and per-session
//! worker tasks. Consumers build a [`CombatRuntime`] and issue commands
//! through the cloneable [`CombatHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder, and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] adapts the content catalog to the engine's oracle traits
//! - [`repository`] stores sessions and combat logs in memory or on disk
//!
//! Session workers stay internal: each session's commands run one at a time,
//! while different sessions proceed concurrently.
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    ActionResponse, CombatHandle, CombatOutcome, CompletionOutcome, ProviderError,
    QuestRewardProvider, Result, RewardGrant, RewardProvider, RuntimeError,
};
pub use events::{Event, EventBus, OutcomeEvent, SessionEvent, Topic};
pub use oracle::OracleManager;
pub use repository::{
    CombatLogEntry, CombatLogRepository, FileCombatLog, FileSessionRepository, InMemoryCombatLog,
    InMemorySessionRepo, RepositoryError, SessionRepository,
};
pub use runtime::{CombatRuntime, RuntimeBuilder, RuntimeConfig};

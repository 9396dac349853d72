//! High-level runtime orchestrator.
//!
//! The runtime owns the session workers, the repositories, and the event bus,
//! and exposes a builder-based API for wiring in content and collaborators.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::info;

use game_core::{GameConfig, SessionId};

use crate::api::{CombatHandle, QuestRewardProvider, Result, RewardProvider, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::repository::{
    CombatLogRepository, FileCombatLog, FileSessionRepository, InMemoryCombatLog,
    InMemorySessionRepo, SessionRepository,
};
use crate::workers::{WorkerContext, WorkerPool};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Commands one session may have queued before callers get `SessionBusy`.
    pub session_queue_depth: usize,
    pub event_buffer_size: usize,
    pub provider_timeout: Duration,
    /// Sessions and combat logs are kept in memory when unset.
    pub save_dir: Option<PathBuf>,
    /// Fixed seed for every new session; derived per session when unset.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            session_queue_depth: 8,
            event_buffer_size: 100,
            provider_timeout: Duration::from_secs(5),
            save_dir: None,
            rng_seed: None,
        }
    }
}

impl RuntimeConfig {
    pub const QUEUE_DEPTH_VAR: &'static str = "COMBAT_QUEUE_DEPTH";
    pub const EVENT_BUFFER_VAR: &'static str = "COMBAT_EVENT_BUFFER";
    pub const PROVIDER_TIMEOUT_VAR: &'static str = "COMBAT_PROVIDER_TIMEOUT_MS";
    pub const SAVE_DIR_VAR: &'static str = "COMBAT_SAVE_DIR";
    pub const RNG_SEED_VAR: &'static str = "COMBAT_RNG_SEED";

    /// Reads overrides from `COMBAT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(depth) = parse_var(&lookup, Self::QUEUE_DEPTH_VAR)? {
            config.session_queue_depth = depth;
        }
        if let Some(size) = parse_var(&lookup, Self::EVENT_BUFFER_VAR)? {
            config.event_buffer_size = size;
        }
        if let Some(millis) = parse_var::<u64>(&lookup, Self::PROVIDER_TIMEOUT_VAR)? {
            config.provider_timeout = Duration::from_millis(millis);
        }
        if let Some(dir) = lookup(Self::SAVE_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
            config.save_dir = Some(PathBuf::from(dir));
        }
        config.rng_seed = parse_var(&lookup, Self::RNG_SEED_VAR)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_queue_depth == 0 {
            return Err(RuntimeError::InvalidConfig(
                "session queue depth must be at least 1".into(),
            ));
        }
        if self.event_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig(
                "event buffer size must be at least 1".into(),
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(RuntimeError::InvalidConfig(
                "provider timeout must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RuntimeError::InvalidConfig(format!("{key}={raw:?} is not valid"))),
    }
}

/// Main runtime that resolves combat sessions.
///
/// [`CombatHandle`] provides a cloneable façade for clients.
pub struct CombatRuntime {
    handle: CombatHandle,
}

impl CombatRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> CombatHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Waits for every session worker to drain its queue.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.pool().shutdown().await
    }
}

/// Builder for [`CombatRuntime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    sessions: Option<Arc<dyn SessionRepository>>,
    log: Option<Arc<dyn CombatLogRepository>>,
    rewards: Option<Arc<dyn RewardProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            sessions: None,
            log: None,
            rewards: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    pub fn session_repository(mut self, sessions: Arc<dyn SessionRepository>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn combat_log(mut self, log: Arc<dyn CombatLogRepository>) -> Self {
        self.log = Some(log);
        self
    }

    /// Defaults to a [`QuestRewardProvider`] over the oracle catalog.
    pub fn reward_provider(mut self, rewards: Arc<dyn RewardProvider>) -> Self {
        self.rewards = Some(rewards);
        self
    }

    /// Build the runtime
    ///
    /// Repositories not set explicitly are file-backed under
    /// `save_dir/sessions` and `save_dir/logs` when a save directory is
    /// configured, in memory otherwise.
    pub async fn build(self) -> Result<CombatRuntime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let mut config = self.config;
        config.validate()?;
        config.game = config.game.normalized();

        let sessions: Arc<dyn SessionRepository> = match (self.sessions, &config.save_dir) {
            (Some(sessions), _) => sessions,
            (None, Some(dir)) => Arc::new(FileSessionRepository::new(dir.join("sessions"))?),
            (None, None) => Arc::new(InMemorySessionRepo::new()),
        };
        let log: Arc<dyn CombatLogRepository> = match (self.log, &config.save_dir) {
            (Some(log), _) => log,
            (None, Some(dir)) => Arc::new(FileCombatLog::new(dir.join("logs"))?),
            (None, None) => Arc::new(InMemoryCombatLog::new()),
        };
        let rewards = self
            .rewards
            .unwrap_or_else(|| Arc::new(QuestRewardProvider::new(Arc::clone(oracles.catalog()))));

        let stored = sessions.list_ids()?;
        let next_session = SessionId(stored.iter().map(|id| id.0).max().unwrap_or(0) + 1);
        info!(
            target: "runtime",
            stored = stored.len(),
            next = %next_session,
            persistent = config.save_dir.is_some(),
            "combat runtime ready"
        );

        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let ctx = WorkerContext {
            config,
            oracles,
            sessions,
            log,
            rewards,
            event_bus,
        };
        let pool = WorkerPool::new(Arc::new(ctx));

        Ok(CombatRuntime {
            handle: CombatHandle::new(pool, next_session),
        })
    }
}

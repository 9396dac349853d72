//! Worker tasks that back the runtime orchestration.
//!
//! Every session gets its own [`SessionWorker`] fed by a bounded queue, so
//! actions on one session run strictly one at a time while sessions proceed
//! in parallel. The [`WorkerPool`] spawns workers on first use.

mod pool;
mod session;

use std::sync::Arc;

use crate::api::RewardProvider;
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::repository::{CombatLogRepository, SessionRepository};
use crate::runtime::RuntimeConfig;

pub(crate) use pool::WorkerPool;
pub(crate) use session::{Resolution, timestamp_ms};

/// Collaborators shared by every session worker.
pub(crate) struct WorkerContext {
    pub config: RuntimeConfig,
    pub oracles: OracleManager,
    pub sessions: Arc<dyn SessionRepository>,
    pub log: Arc<dyn CombatLogRepository>,
    pub rewards: Arc<dyn RewardProvider>,
    pub event_bus: EventBus,
}

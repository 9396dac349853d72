//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine, session workers, repositories, and the
//! reward provider so clients can bubble them up with a stable [`ErrorKind`].
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ErrorKind, ExecuteError, GameError, SessionId};

pub use super::providers::ProviderError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session {0} does not exist")]
    SessionNotFound(SessionId),

    #[error("session {0} already has the maximum number of queued actions")]
    SessionBusy(SessionId),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("reward provider did not answer within {0:?}")]
    ProviderTimeout(Duration),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("session worker answered {0} with a mismatched outcome")]
    UnexpectedOutcome(&'static str),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(String),
}

impl GameError for RuntimeError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::SessionNotFound(_) => ErrorKind::NotFound,
            Self::SessionBusy(_) => ErrorKind::Conflict,
            Self::Execute(error) => error.kind(),
            _ => ErrorKind::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "RUNTIME_SESSION_NOT_FOUND",
            Self::SessionBusy(_) => "RUNTIME_SESSION_BUSY",
            Self::Execute(error) => error.error_code(),
            Self::Repository(_) => "RUNTIME_REPOSITORY",
            Self::Provider(_) => "RUNTIME_PROVIDER",
            Self::ProviderTimeout(_) => "RUNTIME_PROVIDER_TIMEOUT",
            Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_)
            | Self::UnexpectedOutcome(_) => "RUNTIME_WORKER",
            Self::MissingOracles | Self::InvalidConfig(_) => "RUNTIME_CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CombatError, TransitionPhase, TransitionPhaseError};

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            RuntimeError::SessionNotFound(SessionId(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RuntimeError::SessionBusy(SessionId(1)).kind(),
            ErrorKind::Conflict
        );
        let rejected = RuntimeError::from(ExecuteError::Complete(TransitionPhaseError::new(
            TransitionPhase::PreValidate,
            CombatError::RewardsAlreadyClaimed,
        )));
        assert_eq!(rejected.kind(), ErrorKind::Conflict);

        let timeout = RuntimeError::ProviderTimeout(Duration::from_millis(5));
        assert_eq!(timeout.kind(), ErrorKind::Internal);
        assert!(timeout.kind().is_retryable());
    }
}

//! Oracle access errors.

use crate::error::{ErrorKind, GameError};

/// Raised when the environment lacks an oracle an operation needs.
///
/// A missing oracle is a wiring fault of the embedding runtime, never a caller
/// error, so every variant maps to [`ErrorKind::Internal`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("HeroOracle not available")]
    HeroesNotAvailable,

    #[error("QuestOracle not available")]
    QuestsNotAvailable,

    #[error("ComboOracle not available")]
    CombosNotAvailable,

    #[error("AbilityOracle not available")]
    AbilitiesNotAvailable,

    #[error("EnvironmentOracle not available")]
    EnvironmentNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,
}

impl GameError for OracleError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            HeroesNotAvailable => "ORACLE_HEROES_NOT_AVAILABLE",
            QuestsNotAvailable => "ORACLE_QUESTS_NOT_AVAILABLE",
            CombosNotAvailable => "ORACLE_COMBOS_NOT_AVAILABLE",
            AbilitiesNotAvailable => "ORACLE_ABILITIES_NOT_AVAILABLE",
            EnvironmentNotAvailable => "ORACLE_ENVIRONMENT_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
        }
    }
}

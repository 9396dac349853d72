//! Error types for the action execution pipeline.

use crate::env::{HeroClass, OracleError};
use crate::error::{ErrorKind, GameError};
use crate::state::{EnemyId, HeroId, QuestId, SessionStatus};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Rule violations raised by combat commands.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("hero {0} does not exist")]
    HeroNotFound(HeroId),

    #[error("enemy {0} does not exist")]
    EnemyNotFound(EnemyId),

    #[error("quest {0} does not exist")]
    QuestNotFound(QuestId),

    #[error("hero {0} is not part of this session")]
    HeroNotInParty(HeroId),

    #[error("party roster is empty")]
    EmptyRoster,

    #[error("hero {0} appears more than once in the roster")]
    DuplicateHero(HeroId),

    #[error("party of {size} exceeds the limit of {limit}")]
    RosterTooLarge { size: usize, limit: usize },

    #[error("quest {0} has no linked enemies")]
    QuestHasNoEnemies(QuestId),

    #[error("class {0} has no special ability")]
    UnknownClass(HeroClass),

    #[error("status duration must be at least one turn")]
    InvalidDuration,

    #[error("status intensity {0} is outside 1..=3")]
    InvalidIntensity(u8),

    #[error("session is {0}, expected preparing")]
    AlreadyStarted(SessionStatus),

    #[error("session is {0}, expected in_progress")]
    SessionNotInProgress(SessionStatus),

    #[error("it is not the heroes' turn")]
    NotHeroTurn,

    #[error("it is not the enemy's turn")]
    NotEnemyTurn,

    #[error("hero {hero} ability is on cooldown for {remaining} more turns")]
    AbilityOnCooldown { hero: HeroId, remaining: u32 },

    #[error("hero {0} has fallen")]
    HeroDefeated(HeroId),

    #[error("session already ended as {0}")]
    AlreadyTerminal(SessionStatus),

    #[error("rewards are only granted after victory (session is {0})")]
    NotVictorious(SessionStatus),

    #[error("rewards for this session were already claimed")]
    RewardsAlreadyClaimed,

    #[error("session invariant violated: {0}")]
    InvariantViolated(&'static str),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CombatError {
    fn kind(&self) -> ErrorKind {
        use CombatError::*;
        match self {
            HeroNotFound(_) | EnemyNotFound(_) | QuestNotFound(_) | HeroNotInParty(_) => {
                ErrorKind::NotFound
            }
            EmptyRoster
            | DuplicateHero(_)
            | RosterTooLarge { .. }
            | QuestHasNoEnemies(_)
            | UnknownClass(_)
            | InvalidDuration
            | InvalidIntensity(_) => ErrorKind::InvalidRequest,
            AlreadyStarted(_)
            | SessionNotInProgress(_)
            | NotHeroTurn
            | NotEnemyTurn
            | AbilityOnCooldown { .. }
            | HeroDefeated(_)
            | AlreadyTerminal(_)
            | NotVictorious(_) => ErrorKind::InvalidState,
            RewardsAlreadyClaimed => ErrorKind::Conflict,
            InvariantViolated(_) => ErrorKind::Internal,
            Oracle(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            HeroNotFound(_) => "COMBAT_HERO_NOT_FOUND",
            EnemyNotFound(_) => "COMBAT_ENEMY_NOT_FOUND",
            QuestNotFound(_) => "COMBAT_QUEST_NOT_FOUND",
            HeroNotInParty(_) => "COMBAT_HERO_NOT_IN_PARTY",
            EmptyRoster => "COMBAT_EMPTY_ROSTER",
            DuplicateHero(_) => "COMBAT_DUPLICATE_HERO",
            RosterTooLarge { .. } => "COMBAT_ROSTER_TOO_LARGE",
            QuestHasNoEnemies(_) => "COMBAT_QUEST_HAS_NO_ENEMIES",
            UnknownClass(_) => "COMBAT_UNKNOWN_CLASS",
            InvalidDuration => "COMBAT_INVALID_DURATION",
            InvalidIntensity(_) => "COMBAT_INVALID_INTENSITY",
            AlreadyStarted(_) => "COMBAT_ALREADY_STARTED",
            SessionNotInProgress(_) => "COMBAT_NOT_IN_PROGRESS",
            NotHeroTurn => "COMBAT_NOT_HERO_TURN",
            NotEnemyTurn => "COMBAT_NOT_ENEMY_TURN",
            AbilityOnCooldown { .. } => "COMBAT_ABILITY_ON_COOLDOWN",
            HeroDefeated(_) => "COMBAT_HERO_DEFEATED",
            AlreadyTerminal(_) => "COMBAT_ALREADY_TERMINAL",
            NotVictorious(_) => "COMBAT_NOT_VICTORIOUS",
            RewardsAlreadyClaimed => "COMBAT_REWARDS_ALREADY_CLAIMED",
            InvariantViolated(_) => "COMBAT_INVARIANT_VIOLATED",
            Oracle(error) => error.error_code(),
        }
    }
}

/// Errors surfaced while executing a command through the combat engine.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("start combat failed: {0}")]
    Start(TransitionPhaseError<CombatError>),

    #[error("roll dice failed: {0}")]
    RollDice(TransitionPhaseError<CombatError>),

    #[error("enemy attack failed: {0}")]
    EnemyAttack(TransitionPhaseError<CombatError>),

    #[error("special ability failed: {0}")]
    SpecialAbility(TransitionPhaseError<CombatError>),

    #[error("apply status effect failed: {0}")]
    StatusEffect(TransitionPhaseError<CombatError>),

    #[error("complete combat failed: {0}")]
    Complete(TransitionPhaseError<CombatError>),

    #[error("cancel combat failed: {0}")]
    Cancel(TransitionPhaseError<CombatError>),
}

impl ExecuteError {
    fn inner(&self) -> &TransitionPhaseError<CombatError> {
        match self {
            Self::Start(inner)
            | Self::RollDice(inner)
            | Self::EnemyAttack(inner)
            | Self::SpecialAbility(inner)
            | Self::StatusEffect(inner)
            | Self::Complete(inner)
            | Self::Cancel(inner) => inner,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.inner().phase
    }

    pub fn combat_error(&self) -> &CombatError {
        &self.inner().error
    }
}

impl GameError for ExecuteError {
    fn kind(&self) -> ErrorKind {
        self.combat_error().kind()
    }

    fn error_code(&self) -> &'static str {
        self.combat_error().error_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(CombatError::HeroNotFound(HeroId(1)).kind(), ErrorKind::NotFound);
        assert_eq!(CombatError::EmptyRoster.kind(), ErrorKind::InvalidRequest);
        assert_eq!(CombatError::NotHeroTurn.kind(), ErrorKind::InvalidState);
        assert_eq!(CombatError::RewardsAlreadyClaimed.kind(), ErrorKind::Conflict);
        assert_eq!(
            CombatError::Oracle(OracleError::RngNotAvailable).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn execute_error_exposes_phase_and_code() {
        let error = ExecuteError::RollDice(TransitionPhaseError::new(
            TransitionPhase::PreValidate,
            CombatError::SessionNotInProgress(SessionStatus::Defeat),
        ));
        assert_eq!(error.phase(), TransitionPhase::PreValidate);
        assert_eq!(error.kind(), ErrorKind::InvalidState);
        assert_eq!(error.severity(), ErrorSeverity::Recoverable);
        assert_eq!(error.error_code(), "COMBAT_NOT_IN_PROGRESS");
        assert!(error.to_string().contains("pre_validate"));
    }
}

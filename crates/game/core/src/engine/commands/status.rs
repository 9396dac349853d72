use crate::combat::EffectType;
use crate::config::GameConfig;
use crate::env::CombatEnv;
use crate::state::{CombatSession, Combatant};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::resolve::{apply_status, ensure_in_progress};
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// Places (or stacks) a status effect on a hero or the current enemy.
///
/// Does not consume a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyStatusEffect {
    pub target: Combatant,
    pub effect: EffectType,
    pub duration: u32,
    pub intensity: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusOutcome {
    /// False when the target is immune; nothing changed in that case.
    pub success: bool,
    pub target: Combatant,
    pub effect: EffectType,
    /// Remaining turns after stacking.
    pub duration: u32,
    /// Intensity after stacking.
    pub intensity: u8,
    pub message: String,
}

impl ActionTransition for ApplyStatusEffect {
    type Output = StatusOutcome;

    fn pre_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        ensure_in_progress(session)?;
        if self.duration == 0 {
            return Err(CombatError::InvalidDuration);
        }
        if !(GameConfig::MIN_INTENSITY..=GameConfig::MAX_INTENSITY).contains(&self.intensity) {
            return Err(CombatError::InvalidIntensity(self.intensity));
        }
        match self.target {
            Combatant::Hero(id) => {
                let hero = session.hero(id).ok_or(CombatError::HeroNotInParty(id))?;
                if !hero.is_alive() {
                    return Err(CombatError::HeroDefeated(id));
                }
            }
            Combatant::Enemy(id) => {
                if id != session.enemy.id || session.enemy.health.is_depleted() {
                    return Err(CombatError::EnemyNotFound(id));
                }
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        _env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let applied = apply_status(
            session,
            ctx,
            self.target,
            self.effect,
            self.duration,
            self.intensity,
        )?;

        let Some(applied) = applied else {
            return Ok(StatusOutcome {
                success: false,
                target: self.target,
                effect: self.effect,
                duration: 0,
                intensity: 0,
                message: format!("{} is immune to {}", self.target, self.effect),
            });
        };

        let mut record = ctx.record(session, RecordedAction::StatusEffect);
        record.target = Some(self.target);
        record.effect = Some(applied.effect);
        ctx.push_record(session, record);

        Ok(StatusOutcome {
            success: true,
            target: self.target,
            effect: applied.effect,
            duration: applied.remaining_turns,
            intensity: applied.intensity,
            message: format!(
                "{} afflicted with {} (intensity {}, {} turns)",
                self.target, applied.effect, applied.intensity, applied.remaining_turns
            ),
        })
    }
}

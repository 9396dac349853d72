//! Per-action audit records and resolution events.

use sha2::{Digest, Sha256};

use crate::combat::{DiceType, EffectType, MoraleLevel, PhaseTransition, StatusTickKind};
use crate::state::{Combatant, EnemyId, HeroId, SessionStatus};

/// What produced a [`TurnRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RecordedAction {
    Start,
    RollDice,
    EnemyAttack,
    SpecialAbility,
    StatusEffect,
    StatusTick,
    Hazard,
    Complete,
    Cancel,
}

/// One combat log line: action, dice, roll, threshold, result, and the
/// target's health afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    pub nonce: u64,
    pub turn_number: u32,
    pub action: RecordedAction,
    pub actor: Option<Combatant>,
    pub target: Option<Combatant>,
    pub dice: Option<DiceType>,
    pub roll: Option<u32>,
    pub required_roll: Option<u32>,
    pub success: bool,
    pub critical: bool,
    pub damage: u32,
    pub healing: u32,
    pub resulting_health: Option<u32>,
    pub effect: Option<EffectType>,
}

impl TurnRecord {
    pub fn new(nonce: u64, turn_number: u32, action: RecordedAction) -> Self {
        Self {
            nonce,
            turn_number,
            action,
            actor: None,
            target: None,
            dice: None,
            roll: None,
            required_roll: None,
            success: true,
            critical: false,
            damage: 0,
            healing: 0,
            resulting_health: None,
            effect: None,
        }
    }

    /// Chains this record onto `previous`: `sha256(previous ‖ fields)`.
    pub fn chain_digest(&self, previous: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(previous);
        hasher.update(self.nonce.to_le_bytes());
        hasher.update(self.turn_number.to_le_bytes());
        hasher.update(self.action.as_ref().as_bytes());
        for combatant in [self.actor, self.target] {
            match combatant {
                Some(combatant) => hasher.update(combatant.seed_key().to_le_bytes()),
                None => hasher.update([0xff; 4]),
            }
        }
        hasher.update(self.dice.map_or(0, DiceType::faces).to_le_bytes());
        hasher.update(self.roll.unwrap_or(0).to_le_bytes());
        hasher.update(self.required_roll.unwrap_or(0).to_le_bytes());
        hasher.update([u8::from(self.success), u8::from(self.critical)]);
        hasher.update(self.damage.to_le_bytes());
        hasher.update(self.healing.to_le_bytes());
        hasher.update(self.resulting_health.unwrap_or(u32::MAX).to_le_bytes());
        hasher.update(self.effect.as_ref().map_or("", AsRef::<str>::as_ref).as_bytes());
        hasher.finalize().into()
    }
}

/// Notable state changes produced while resolving one command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    PhaseTransition(PhaseTransition),
    EnemyDefeated {
        enemy: EnemyId,
        next: Option<EnemyId>,
    },
    HeroFallen {
        hero: HeroId,
    },
    StatusApplied {
        target: Combatant,
        effect: EffectType,
        intensity: u8,
        remaining_turns: u32,
    },
    StatusTicked {
        target: Combatant,
        effect: EffectType,
        kind: StatusTickKind,
        expired: bool,
    },
    MoraleShift {
        combatant: Combatant,
        from: MoraleLevel,
        to: MoraleLevel,
    },
    Concluded {
        status: SessionStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_previous_and_fields() {
        let record = TurnRecord::new(1, 1, RecordedAction::RollDice);
        let first = record.chain_digest(&[0; 32]);
        assert_eq!(first, record.chain_digest(&[0; 32]));
        assert_ne!(first, record.chain_digest(&first));

        let mut changed = record.clone();
        changed.damage = 7;
        assert_ne!(first, changed.chain_digest(&[0; 32]));
        assert_eq!(hex::encode(first).len(), 64);
    }

    #[test]
    fn digest_covers_the_applied_effect() {
        let mut poisoned = TurnRecord::new(1, 1, RecordedAction::RollDice);
        poisoned.effect = Some(EffectType::Poison);
        let mut stunned = poisoned.clone();
        stunned.effect = Some(EffectType::Stun);
        let plain = TurnRecord::new(1, 1, RecordedAction::RollDice);

        let poisoned = poisoned.chain_digest(&[0; 32]);
        assert_ne!(poisoned, stunned.chain_digest(&[0; 32]));
        assert_ne!(poisoned, plain.chain_digest(&[0; 32]));
    }
}

use crate::combat::{ActionLabel, DiceType, roll_dice};
use crate::env::{CombatEnv, compute_seed, context};
use crate::state::{CombatSession, HeroId, SessionStatus, TurnSide};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::resolve::{
    enemy_overrides, ensure_hero_turn, hero_critical_chance, resolve_enemy_down, roll_critical,
    strike_enemy,
};
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// The active hero rolls to hit the current enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollDice {
    pub dice: DiceType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOutcome {
    pub hero: HeroId,
    pub dice: DiceType,
    pub roll: u32,
    pub required_roll: u32,
    pub success: bool,
    pub critical: bool,
    pub damage_dealt: u32,
    pub enemy_health_after: u32,
    pub enemy_defeated: bool,
    pub message: String,
}

/// Threshold before clamping: base (or phase) minimum, minus weakness
/// reduction, plus accuracy and blindness adjustments.
fn required_roll(session: &CombatSession, hero_index: usize, dice: DiceType) -> i32 {
    let Some(definition) = session.current_enemy() else {
        return dice.faces() as i32;
    };
    let base = enemy_overrides(session)
        .minimum_roll
        .unwrap_or(definition.minimum_roll) as i32;
    let reduction = session
        .weakness_against(definition.id)
        .map_or(0, |weakness| weakness.roll_reduction as i32);
    let accuracy = session
        .environment
        .modifiers()
        .required_roll_adjustment(dice);
    let blindness = session.heroes[hero_index]
        .statuses
        .modifiers()
        .accuracy_penalty;

    base - reduction + accuracy + blindness
}

impl ActionTransition for RollDice {
    type Output = RollOutcome;

    fn pre_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        ensure_hero_turn(session)
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let rng = env.rng()?;
        let index = session
            .active_hero_index()
            .ok_or(CombatError::InvariantViolated("no living hero to roll"))?;
        let hero = session.heroes[index].combatant();
        let hero_id = session.heroes[index].id;
        let hero_name = session.heroes[index].name.clone();
        let target = session.enemy.combatant();

        let seed = compute_seed(session.seed, session.nonce, hero.seed_key(), context::CHECK);
        let outcome = roll_dice(rng, seed, self.dice, required_roll(session, index, self.dice));

        let mut critical = false;
        let mut damage_dealt = 0;
        if outcome.success {
            critical = roll_critical(session, rng, hero, hero_critical_chance(session, index));
            let attack = session.heroes[index].stats.attack;
            damage_dealt = strike_enemy(session, ctx, index, attack, critical)?.final_damage;
            session
                .combo
                .record_success(ActionLabel::RollDice, ctx.config.combo_cap);
        } else {
            session.combo.record_failure(ActionLabel::RollDice);
        }
        session.advance_cursor(index);

        let enemy_health_after = session.enemy.health.current();
        let mut record = ctx.record(session, RecordedAction::RollDice);
        record.actor = Some(hero);
        record.target = Some(target);
        record.dice = Some(self.dice);
        record.roll = Some(outcome.roll);
        record.required_roll = Some(outcome.required_roll);
        record.success = outcome.success;
        record.critical = critical;
        record.damage = damage_dealt;
        record.resulting_health = Some(enemy_health_after);
        ctx.push_record(session, record);

        let enemy_defeated = resolve_enemy_down(session, ctx);
        if session.status == SessionStatus::InProgress {
            session.turn = TurnSide::Enemy;
        }

        let message = match (outcome.success, critical, enemy_defeated) {
            (false, _, _) => format!(
                "{hero_name} rolled {} on {} (needed {}) and missed",
                outcome.roll, self.dice, outcome.required_roll
            ),
            (true, _, true) => format!(
                "{hero_name} rolled {} on {} and felled the enemy with {damage_dealt} damage",
                outcome.roll, self.dice
            ),
            (true, true, false) => format!(
                "{hero_name} rolled {} on {} and landed a critical hit for {damage_dealt} damage",
                outcome.roll, self.dice
            ),
            (true, false, false) => format!(
                "{hero_name} rolled {} on {} (needed {}) and hit for {damage_dealt} damage",
                outcome.roll, self.dice, outcome.required_roll
            ),
        };

        Ok(RollOutcome {
            hero: hero_id,
            dice: self.dice,
            roll: outcome.roll,
            required_roll: outcome.required_roll,
            success: outcome.success,
            critical,
            damage_dealt,
            enemy_health_after,
            enemy_defeated,
            message,
        })
    }
}

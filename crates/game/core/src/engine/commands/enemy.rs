use crate::combat::{
    DamageInput, DamageModifiers, EffectType, MoraleEvent, calculate_damage, critical_chance,
    effective_defense,
};
use crate::env::{CombatEnv, compute_seed, context};
use crate::state::{CombatSession, HeroId, SessionStatus, TurnSide};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::resolve::{
    apply_status, conclude, end_of_turn, enemy_overrides, ensure_in_progress, hero_fell,
    roll_critical, shift_morale,
};
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// The current enemy attacks the weakest living hero, closing the turn pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAttack;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAttackOutcome {
    /// `None` when the enemy was stunned and lost its attack.
    pub target: Option<HeroId>,
    pub enemy_roll: u32,
    pub enemy_power: u32,
    /// Damage before the hero's defense.
    pub total_damage: u32,
    pub hero_defense: u32,
    pub final_damage: u32,
    pub critical: bool,
    pub stunned: bool,
    pub special_applied: Option<EffectType>,
    pub all_heroes_dead: bool,
    pub message: String,
}

/// Lowest current health among living heroes, ties broken by roster order.
fn select_target(session: &CombatSession) -> Option<usize> {
    session
        .heroes
        .iter()
        .enumerate()
        .filter(|(_, hero)| hero.is_alive())
        .min_by_key(|(index, hero)| (hero.health.current(), *index))
        .map(|(index, _)| index)
}

impl ActionTransition for EnemyAttack {
    type Output = EnemyAttackOutcome;

    fn pre_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        ensure_in_progress(session)?;
        if session.turn != TurnSide::Enemy {
            return Err(CombatError::NotEnemyTurn);
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let rng = env.rng()?;
        let definition = session
            .current_enemy()
            .cloned()
            .ok_or(CombatError::InvariantViolated("no current enemy"))?;
        let enemy = session.enemy.combatant();
        let enemy_power = enemy_overrides(session).power.unwrap_or(definition.power);
        let enemy_status = session.enemy.statuses.modifiers();

        let mut outcome = EnemyAttackOutcome {
            target: None,
            enemy_roll: 0,
            enemy_power,
            total_damage: 0,
            hero_defense: 0,
            final_damage: 0,
            critical: false,
            stunned: enemy_status.stunned,
            special_applied: None,
            all_heroes_dead: false,
            message: String::new(),
        };

        if enemy_status.stunned {
            let mut record = ctx.record(session, RecordedAction::EnemyAttack);
            record.actor = Some(enemy);
            record.success = false;
            record.effect = Some(EffectType::Stun);
            ctx.push_record(session, record);
            outcome.message = format!("{} is stunned and cannot attack", definition.name);
        } else {
            let index = select_target(session)
                .ok_or(CombatError::InvariantViolated("no living hero to target"))?;
            let hero = session.heroes[index].combatant();
            let hero_id = session.heroes[index].id;

            let seed = compute_seed(session.seed, session.nonce, enemy.seed_key(), context::CHECK);
            let enemy_roll = rng.roll_die(seed, definition.attack_die.faces());
            let enemy_morale = session.enemy.morale.modifiers();
            let critical = roll_critical(
                session,
                rng,
                enemy,
                critical_chance(enemy_morale.crit_pct, enemy_status.crit_pct),
            );

            let target = &session.heroes[index];
            let hero_defense = effective_defense(
                target.stats.defense,
                target.morale.modifiers().defense_pct
                    + target.statuses.modifiers().defense_pct
                    + session.environment.modifiers().defense,
            );
            let breakdown = calculate_damage(
                &DamageInput {
                    base_attack: enemy_power + enemy_roll,
                    combo_multiplier: 1,
                    modifiers: DamageModifiers {
                        morale_pct: enemy_morale.damage_pct,
                        status_pct: enemy_status.damage_pct,
                        ..DamageModifiers::default()
                    },
                    target_defense: hero_defense,
                    critical,
                },
                ctx.config.critical_multiplier,
            );

            let dealt = session.heroes[index].health.damage(breakdown.final_damage);
            if dealt > 0 {
                shift_morale(
                    ctx,
                    &mut session.heroes[index].morale,
                    hero,
                    MoraleEvent::DamageTaken,
                );
                shift_morale(
                    ctx,
                    &mut session.enemy.morale,
                    enemy,
                    MoraleEvent::SuccessfulAttack,
                );
            }
            if critical {
                shift_morale(ctx, &mut session.enemy.morale, enemy, MoraleEvent::CriticalHit);
            }

            let mut record = ctx.record(session, RecordedAction::EnemyAttack);
            record.actor = Some(enemy);
            record.target = Some(hero);
            record.dice = Some(definition.attack_die);
            record.roll = Some(enemy_roll);
            record.success = breakdown.final_damage > 0;
            record.critical = critical;
            record.damage = breakdown.final_damage;
            record.resulting_health = Some(session.heroes[index].health.current());
            ctx.push_record(session, record);

            let fell = !session.heroes[index].is_alive();
            if fell {
                hero_fell(session, ctx, index);
            } else if let Some(special) = definition.special.filter(|_| dealt > 0) {
                let seed =
                    compute_seed(session.seed, session.nonce, enemy.seed_key(), context::SPECIAL);
                if rng.roll_d100(seed) <= special.chance_pct {
                    let applied = apply_status(
                        session,
                        ctx,
                        hero,
                        special.effect,
                        special.duration,
                        special.intensity,
                    )?;
                    if let Some(applied) = applied {
                        let mut record = ctx.record(session, RecordedAction::StatusEffect);
                        record.actor = Some(enemy);
                        record.target = Some(hero);
                        record.effect = Some(applied.effect);
                        ctx.push_record(session, record);
                        outcome.special_applied = Some(applied.effect);
                    }
                }
            }

            let hero_name = &session.heroes[index].name;
            outcome.message = match (fell, critical) {
                (true, _) => format!(
                    "{} struck {hero_name} down with {} damage",
                    definition.name, breakdown.final_damage
                ),
                (false, true) => format!(
                    "{} landed a critical blow on {hero_name} for {} damage",
                    definition.name, breakdown.final_damage
                ),
                (false, false) => format!(
                    "{} hit {hero_name} for {} damage",
                    definition.name, breakdown.final_damage
                ),
            };
            outcome.target = Some(hero_id);
            outcome.enemy_roll = enemy_roll;
            outcome.total_damage = breakdown.pre_defense;
            outcome.hero_defense = hero_defense;
            outcome.final_damage = breakdown.final_damage;
            outcome.critical = critical;
        }

        session.turn = TurnSide::Hero;
        if session.all_heroes_down() {
            conclude(session, ctx, SessionStatus::Defeat);
        } else {
            end_of_turn(session, ctx);
            if session.status == SessionStatus::InProgress {
                session.turn_number += 1;
            }
        }
        outcome.all_heroes_dead = session.all_heroes_down();
        Ok(outcome)
    }
}

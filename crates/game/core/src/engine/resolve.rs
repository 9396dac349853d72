//! Resolution steps shared by several commands.

use crate::combat::{
    DamageBreakdown, DamageInput, DamageModifiers, EffectType, MoraleEvent, MoraleState,
    PhaseOverrides, StatusEffectState, StatusEffects, StatusTickKind, calculate_damage,
    critical_chance, effective_defense, is_critical,
};
use crate::env::{RngOracle, compute_seed, context};
use crate::state::{CombatSession, Combatant, EnemyCombatant, HealthPool, SessionStatus, TurnSide};

use super::errors::CombatError;
use super::record::{CombatEvent, RecordedAction, TurnRecord};
use super::transition::ResolutionContext;

pub(super) fn ensure_in_progress(session: &CombatSession) -> Result<(), CombatError> {
    if session.status != SessionStatus::InProgress {
        return Err(CombatError::SessionNotInProgress(session.status));
    }
    Ok(())
}

pub(super) fn ensure_hero_turn(session: &CombatSession) -> Result<(), CombatError> {
    ensure_in_progress(session)?;
    if session.turn != TurnSide::Hero {
        return Err(CombatError::NotHeroTurn);
    }
    Ok(())
}

/// Applies a morale event and reports a tier change, if any.
pub(super) fn shift_morale(
    ctx: &mut ResolutionContext<'_>,
    morale: &mut MoraleState,
    combatant: Combatant,
    event: MoraleEvent,
) {
    let from = morale.level();
    let to = morale.apply(event);
    if from != to {
        ctx.emit(CombatEvent::MoraleShift {
            combatant,
            from,
            to,
        });
    }
}

/// Draws the critical-hit d100 for `actor` and checks it against its chance.
pub(super) fn roll_critical(
    session: &CombatSession,
    rng: &(dyn RngOracle + '_),
    actor: Combatant,
    chance: u32,
) -> bool {
    let seed = compute_seed(session.seed, session.nonce, actor.seed_key(), context::CRITICAL);
    is_critical(chance, rng.roll_d100(seed))
}

/// Critical chance of the hero at `index`.
pub(super) fn hero_critical_chance(session: &CombatSession, index: usize) -> u32 {
    let hero = &session.heroes[index];
    critical_chance(
        hero.morale.modifiers().crit_pct,
        hero.statuses.modifiers().crit_pct,
    )
}

/// Hero attack on the current enemy: damage, morale, combo-independent
/// bookkeeping, and boss phase checks. Enemy defeat is left to the caller.
pub(super) fn strike_enemy(
    session: &mut CombatSession,
    ctx: &mut ResolutionContext<'_>,
    hero_index: usize,
    base_attack: u32,
    critical: bool,
) -> Result<DamageBreakdown, CombatError> {
    let definition = session
        .current_enemy()
        .cloned()
        .ok_or(CombatError::InvariantViolated("no current enemy"))?;
    let environment = session.environment.modifiers();
    let weakness = session.weakness_against(definition.id).copied();

    let hero = &session.heroes[hero_index];
    let modifiers = DamageModifiers {
        morale_pct: hero.morale.modifiers().damage_pct,
        status_pct: hero.statuses.modifiers().damage_pct,
        environment_pct: environment.elemental_damage,
        weakness_pct: weakness.map_or(0, |weakness| weakness.damage_bonus_pct),
    };
    let enemy_defense = effective_defense(
        definition.defense,
        session.enemy.morale.modifiers().defense_pct
            + session.enemy.statuses.modifiers().defense_pct
            + environment.defense,
    );

    let breakdown = calculate_damage(
        &DamageInput {
            base_attack,
            combo_multiplier: session.combo.multiplier,
            modifiers,
            target_defense: enemy_defense,
            critical,
        },
        ctx.config.critical_multiplier,
    );

    let hero_combatant = session.heroes[hero_index].combatant();
    let enemy_combatant = session.enemy.combatant();
    session.enemy.health.damage(breakdown.final_damage);

    shift_morale(
        ctx,
        &mut session.heroes[hero_index].morale,
        hero_combatant,
        MoraleEvent::SuccessfulAttack,
    );
    if critical {
        shift_morale(
            ctx,
            &mut session.heroes[hero_index].morale,
            hero_combatant,
            MoraleEvent::CriticalHit,
        );
    }
    if breakdown.final_damage > 0 {
        shift_morale(
            ctx,
            &mut session.enemy.morale,
            enemy_combatant,
            MoraleEvent::DamageTaken,
        );
    }

    check_boss_phase(session, ctx);
    Ok(breakdown)
}

/// Advances the current boss through every phase its health has crossed.
pub(super) fn check_boss_phase(session: &mut CombatSession, ctx: &mut ResolutionContext<'_>) {
    let Some(profile) = session
        .current_enemy()
        .and_then(|definition| definition.boss.clone())
    else {
        return;
    };
    let enemy = &mut session.enemy;
    if let Some(boss) = enemy.boss.as_mut() {
        for transition in boss.advance(&profile, &enemy.health, enemy.id) {
            ctx.emit(CombatEvent::PhaseTransition(transition));
        }
    }
}

/// Handles a depleted enemy: spawns the next one in the lineup or concludes
/// with victory. Returns true when the enemy was down.
pub(super) fn resolve_enemy_down(
    session: &mut CombatSession,
    ctx: &mut ResolutionContext<'_>,
) -> bool {
    if !session.enemy.health.is_depleted() {
        return false;
    }

    let defeated = session.enemy.id;
    session.defeated_enemies.push(defeated);
    let next = session.enemies.get(session.enemy_index + 1).cloned();
    ctx.emit(CombatEvent::EnemyDefeated {
        enemy: defeated,
        next: next.as_ref().map(|definition| definition.id),
    });

    match next {
        Some(definition) => {
            session.enemy_index += 1;
            session.enemy = EnemyCombatant::spawn(&definition, ctx.config.morale_baseline);
        }
        None => {
            for hero in session.heroes.iter_mut().filter(|hero| hero.is_alive()) {
                let combatant = hero.combatant();
                shift_morale(ctx, &mut hero.morale, combatant, MoraleEvent::Victory);
            }
            conclude(session, ctx, SessionStatus::Victory);
        }
    }
    true
}

/// Moves the session into a terminal status.
pub(super) fn conclude(
    session: &mut CombatSession,
    ctx: &mut ResolutionContext<'_>,
    status: SessionStatus,
) {
    session.status = status;
    session.timestamps.completed_at = Some(ctx.now);
    ctx.emit(CombatEvent::Concluded { status });
}

/// Records a fallen hero and shakes the survivors.
pub(super) fn hero_fell(session: &mut CombatSession, ctx: &mut ResolutionContext<'_>, index: usize) {
    let fallen = session.heroes[index].id;
    ctx.emit(CombatEvent::HeroFallen { hero: fallen });
    for hero in session.heroes.iter_mut().filter(|hero| hero.is_alive()) {
        let combatant = hero.combatant();
        shift_morale(ctx, &mut hero.morale, combatant, MoraleEvent::Death);
    }
}

/// Applies or stacks a status effect on a living target.
///
/// Returns `Ok(None)` when a boss phase makes the current enemy immune; the
/// session is untouched in that case.
pub(super) fn apply_status(
    session: &mut CombatSession,
    ctx: &mut ResolutionContext<'_>,
    target: Combatant,
    effect: EffectType,
    duration: u32,
    intensity: u8,
) -> Result<Option<StatusEffectState>, CombatError> {
    let cap = ctx.config.status_intensity_cap;
    let applied = match target {
        Combatant::Hero(id) => {
            let hero = session
                .heroes
                .iter_mut()
                .find(|hero| hero.id == id)
                .ok_or(CombatError::HeroNotInParty(id))?;
            if !hero.is_alive() {
                return Err(CombatError::HeroDefeated(id));
            }
            let applied = hero
                .statuses
                .apply(target, effect, duration, intensity, cap)
                .ok_or(CombatError::InvariantViolated("status effect capacity exceeded"))?;
            if effect.profile().harmful {
                shift_morale(ctx, &mut hero.morale, target, MoraleEvent::StatusAfflicted);
            }
            applied
        }
        Combatant::Enemy(id) => {
            if id != session.enemy.id || session.enemy.health.is_depleted() {
                return Err(CombatError::EnemyNotFound(id));
            }
            if is_immune(session, effect) {
                return Ok(None);
            }
            let enemy = &mut session.enemy;
            let applied = enemy
                .statuses
                .apply(target, effect, duration, intensity, cap)
                .ok_or(CombatError::InvariantViolated("status effect capacity exceeded"))?;
            if effect.profile().harmful {
                shift_morale(ctx, &mut enemy.morale, target, MoraleEvent::StatusAfflicted);
            }
            applied
        }
    };

    ctx.emit(CombatEvent::StatusApplied {
        target,
        effect,
        intensity: applied.intensity,
        remaining_turns: applied.remaining_turns,
    });
    Ok(Some(applied))
}

/// Overrides of every boss phase the current enemy has entered.
pub(super) fn enemy_overrides(session: &CombatSession) -> PhaseOverrides {
    let profile = session
        .current_enemy()
        .and_then(|definition| definition.boss.as_ref());
    match (profile, session.enemy.boss.as_ref()) {
        (Some(profile), Some(boss)) => boss.overrides(profile),
        _ => PhaseOverrides::default(),
    }
}

/// True when the current boss phase grants immunity to `effect`.
pub(super) fn is_immune(session: &CombatSession, effect: EffectType) -> bool {
    enemy_overrides(session).immunities.contains(&effect)
}

fn tick_statuses(
    nonce: u64,
    turn_number: u32,
    target: Combatant,
    statuses: &mut StatusEffects,
    health: &mut HealthPool,
    ctx: &mut ResolutionContext<'_>,
) -> Vec<TurnRecord> {
    let mut records = Vec::new();
    for tick in statuses.tick(health) {
        let mut record = TurnRecord::new(nonce, turn_number, RecordedAction::StatusTick);
        record.target = Some(target);
        record.effect = Some(tick.effect);
        record.resulting_health = Some(health.current());
        match tick.kind {
            StatusTickKind::Damage(amount) => record.damage = amount,
            StatusTickKind::Heal(amount) => record.healing = amount,
            StatusTickKind::Countdown => {}
        }
        ctx.emit(CombatEvent::StatusTicked {
            target,
            effect: tick.effect,
            kind: tick.kind,
            expired: tick.expired,
        });
        records.push(record);
    }
    records
}

/// Turn-pair boundary, run after the enemy acts.
///
/// Order: status ticks (heroes in roster order, then the enemy), environmental
/// hazard, ability cooldowns, then defeat and enemy-defeat checks. Defeat wins
/// when both sides fall in the same boundary.
pub(super) fn end_of_turn(session: &mut CombatSession, ctx: &mut ResolutionContext<'_>) {
    let nonce = session.nonce;
    let turn_number = session.turn_number;

    for index in 0..session.heroes.len() {
        if !session.heroes[index].is_alive() {
            continue;
        }
        let hero = &mut session.heroes[index];
        let target = hero.combatant();
        let records = tick_statuses(
            nonce,
            turn_number,
            target,
            &mut hero.statuses,
            &mut hero.health,
            ctx,
        );
        for record in records {
            ctx.push_record(session, record);
        }
        if !session.heroes[index].is_alive() {
            hero_fell(session, ctx, index);
        }
    }

    if !session.enemy.health.is_depleted() {
        let target = session.enemy.combatant();
        let enemy = &mut session.enemy;
        let records = tick_statuses(
            nonce,
            turn_number,
            target,
            &mut enemy.statuses,
            &mut enemy.health,
            ctx,
        );
        for record in records {
            ctx.push_record(session, record);
        }
        check_boss_phase(session, ctx);
    }

    let hazard = session.environment.modifiers().hazard_damage;
    if hazard > 0 {
        for index in 0..session.heroes.len() {
            if !session.heroes[index].is_alive() {
                continue;
            }
            let hero = &mut session.heroes[index];
            let target = hero.combatant();
            let dealt = hero.health.damage(hazard);
            shift_morale(ctx, &mut hero.morale, target, MoraleEvent::EnvironmentalDamage);

            let mut record = ctx.record(session, RecordedAction::Hazard);
            record.target = Some(target);
            record.damage = dealt;
            record.resulting_health = Some(session.heroes[index].health.current());
            ctx.push_record(session, record);

            if !session.heroes[index].is_alive() {
                hero_fell(session, ctx, index);
            }
        }
    }

    for hero in session.heroes.iter_mut() {
        hero.cooldown = hero.cooldown.saturating_sub(1);
    }

    if session.all_heroes_down() {
        conclude(session, ctx, SessionStatus::Defeat);
    } else {
        resolve_enemy_down(session, ctx);
    }
}

use std::cmp::Reverse;

use crate::combat::{ActionLabel, EffectType, MoraleEvent, scaled_healing};
use crate::env::{AbilityEffect, CombatEnv, EffectRider};
use crate::state::{CombatSession, Combatant, HeroId, SessionStatus, TurnSide};

use crate::engine::errors::CombatError;
use crate::engine::record::RecordedAction;
use crate::engine::resolve::{
    apply_status, ensure_hero_turn, hero_critical_chance, resolve_enemy_down, roll_critical,
    shift_morale, strike_enemy,
};
use crate::engine::transition::{ActionTransition, ResolutionContext};

/// A hero spends their turn on their class ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseSpecialAbility {
    pub hero: HeroId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityOutcome {
    pub hero: HeroId,
    pub ability: String,
    pub success: bool,
    pub damage_dealt: u32,
    pub healing_done: u32,
    pub cooldown_remaining: u32,
    pub critical: bool,
    pub enemy_health_after: u32,
    pub rider_applied: Option<EffectType>,
    pub message: String,
}

/// Living hero missing the most health, ties broken by roster order.
fn most_wounded(session: &CombatSession) -> Option<usize> {
    session
        .heroes
        .iter()
        .enumerate()
        .filter(|(_, hero)| hero.is_alive())
        .max_by_key(|(index, hero)| (hero.health.missing(), Reverse(*index)))
        .map(|(index, _)| index)
}

/// Applies an ability rider and logs it. Returns the effect when it landed.
fn apply_rider(
    session: &mut CombatSession,
    ctx: &mut ResolutionContext<'_>,
    actor: Combatant,
    target: Combatant,
    rider: EffectRider,
) -> Result<Option<EffectType>, CombatError> {
    let Some(applied) = apply_status(
        session,
        ctx,
        target,
        rider.effect,
        rider.duration,
        rider.intensity,
    )?
    else {
        return Ok(None);
    };
    let mut record = ctx.record(session, RecordedAction::StatusEffect);
    record.actor = Some(actor);
    record.target = Some(target);
    record.effect = Some(applied.effect);
    ctx.push_record(session, record);
    Ok(Some(applied.effect))
}

impl ActionTransition for UseSpecialAbility {
    type Output = AbilityOutcome;

    fn pre_validate(
        &self,
        session: &CombatSession,
        _env: &CombatEnv<'_>,
        _ctx: &ResolutionContext<'_>,
    ) -> Result<(), CombatError> {
        ensure_hero_turn(session)?;
        let hero = session
            .hero(self.hero)
            .ok_or(CombatError::HeroNotInParty(self.hero))?;
        if !hero.is_alive() {
            return Err(CombatError::HeroDefeated(self.hero));
        }
        if hero.cooldown > 0 {
            return Err(CombatError::AbilityOnCooldown {
                hero: self.hero,
                remaining: hero.cooldown,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        session: &mut CombatSession,
        env: &CombatEnv<'_>,
        ctx: &mut ResolutionContext<'_>,
    ) -> Result<Self::Output, CombatError> {
        let index = session
            .hero_index(self.hero)
            .ok_or(CombatError::HeroNotInParty(self.hero))?;
        let actor = session.heroes[index].combatant();
        let ability = session.heroes[index].ability.clone();
        let hero_name = session.heroes[index].name.clone();
        let healing_pct = session.environment.modifiers().healing;

        let mut record = ctx.record(session, RecordedAction::SpecialAbility);
        record.actor = Some(actor);

        let mut critical = false;
        let mut damage_dealt = 0;
        let mut healing_done = 0;
        let mut rider_targets = Vec::new();

        match ability.effect {
            AbilityEffect::Strike { power_pct } => {
                let rng = env.rng()?;
                let target = session.enemy.combatant();
                let attack = session.heroes[index].stats.attack;
                let base = (u64::from(attack) * u64::from(power_pct) + 50) / 100;
                let base = u32::try_from(base).unwrap_or(u32::MAX);

                critical = roll_critical(session, rng, actor, hero_critical_chance(session, index));
                damage_dealt = strike_enemy(session, ctx, index, base, critical)?.final_damage;

                record.target = Some(target);
                record.critical = critical;
                record.damage = damage_dealt;
                record.resulting_health = Some(session.enemy.health.current());
                if !session.enemy.health.is_depleted() {
                    rider_targets.push(target);
                }
            }
            AbilityEffect::Heal { amount } => {
                if let Some(target_index) = most_wounded(session) {
                    let target = session.heroes[target_index].combatant();
                    healing_done = session.heroes[target_index]
                        .health
                        .heal(scaled_healing(amount, healing_pct));
                    record.target = Some(target);
                    record.resulting_health = Some(session.heroes[target_index].health.current());
                    rider_targets.push(target);
                }
            }
            AbilityEffect::PartyHeal { amount } => {
                let amount = scaled_healing(amount, healing_pct);
                for hero in session.heroes.iter_mut().filter(|hero| hero.is_alive()) {
                    healing_done += hero.health.heal(amount);
                    rider_targets.push(hero.combatant());
                }
            }
        }
        record.healing = healing_done;

        let hero = &mut session.heroes[index];
        hero.cooldown = ability.cooldown;
        let cooldown_remaining = hero.cooldown;
        shift_morale(ctx, &mut hero.morale, actor, MoraleEvent::SpecialAbilityUsed);
        session
            .combo
            .record_success(ActionLabel::SpecialAbility, ctx.config.combo_cap);
        session.advance_cursor(index);
        ctx.push_record(session, record);

        let mut rider_applied = None;
        if let Some(rider) = ability.rider {
            for target in rider_targets {
                rider_applied = apply_rider(session, ctx, actor, target, rider)?.or(rider_applied);
            }
        }

        let enemy_health_after = session.enemy.health.current();
        let enemy_defeated = resolve_enemy_down(session, ctx);
        if session.status == SessionStatus::InProgress {
            session.turn = TurnSide::Enemy;
        }

        let message = match ability.effect {
            AbilityEffect::Strike { .. } if enemy_defeated => format!(
                "{hero_name} used {} and felled the enemy with {damage_dealt} damage",
                ability.name
            ),
            AbilityEffect::Strike { .. } if critical => format!(
                "{hero_name} used {} and landed a critical hit for {damage_dealt} damage",
                ability.name
            ),
            AbilityEffect::Strike { .. } => format!(
                "{hero_name} used {} for {damage_dealt} damage",
                ability.name
            ),
            AbilityEffect::Heal { .. } | AbilityEffect::PartyHeal { .. } => format!(
                "{hero_name} used {} and restored {healing_done} health",
                ability.name
            ),
        };

        Ok(AbilityOutcome {
            hero: self.hero,
            ability: ability.name,
            success: true,
            damage_dealt,
            healing_done,
            cooldown_remaining,
            critical,
            enemy_health_after,
            rider_applied,
            message,
        })
    }
}

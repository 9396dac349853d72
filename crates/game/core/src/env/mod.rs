//! Traits describing read-only reference data.
//!
//! Oracles expose heroes, quests and enemies, party combos, class abilities,
//! environmental conditions, and randomness. The [`Env`] aggregate bundles them
//! so the engine can reach everything it needs without coupling to concrete
//! catalogs.
mod abilities;
mod combos;
mod environment;
mod error;
mod heroes;
mod quests;
mod rng;

pub use abilities::{AbilityDefinition, AbilityEffect, AbilityOracle, EffectRider};
pub use combos::{BossWeakness, ComboOracle, PartyCombo};
pub use environment::{
    ConditionKind, EnvironmentOracle, EnvironmentalCondition, EnvironmentalModifiers,
};
pub use error::OracleError;
pub use heroes::{ClassSet, CombatStats, HeroClass, HeroOracle, HeroProfile};
pub use quests::{EnemyDefinition, EnemySpecial, QuestDefinition, QuestOracle, QuestReward};
pub use rng::{PcgRng, RngOracle, ScriptedRng, compute_seed, context};

/// Aggregates read-only oracles required by the engine.
pub struct Env<'a, H, Q, C, A, E, R>
where
    H: HeroOracle + ?Sized,
    Q: QuestOracle + ?Sized,
    C: ComboOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    E: EnvironmentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    heroes: Option<&'a H>,
    quests: Option<&'a Q>,
    combos: Option<&'a C>,
    abilities: Option<&'a A>,
    environment: Option<&'a E>,
    rng: Option<&'a R>,
}

impl<H, Q, C, A, E, R> Clone for Env<'_, H, Q, C, A, E, R>
where
    H: HeroOracle + ?Sized,
    Q: QuestOracle + ?Sized,
    C: ComboOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    E: EnvironmentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, Q, C, A, E, R> Copy for Env<'_, H, Q, C, A, E, R>
where
    H: HeroOracle + ?Sized,
    Q: QuestOracle + ?Sized,
    C: ComboOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    E: EnvironmentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
}

pub type CombatEnv<'a> = Env<
    'a,
    dyn HeroOracle + 'a,
    dyn QuestOracle + 'a,
    dyn ComboOracle + 'a,
    dyn AbilityOracle + 'a,
    dyn EnvironmentOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, H, Q, C, A, E, R> Env<'a, H, Q, C, A, E, R>
where
    H: HeroOracle + ?Sized,
    Q: QuestOracle + ?Sized,
    C: ComboOracle + ?Sized,
    A: AbilityOracle + ?Sized,
    E: EnvironmentOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        heroes: Option<&'a H>,
        quests: Option<&'a Q>,
        combos: Option<&'a C>,
        abilities: Option<&'a A>,
        environment: Option<&'a E>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            heroes,
            quests,
            combos,
            abilities,
            environment,
            rng,
        }
    }

    pub fn with_all(
        heroes: &'a H,
        quests: &'a Q,
        combos: &'a C,
        abilities: &'a A,
        environment: &'a E,
        rng: &'a R,
    ) -> Self {
        Self::new(
            Some(heroes),
            Some(quests),
            Some(combos),
            Some(abilities),
            Some(environment),
            Some(rng),
        )
    }

    pub fn empty() -> Self {
        Self {
            heroes: None,
            quests: None,
            combos: None,
            abilities: None,
            environment: None,
            rng: None,
        }
    }

    /// Returns the HeroOracle, or an error if not available.
    pub fn heroes(&self) -> Result<&'a H, OracleError> {
        self.heroes.ok_or(OracleError::HeroesNotAvailable)
    }

    pub fn quests(&self) -> Result<&'a Q, OracleError> {
        self.quests.ok_or(OracleError::QuestsNotAvailable)
    }

    pub fn combos(&self) -> Result<&'a C, OracleError> {
        self.combos.ok_or(OracleError::CombosNotAvailable)
    }

    pub fn abilities(&self) -> Result<&'a A, OracleError> {
        self.abilities.ok_or(OracleError::AbilitiesNotAvailable)
    }

    pub fn environment(&self) -> Result<&'a E, OracleError> {
        self.environment.ok_or(OracleError::EnvironmentNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, H, Q, C, A, E, R> Env<'a, H, Q, C, A, E, R>
where
    H: HeroOracle + 'a,
    Q: QuestOracle + 'a,
    C: ComboOracle + 'a,
    A: AbilityOracle + 'a,
    E: EnvironmentOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into the trait-object based [`CombatEnv`].
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        let heroes: Option<&'a dyn HeroOracle> = self.heroes.map(|heroes| heroes as _);
        let quests: Option<&'a dyn QuestOracle> = self.quests.map(|quests| quests as _);
        let combos: Option<&'a dyn ComboOracle> = self.combos.map(|combos| combos as _);
        let abilities: Option<&'a dyn AbilityOracle> =
            self.abilities.map(|abilities| abilities as _);
        let environment: Option<&'a dyn EnvironmentOracle> =
            self.environment.map(|environment| environment as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(heroes, quests, combos, abilities, environment, rng)
    }
}

//! Runtime access to static game content.
//!
//! The [`OracleManager`] shares one read-only [`Catalog`] across every session
//! worker and builds a [`CombatEnv`] for each command. Dynamic state lives in
//! repositories, never here.

use std::sync::Arc;

use game_content::Catalog;
use game_core::env::{
    AbilityOracle, ComboOracle, EnvironmentOracle, HeroOracle, QuestOracle, RngOracle,
};
use game_core::{CombatEnv, Env, PcgRng};

/// Bundles the content catalog with the randomness source.
#[derive(Clone)]
pub struct OracleManager {
    catalog: Arc<Catalog>,
    rng: Arc<dyn RngOracle>,
}

impl OracleManager {
    /// Uses the stateless [`PcgRng`] for dice.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            rng: Arc::new(PcgRng),
        }
    }

    /// Replaces the randomness source, e.g. with a scripted one in tests.
    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Converts the manager into the environment the engine consumes.
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        let catalog = self.catalog.as_ref();
        Env::with_all(
            catalog as &dyn HeroOracle,
            catalog as &dyn QuestOracle,
            catalog as &dyn ComboOracle,
            catalog as &dyn AbilityOracle,
            catalog as &dyn EnvironmentOracle,
            self.rng.as_ref(),
        )
    }
}

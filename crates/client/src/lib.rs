//! Quest combat client.
//!
//! Composition root for the combat runtime: reads configuration, installs
//! logging, loads content, and drives one encounter with the autopilot in
//! [`driver`].

pub mod config;
pub mod driver;
pub mod logging;

pub use config::ClientConfig;
pub use driver::{EncounterReport, Move, next_move, run_encounter};

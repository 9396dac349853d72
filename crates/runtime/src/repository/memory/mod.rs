//! In-memory repositories for tests and local runs.

mod log;
mod session;

pub use log::InMemoryCombatLog;
pub use session::InMemorySessionRepo;

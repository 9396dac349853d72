//! File-backed repositories.
//!
//! # File Structure
//!
//! ```text
//! {save_dir}/
//!   ├── sessions/
//!   │   ├── session_{id}.bin
//!   │   └── ...
//!   └── logs/
//!       ├── combat_{id}.log
//!       └── ...
//! ```

mod log;
mod session;

pub use log::{FileCombatLog, LogFile};
pub use session::FileSessionRepository;

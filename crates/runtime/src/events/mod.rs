//! Topic-based event bus for runtime events.
//!
//! Resolution events go to [`Topic::Combat`]; terminal transitions and reward
//! grants go to [`Topic::Outcome`]. Consumers subscribe only to what they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{OutcomeEvent, SessionEvent};

//! War lifecycle simulation: declaration, daily advancement, resolution

pub mod algorithms;
pub mod manager;
pub mod state;

pub use manager::{WarDayReport, WarManager};
pub use state::{Battle, CallToArmsRecord, War, WarOutcome, WarOutcomeType};

//! Diplomatic layer: peace brokering, sanctions, alliances, proxy wars

pub mod alliance;
pub mod events;
pub mod manager;
pub mod peace;
pub mod proxy;
pub mod sanction;

pub use alliance::{Alliance, AllianceTerms, AllianceType, ConflictContext};
pub use events::{DiplomaticEvent, DiplomaticEventLog, DiplomaticEventType};
pub use manager::DiplomaticManager;
pub use peace::{PeaceBrokeringAttempt, PeaceResponseKind, PeaceStatus, PeaceTerms};
pub use proxy::{ProxyWar, ProxyWarStatus, ProxyWarType};
pub use sanction::{Sanction, SanctionImpact, SanctionStatus, SanctionType};

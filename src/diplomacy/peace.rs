//! Peace brokering: third-party-mediated negotiation between warring factions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::config::DiplomacyConfig;
use crate::core::types::{FactionId, RegionId, SimDay, WarId};
use crate::war::state::WarOutcomeType;

/// Proposed settlement clauses. Explicit named fields; nothing stringly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeaceTerms {
    /// Outcome the treaty would record (ceasefire, white peace, ...)
    pub outcome_type: Option<WarOutcomeType>,
    /// Regions each faction would cede
    pub territorial_concessions: HashMap<FactionId, Vec<RegionId>>,
    /// Reparations each faction would pay
    pub reparations: HashMap<FactionId, f64>,
    pub treaty_duration_days: u32,
}

impl PeaceTerms {
    /// How much these terms favor `faction` over `opponent`, in [-1, 1].
    /// Concessions and reparations by the opponent count for, one's own
    /// count against.
    pub fn favorability(&self, faction: FactionId, opponent: FactionId) -> f64 {
        let ceded_by = |f: FactionId| {
            self.territorial_concessions
                .get(&f)
                .map_or(0, |regions| regions.len()) as f64
        };
        let paid_by = |f: FactionId| self.reparations.get(&f).copied().unwrap_or(0.0);

        let territorial = 0.15 * (ceded_by(opponent) - ceded_by(faction));
        let monetary = 0.0005 * (paid_by(opponent) - paid_by(faction));
        (territorial + monetary).clamp(-1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeaceResponseKind {
    Accept,
    Reject,
    Counter,
}

/// A faction's latest recorded response to an attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeaceResponseRecord {
    pub response: PeaceResponseKind,
    pub counter_terms: Option<PeaceTerms>,
    pub details: Option<String>,
    pub day: SimDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeaceStatus {
    Proposed,
    Accepted,
    Rejected,
    Countered,
}

impl PeaceStatus {
    /// Accepted and Rejected attempts take no further responses
    pub fn is_terminal(&self) -> bool {
        matches!(self, PeaceStatus::Accepted | PeaceStatus::Rejected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeaceHistoryEntry {
    pub day: SimDay,
    pub note: String,
}

/// One brokered negotiation over one war
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeaceBrokeringAttempt {
    pub id: Uuid,
    pub war_id: WarId,
    pub broker_faction_id: FactionId,
    pub faction_a_id: FactionId,
    pub faction_b_id: FactionId,
    pub proposed_terms: PeaceTerms,
    pub incentives: HashMap<FactionId, f64>,
    pub acceptance_chance: HashMap<FactionId, f64>,
    pub responses: HashMap<FactionId, PeaceResponseRecord>,
    pub status: PeaceStatus,
    pub history: Vec<PeaceHistoryEntry>,
}

impl PeaceBrokeringAttempt {
    pub fn involves(&self, faction: FactionId) -> bool {
        faction == self.faction_a_id || faction == self.faction_b_id
    }

    pub fn opponent_of(&self, faction: FactionId) -> Option<FactionId> {
        if faction == self.faction_a_id {
            Some(self.faction_b_id)
        } else if faction == self.faction_b_id {
            Some(self.faction_a_id)
        } else {
            None
        }
    }

    pub fn response_of(&self, faction: FactionId) -> Option<&PeaceResponseRecord> {
        self.responses.get(&faction)
    }

    /// Both warring factions' latest responses are accepts
    pub fn both_accepted(&self) -> bool {
        [self.faction_a_id, self.faction_b_id].iter().all(|f| {
            self.responses
                .get(f)
                .map_or(false, |r| r.response == PeaceResponseKind::Accept)
        })
    }

    pub fn push_history(&mut self, day: SimDay, note: impl Into<String>) {
        self.history.push(PeaceHistoryEntry {
            day,
            note: note.into(),
        });
    }
}

/// Chance a faction accepts the proposed terms, from terms favorability and
/// any incentive offered to it. Clamped to the configured band.
pub fn acceptance_chance(
    terms: &PeaceTerms,
    faction: FactionId,
    opponent: FactionId,
    incentive: f64,
    config: &DiplomacyConfig,
) -> f64 {
    let favorability = terms.favorability(faction, opponent);
    let incentive_pull = (incentive / 1000.0).min(1.0);
    (config.base_peace_acceptance
        + favorability * config.favorability_weight
        + incentive_pull * config.incentive_weight)
        .clamp(config.min_acceptance, config.max_acceptance)
}

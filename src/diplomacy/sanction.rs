//! Economic sanction records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::{FactionId, SimDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SanctionType {
    TradeEmbargo,
    Military,
    Diplomatic,
    Full,
}

impl SanctionType {
    /// Baseline severity used by the impact formula
    pub fn severity(&self) -> f64 {
        match self {
            SanctionType::Full => 1.0,
            SanctionType::Military => 0.6,
            SanctionType::TradeEmbargo => 0.5,
            SanctionType::Diplomatic => 0.3,
        }
    }

    /// Discrete effects a sanction of this type imposes
    pub fn effects(&self) -> Vec<String> {
        let trade = ["trade_routes_closed", "market_access_revoked"];
        let military = ["arms_supply_cut", "military_aid_suspended"];
        let diplomatic = ["embassy_recalled", "summit_participation_barred"];
        let picked: Vec<&str> = match self {
            SanctionType::TradeEmbargo => trade.to_vec(),
            SanctionType::Military => military.to_vec(),
            SanctionType::Diplomatic => diplomatic.to_vec(),
            SanctionType::Full => trade
                .iter()
                .chain(military.iter())
                .chain(diplomatic.iter())
                .copied()
                .collect(),
        };
        picked.into_iter().map(String::from).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SanctionStatus {
    Active,
    Lifted,
}

/// Computed consequences of a sanction, stored with the record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanctionImpact {
    pub economic_impact: f64,
    pub reputation_impact: f64,
    pub military_impact: f64,
    pub tension_change: f64,
    pub effects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sanction {
    pub id: Uuid,
    pub sanctioning_faction_id: FactionId,
    pub target_faction_id: FactionId,
    pub sanction_type: SanctionType,
    pub duration_days: u64,
    pub reason: String,
    pub impact: SanctionImpact,
    pub status: SanctionStatus,
    pub applied_at: SimDay,
    pub lifted_reason: Option<String>,
    pub lifted_at: Option<SimDay>,
}

impl Sanction {
    pub fn is_active(&self) -> bool {
        self.status == SanctionStatus::Active
    }

    /// Whether the sanction's duration has run out by `day`. Expiry is
    /// checked by callers; sanctions never lift themselves.
    pub fn is_expired(&self, day: SimDay) -> bool {
        day >= self.applied_at + self.duration_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sanctions_carry_all_effects() {
        let full = SanctionType::Full.effects();
        for partial in [
            SanctionType::TradeEmbargo,
            SanctionType::Military,
            SanctionType::Diplomatic,
        ] {
            for effect in partial.effects() {
                assert!(full.contains(&effect));
            }
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(SanctionType::Full.severity() > SanctionType::Military.severity());
        assert!(SanctionType::Military.severity() > SanctionType::Diplomatic.severity());
    }
}

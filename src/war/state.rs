//! War lifecycle state: wars, battles, outcomes
//!
//! A war advances `none -> active -> ended`; once an outcome is attached the
//! war is inactive forever. At most one active war exists per unordered
//! faction pair (enforced by the manager's registry).

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::types::{FactionId, FactionPair, RegionId, SimDay, TerrainType, WarId};

/// How a war concluded. `DecisiveVictory` is the full-conquest outcome:
/// all threshold tables key on this enum and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarOutcomeType {
    DecisiveVictory,
    Victory,
    Stalemate,
    Ceasefire,
    WhitePeace,
}

impl WarOutcomeType {
    /// Fraction of disputed regions transferred to the winner
    pub fn territorial_transfer_fraction(&self) -> f64 {
        match self {
            WarOutcomeType::DecisiveVictory => 1.0,
            WarOutcomeType::Victory => 0.5,
            WarOutcomeType::Stalemate | WarOutcomeType::Ceasefire | WarOutcomeType::WhitePeace => {
                0.0
            }
        }
    }

    /// Cultural influence the winner gains in each disputed region
    pub fn winner_influence(&self) -> f64 {
        match self {
            WarOutcomeType::DecisiveVictory => 1.0,
            WarOutcomeType::Victory => 0.3,
            _ => 0.0,
        }
    }

    /// Post-war tension adjustment; more decisive outcomes settle more
    pub fn tension_adjustment(&self) -> f64 {
        match self {
            WarOutcomeType::DecisiveVictory => -30.0,
            WarOutcomeType::Victory => -20.0,
            _ => -10.0,
        }
    }

    /// Days the peace treaty holds after this outcome
    pub fn treaty_duration_days(&self) -> u32 {
        match self {
            WarOutcomeType::DecisiveVictory => 720,
            WarOutcomeType::Victory => 360,
            _ => 180,
        }
    }

    pub fn has_victor(&self) -> bool {
        matches!(self, WarOutcomeType::DecisiveVictory | WarOutcomeType::Victory)
    }
}

/// A single resolved battle within a war
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battle {
    pub winner_id: FactionId,
    pub attacker_id: FactionId,
    pub defender_id: FactionId,
    pub region_id: RegionId,
    pub terrain_type: TerrainType,
    pub attacker_strength: f64,
    pub defender_strength: f64,
    /// Loss fractions, clamped to [0.05, 0.7]
    pub attacker_losses: f64,
    pub defender_losses: f64,
    pub timestamp: SimDay,
}

/// An ally's recorded answer to a call to arms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToArmsRecord {
    pub ally: FactionId,
    pub requested_by: FactionId,
    pub chance: f64,
    pub joined: bool,
    pub day: SimDay,
}

/// Final settlement attached to an ended war. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarOutcome {
    pub outcome_type: WarOutcomeType,
    pub winner_id: Option<FactionId>,
    pub loser_id: Option<FactionId>,
    /// Disputed regions transferred to the winner
    pub territorial_changes: Vec<RegionId>,
    /// Resource amounts flowing loser -> winner
    pub resource_transfers: HashMap<String, f64>,
    pub reputation_changes: HashMap<FactionId, f64>,
    /// Tension delta to feed back into the tension layer
    pub tension_changes: f64,
    pub casualties: HashMap<FactionId, u64>,
    /// War length in days
    pub duration: u32,
}

/// An ongoing or concluded war between two factions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct War {
    pub id: WarId,
    pub faction_a: FactionId,
    pub faction_b: FactionId,
    pub start_date: SimDay,
    /// Days elapsed since declaration; starts at 1, advances only while active
    pub day: u32,
    pub disputed_regions: Vec<RegionId>,
    /// Append-only battle record
    pub battles: Vec<Battle>,
    pub exhaustion_a: f64,
    pub exhaustion_b: f64,
    pub casualties: HashMap<FactionId, u64>,
    /// Points of interest currently held per faction
    pub controlled_pois: HashMap<FactionId, HashSet<RegionId>>,
    pub call_to_arms: Vec<CallToArmsRecord>,
    pub is_active: bool,
    pub outcome: Option<WarOutcome>,
    pub end_date: Option<SimDay>,
}

impl War {
    pub fn new(
        id: WarId,
        pair: FactionPair,
        disputed_regions: Vec<RegionId>,
        start_date: SimDay,
    ) -> Self {
        Self {
            id,
            faction_a: pair.first(),
            faction_b: pair.second(),
            start_date,
            day: 1,
            disputed_regions,
            battles: Vec::new(),
            exhaustion_a: 0.0,
            exhaustion_b: 0.0,
            casualties: HashMap::new(),
            controlled_pois: HashMap::new(),
            call_to_arms: Vec::new(),
            is_active: true,
            outcome: None,
            end_date: None,
        }
    }

    pub fn pair(&self) -> FactionPair {
        // Participants are distinct by construction
        FactionPair::new(self.faction_a, self.faction_b)
            .expect("war participants are distinct")
    }

    pub fn is_participant(&self, faction: FactionId) -> bool {
        faction == self.faction_a || faction == self.faction_b
    }

    pub fn opponent(&self, faction: FactionId) -> Option<FactionId> {
        if faction == self.faction_a {
            Some(self.faction_b)
        } else if faction == self.faction_b {
            Some(self.faction_a)
        } else {
            None
        }
    }

    pub fn exhaustion_of(&self, faction: FactionId) -> f64 {
        if faction == self.faction_a {
            self.exhaustion_a
        } else {
            self.exhaustion_b
        }
    }

    /// Add exhaustion to one side, clamped to [0, max]
    pub fn add_exhaustion(&mut self, faction: FactionId, amount: f64, max: f64) {
        let slot = if faction == self.faction_a {
            &mut self.exhaustion_a
        } else {
            &mut self.exhaustion_b
        };
        *slot = (*slot + amount).clamp(0.0, max);
    }

    pub fn wins_of(&self, faction: FactionId) -> usize {
        self.battles.iter().filter(|b| b.winner_id == faction).count()
    }

    pub fn pois_of(&self, faction: FactionId) -> usize {
        self.controlled_pois.get(&faction).map_or(0, |s| s.len())
    }

    /// Record a battle and move point-of-interest control to the winner
    pub fn record_battle(&mut self, battle: Battle) {
        let loser = if battle.winner_id == battle.attacker_id {
            battle.defender_id
        } else {
            battle.attacker_id
        };
        if let Some(held) = self.controlled_pois.get_mut(&loser) {
            held.remove(&battle.region_id);
        }
        self.controlled_pois
            .entry(battle.winner_id)
            .or_default()
            .insert(battle.region_id);

        let attacker_toll = (battle.attacker_losses * battle.attacker_strength) as u64;
        let defender_toll = (battle.defender_losses * battle.defender_strength) as u64;
        *self.casualties.entry(battle.attacker_id).or_insert(0) += attacker_toll;
        *self.casualties.entry(battle.defender_id).or_insert(0) += defender_toll;

        self.battles.push(battle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn war() -> War {
        let pair = FactionPair::new(FactionId(1), FactionId(2)).unwrap();
        War::new(WarId(1), pair, vec![RegionId(10), RegionId(11)], 100)
    }

    fn battle(winner: u32, region: u32) -> Battle {
        Battle {
            winner_id: FactionId(winner),
            attacker_id: FactionId(1),
            defender_id: FactionId(2),
            region_id: RegionId(region),
            terrain_type: TerrainType::Plains,
            attacker_strength: 100.0,
            defender_strength: 90.0,
            attacker_losses: 0.1,
            defender_losses: 0.4,
            timestamp: 101,
        }
    }

    #[test]
    fn test_new_war_starts_on_day_one() {
        let w = war();
        assert_eq!(w.day, 1);
        assert!(w.is_active);
        assert!(w.battles.is_empty());
        assert!(w.outcome.is_none());
    }

    #[test]
    fn test_exhaustion_clamps() {
        let mut w = war();
        w.add_exhaustion(FactionId(1), 250.0, 100.0);
        assert_eq!(w.exhaustion_of(FactionId(1)), 100.0);
        w.add_exhaustion(FactionId(1), -500.0, 100.0);
        assert_eq!(w.exhaustion_of(FactionId(1)), 0.0);
    }

    #[test]
    fn test_record_battle_moves_poi_control() {
        let mut w = war();
        w.record_battle(battle(1, 10));
        assert_eq!(w.pois_of(FactionId(1)), 1);
        assert_eq!(w.pois_of(FactionId(2)), 0);

        // Faction 2 retakes the same region
        w.record_battle(battle(2, 10));
        assert_eq!(w.pois_of(FactionId(1)), 0);
        assert_eq!(w.pois_of(FactionId(2)), 1);
    }

    #[test]
    fn test_casualties_accumulate() {
        let mut w = war();
        w.record_battle(battle(1, 10));
        w.record_battle(battle(1, 11));
        assert_eq!(w.casualties[&FactionId(1)], 20);
        assert_eq!(w.casualties[&FactionId(2)], 72);
    }

    #[test]
    fn test_transfer_fractions_key_on_enum() {
        assert_eq!(WarOutcomeType::DecisiveVictory.territorial_transfer_fraction(), 1.0);
        assert_eq!(WarOutcomeType::Victory.territorial_transfer_fraction(), 0.5);
        assert_eq!(WarOutcomeType::Stalemate.territorial_transfer_fraction(), 0.0);
        assert_eq!(WarOutcomeType::WhitePeace.territorial_transfer_fraction(), 0.0);
    }
}

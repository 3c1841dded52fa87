//! War lifecycle management
//!
//! The manager owns war storage and state transitions; the numeric formulas
//! live in [`crate::war::algorithms`].

use ahash::AHashMap;
use rand::Rng;
use std::collections::HashMap;

use crate::core::config::WarConfig;
use crate::core::error::{Result, StrifeError};
use crate::core::types::{FactionId, FactionPair, RegionId, SimDay, WarId};
use crate::war::algorithms::{self, ResourceChanges, WarResolution};
use crate::war::state::{War, WarOutcome, WarOutcomeType};
use crate::world::{FactionProfile, RegionState};

/// Result of advancing a war by one day
#[derive(Debug, Clone)]
pub struct WarDayReport {
    pub war_id: WarId,
    pub day: u32,
    pub battles_fought: usize,
    /// Resource deltas per raided region, for the orchestration layer to
    /// apply to its region records
    pub resource_changes: Vec<(RegionId, ResourceChanges)>,
    /// Set when the day's advancement terminated the war
    pub ended: Option<WarOutcomeType>,
}

/// Owns all war records and enforces the single-active-war invariant
#[derive(Debug, Clone)]
pub struct WarManager {
    config: WarConfig,
    wars: AHashMap<WarId, War>,
    active_by_pair: AHashMap<FactionPair, WarId>,
    last_ended: AHashMap<FactionPair, SimDay>,
    next_war_id: u32,
}

impl WarManager {
    pub fn new(config: WarConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            wars: AHashMap::new(),
            active_by_pair: AHashMap::new(),
            last_ended: AHashMap::new(),
            next_war_id: 1,
        })
    }

    pub fn config(&self) -> &WarConfig {
        &self.config
    }

    /// Declare war between two factions. Idempotent: an existing active war
    /// between the pair is returned unchanged. Redeclaring during an
    /// enforced peace window is an error.
    pub fn declare_war(
        &mut self,
        a: FactionId,
        b: FactionId,
        disputed_regions: Vec<RegionId>,
        day: SimDay,
    ) -> Result<&War> {
        let pair = FactionPair::new(a, b)?;

        if let Some(&existing) = self.active_by_pair.get(&pair) {
            return Ok(&self.wars[&existing]);
        }

        if let Some(&ended_at) = self.last_ended.get(&pair) {
            let elapsed = day.saturating_sub(ended_at);
            if elapsed < self.config.min_peace_duration {
                return Err(StrifeError::InvalidState(format!(
                    "peace treaty between {:?} and {:?} holds for {} more days",
                    a,
                    b,
                    self.config.min_peace_duration - elapsed
                )));
            }
        }

        let id = WarId(self.next_war_id);
        self.next_war_id += 1;

        let war = War::new(id, pair, disputed_regions, day);
        tracing::info!(
            war = id.0,
            a = a.0,
            b = b.0,
            disputed = war.disputed_regions.len(),
            "war declared"
        );
        self.active_by_pair.insert(pair, id);
        self.wars.insert(id, war);
        Ok(&self.wars[&id])
    }

    /// Advance an active war by one simulated day: accrue exhaustion, roll
    /// the day's raids, and check for termination. Unknown wars are
    /// `NotFound`; ended wars are `InvalidState`. Failed calls mutate
    /// nothing.
    pub fn advance_war_day(
        &mut self,
        war_id: WarId,
        factions: &HashMap<FactionId, FactionProfile>,
        regions: &HashMap<RegionId, RegionState>,
        rng: &mut impl Rng,
    ) -> Result<WarDayReport> {
        let war = self
            .wars
            .get_mut(&war_id)
            .ok_or_else(|| StrifeError::NotFound(format!("war {:?}", war_id)))?;
        if !war.is_active {
            return Err(StrifeError::InvalidState(format!(
                "war {:?} has already ended",
                war_id
            )));
        }

        war.day += 1;
        let sim_day = war.start_date + war.day as SimDay;

        let (a, b) = (war.faction_a, war.faction_b);
        war.add_exhaustion(a, self.config.exhaustion_rate, self.config.max_exhaustion);
        war.add_exhaustion(b, self.config.exhaustion_rate, self.config.max_exhaustion);

        let raids =
            algorithms::generate_daily_raids(war, factions, regions, &self.config, sim_day, rng);
        let battles_fought = raids.len();
        let mut resource_changes = Vec::with_capacity(battles_fought);
        for battle in raids {
            if let Some(region) = regions.get(&battle.region_id) {
                resource_changes.push((
                    battle.region_id,
                    algorithms::calculate_resource_changes(&battle, &region.resources, &self.config),
                ));
            }
            war.add_exhaustion(a, self.config.attrition_factor, self.config.max_exhaustion);
            war.add_exhaustion(b, self.config.attrition_factor, self.config.max_exhaustion);
            war.record_battle(battle);
        }

        let day = war.day;
        let verdict = algorithms::simulate_war(war, &self.config);
        let ended = match verdict {
            Some(verdict) => {
                self.end_war(war_id, verdict.outcome_type, verdict.winner)?;
                Some(verdict.outcome_type)
            }
            None => None,
        };

        Ok(WarDayReport {
            war_id,
            day,
            battles_fought,
            resource_changes,
            ended,
        })
    }

    /// End a war with the given outcome. Terminal: the outcome is attached
    /// once and the war can never be reactivated.
    pub fn end_war(
        &mut self,
        war_id: WarId,
        outcome_type: WarOutcomeType,
        winner: Option<FactionId>,
    ) -> Result<WarOutcome> {
        let war = self
            .wars
            .get_mut(&war_id)
            .ok_or_else(|| StrifeError::NotFound(format!("war {:?}", war_id)))?;
        if !war.is_active {
            return Err(StrifeError::InvalidState(format!(
                "war {:?} has already ended",
                war_id
            )));
        }
        if let Some(winner) = winner {
            if !war.is_participant(winner) {
                return Err(StrifeError::Validation(format!(
                    "{:?} is not a participant in war {:?}",
                    winner, war_id
                )));
            }
        }
        if outcome_type.has_victor() && winner.is_none() {
            return Err(StrifeError::Validation(format!(
                "{:?} requires a winner",
                outcome_type
            )));
        }

        let loser = winner.and_then(|w| war.opponent(w));
        let resource_transfers = match winner {
            Some(_) => {
                let decisiveness = match outcome_type {
                    WarOutcomeType::DecisiveVictory => 1.0,
                    WarOutcomeType::Victory => 0.5,
                    _ => 0.0,
                };
                let mut transfers = HashMap::new();
                if decisiveness > 0.0 {
                    transfers.insert(
                        "gold".to_string(),
                        war.day as f64 * algorithms::REPARATIONS_PER_DAY * decisiveness,
                    );
                }
                transfers
            }
            None => HashMap::new(),
        };

        let outcome = WarOutcome {
            outcome_type,
            winner_id: winner,
            loser_id: loser,
            territorial_changes: algorithms::calculate_territorial_changes(
                winner,
                war,
                outcome_type,
            ),
            resource_transfers,
            reputation_changes: algorithms::reputation_changes(
                winner,
                loser,
                war.faction_a,
                war.faction_b,
                outcome_type,
            ),
            tension_changes: outcome_type.tension_adjustment(),
            casualties: war.casualties.clone(),
            duration: war.day,
        };

        let end_date = war.start_date + war.day as SimDay;
        war.outcome = Some(outcome.clone());
        war.is_active = false;
        war.end_date = Some(end_date);

        let pair = war.pair();
        self.active_by_pair.remove(&pair);
        self.last_ended.insert(pair, end_date);

        tracing::info!(
            war = war_id.0,
            outcome = ?outcome_type,
            winner = ?winner,
            duration = outcome.duration,
            "war ended"
        );
        Ok(outcome)
    }

    /// Attach an ally's call-to-arms response to an active war
    pub fn record_call_to_arms(
        &mut self,
        war_id: WarId,
        record: crate::war::state::CallToArmsRecord,
    ) -> Result<()> {
        let war = self
            .wars
            .get_mut(&war_id)
            .ok_or_else(|| StrifeError::NotFound(format!("war {:?}", war_id)))?;
        if !war.is_active {
            return Err(StrifeError::InvalidState(format!(
                "war {:?} has already ended",
                war_id
            )));
        }
        war.call_to_arms.push(record);
        Ok(())
    }

    /// Settlement payload for an ended war; `None` for unknown or active wars
    pub fn resolve_war(&self, war_id: WarId) -> Option<WarResolution> {
        self.wars.get(&war_id).and_then(algorithms::resolve_war)
    }

    pub fn get_war_status(&self, war_id: WarId) -> Option<&War> {
        self.wars.get(&war_id)
    }

    /// The active war between two factions, if any. Order-independent.
    pub fn get_war(&self, a: FactionId, b: FactionId) -> Option<&War> {
        let pair = FactionPair::new(a, b).ok()?;
        self.active_by_pair
            .get(&pair)
            .and_then(|id| self.wars.get(id))
    }

    pub fn active_wars(&self) -> impl Iterator<Item = &War> {
        self.wars.values().filter(|w| w.is_active)
    }

    pub fn active_war_ids(&self) -> Vec<WarId> {
        self.active_by_pair.values().copied().collect()
    }

    pub fn wars_involving(&self, faction: FactionId) -> Vec<&War> {
        self.wars
            .values()
            .filter(|w| w.is_participant(faction))
            .collect()
    }

    /// Count of active wars a faction is fighting
    pub fn commitment_count(&self, faction: FactionId) -> u32 {
        self.wars
            .values()
            .filter(|w| w.is_active && w.is_participant(faction))
            .count() as u32
    }
}

//! Tension tracking: bounded deltas, decay toward base, event impacts

use serde::{Deserialize, Serialize};

use crate::core::config::TensionConfig;
use crate::core::error::Result;
use crate::core::types::{FactionId, FactionPair, RegionId, SimDay};
use crate::tension::store::{TensionLevel, TensionRecord, TensionStore};

/// World events that move tension for the pairs they touch.
/// Weight sign decides direction: positive raises tension, negative lowers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldEventType {
    BorderIncident,
    TradeDispute,
    Assassination,
    ReligiousTension,
    EspionageExposed,
    CulturalExchange,
    DisasterRelief,
}

impl WorldEventType {
    pub fn weight(&self) -> f64 {
        match self {
            WorldEventType::Assassination => 3.0,
            WorldEventType::EspionageExposed => 2.0,
            WorldEventType::BorderIncident => 1.5,
            WorldEventType::ReligiousTension => 1.0,
            WorldEventType::TradeDispute => 0.8,
            WorldEventType::CulturalExchange => -0.5,
            WorldEventType::DisasterRelief => -1.0,
        }
    }
}

/// Owns the tension store and applies all mutations to it
#[derive(Debug, Clone)]
pub struct TensionManager {
    store: TensionStore,
    config: TensionConfig,
}

impl TensionManager {
    pub fn new(config: TensionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: TensionStore::new(),
            config,
        })
    }

    pub fn config(&self) -> &TensionConfig {
        &self.config
    }

    /// Snapshot of every pair record in a region. Empty if the region has
    /// never been touched; reading never creates records.
    pub fn get_tension(&self, region: RegionId) -> Vec<TensionRecord> {
        self.store.region_records(region).cloned().collect()
    }

    /// Apply a delta to the pair's tension, clamped to the configured bounds.
    /// Returns the new value.
    pub fn modify_tension(
        &mut self,
        region: RegionId,
        pair: FactionPair,
        delta: f64,
        reason: &str,
        day: SimDay,
    ) -> f64 {
        let (min, max, base) = (
            self.config.min_tension,
            self.config.max_tension,
            self.config.base_tension,
        );
        let record = self.store.record_mut_or_insert(region, pair, base, day);
        record.value = (record.value + delta).clamp(min, max);
        record.last_updated = day;
        tracing::debug!(
            region = region.0,
            a = pair.first().0,
            b = pair.second().0,
            value = record.value,
            reason,
            "tension modified"
        );
        record.value
    }

    /// Move every pair in the region toward `base_tension` by
    /// `decay_rate * days`, never overshooting the base.
    pub fn decay_tension(&mut self, region: RegionId, days: u64) {
        let amount = self.config.decay_rate * days as f64;
        let base = self.config.base_tension;
        for record in self.store.region_records_mut(region) {
            record.value = decay_toward(record.value, base, amount);
        }
    }

    /// Drop every record in the region; pairs read as `base_tension` again
    pub fn reset_tension(&mut self, region: RegionId) {
        self.store.clear_region(region);
    }

    /// Current tension between two factions, order-independent.
    /// Unknown pairs read as `base_tension`.
    pub fn get_faction_tension(
        &self,
        region: RegionId,
        a: FactionId,
        b: FactionId,
    ) -> Result<f64> {
        let pair = FactionPair::new(a, b)?;
        Ok(self
            .store
            .record(region, pair)
            .map_or(self.config.base_tension, |r| r.value))
    }

    /// Qualitative level for a pair, order-independent
    pub fn tension_level(&self, region: RegionId, a: FactionId, b: FactionId) -> Result<TensionLevel> {
        Ok(TensionLevel::from_value(self.get_faction_tension(region, a, b)?))
    }

    /// Apply one weighted world-event delta across all supplied pairs.
    /// Returns the delta that was applied to each.
    pub fn calculate_event_impact(
        &mut self,
        region: RegionId,
        event_type: WorldEventType,
        severity: f64,
        affected_pairs: &[FactionPair],
        reason: &str,
        day: SimDay,
    ) -> f64 {
        let delta = severity * self.config.event_impact * event_type.weight();
        for &pair in affected_pairs {
            self.modify_tension(region, pair, delta, reason, day);
        }
        delta
    }
}

/// Decay a value toward `base` by `amount` without overshooting
fn decay_toward(value: f64, base: f64, amount: f64) -> f64 {
    if value > base {
        (value - amount).max(base)
    } else if value < base {
        (value + amount).min(base)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TensionConfig;
    use crate::core::types::FactionId;

    fn manager() -> TensionManager {
        TensionManager::new(TensionConfig::default()).unwrap()
    }

    fn pair(a: u32, b: u32) -> FactionPair {
        FactionPair::new(FactionId(a), FactionId(b)).unwrap()
    }

    #[test]
    fn test_modify_clamps_to_bounds() {
        let mut m = manager();
        let value = m.modify_tension(RegionId(1), pair(1, 2), 500.0, "test", 0);
        assert_eq!(value, 100.0);
        let value = m.modify_tension(RegionId(1), pair(1, 2), -900.0, "test", 1);
        assert_eq!(value, -100.0);
    }

    #[test]
    fn test_lookup_is_order_independent() {
        let mut m = manager();
        m.modify_tension(RegionId(1), pair(1, 2), 42.0, "test", 0);
        let ab = m.get_faction_tension(RegionId(1), FactionId(1), FactionId(2)).unwrap();
        let ba = m.get_faction_tension(RegionId(1), FactionId(2), FactionId(1)).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab, 42.0);
    }

    #[test]
    fn test_unknown_pair_reads_as_base() {
        let m = manager();
        let value = m.get_faction_tension(RegionId(1), FactionId(8), FactionId(9)).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_self_pair_is_rejected() {
        let m = manager();
        assert!(m.get_faction_tension(RegionId(1), FactionId(1), FactionId(1)).is_err());
    }

    #[test]
    fn test_decay_moves_toward_base_without_overshoot() {
        let mut m = manager();
        m.modify_tension(RegionId(1), pair(1, 2), 10.0, "test", 0);
        m.modify_tension(RegionId(1), pair(3, 4), -10.0, "test", 0);

        // decay_rate 0.5 * 30 days = 15 units, more than either distance to base
        m.decay_tension(RegionId(1), 30);
        assert_eq!(m.get_faction_tension(RegionId(1), FactionId(1), FactionId(2)).unwrap(), 0.0);
        assert_eq!(m.get_faction_tension(RegionId(1), FactionId(3), FactionId(4)).unwrap(), 0.0);
    }

    #[test]
    fn test_decay_is_monotone() {
        let mut m = manager();
        m.modify_tension(RegionId(1), pair(1, 2), 60.0, "test", 0);
        let mut previous = 60.0;
        for _ in 0..200 {
            m.decay_tension(RegionId(1), 1);
            let value = m.get_faction_tension(RegionId(1), FactionId(1), FactionId(2)).unwrap();
            assert!(value <= previous);
            assert!(value >= 0.0);
            previous = value;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_reset_clears_region() {
        let mut m = manager();
        m.modify_tension(RegionId(1), pair(1, 2), 60.0, "test", 0);
        m.reset_tension(RegionId(1));
        assert!(m.get_tension(RegionId(1)).is_empty());
        assert_eq!(m.get_faction_tension(RegionId(1), FactionId(1), FactionId(2)).unwrap(), 0.0);
    }

    #[test]
    fn test_event_impact_hits_all_pairs() {
        let mut m = manager();
        let pairs = [pair(1, 2), pair(1, 3)];
        let delta = m.calculate_event_impact(
            RegionId(1),
            WorldEventType::Assassination,
            5.0,
            &pairs,
            "envoy killed",
            3,
        );
        assert_eq!(delta, 15.0);
        assert_eq!(m.get_faction_tension(RegionId(1), FactionId(1), FactionId(2)).unwrap(), 15.0);
        assert_eq!(m.get_faction_tension(RegionId(1), FactionId(1), FactionId(3)).unwrap(), 15.0);
    }

    #[test]
    fn test_spec_scenario_sixty_is_hostile() {
        let mut m = manager();
        m.modify_tension(RegionId(1), pair(1, 2), 60.0, "escalation", 0);
        assert_eq!(
            m.tension_level(RegionId(1), FactionId(1), FactionId(2)).unwrap(),
            TensionLevel::Hostile
        );
    }
}

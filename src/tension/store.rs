//! Pairwise tension records and their qualitative classification

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{FactionPair, RegionId, SimDay};

/// Qualitative relation level, a pure function of the tension value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TensionLevel {
    Alliance,
    Friendly,
    Neutral,
    Rivalry,
    Hostile,
    War,
}

impl TensionLevel {
    /// Classify a tension value. Thresholds are fixed; the value itself is
    /// already clamped by the store.
    pub fn from_value(value: f64) -> Self {
        if value <= -50.0 {
            TensionLevel::Alliance
        } else if value <= -15.0 {
            TensionLevel::Friendly
        } else if value < 30.0 {
            TensionLevel::Neutral
        } else if value < 50.0 {
            TensionLevel::Rivalry
        } else if value < 80.0 {
            TensionLevel::Hostile
        } else {
            TensionLevel::War
        }
    }
}

/// Tension between one canonical faction pair in one region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionRecord {
    pub region: RegionId,
    pub pair: FactionPair,
    pub value: f64,
    pub last_updated: SimDay,
}

impl TensionRecord {
    pub fn level(&self) -> TensionLevel {
        TensionLevel::from_value(self.value)
    }
}

/// All tension records, keyed region -> canonical pair.
/// Exactly one record exists per (region, unordered pair).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TensionStore {
    regions: AHashMap<RegionId, AHashMap<FactionPair, TensionRecord>>,
}

impl TensionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, region: RegionId, pair: FactionPair) -> Option<&TensionRecord> {
        self.regions.get(&region).and_then(|pairs| pairs.get(&pair))
    }

    /// Fetch a record, lazily creating it at `initial` if absent
    pub fn record_mut_or_insert(
        &mut self,
        region: RegionId,
        pair: FactionPair,
        initial: f64,
        day: SimDay,
    ) -> &mut TensionRecord {
        self.regions
            .entry(region)
            .or_default()
            .entry(pair)
            .or_insert_with(|| TensionRecord {
                region,
                pair,
                value: initial,
                last_updated: day,
            })
    }

    pub fn region_records(&self, region: RegionId) -> impl Iterator<Item = &TensionRecord> {
        self.regions.get(&region).into_iter().flat_map(|m| m.values())
    }

    pub fn region_records_mut(
        &mut self,
        region: RegionId,
    ) -> impl Iterator<Item = &mut TensionRecord> {
        self.regions
            .get_mut(&region)
            .into_iter()
            .flat_map(|m| m.values_mut())
    }

    pub fn clear_region(&mut self, region: RegionId) {
        self.regions.remove(&region);
    }

    pub fn pair_count(&self, region: RegionId) -> usize {
        self.regions.get(&region).map_or(0, |m| m.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FactionId;

    fn pair(a: u32, b: u32) -> FactionPair {
        FactionPair::new(FactionId(a), FactionId(b)).unwrap()
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(TensionLevel::from_value(-80.0), TensionLevel::Alliance);
        assert_eq!(TensionLevel::from_value(-30.0), TensionLevel::Friendly);
        assert_eq!(TensionLevel::from_value(0.0), TensionLevel::Neutral);
        assert_eq!(TensionLevel::from_value(40.0), TensionLevel::Rivalry);
        assert_eq!(TensionLevel::from_value(60.0), TensionLevel::Hostile);
        assert_eq!(TensionLevel::from_value(85.0), TensionLevel::War);
    }

    #[test]
    fn test_one_record_per_unordered_pair() {
        let mut store = TensionStore::new();
        store.record_mut_or_insert(RegionId(1), pair(1, 2), 0.0, 0);
        store.record_mut_or_insert(RegionId(1), pair(2, 1), 0.0, 0);
        assert_eq!(store.pair_count(RegionId(1)), 1);
    }

    #[test]
    fn test_clear_region() {
        let mut store = TensionStore::new();
        store.record_mut_or_insert(RegionId(1), pair(1, 2), 5.0, 0);
        store.clear_region(RegionId(1));
        assert_eq!(store.pair_count(RegionId(1)), 0);
        assert!(store.record(RegionId(1), pair(1, 2)).is_none());
    }
}

//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StrifeError};

/// Unique identifier for factions (assigned by the orchestration layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// Unique identifier for regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

/// Unique identifier for wars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarId(pub u32);

/// Simulation time unit: days since world epoch
pub type SimDay = u64;

/// Canonical unordered faction pair.
///
/// Construction sorts the two ids, so `(a, b)` and `(b, a)` produce the same
/// key. This is the only map key used for pairwise relation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionPair {
    first: FactionId,
    second: FactionId,
}

impl FactionPair {
    pub fn new(a: FactionId, b: FactionId) -> Result<Self> {
        if a == b {
            return Err(StrifeError::Validation(format!(
                "faction pair requires two distinct factions, got {:?} twice",
                a
            )));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { first, second })
    }

    pub fn first(&self) -> FactionId {
        self.first
    }

    pub fn second(&self) -> FactionId {
        self.second
    }

    pub fn contains(&self, faction: FactionId) -> bool {
        self.first == faction || self.second == faction
    }

    /// The other member of the pair, if `faction` is a member
    pub fn other(&self, faction: FactionId) -> Option<FactionId> {
        if faction == self.first {
            Some(self.second)
        } else if faction == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    pub fn as_tuple(&self) -> (FactionId, FactionId) {
        (self.first, self.second)
    }
}

/// Region terrain classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    Plains,
    Hills,
    Forest,
    Mountains,
    Swamp,
    Desert,
    Coast,
}

impl TerrainType {
    /// Defensive strength bonus for the side holding this terrain
    pub fn defense_bonus(&self) -> f64 {
        match self {
            TerrainType::Mountains => 0.3,
            TerrainType::Swamp => 0.2,
            TerrainType::Hills => 0.15,
            TerrainType::Forest => 0.1,
            TerrainType::Plains | TerrainType::Desert | TerrainType::Coast => 0.0,
        }
    }
}

impl Default for TerrainType {
    fn default() -> Self {
        TerrainType::Plains
    }
}

/// Named behavioral flags on a faction, supplied by the orchestration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactionTrait {
    Militaristic,
    Peaceful,
    Aggressive,
    Expansionist,
    Diplomatic,
    Isolationist,
    Honorable,
    Treacherous,
}

//! Region boundary data supplied by the orchestration layer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::types::{FactionId, RegionId, TerrainType};

/// Snapshot of a region as the orchestration layer sees it.
/// `controller` is the source of truth for territory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionState {
    pub id: RegionId,
    pub name: String,
    /// Claim strength per faction, in [0, 1]; absent means no claim
    pub claims: HashMap<FactionId, f64>,
    pub controller: Option<FactionId>,
    pub terrain: TerrainType,
    /// Political stability, in [0, 1]; low values favor insurgencies
    pub stability: f64,
    /// Numeric resource stocks keyed by resource name
    pub resources: HashMap<String, f64>,
    pub population: u64,
    pub dominant_language: Option<String>,
}

impl RegionState {
    pub fn new(id: RegionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            claims: HashMap::new(),
            controller: None,
            terrain: TerrainType::default(),
            stability: 0.5,
            resources: HashMap::new(),
            population: 10_000,
            dominant_language: None,
        }
    }

    pub fn claim_of(&self, faction: FactionId) -> f64 {
        self.claims.get(&faction).copied().unwrap_or(0.0)
    }

    pub fn is_controlled_by(&self, faction: FactionId) -> bool {
        self.controller == Some(faction)
    }
}

//! Faction boundary data supplied by the orchestration layer
//!
//! The core never owns faction records; callers pass profiles per operation.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::types::{FactionId, FactionTrait, RegionId};

/// Snapshot of a faction as the orchestration layer sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionProfile {
    pub id: FactionId,
    pub name: String,
    pub military_strength: f64,
    pub economic_strength: f64,
    pub covert_ops_strength: f64,
    pub counter_intel_strength: f64,
    /// Position on a single ideology axis, in [-1, 1]
    pub ideology: f64,
    pub traits: AHashSet<FactionTrait>,
    /// Influence per region, in [0, 1]
    pub influence: HashMap<RegionId, f64>,
    /// Wars and proxy commitments the faction is already engaged in
    pub active_commitments: u32,
}

impl FactionProfile {
    pub fn new(id: FactionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            military_strength: 100.0,
            economic_strength: 100.0,
            covert_ops_strength: 10.0,
            counter_intel_strength: 10.0,
            ideology: 0.0,
            traits: AHashSet::new(),
            influence: HashMap::new(),
            active_commitments: 0,
        }
    }

    pub fn has_trait(&self, t: FactionTrait) -> bool {
        self.traits.contains(&t)
    }

    pub fn influence_in(&self, region: RegionId) -> f64 {
        self.influence.get(&region).copied().unwrap_or(0.0)
    }
}

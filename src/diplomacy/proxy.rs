//! Proxy wars: sponsored indirect conflict with discoverable attribution

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::ProxyWarConfig;
use crate::core::types::{FactionId, RegionId, SimDay};
use crate::world::{FactionProfile, RegionState};

/// Nominal fighter count of a fully funded, full-intensity proxy group
pub const MAX_GROUP_SIZE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyWarType {
    Insurgency,
    BorderConflict,
    Sabotage,
    ArmedIntervention,
    Coup,
}

impl ProxyWarType {
    /// Monthly cost relative to an insurgency
    pub fn cost_multiplier(&self) -> f64 {
        match self {
            ProxyWarType::Sabotage => 0.8,
            ProxyWarType::Insurgency => 1.0,
            ProxyWarType::BorderConflict => 1.2,
            ProxyWarType::Coup => 1.5,
            ProxyWarType::ArmedIntervention => 2.5,
        }
    }

    /// Baseline attribution risk of operations of this type
    pub fn risk_factor(&self) -> f64 {
        match self {
            ProxyWarType::BorderConflict => 0.2,
            ProxyWarType::Insurgency => 0.3,
            ProxyWarType::Sabotage => 0.4,
            ProxyWarType::ArmedIntervention => 0.6,
            ProxyWarType::Coup => 0.8,
        }
    }

    /// Success-chance adjustment: coups are hard, sabotage is cheap to pull off
    pub fn success_shift(&self) -> f64 {
        match self {
            ProxyWarType::Sabotage => 0.05,
            ProxyWarType::Coup => -0.1,
            _ => 0.0,
        }
    }

    /// (economic, military, political) impact profile per unit intensity
    pub fn impact_profile(&self) -> (f64, f64, f64) {
        match self {
            ProxyWarType::Insurgency => (0.3, 0.4, 0.5),
            ProxyWarType::BorderConflict => (0.2, 0.5, 0.3),
            ProxyWarType::Sabotage => (0.6, 0.2, 0.2),
            ProxyWarType::ArmedIntervention => (0.4, 0.7, 0.4),
            ProxyWarType::Coup => (0.3, 0.2, 0.9),
        }
    }

    /// Ideology the recruited proxy group typically carries
    pub fn typical_ideology(&self) -> ProxyGroupIdeology {
        match self {
            ProxyWarType::Insurgency | ProxyWarType::Coup => ProxyGroupIdeology::Revolutionary,
            ProxyWarType::BorderConflict => ProxyGroupIdeology::Separatist,
            ProxyWarType::Sabotage => ProxyGroupIdeology::Criminal,
            ProxyWarType::ArmedIntervention => ProxyGroupIdeology::Religious,
        }
    }
}

/// Ideological flavor of a proxy group; sets the discovery-risk baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyGroupIdeology {
    Separatist,
    Religious,
    Revolutionary,
    Criminal,
}

impl ProxyGroupIdeology {
    pub fn discovery_baseline(&self) -> f64 {
        match self {
            ProxyGroupIdeology::Criminal => 0.15,
            ProxyGroupIdeology::Separatist => 0.2,
            ProxyGroupIdeology::Religious => 0.25,
            ProxyGroupIdeology::Revolutionary => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyWarStatus {
    Active,
    Exposed,
    Concluded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyWar {
    pub id: Uuid,
    pub sponsor_faction_id: FactionId,
    pub target_faction_id: FactionId,
    pub proxy_faction_id: FactionId,
    pub region_id: RegionId,
    pub war_type: ProxyWarType,
    pub status: ProxyWarStatus,
    pub start_date: SimDay,
    /// Sponsor funding, in [0, 1]
    pub funding_level: f64,
    /// Operation intensity, in [0, 1]
    pub intensity: f64,
    /// Cover name of the sponsored group
    pub group_name: String,
}

impl ProxyWar {
    /// Fighter headcount implied by funding and intensity
    pub fn group_size(&self) -> u32 {
        (100.0 + (self.funding_level + self.intensity) / 2.0 * (MAX_GROUP_SIZE - 100.0)) as u32
    }
}

/// Suitability of a target for sponsored subversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSuitability {
    /// How weak the target looks, in [0, 1]
    pub vulnerability_score: f64,
    /// Strategic value of hurting it, in [0, 1]
    pub value_score: f64,
    pub overall_score: f64,
}

/// Composite target assessment: weakness of the target plus the strategic
/// value of striking it, tilted by operation type.
pub fn evaluate_proxy_war_target(
    sponsor: &FactionProfile,
    target: &FactionProfile,
    war_type: ProxyWarType,
) -> TargetSuitability {
    let military_share =
        target.military_strength / (target.military_strength + sponsor.military_strength).max(1.0);
    let counter_intel = (target.counter_intel_strength / 100.0).clamp(0.0, 1.0);
    let vulnerability_score = ((1.0 - military_share) * 0.7 + (1.0 - counter_intel) * 0.3)
        .clamp(0.0, 1.0);

    let economic_share =
        target.economic_strength / (target.economic_strength + sponsor.economic_strength).max(1.0);
    let value_score = (economic_share + war_type.success_shift().abs()).clamp(0.0, 1.0);

    let overall_score = (0.6 * vulnerability_score + 0.4 * value_score).clamp(0.0, 1.0);
    TargetSuitability {
        vulnerability_score,
        value_score,
        overall_score,
    }
}

/// Chance the sponsored operation succeeds. Proxy-vs-target strength sets
/// the base; sponsor covert ops and region instability raise it, target
/// counter-intel lowers it. Clamped to the configured band.
pub fn calculate_proxy_war_success_chance(
    sponsor: &FactionProfile,
    target: &FactionProfile,
    proxy: &FactionProfile,
    region: &RegionState,
    war_type: ProxyWarType,
    config: &ProxyWarConfig,
) -> f64 {
    let strength_share =
        proxy.military_strength / (proxy.military_strength + target.military_strength).max(1.0);

    let chance = config.base_success
        + (strength_share - 0.5)
        + (sponsor.covert_ops_strength / 100.0).clamp(0.0, 1.0) * config.covert_ops_weight
        + (1.0 - region.stability) * config.instability_weight
        - (target.counter_intel_strength / 100.0).clamp(0.0, 1.0) * config.counter_intel_weight
        + war_type.success_shift();

    chance.clamp(config.min_success, config.max_success)
}

/// Risk that the sponsor's hand is discovered. Rises with funding volume
/// and group size over the ideology-specific baseline.
pub fn calculate_discovery_risk(
    funding_level: f64,
    group_size: u32,
    ideology: ProxyGroupIdeology,
) -> f64 {
    let size_share = (group_size as f64 / MAX_GROUP_SIZE).clamp(0.0, 1.0);
    (ideology.discovery_baseline() + funding_level.clamp(0.0, 1.0) * 0.3 + size_share * 0.2)
        .clamp(0.0, 1.0)
}

/// How much damage the group can actually do, in [0, 1]
pub fn calculate_proxy_war_effectiveness(
    funding_level: f64,
    proxy_strength: f64,
    group_size: u32,
) -> f64 {
    let size_share = (group_size as f64 / MAX_GROUP_SIZE).clamp(0.0, 1.0);
    (funding_level.clamp(0.0, 1.0) * 0.4
        + (proxy_strength / 100.0).clamp(0.0, 1.0) * 0.4
        + size_share * 0.2)
        .clamp(0.0, 1.0)
}

/// Cost breakdown of sustaining a proxy war
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProxyWarCost {
    pub monthly_cost: f64,
    pub total_cost: f64,
    pub risk_factor: f64,
}

/// Cost scales with duration and intensity over a type-dependent base rate
pub fn calculate_proxy_war_cost(
    war_type: ProxyWarType,
    duration_months: u32,
    intensity: f64,
    config: &ProxyWarConfig,
) -> ProxyWarCost {
    let intensity = intensity.clamp(0.0, 1.0);
    let monthly_cost =
        config.base_monthly_cost * war_type.cost_multiplier() * (0.5 + intensity);
    ProxyWarCost {
        monthly_cost,
        total_cost: monthly_cost * duration_months as f64,
        risk_factor: war_type.risk_factor() * (0.5 + intensity / 2.0),
    }
}

/// Impact on the target, per dimension
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProxyWarImpact {
    pub economic: f64,
    pub military: f64,
    pub political: f64,
}

/// Impact magnitudes scaled by intensity and the type's profile
pub fn evaluate_proxy_war_impact(proxy_war: &ProxyWar, _target: &FactionProfile) -> ProxyWarImpact {
    let (economic, military, political) = proxy_war.war_type.impact_profile();
    let scale = proxy_war.intensity.clamp(0.0, 1.0) * 100.0;
    ProxyWarImpact {
        economic: economic * scale,
        military: military * scale,
        political: political * scale,
    }
}

/// Result of one proxy-war resolution pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyWarOutcome {
    pub succeeded: bool,
    pub discovered: bool,
    pub success_chance: f64,
    pub discovery_risk: f64,
    pub effectiveness: f64,
    /// Damage dealt to the target when the operation succeeded
    pub impact: Option<ProxyWarImpact>,
}

/// Resolve a proxy war with two independent draws: one for success, one for
/// discovery. The draws are independent so a discovered operation can still
/// have succeeded.
pub fn simulate_proxy_war(
    proxy_war: &ProxyWar,
    sponsor: &FactionProfile,
    target: &FactionProfile,
    proxy: &FactionProfile,
    region: &RegionState,
    config: &ProxyWarConfig,
    rng: &mut impl Rng,
) -> ProxyWarOutcome {
    let success_chance = calculate_proxy_war_success_chance(
        sponsor,
        target,
        proxy,
        region,
        proxy_war.war_type,
        config,
    );
    let discovery_risk = calculate_discovery_risk(
        proxy_war.funding_level,
        proxy_war.group_size(),
        proxy_war.war_type.typical_ideology(),
    );
    let effectiveness = calculate_proxy_war_effectiveness(
        proxy_war.funding_level,
        proxy.military_strength,
        proxy_war.group_size(),
    );

    let succeeded = rng.gen::<f64>() < success_chance;
    let discovered = rng.gen::<f64>() < discovery_risk;

    ProxyWarOutcome {
        succeeded,
        discovered,
        success_chance,
        discovery_risk,
        effectiveness,
        impact: succeeded.then(|| evaluate_proxy_war_impact(proxy_war, target)),
    }
}

const GROUP_NAME_PREFIXES: [&str; 6] = [
    "Free Companies of",
    "Liberation Front of",
    "Sons of",
    "People's Militia of",
    "Black Banner of",
    "True Heirs of",
];

/// A cover name for the sponsored group, flavored with the region's name
pub fn generate_proxy_group_name(region: &RegionState, rng: &mut impl Rng) -> String {
    let prefix = GROUP_NAME_PREFIXES[rng.gen_range(0..GROUP_NAME_PREFIXES.len())];
    if region.name.is_empty() {
        format!("{} Region {}", prefix, region.id.0)
    } else {
        format!("{} {}", prefix, region.name)
    }
}

//! Alliances: formation compatibility, strength, stability, and the
//! sanction-impact formula shared with the sanction layer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::core::config::AllianceConfig;
use crate::core::types::{FactionId, FactionTrait, SimDay};
use crate::diplomacy::sanction::{SanctionImpact, SanctionType};
use crate::world::FactionProfile;

/// Tension change applied to the issuer/target pair per unit of severity
pub const SANCTION_TENSION_PER_SEVERITY: f64 = 15.0;
/// Strength a faction is considered "strong" at for rating purposes
pub const STRENGTH_REFERENCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllianceType {
    Military,
    Economic,
    Full,
    NonAggression,
    Trade,
}

impl AllianceType {
    /// Call-to-arms bonus ladder: military > full > trade > non-aggression
    pub fn call_to_arms_bonus(&self) -> f64 {
        match self {
            AllianceType::Military => 0.3,
            AllianceType::Full => 0.25,
            AllianceType::Trade => 0.1,
            AllianceType::Economic => 0.08,
            AllianceType::NonAggression => 0.05,
        }
    }
}

/// Named clauses of an alliance. Generated by [`generate_alliance_terms`],
/// adjustable by callers before formation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllianceTerms {
    pub defensive_pact: bool,
    pub trade_bonus: f64,
    pub military_access: bool,
    pub intelligence_sharing: bool,
    pub resource_sharing: bool,
    pub technology_sharing: bool,
    pub duration_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alliance {
    pub id: Uuid,
    pub alliance_type: AllianceType,
    pub members: Vec<FactionId>,
    pub terms: AllianceTerms,
    pub duration_months: u32,
    pub formed_at: SimDay,
    pub stability_score: f64,
}

impl Alliance {
    pub fn is_member(&self, faction: FactionId) -> bool {
        self.members.contains(&faction)
    }

    pub fn age_months(&self, now: SimDay) -> f64 {
        now.saturating_sub(self.formed_at) as f64 / 30.0
    }
}

/// Trait pairs that pull factions apart when split across the two sides
const CONFLICTING_TRAITS: [(FactionTrait, FactionTrait); 4] = [
    (FactionTrait::Militaristic, FactionTrait::Peaceful),
    (FactionTrait::Aggressive, FactionTrait::Diplomatic),
    (FactionTrait::Expansionist, FactionTrait::Isolationist),
    (FactionTrait::Honorable, FactionTrait::Treacherous),
];

/// Compatibility of two factions as alliance partners, in [0, 1].
/// Weighted combination of ideology distance, trait overlap/conflict, and
/// the pair's current tension.
pub fn evaluate_alliance_compatibility(
    a: &FactionProfile,
    b: &FactionProfile,
    tension: f64,
    config: &AllianceConfig,
) -> f64 {
    // Ideology axis spans [-1, 1], so distance spans [0, 2]
    let ideology_score = 1.0 - (a.ideology - b.ideology).abs() / 2.0;

    let shared = a.traits.intersection(&b.traits).count() as f64;
    let conflicts = CONFLICTING_TRAITS
        .iter()
        .filter(|(x, y)| {
            (a.has_trait(*x) && b.has_trait(*y)) || (a.has_trait(*y) && b.has_trait(*x))
        })
        .count() as f64;
    let trait_score = (0.5 + 0.1 * shared - 0.15 * conflicts).clamp(0.0, 1.0);

    // Tension spans [-100, 100]; alliance-level tension scores near 1
    let tension_score = ((100.0 - tension) / 200.0).clamp(0.0, 1.0);

    (config.ideology_weight * ideology_score
        + config.trait_weight * trait_score
        + config.tension_weight * tension_score)
        .clamp(0.0, 1.0)
}

/// Aggregate strength assessment of an alliance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllianceStrength {
    pub total_military: f64,
    pub total_economic: f64,
    /// Normalized rating in [0, 1]
    pub overall_rating: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

pub fn evaluate_alliance_strength(
    alliance: &Alliance,
    members: &[&FactionProfile],
) -> AllianceStrength {
    let total_military: f64 = members.iter().map(|m| m.military_strength).sum();
    let total_economic: f64 = members.iter().map(|m| m.economic_strength).sum();
    let count = members.len().max(1) as f64;

    let avg_military = total_military / count;
    let avg_economic = total_economic / count;
    let overall_rating =
        ((avg_military + avg_economic) / (2.0 * STRENGTH_REFERENCE * 1.5)).clamp(0.0, 1.0);

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    if avg_military >= STRENGTH_REFERENCE * 1.2 {
        strengths.push("dominant military".to_string());
    } else if avg_military < STRENGTH_REFERENCE * 0.8 {
        weaknesses.push("thin military".to_string());
    }
    if avg_economic >= STRENGTH_REFERENCE * 1.2 {
        strengths.push("deep treasury".to_string());
    } else if avg_economic < STRENGTH_REFERENCE * 0.8 {
        weaknesses.push("weak economy".to_string());
    }
    if members.len() >= 3 {
        strengths.push("broad membership".to_string());
    }
    if alliance.terms.defensive_pact {
        strengths.push("binding defensive pact".to_string());
    }
    if alliance.stability_score < 0.3 {
        weaknesses.push("fraying cohesion".to_string());
    }

    AllianceStrength {
        total_military,
        total_economic,
        overall_rating,
        strengths,
        weaknesses,
    }
}

/// Context of the conflict an ally is being called into
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictContext {
    /// Strategic importance to the alliance, in [0, 1]
    pub strategic_importance: f64,
    /// Severity of the conflict, in [0, 1]
    pub severity: f64,
}

/// Probability that `responder` answers `requester`'s call to arms.
/// Alliance type sets the base ladder; importance and severity pull the
/// chance up, existing commitments and instability pull it down.
pub fn calculate_call_to_arms_chance(
    alliance: &Alliance,
    requester: FactionId,
    responder: &FactionProfile,
    conflict: &ConflictContext,
    config: &AllianceConfig,
) -> f64 {
    debug_assert!(alliance.is_member(requester));

    let chance = config.base_call_to_arms
        + alliance.alliance_type.call_to_arms_bonus()
        + conflict.strategic_importance * config.importance_weight
        + conflict.severity * config.severity_weight
        - responder.active_commitments as f64 * config.commitment_penalty
        - (1.0 - alliance.stability_score) * config.instability_penalty;

    chance.clamp(0.0, 1.0)
}

/// What one member gets out of the alliance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberBenefits {
    pub strength_bonus: f64,
    pub trade_efficiency: f64,
    pub defensive_pact: bool,
    pub resource_sharing: bool,
    pub technology_sharing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllianceBenefits {
    pub per_member: HashMap<FactionId, MemberBenefits>,
    /// Flags that apply to the alliance as a whole
    pub shared: Vec<String>,
}

/// Benefits keyed by alliance type: military grants strength and a pact,
/// economic grants trade efficiency and resource sharing, full is the union
/// plus technology sharing, non-aggression only a shared flag. Optional
/// terms add on top.
pub fn calculate_alliance_benefits(alliance: &Alliance) -> AllianceBenefits {
    let mut benefits = AllianceBenefits::default();

    let mut template = MemberBenefits::default();
    match alliance.alliance_type {
        AllianceType::Military => {
            template.strength_bonus = 0.1;
            template.defensive_pact = true;
            benefits.shared.push("joint_command".to_string());
        }
        AllianceType::Economic => {
            template.trade_efficiency = 0.15;
            template.resource_sharing = true;
            benefits.shared.push("customs_union".to_string());
        }
        AllianceType::Full => {
            template.strength_bonus = 0.1;
            template.defensive_pact = true;
            template.trade_efficiency = 0.15;
            template.resource_sharing = true;
            template.technology_sharing = true;
            benefits.shared.push("joint_command".to_string());
            benefits.shared.push("customs_union".to_string());
            benefits.shared.push("shared_research".to_string());
        }
        AllianceType::Trade => {
            template.trade_efficiency = 0.1;
        }
        AllianceType::NonAggression => {
            benefits.shared.push("mutual_non_aggression".to_string());
        }
    }

    if alliance.terms.military_access {
        template.strength_bonus += 0.05;
    }
    if alliance.terms.trade_bonus > 0.0 {
        template.trade_efficiency += alliance.terms.trade_bonus;
    }
    if alliance.terms.intelligence_sharing {
        benefits.shared.push("intelligence_network".to_string());
    }

    for &member in &alliance.members {
        benefits.per_member.insert(member, template.clone());
    }
    benefits
}

/// Generate the terms for a prospective alliance. Duration and pact
/// inclusion scale upward with compatibility; honorable partners commit
/// for longer.
pub fn generate_alliance_terms(
    a: &FactionProfile,
    b: &FactionProfile,
    alliance_type: AllianceType,
    compatibility: f64,
    config: &AllianceConfig,
) -> AllianceTerms {
    let compatibility = compatibility.clamp(0.0, 1.0);
    let committed = compatibility >= config.pact_compatibility_threshold;

    let mut duration_months = 12 + (compatibility * 48.0) as u32;
    if a.has_trait(FactionTrait::Honorable) && b.has_trait(FactionTrait::Honorable) {
        duration_months += 12;
    }

    let martial = matches!(alliance_type, AllianceType::Military | AllianceType::Full);
    let commercial = matches!(
        alliance_type,
        AllianceType::Economic | AllianceType::Trade | AllianceType::Full
    );

    AllianceTerms {
        defensive_pact: martial && committed,
        trade_bonus: if commercial {
            0.05 + 0.1 * compatibility
        } else {
            0.0
        },
        military_access: martial && committed,
        intelligence_sharing: alliance_type == AllianceType::Full && compatibility >= 0.8,
        resource_sharing: matches!(alliance_type, AllianceType::Economic | AllianceType::Full),
        technology_sharing: alliance_type == AllianceType::Full,
        duration_months,
    }
}

/// Events that feed the stability estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllianceEventKind {
    HonoredCallToArms,
    RefusedCallToArms,
    TradeDispute,
    JointVictory,
    BrokenPromise,
}

impl AllianceEventKind {
    pub fn stability_weight(&self) -> f64 {
        match self {
            AllianceEventKind::HonoredCallToArms => 0.1,
            AllianceEventKind::JointVictory => 0.15,
            AllianceEventKind::TradeDispute => -0.05,
            AllianceEventKind::RefusedCallToArms => -0.2,
            AllianceEventKind::BrokenPromise => -0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AllianceEvent {
    pub kind: AllianceEventKind,
    pub day: SimDay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllianceStability {
    /// Stability in [0, 1]
    pub score: f64,
    /// The alliance is at imminent risk of dissolving
    pub breaking_point: bool,
}

/// Stability at or below which an alliance is considered breaking
pub const BREAKING_POINT_THRESHOLD: f64 = 0.2;

/// Stability from age, current tension between members, and weighted recent
/// events. A first-year alliance earns a small maturity bonus over time.
pub fn evaluate_alliance_stability(
    alliance: &Alliance,
    max_member_tension: f64,
    recent_events: &[AllianceEvent],
    now: SimDay,
) -> AllianceStability {
    let age_years = alliance.age_months(now) / 12.0;
    let maturity = age_years.min(1.0) * 0.2;

    // Tension spans [-100, 100]
    let tension_drag = (max_member_tension.clamp(-100.0, 100.0) / 100.0) * 0.3;

    let event_shift: f64 = recent_events
        .iter()
        .map(|e| e.kind.stability_weight())
        .sum();

    let score = (0.5 + maturity - tension_drag + event_shift).clamp(0.0, 1.0);
    AllianceStability {
        score,
        breaking_point: score <= BREAKING_POINT_THRESHOLD,
    }
}

/// Impact of a sanction on its target, scaled by sanction type, duration,
/// and how dependent the target is on the issuer's trade and arms.
pub fn evaluate_sanction_impact(
    sanction_type: SanctionType,
    target: &FactionProfile,
    issuer: &FactionProfile,
    duration_months: f64,
) -> SanctionImpact {
    let severity = sanction_type.severity();
    let duration_factor = (duration_months / 12.0).clamp(0.25, 2.0);

    // Dependence proxies: share of the combined economy/arsenal the issuer
    // represents from the target's point of view
    let trade_dependence =
        issuer.economic_strength / (issuer.economic_strength + target.economic_strength).max(1.0);
    let military_dependence =
        issuer.military_strength / (issuer.military_strength + target.military_strength).max(1.0);

    let economic_impact = severity * duration_factor * trade_dependence * 100.0;
    let military_impact = match sanction_type {
        SanctionType::Military | SanctionType::Full => {
            severity * duration_factor * military_dependence * 50.0
        }
        _ => 0.0,
    };
    let reputation_impact = -(severity * 10.0);
    let tension_change = severity * SANCTION_TENSION_PER_SEVERITY;

    SanctionImpact {
        economic_impact,
        reputation_impact,
        military_impact,
        tension_change,
        effects: sanction_type.effects(),
    }
}

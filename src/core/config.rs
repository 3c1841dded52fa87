//! Simulation configuration
//!
//! All tuning knobs are collected here. Config structs are immutable after
//! construction and shared read-only across the managers.

use serde::Deserialize;

use crate::core::error::{Result, StrifeError};

/// Tension accumulation and decay tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TensionConfig {
    /// Resting tension value. Decay moves values toward this, not toward zero.
    pub base_tension: f64,
    /// Tension units removed per simulated day of decay
    pub decay_rate: f64,
    /// Upper clamp for any pair's tension
    pub max_tension: f64,
    /// Lower clamp for any pair's tension (negative = friendly)
    pub min_tension: f64,
    /// Delta applied for direct faction-level provocations
    pub faction_impact: f64,
    /// Delta applied for border incidents
    pub border_impact: f64,
    /// Multiplier applied to world-event severity when computing event deltas
    pub event_impact: f64,
}

impl Default for TensionConfig {
    fn default() -> Self {
        Self {
            base_tension: 0.0,
            decay_rate: 0.5,
            max_tension: 100.0,
            min_tension: -100.0,
            faction_impact: 10.0,
            border_impact: 5.0,
            event_impact: 1.0,
        }
    }
}

impl TensionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_tension >= self.max_tension {
            return Err(StrifeError::Validation(format!(
                "min_tension ({}) must be below max_tension ({})",
                self.min_tension, self.max_tension
            )));
        }
        if self.base_tension < self.min_tension || self.base_tension > self.max_tension {
            return Err(StrifeError::Validation(format!(
                "base_tension ({}) must lie within [{}, {}]",
                self.base_tension, self.min_tension, self.max_tension
            )));
        }
        if self.decay_rate <= 0.0 {
            return Err(StrifeError::Validation(
                "decay_rate must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Relative weight of each component in the aggregate war score
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutcomeWeights {
    /// Battle-victory differential
    pub battles: f64,
    /// Exhaustion differential
    pub exhaustion: f64,
    /// Controlled point-of-interest differential
    pub territory: f64,
}

impl Default for OutcomeWeights {
    fn default() -> Self {
        Self {
            battles: 0.7,
            exhaustion: 0.2,
            territory: 0.1,
        }
    }
}

/// War simulation tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarConfig {
    /// Minimum days before a victory verdict can be reached
    pub default_war_duration: u32,
    /// Exhaustion accrued per side per simulated day
    pub exhaustion_rate: f64,
    /// Upper clamp on either side's exhaustion
    pub max_exhaustion: f64,
    /// Days after a war ends during which re-declaration is refused
    pub min_peace_duration: u64,
    /// Extra exhaustion per battle fought
    pub attrition_factor: f64,
    /// Daily probability that a raid/battle occurs
    pub battle_frequency: f64,
    pub outcome_weights: OutcomeWeights,
    /// Strength multiplier for a defender controlling the contested region
    pub defender_advantage: f64,
    /// Floor for per-battle loss fractions
    pub base_losses: f64,
    /// Fraction of a side's loss fraction applied to regional resources
    pub resource_loss_factor: f64,
    /// Fraction of the loser's resource loss credited to the winner
    pub resource_capture_factor: f64,
    /// |war score| at or above which the war ends decisively
    pub decisive_victory_threshold: f64,
    /// |war score| at or above which the war ends in an ordinary victory
    pub victory_threshold: f64,
    /// Days after which a war without a clear majority ends in stalemate
    pub stalemate_duration: u32,
}

impl Default for WarConfig {
    fn default() -> Self {
        Self {
            default_war_duration: 30,
            exhaustion_rate: 0.5,
            max_exhaustion: 100.0,
            min_peace_duration: 180,
            attrition_factor: 0.1,
            battle_frequency: 0.3,
            outcome_weights: OutcomeWeights::default(),
            defender_advantage: 1.2,
            base_losses: 0.05,
            resource_loss_factor: 0.1,
            resource_capture_factor: 0.3,
            decisive_victory_threshold: 0.4,
            victory_threshold: 0.2,
            stalemate_duration: 180,
        }
    }
}

impl WarConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.battle_frequency) {
            return Err(StrifeError::Validation(format!(
                "battle_frequency ({}) must lie within [0, 1]",
                self.battle_frequency
            )));
        }
        if self.victory_threshold >= self.decisive_victory_threshold {
            return Err(StrifeError::Validation(format!(
                "victory_threshold ({}) must be below decisive_victory_threshold ({})",
                self.victory_threshold, self.decisive_victory_threshold
            )));
        }
        if self.decisive_victory_threshold > 1.0 {
            return Err(StrifeError::Validation(
                "decisive_victory_threshold cannot exceed 1.0".into(),
            ));
        }
        if self.max_exhaustion <= 0.0 {
            return Err(StrifeError::Validation(
                "max_exhaustion must be positive".into(),
            ));
        }
        for (name, value) in [
            ("resource_loss_factor", self.resource_loss_factor),
            ("resource_capture_factor", self.resource_capture_factor),
            ("base_losses", self.base_losses),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StrifeError::Validation(format!(
                    "{} ({}) must lie within [0, 1]",
                    name, value
                )));
            }
        }
        if self.defender_advantage < 1.0 {
            return Err(StrifeError::Validation(
                "defender_advantage must be at least 1.0".into(),
            ));
        }
        Ok(())
    }
}

/// Alliance formation and stability tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AllianceConfig {
    /// Weight of ideology distance in compatibility
    pub ideology_weight: f64,
    /// Weight of trait overlap/conflict in compatibility
    pub trait_weight: f64,
    /// Weight of current tension in compatibility
    pub tension_weight: f64,
    /// Base probability of answering a call to arms
    pub base_call_to_arms: f64,
    /// Call-to-arms bonus per unit of conflict strategic importance
    pub importance_weight: f64,
    /// Call-to-arms bonus per unit of conflict severity
    pub severity_weight: f64,
    /// Call-to-arms penalty per existing war commitment of the responder
    pub commitment_penalty: f64,
    /// Call-to-arms penalty scaled by alliance instability
    pub instability_penalty: f64,
    /// Compatibility at or above which generated terms include a defensive pact
    pub pact_compatibility_threshold: f64,
}

impl Default for AllianceConfig {
    fn default() -> Self {
        Self {
            ideology_weight: 0.4,
            trait_weight: 0.3,
            tension_weight: 0.3,
            base_call_to_arms: 0.3,
            importance_weight: 0.2,
            severity_weight: 0.15,
            commitment_penalty: 0.1,
            instability_penalty: 0.25,
            pact_compatibility_threshold: 0.6,
        }
    }
}

impl AllianceConfig {
    pub fn validate(&self) -> Result<()> {
        let weight_sum = self.ideology_weight + self.trait_weight + self.tension_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(StrifeError::Validation(format!(
                "compatibility weights must sum to 1.0, got {}",
                weight_sum
            )));
        }
        if !(0.0..=1.0).contains(&self.base_call_to_arms) {
            return Err(StrifeError::Validation(
                "base_call_to_arms must lie within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Proxy war tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyWarConfig {
    /// Success chance when proxy and target strength are equal
    pub base_success: f64,
    /// Success bonus per unit of sponsor covert-ops strength (normalized)
    pub covert_ops_weight: f64,
    /// Success bonus scaled by region instability
    pub instability_weight: f64,
    /// Success penalty per unit of target counter-intel strength (normalized)
    pub counter_intel_weight: f64,
    /// Lower clamp on success chance
    pub min_success: f64,
    /// Upper clamp on success chance
    pub max_success: f64,
    /// Monthly cost of an intensity-1.0 insurgency; other types scale off this
    pub base_monthly_cost: f64,
}

impl Default for ProxyWarConfig {
    fn default() -> Self {
        Self {
            base_success: 0.4,
            covert_ops_weight: 0.2,
            instability_weight: 0.15,
            counter_intel_weight: 0.2,
            min_success: 0.1,
            max_success: 0.9,
            base_monthly_cost: 1000.0,
        }
    }
}

impl ProxyWarConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_success >= self.max_success {
            return Err(StrifeError::Validation(format!(
                "min_success ({}) must be below max_success ({})",
                self.min_success, self.max_success
            )));
        }
        if self.base_monthly_cost <= 0.0 {
            return Err(StrifeError::Validation(
                "base_monthly_cost must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Peace brokering tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiplomacyConfig {
    /// Acceptance chance for perfectly neutral terms with no incentives
    pub base_peace_acceptance: f64,
    /// Acceptance bonus per unit of terms favorability
    pub favorability_weight: f64,
    /// Acceptance bonus per unit of offered incentive (normalized)
    pub incentive_weight: f64,
    /// Lower clamp on acceptance chance
    pub min_acceptance: f64,
    /// Upper clamp on acceptance chance
    pub max_acceptance: f64,
}

impl Default for DiplomacyConfig {
    fn default() -> Self {
        Self {
            base_peace_acceptance: 0.4,
            favorability_weight: 0.3,
            incentive_weight: 0.25,
            min_acceptance: 0.05,
            max_acceptance: 0.95,
        }
    }
}

impl DiplomacyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_acceptance >= self.max_acceptance {
            return Err(StrifeError::Validation(format!(
                "min_acceptance ({}) must be below max_acceptance ({})",
                self.min_acceptance, self.max_acceptance
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for a simulation run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed; identical seeds reproduce identical runs
    pub seed: u64,
    /// Days to simulate (demo runner)
    pub days: u64,
    pub tension: TensionConfig,
    pub war: WarConfig,
    pub alliance: AllianceConfig,
    pub proxy: ProxyWarConfig,
    pub diplomacy: DiplomacyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            days: 365,
            tension: TensionConfig::default(),
            war: WarConfig::default(),
            alliance: AllianceConfig::default(),
            proxy: ProxyWarConfig::default(),
            diplomacy: DiplomacyConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate all sub-configs for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.tension.validate()?;
        self.war.validate()?;
        self.alliance.validate()?;
        self.proxy.validate()?;
        self.diplomacy.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_tension_bounds_rejected() {
        let config = TensionConfig {
            min_tension: 50.0,
            max_tension: -50.0,
            ..TensionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_ordering_enforced() {
        let config = WarConfig {
            victory_threshold: 0.8,
            decisive_victory_threshold: 0.5,
            ..WarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_override() {
        let config: SimulationConfig = toml::from_str(
            r#"
            seed = 99
            [war]
            battle_frequency = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, 99);
        assert!((config.war.battle_frequency - 0.5).abs() < f64::EPSILON);
        assert!((config.tension.max_tension - 100.0).abs() < f64::EPSILON);
    }
}

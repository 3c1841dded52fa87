//! War simulation formulas
//!
//! Pure functions over war state and boundary data. Every probabilistic
//! function takes the random source as a parameter so callers can seed it.

use rand::Rng;
use std::collections::HashMap;

use crate::core::config::WarConfig;
use crate::core::types::{FactionId, FactionTrait, RegionId, SimDay};
use crate::war::state::{Battle, War, WarOutcomeType};
use crate::world::{FactionProfile, RegionState};

/// War-chance adjustment for a militaristic or peaceful faction
pub const MAJOR_TRAIT_WAR_SHIFT: f64 = 0.2;
/// War-chance adjustment for aggressive/diplomatic dispositions
pub const MINOR_TRAIT_WAR_SHIFT: f64 = 0.1;
/// War-chance adjustment for expansionist/isolationist dispositions
pub const LESSER_TRAIT_WAR_SHIFT: f64 = 0.05;

/// Battle strength multiplier band
pub const STRENGTH_ROLL_MIN: f64 = 0.8;
pub const STRENGTH_ROLL_MAX: f64 = 1.2;

/// Loss-fraction bands; winners draw from the low band, losers from the high
pub const WINNER_LOSS_MAX: f64 = 0.3;
pub const LOSER_LOSS_MIN: f64 = 0.25;
pub const LOSS_FLOOR: f64 = 0.05;
pub const LOSS_CEILING: f64 = 0.7;

/// Baseline casualties per war day and per battle fought
pub const CASUALTIES_PER_DAY: u64 = 20;
pub const CASUALTIES_PER_BATTLE: u64 = 150;
/// Winner's share of baseline casualties
pub const WINNER_CASUALTY_SHARE: f64 = 0.6;
/// Refugees per baseline casualty after a conquest
pub const REFUGEE_MULTIPLIER: f64 = 3.0;

/// Reparations per war day, scaled by outcome decisiveness
pub const REPARATIONS_PER_DAY: f64 = 10.0;

/// A region is disputed when both factions hold a nonzero claim, or when one
/// controls it while the other claims it. Order follows the input sequence.
pub fn calculate_disputed_regions(
    a: FactionId,
    b: FactionId,
    regions: &[RegionState],
) -> Vec<RegionId> {
    regions
        .iter()
        .filter(|region| {
            let claim_a = region.claim_of(a);
            let claim_b = region.claim_of(b);
            let both_claim = claim_a > 0.0 && claim_b > 0.0;
            let controller_vs_claim = (region.is_controlled_by(a) && claim_b > 0.0)
                || (region.is_controlled_by(b) && claim_a > 0.0);
            both_claim || controller_vs_claim
        })
        .map(|region| region.id)
        .collect()
}

/// Probability that tension escalates into open war.
///
/// Base chance is `(tension / 100)^2`, zero at or below zero tension, then
/// shifted per trait on either side and clamped to [0, 1].
pub fn calculate_war_chances(
    tension: f64,
    traits_a: &ahash::AHashSet<FactionTrait>,
    traits_b: &ahash::AHashSet<FactionTrait>,
) -> f64 {
    let mut chance = if tension <= 0.0 {
        0.0
    } else {
        (tension / 100.0).powi(2)
    };

    for traits in [traits_a, traits_b] {
        if traits.contains(&FactionTrait::Militaristic) {
            chance += MAJOR_TRAIT_WAR_SHIFT;
        }
        if traits.contains(&FactionTrait::Peaceful) {
            chance -= MAJOR_TRAIT_WAR_SHIFT;
        }
        if traits.contains(&FactionTrait::Aggressive) {
            chance += MINOR_TRAIT_WAR_SHIFT;
        }
        if traits.contains(&FactionTrait::Diplomatic) {
            chance -= MINOR_TRAIT_WAR_SHIFT;
        }
        if traits.contains(&FactionTrait::Expansionist) {
            chance += LESSER_TRAIT_WAR_SHIFT;
        }
        if traits.contains(&FactionTrait::Isolationist) {
            chance -= LESSER_TRAIT_WAR_SHIFT;
        }
    }

    chance.clamp(0.0, 1.0)
}

/// Resolve one battle between an attacker and a defender in a region.
///
/// Each side's effective strength is its military strength times a random
/// multiplier in [0.8, 1.2]; the defender additionally gets the terrain
/// bonus and, when it controls the region, the configured defender
/// advantage. The stronger adjusted side wins; the winner draws losses from
/// the low band, the loser from the high band.
pub fn evaluate_battle_outcome(
    attacker: &FactionProfile,
    defender: &FactionProfile,
    region: &RegionState,
    config: &WarConfig,
    day: SimDay,
    rng: &mut impl Rng,
) -> Battle {
    let attacker_strength =
        attacker.military_strength * rng.gen_range(STRENGTH_ROLL_MIN..STRENGTH_ROLL_MAX);

    let terrain_mod = 1.0 + region.terrain.defense_bonus();
    let holding_mod = if region.is_controlled_by(defender.id) {
        config.defender_advantage
    } else {
        1.0
    };
    let defender_strength = defender.military_strength
        * rng.gen_range(STRENGTH_ROLL_MIN..STRENGTH_ROLL_MAX)
        * terrain_mod
        * holding_mod;

    let attacker_won = attacker_strength > defender_strength;

    let winner_losses = rng
        .gen_range(config.base_losses..WINNER_LOSS_MAX)
        .clamp(LOSS_FLOOR, LOSS_CEILING);
    let loser_losses = rng
        .gen_range(LOSER_LOSS_MIN..LOSS_CEILING)
        .clamp(LOSS_FLOOR, LOSS_CEILING);

    let (attacker_losses, defender_losses) = if attacker_won {
        (winner_losses, loser_losses)
    } else {
        (loser_losses, winner_losses)
    };

    Battle {
        winner_id: if attacker_won { attacker.id } else { defender.id },
        attacker_id: attacker.id,
        defender_id: defender.id,
        region_id: region.id,
        terrain_type: region.terrain,
        attacker_strength,
        defender_strength,
        attacker_losses,
        defender_losses,
        timestamp: day,
    }
}

/// Resource deltas produced by one battle, per side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceChanges {
    pub attacker: HashMap<String, f64>,
    pub defender: HashMap<String, f64>,
}

/// Each side loses `resource * own_loss_fraction * resource_loss_factor`;
/// a `resource_capture_factor` share of the loser's loss is credited to the
/// winner instead of destroyed.
pub fn calculate_resource_changes(
    battle: &Battle,
    region_resources: &HashMap<String, f64>,
    config: &WarConfig,
) -> ResourceChanges {
    let mut changes = ResourceChanges::default();
    let attacker_won = battle.winner_id == battle.attacker_id;

    for (name, stock) in region_resources {
        let attacker_loss = stock * battle.attacker_losses * config.resource_loss_factor;
        let defender_loss = stock * battle.defender_losses * config.resource_loss_factor;

        let (winner_loss, loser_loss) = if attacker_won {
            (attacker_loss, defender_loss)
        } else {
            (defender_loss, attacker_loss)
        };
        let captured = loser_loss * config.resource_capture_factor;

        let (attacker_delta, defender_delta) = if attacker_won {
            (-winner_loss + captured, -loser_loss)
        } else {
            (-loser_loss, -winner_loss + captured)
        };

        changes.attacker.insert(name.clone(), attacker_delta);
        changes.defender.insert(name.clone(), defender_delta);
    }

    changes
}

/// Aggregate war score in [-1, 1]; positive favors `faction_a`.
///
/// Combines the battle-win differential, the exhaustion differential, and
/// the controlled point-of-interest differential under the configured
/// outcome weights.
pub fn war_score(war: &War, config: &WarConfig) -> f64 {
    let weights = &config.outcome_weights;

    let battle_total = war.battles.len();
    let battle_component = if battle_total == 0 {
        0.0
    } else {
        let wins_a = war.wins_of(war.faction_a) as f64;
        let wins_b = war.wins_of(war.faction_b) as f64;
        (wins_a - wins_b) / battle_total as f64
    };

    let exhaustion_component =
        (war.exhaustion_b - war.exhaustion_a) / config.max_exhaustion;

    let region_total = war.disputed_regions.len();
    let territory_component = if region_total == 0 {
        0.0
    } else {
        let pois_a = war.pois_of(war.faction_a) as f64;
        let pois_b = war.pois_of(war.faction_b) as f64;
        (pois_a - pois_b) / region_total as f64
    };

    (weights.battles * battle_component
        + weights.exhaustion * exhaustion_component
        + weights.territory * territory_component)
        .clamp(-1.0, 1.0)
}

/// Termination decision produced by [`simulate_war`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarVerdict {
    pub outcome_type: WarOutcomeType,
    pub winner: Option<FactionId>,
}

/// Check whether the war should end, from its aggregate score and duration.
///
/// Victory verdicts require the war to have run at least
/// `default_war_duration` days; a war past `stalemate_duration` without a
/// clear majority ends in stalemate. Already-ended wars pass through
/// unchanged (`None`).
pub fn simulate_war(war: &War, config: &WarConfig) -> Option<WarVerdict> {
    if !war.is_active || war.outcome.is_some() {
        return None;
    }

    let score = war_score(war, config);
    let magnitude = score.abs();
    let leader = if score > 0.0 {
        war.faction_a
    } else {
        war.faction_b
    };

    if war.day >= config.default_war_duration {
        if magnitude >= config.decisive_victory_threshold {
            return Some(WarVerdict {
                outcome_type: WarOutcomeType::DecisiveVictory,
                winner: Some(leader),
            });
        }
        if magnitude >= config.victory_threshold {
            return Some(WarVerdict {
                outcome_type: WarOutcomeType::Victory,
                winner: Some(leader),
            });
        }
    }

    if war.day > config.stalemate_duration {
        return Some(WarVerdict {
            outcome_type: WarOutcomeType::Stalemate,
            winner: None,
        });
    }

    None
}

/// Regions transferred to the winner: the configured fraction of the
/// disputed list, in order. No winner means no transfer.
pub fn calculate_territorial_changes(
    winner: Option<FactionId>,
    war: &War,
    outcome_type: WarOutcomeType,
) -> Vec<RegionId> {
    if winner.is_none() {
        return Vec::new();
    }
    let fraction = outcome_type.territorial_transfer_fraction();
    let count = (war.disputed_regions.len() as f64 * fraction).round() as usize;
    war.disputed_regions.iter().copied().take(count).collect()
}

/// Casualty and displacement totals for a concluded war
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationImpact {
    pub casualties: HashMap<FactionId, u64>,
    pub refugees: u64,
}

/// Casualties scale with war length and battle count; the winner's toll is
/// consistently lower. Conquest outcomes displace refugees from the loser.
pub fn calculate_population_impact(
    winner: FactionId,
    loser: FactionId,
    war: &War,
    outcome_type: WarOutcomeType,
) -> PopulationImpact {
    let baseline =
        war.day as u64 * CASUALTIES_PER_DAY + war.battles.len() as u64 * CASUALTIES_PER_BATTLE;

    let mut casualties = HashMap::new();
    casualties.insert(winner, (baseline as f64 * WINNER_CASUALTY_SHARE) as u64);
    casualties.insert(loser, baseline);

    let refugees = if outcome_type == WarOutcomeType::DecisiveVictory {
        (baseline as f64 * REFUGEE_MULTIPLIER) as u64
    } else {
        0
    };

    PopulationImpact {
        casualties,
        refugees,
    }
}

/// Cultural consequences of a concluded war
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CulturalImpact {
    /// Winner's influence score per disputed region
    pub regional_influence: HashMap<RegionId, f64>,
    /// Regions whose dominant language shifts toward the winner's
    pub language_shifts: Vec<RegionId>,
    /// Aggregate influence delta per faction (winner up, loser down)
    pub influence_changes: HashMap<FactionId, f64>,
}

/// Per disputed region the winner gains an influence score set by the
/// outcome; influence at or above 0.5 shifts the region's language.
pub fn calculate_cultural_impact(
    winner: FactionId,
    loser: FactionId,
    war: &War,
    outcome_type: WarOutcomeType,
) -> CulturalImpact {
    let influence = outcome_type.winner_influence();
    let mut impact = CulturalImpact::default();

    for &region in &war.disputed_regions {
        impact.regional_influence.insert(region, influence);
        if influence >= 0.5 {
            impact.language_shifts.push(region);
        }
    }

    let total = influence * war.disputed_regions.len() as f64;
    impact.influence_changes.insert(winner, total);
    impact.influence_changes.insert(loser, -total);
    impact
}

/// Reparations flowing loser -> winner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reparations {
    pub from: FactionId,
    pub to: FactionId,
    pub amount: f64,
}

/// Post-war settlement payload for the orchestration layer
#[derive(Debug, Clone)]
pub struct WarResolution {
    /// Delta to feed back into the tension layer
    pub tension_adjustment: f64,
    pub territorial_changes: Vec<RegionId>,
    pub reparations: Option<Reparations>,
    pub treaty_duration_days: u32,
    pub population: Option<PopulationImpact>,
    pub cultural: Option<CulturalImpact>,
}

/// Settlement terms for an ended war; `None` while the war is active or has
/// no outcome attached.
pub fn resolve_war(war: &War) -> Option<WarResolution> {
    if war.is_active {
        return None;
    }
    let outcome = war.outcome.as_ref()?;

    let (reparations, population, cultural) =
        match (outcome.winner_id, outcome.loser_id) {
            (Some(winner), Some(loser)) => {
                let decisiveness = match outcome.outcome_type {
                    WarOutcomeType::DecisiveVictory => 1.0,
                    WarOutcomeType::Victory => 0.5,
                    _ => 0.0,
                };
                let reparations = (decisiveness > 0.0).then(|| Reparations {
                    from: loser,
                    to: winner,
                    amount: war.day as f64 * REPARATIONS_PER_DAY * decisiveness,
                });
                (
                    reparations,
                    Some(calculate_population_impact(
                        winner,
                        loser,
                        war,
                        outcome.outcome_type,
                    )),
                    Some(calculate_cultural_impact(
                        winner,
                        loser,
                        war,
                        outcome.outcome_type,
                    )),
                )
            }
            _ => (None, None, None),
        };

    Some(WarResolution {
        tension_adjustment: outcome.outcome_type.tension_adjustment(),
        territorial_changes: calculate_territorial_changes(
            outcome.winner_id,
            war,
            outcome.outcome_type,
        ),
        reparations,
        treaty_duration_days: outcome.outcome_type.treaty_duration_days(),
        population,
        cultural,
    })
}

/// Reputation deltas for a concluded war
pub fn reputation_changes(
    winner: Option<FactionId>,
    loser: Option<FactionId>,
    faction_a: FactionId,
    faction_b: FactionId,
    outcome_type: WarOutcomeType,
) -> HashMap<FactionId, f64> {
    let mut changes = HashMap::new();
    match (winner, loser) {
        (Some(winner), Some(loser)) => {
            let swing = match outcome_type {
                WarOutcomeType::DecisiveVictory => 15.0,
                WarOutcomeType::Victory => 10.0,
                _ => 5.0,
            };
            changes.insert(winner, swing);
            changes.insert(loser, -swing);
        }
        _ => {
            // Inconclusive wars cost both sides a little standing
            changes.insert(faction_a, -2.0);
            changes.insert(faction_b, -2.0);
        }
    }
    changes
}

/// Roll for the day's raids. At most one battle per day, gated by
/// `battle_frequency`; the attacking side and contested region are drawn at
/// random from the war's participants and disputed regions.
pub fn generate_daily_raids(
    war: &War,
    factions: &HashMap<FactionId, FactionProfile>,
    regions: &HashMap<RegionId, RegionState>,
    config: &WarConfig,
    day: SimDay,
    rng: &mut impl Rng,
) -> Vec<Battle> {
    if war.disputed_regions.is_empty() {
        return Vec::new();
    }
    if rng.gen::<f64>() >= config.battle_frequency {
        return Vec::new();
    }

    let region_id = war.disputed_regions[rng.gen_range(0..war.disputed_regions.len())];
    let (attacker_id, defender_id) = if rng.gen::<bool>() {
        (war.faction_a, war.faction_b)
    } else {
        (war.faction_b, war.faction_a)
    };

    let (Some(attacker), Some(defender), Some(region)) = (
        factions.get(&attacker_id),
        factions.get(&defender_id),
        regions.get(&region_id),
    ) else {
        return Vec::new();
    };

    vec![evaluate_battle_outcome(
        attacker, defender, region, config, day, rng,
    )]
}

//! Headless demo run of the relations simulation
//!
//! Seeds a small world, drives daily ticks for the configured number of
//! days, and logs a summary. Pass a TOML config path to override defaults:
//!
//!   relations_sim [config.toml]

use std::collections::HashMap;

use strife::core::config::SimulationConfig;
use strife::core::types::{FactionId, FactionPair, FactionTrait, RegionId, TerrainType};
use strife::simulation::{SimulationEngine, WorldEvent};
use strife::tension::WorldEventType;
use strife::world::{FactionProfile, RegionState};

fn load_config() -> SimulationConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationConfig::default();
    };
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read config {}: {}", path, e));
    toml::from_str(&raw).unwrap_or_else(|e| panic!("failed to parse config {}: {}", path, e))
}

fn demo_factions() -> HashMap<FactionId, FactionProfile> {
    let mut factions = HashMap::new();

    let mut ironmarch = FactionProfile::new(FactionId(1), "Ironmarch Compact");
    ironmarch.military_strength = 140.0;
    ironmarch.economic_strength = 90.0;
    ironmarch.traits.insert(FactionTrait::Militaristic);
    ironmarch.traits.insert(FactionTrait::Expansionist);

    let mut veridia = FactionProfile::new(FactionId(2), "Veridian League");
    veridia.military_strength = 100.0;
    veridia.economic_strength = 150.0;
    veridia.traits.insert(FactionTrait::Diplomatic);

    let mut sunward = FactionProfile::new(FactionId(3), "Sunward Covenant");
    sunward.military_strength = 80.0;
    sunward.economic_strength = 110.0;
    sunward.traits.insert(FactionTrait::Peaceful);
    sunward.traits.insert(FactionTrait::Honorable);

    for faction in [ironmarch, veridia, sunward] {
        factions.insert(faction.id, faction);
    }
    factions
}

fn demo_regions() -> HashMap<RegionId, RegionState> {
    let specs: [(u32, &str, TerrainType, &[(u32, f64)], Option<u32>); 4] = [
        (1, "The Contested March", TerrainType::Plains, &[(1, 0.7), (2, 0.6)], Some(2)),
        (2, "Greywall Hills", TerrainType::Hills, &[(1, 0.5), (2, 0.3)], Some(1)),
        (3, "Amber Coast", TerrainType::Coast, &[(2, 0.8), (3, 0.4)], Some(2)),
        (4, "Thornwood", TerrainType::Forest, &[(3, 0.9)], Some(3)),
    ];

    let mut regions = HashMap::new();
    for (id, name, terrain, claims, controller) in specs {
        let mut region = RegionState::new(RegionId(id), name);
        region.terrain = terrain;
        region.controller = controller.map(FactionId);
        for &(faction, strength) in claims {
            region.claims.insert(FactionId(faction), strength);
        }
        region.resources.insert("grain".to_string(), 1200.0);
        region.resources.insert("iron".to_string(), 400.0);
        regions.insert(region.id, region);
    }
    regions
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = load_config();
    let days = config.days;
    tracing::info!(seed = config.seed, days, "starting relations simulation");

    let mut engine = SimulationEngine::new(config).expect("config should validate");
    let factions = demo_factions();
    let regions = demo_regions();

    let border_pair =
        FactionPair::new(FactionId(1), FactionId(2)).expect("demo factions are distinct");

    let mut total_battles = 0usize;
    let mut total_wars = 0usize;
    for day in 1..=days {
        // A border incident flares up along the contested march every 20 days
        let events = if day % 20 == 0 {
            vec![WorldEvent {
                region: RegionId(1),
                event_type: WorldEventType::BorderIncident,
                severity: 8.0,
                affected_pairs: vec![border_pair],
                reason: "patrol clash on the march".to_string(),
            }]
        } else {
            Vec::new()
        };

        let report = engine.tick(&factions, &regions, &events).expect("tick");
        total_battles += report.battles_fought;
        total_wars += report.wars_declared.len();

        for (war_id, outcome) in &report.wars_ended {
            tracing::info!(war = war_id.0, ?outcome, day, "war concluded");
        }
    }

    for region in regions.values() {
        for record in engine.tension.get_tension(region.id) {
            tracing::info!(
                region = %region.name,
                pair = ?record.pair.as_tuple(),
                value = format!("{:.1}", record.value),
                level = ?record.level(),
                "final tension"
            );
        }
    }
    tracing::info!(
        days,
        wars_declared = total_wars,
        battles = total_battles,
        "simulation complete"
    );
}

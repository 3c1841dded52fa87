//! Property tests for the tension invariants: clamping, symmetry, and
//! monotone decay toward base

use proptest::prelude::*;

use strife::core::config::TensionConfig;
use strife::core::types::{FactionId, FactionPair, RegionId};
use strife::tension::TensionManager;

fn manager() -> TensionManager {
    TensionManager::new(TensionConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn tension_stays_within_bounds_for_any_delta(
        deltas in prop::collection::vec(-1e6f64..1e6, 1..30)
    ) {
        let mut m = manager();
        let pair = FactionPair::new(FactionId(1), FactionId(2)).unwrap();
        for (day, delta) in deltas.into_iter().enumerate() {
            let value = m.modify_tension(RegionId(1), pair, delta, "prop", day as u64);
            prop_assert!((-100.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn pair_lookup_is_symmetric(a in 0u32..50, b in 0u32..50, delta in -200f64..200.0) {
        prop_assume!(a != b);
        let mut m = manager();
        let pair = FactionPair::new(FactionId(a), FactionId(b)).unwrap();
        m.modify_tension(RegionId(1), pair, delta, "prop", 0);

        let forward = m.get_faction_tension(RegionId(1), FactionId(a), FactionId(b)).unwrap();
        let backward = m.get_faction_tension(RegionId(1), FactionId(b), FactionId(a)).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn decay_approaches_base_without_overshoot(
        initial in -100f64..100.0,
        steps in 1usize..300
    ) {
        let mut m = manager();
        let pair = FactionPair::new(FactionId(1), FactionId(2)).unwrap();
        m.modify_tension(RegionId(1), pair, initial, "prop", 0);

        let mut previous = m
            .get_faction_tension(RegionId(1), FactionId(1), FactionId(2))
            .unwrap();
        let base = 0.0;
        for _ in 0..steps {
            m.decay_tension(RegionId(1), 1);
            let value = m
                .get_faction_tension(RegionId(1), FactionId(1), FactionId(2))
                .unwrap();
            // Monotone toward base, never crossing it
            prop_assert!((value - base).abs() <= (previous - base).abs() + 1e-12);
            if previous >= base {
                prop_assert!(value >= base);
            } else {
                prop_assert!(value <= base);
            }
            previous = value;
        }
    }

    #[test]
    fn long_decay_always_reaches_base(initial in -100f64..100.0) {
        let mut m = manager();
        let pair = FactionPair::new(FactionId(1), FactionId(2)).unwrap();
        m.modify_tension(RegionId(1), pair, initial, "prop", 0);

        // 0.5/day for 500 days covers the widest possible distance to base
        m.decay_tension(RegionId(1), 500);
        let value = m
            .get_faction_tension(RegionId(1), FactionId(1), FactionId(2))
            .unwrap();
        prop_assert_eq!(value, 0.0);
    }
}

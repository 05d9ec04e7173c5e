//! Integration test: transfer and equalization sessions over many ticks.
//!
//! Covers:
//! - ten transfer ticks from the reference levels
//! - equalization convergence from (80, 20), including the late stop
//! - level bounds and conservation over arbitrary tick sequences

use cf_core::TankId;
use cf_sim::{FlowDirection, FlowLoop, FlowParams, FlowReadings, Plant, TickOutcome};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn transfer_right_ten_ticks() {
    let mut plant = Plant::new(80.0, 20.0);
    let mut flow = FlowLoop::new(FlowParams::default());
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    assert!(flow.begin_transfer(&plant, FlowDirection::Right));
    for _ in 0..10 {
        let outcome = flow.tick(&mut plant, &mut rng);
        assert!(outcome.keeps_running());
        let p = flow.readings().pressure_psi;
        assert!((120.0..150.0).contains(&p), "pressure {p} out of band");
    }

    assert_eq!(plant.levels(), (70.0, 30.0));
    assert_eq!(flow.readings().flow_rate_m3ps, 2.5);
}

#[test]
fn equalization_converges_from_reference_levels() {
    let mut plant = Plant::new(80.0, 20.0);
    let mut flow = FlowLoop::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    assert!(flow.begin_equalize(&plant));

    // 30 points to close at 0.5 per tick
    for tick in 1..=60 {
        let outcome = flow.tick(&mut plant, &mut rng);
        assert_eq!(outcome, TickOutcome::Equalized { target: 50.0 }, "tick {tick}");
        let p = flow.readings().pressure_psi;
        assert!((100.0..130.0).contains(&p));
        assert_eq!(flow.readings().flow_rate_m3ps, 1.8);
    }
    assert_eq!(plant.levels(), (50.0, 50.0));
    assert!(flow.is_equalizing());

    // the stop is detected on the following tick
    assert_eq!(
        flow.tick(&mut plant, &mut rng),
        TickOutcome::Converged { target: 50.0 }
    );
    assert!(!flow.is_equalizing());
    assert_eq!(flow.readings(), FlowReadings::IDLE);
    assert_eq!(plant.levels(), (50.0, 50.0));
}

#[test]
fn closing_valve_mid_transfer_stops_everything() {
    let mut plant = Plant::default();
    let mut flow = FlowLoop::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    flow.begin_transfer(&plant, FlowDirection::Left);
    for _ in 0..3 {
        flow.tick(&mut plant, &mut rng);
    }
    assert_eq!(plant.levels(), (83.0, 17.0));

    plant.set_valve(TankId::Tank1, false);
    assert!(flow.on_valve_change(&plant));
    assert!(!flow.is_flowing());
    assert!(!flow.is_equalizing());
    assert_eq!(flow.readings(), FlowReadings::IDLE);

    // reopening does not resume the session
    plant.set_valve(TankId::Tank1, true);
    assert_eq!(flow.tick(&mut plant, &mut rng), TickOutcome::Idle);
    assert_eq!(plant.levels(), (83.0, 17.0));
}

fn direction() -> impl Strategy<Value = FlowDirection> {
    prop_oneof![Just(FlowDirection::Left), Just(FlowDirection::Right)]
}

proptest! {
    #[test]
    fn levels_stay_in_bounds(
        t1 in 0.0_f64..=100.0,
        t2 in 0.0_f64..=100.0,
        moves in prop::collection::vec((direction(), 1_usize..40), 1..8),
        seed in any::<u64>(),
    ) {
        let mut plant = Plant::new(t1, t2);
        let mut flow = FlowLoop::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for (dir, ticks) in moves {
            flow.begin_transfer(&plant, dir);
            for _ in 0..ticks {
                flow.tick(&mut plant, &mut rng);
                let (a, b) = plant.levels();
                prop_assert!((0.0..=100.0).contains(&a));
                prop_assert!((0.0..=100.0).contains(&b));
            }
        }
    }

    #[test]
    fn interior_transfer_conserves_total(
        t1 in 10.0_f64..90.0,
        t2 in 10.0_f64..90.0,
        dir in direction(),
        ticks in 1_usize..10,
    ) {
        let mut plant = Plant::new(t1, t2);
        let mut flow = FlowLoop::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let before = plant.total_level();

        prop_assert!(flow.begin_transfer(&plant, dir));
        for _ in 0..ticks {
            flow.tick(&mut plant, &mut rng);
        }
        prop_assert!((plant.total_level() - before).abs() < 1e-9);
    }

    #[test]
    fn equalization_always_settles(t1 in 0.0_f64..=100.0, t2 in 0.0_f64..=100.0) {
        let mut plant = Plant::new(t1, t2);
        let mut flow = FlowLoop::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        flow.begin_equalize(&plant);
        // 100 points apart at most: 100 half-steps plus the late stop
        let mut ticks = 0;
        while flow.is_equalizing() && ticks < 102 {
            flow.tick(&mut plant, &mut rng);
            ticks += 1;
        }
        prop_assert!(!flow.is_equalizing());
        let (a, b) = plant.levels();
        prop_assert!((a - b).abs() < 1e-9);
    }
}

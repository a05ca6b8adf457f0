//! End-to-end spin scenarios driven through the public API

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use spin_wheel::spin::{begin_spin, plan_spin, segment_at, step};
use spin_wheel::{
    RotationDirection, Segment, SpinConfig, SpinEngine, SpinError, SpinEventKind, SpinOverrides,
    SpinPhase, SpinRng,
};

fn weighted_abc() -> Vec<Segment> {
    vec![
        Segment::new("a").with_weight(1.0),
        Segment::new("b").with_weight(2.0),
        Segment::new("c").with_weight(3.0),
    ]
}

fn equal(count: usize) -> Vec<Segment> {
    (0..count).map(|i| Segment::new(format!("s{}", i))).collect()
}

fn record(engine: &SpinEngine) -> Rc<RefCell<Vec<SpinEventKind>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    engine.subscribe(move |event| sink.borrow_mut().push(event.kind));
    log
}

#[test]
fn test_forced_index_end_to_end() {
    let config = SpinConfig::new(weighted_abc())
        .with_rotations(1, 1)
        .with_duration_ms(200.0);
    let mut engine = SpinEngine::new(config).unwrap();
    let events = record(&engine);

    engine.spin(SpinOverrides::target_index(1)).unwrap();
    engine.tick(100.0);
    let state = engine.tick(100.0);

    assert_eq!(state.phase, SpinPhase::Stopped);
    assert_eq!(state.winning_index, Some(1));
    let completed = events
        .borrow()
        .iter()
        .filter(|kind| **kind == SpinEventKind::SpinCompleted)
        .count();
    assert_eq!(completed, 1);
}

#[test]
fn test_dispose_then_spin_and_tick() {
    let config = SpinConfig::new(weighted_abc()).with_seed(5u64);
    let mut engine = SpinEngine::new(config).unwrap();
    let before = engine.state();

    engine.dispose();
    assert_eq!(
        engine.spin(SpinOverrides::default()),
        Err(SpinError::Disposed)
    );
    let after = engine.tick(100.0);
    assert!(Rc::ptr_eq(&before, &after));
}

#[test]
fn test_forced_target_angle_geometry() {
    let config = SpinConfig::new(equal(4)).with_pointer_angle(0.0);
    let mut engine = SpinEngine::new(config.clone().with_seed(1u64)).unwrap();
    let plan = engine.spin(SpinOverrides::target_angle(90.0)).unwrap();
    assert_eq!(plan.winning_index, 3);

    // Same answer on a second run and from a different seed
    let mut other = SpinEngine::new(config.with_seed(999u64)).unwrap();
    let again = other.spin(SpinOverrides::target_angle(90.0)).unwrap();
    assert_eq!(again.winning_index, 3);
}

#[test]
fn test_same_seed_same_timeline() {
    let config = SpinConfig::new(equal(12))
        .with_jitter(0.5)
        .with_duration_ms(900.0)
        .with_seed("carnival");
    let mut a = SpinEngine::new(config.clone()).unwrap();
    let mut b = SpinEngine::new(config).unwrap();

    for round in 0..5 {
        let plan_a = a.spin(SpinOverrides::default()).unwrap();
        let plan_b = b.spin(SpinOverrides::default()).unwrap();
        assert_eq!(plan_a, plan_b, "round {}", round);
        for delta in [16.0, 33.0, 250.0, 16.0, 700.0] {
            let sa = a.tick(delta);
            let sb = b.tick(delta);
            assert_eq!(sa.angle, sb.angle);
            assert_eq!(sa.winning_index, sb.winning_index);
            assert_eq!(sa.phase, sb.phase);
        }
    }
}

#[test]
fn test_seeded_engine_advances_between_spins() {
    let config = SpinConfig::new(equal(24)).with_seed(42u64);
    let mut engine = SpinEngine::new(config).unwrap();
    let mut winners = HashSet::new();
    for _ in 0..10 {
        let plan = engine.spin(SpinOverrides::default()).unwrap();
        winners.insert(plan.winning_index);
        let state = engine.tick(plan.duration_ms);
        assert_eq!(state.phase, SpinPhase::Stopped);
    }
    assert!(winners.len() > 1, "every spin picked {:?}", winners);
}

#[test]
fn test_controlled_mode_threads_one_generator() {
    let config = SpinConfig::new(equal(24)).with_duration_ms(0.0);
    let mut rng = SpinRng::from_seed(&"controlled".into());
    let mut state = spin_wheel::SpinState::new(config.start_angle, config.segments.clone());
    let mut winners = HashSet::new();
    for _ in 0..10 {
        let plan = plan_spin(&state, &config, &SpinOverrides::default(), &mut rng).unwrap();
        state = begin_spin(&state, &plan);
        state = step(&state, &config, 16.0);
        assert_eq!(state.phase, SpinPhase::Stopped);
        assert_eq!(segment_at(state.angle, 0.0, 24), Some(plan.winning_index));
        winners.insert(plan.winning_index);
    }
    assert!(winners.len() > 1);
}

#[test]
fn test_counter_clockwise_spins_backward() {
    let config = SpinConfig::new(equal(6))
        .with_direction(RotationDirection::CounterClockwise)
        .with_start_angle(45.0)
        .with_seed(3u64);
    let mut engine = SpinEngine::new(config).unwrap();
    let start = engine.state().angle;
    let plan = engine.spin(SpinOverrides::default()).unwrap();
    assert!(plan.target_angle < start);

    // Angle decreases monotonically over the spin
    let mut last = start;
    loop {
        let state = engine.tick(250.0);
        assert!(state.angle <= last);
        last = state.angle;
        if state.phase == SpinPhase::Stopped {
            break;
        }
    }
    assert_eq!(last, plan.target_angle);
}

#[test]
fn test_engine_keeps_private_config_copy() {
    let mut config = SpinConfig::new(equal(3)).with_seed(8u64);
    let mut engine = SpinEngine::new(config.clone()).unwrap();

    config.segments.clear();
    config.duration_ms = 1.0;

    assert_eq!(engine.config().segments.len(), 3);
    let plan = engine.spin(SpinOverrides::default()).unwrap();
    assert_eq!(plan.duration_ms, 6000.0);
}

#[test]
fn test_reset_after_completion_and_spin_again() {
    let config = SpinConfig::new(weighted_abc())
        .with_duration_ms(100.0)
        .with_start_angle(15.0)
        .with_seed(77u64);
    let mut engine = SpinEngine::new(config).unwrap();
    let events = record(&engine);

    engine.stop_at(2).unwrap();
    engine.tick(100.0);
    engine.reset().unwrap();
    assert_eq!(engine.state().angle, 15.0);

    engine.stop_at(0).unwrap();
    engine.tick(100.0);
    assert_eq!(engine.winning_segment().map(|s| s.id.clone()), Some("a".into()));

    assert_eq!(
        *events.borrow(),
        vec![
            SpinEventKind::SpinStarted,
            SpinEventKind::SpinProgress,
            SpinEventKind::SpinCompleted,
            SpinEventKind::SpinReset,
            SpinEventKind::SpinStarted,
            SpinEventKind::SpinProgress,
            SpinEventKind::SpinCompleted,
        ]
    );
}

#[test]
fn test_custom_random_source() {
    let config = SpinConfig::new(weighted_abc()).with_rotations(2, 2);
    // Always the top of the range: heaviest (last) segment wins
    let rng = SpinRng::from_fn(|| 0.99);
    let mut engine = SpinEngine::with_random_source(config, rng).unwrap();
    for _ in 0..3 {
        let plan = engine.spin(SpinOverrides::default()).unwrap();
        assert_eq!(plan.winning_index, 2);
    }
}

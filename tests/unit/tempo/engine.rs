use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn time_log(engine: &mut TempoEngine, kind: BeatKind) -> Rc<RefCell<Vec<f64>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let writer = Rc::clone(&log);
    engine.on_beat(kind, move |t| writer.borrow_mut().push(t));
    log
}

#[test]
fn downbeat_fires_at_bar_starts_only() {
    // 60 BPM, 4/4: one bar = 4 seconds.
    let mut e = TempoEngine::new(60.0, 4);
    let log = time_log(&mut e, BeatKind::Downbeat);
    let dt = 0.016;
    let mut t = 0.0;
    while t < 10.0 {
        e.tick(dt);
        t += dt;
    }
    let times = log.borrow();
    assert_eq!(times.len(), 3);
    for (i, expected) in [0.0, 4.0, 8.0].iter().enumerate() {
        assert!(
            (times[i] - expected).abs() <= dt + 1e-9,
            "downbeat {i} at {} expected near {expected}",
            times[i]
        );
    }
}

#[test]
fn quarters_and_eighths_fire_on_their_grids() {
    let mut e = TempoEngine::new(60.0, 4);
    let quarters = time_log(&mut e, BeatKind::Quarter);
    let eighths = time_log(&mut e, BeatKind::Eighth);
    let dt = 0.01;
    for _ in 0..399 {
        e.tick(dt); // 3.99 seconds: just shy of one full bar
    }
    assert_eq!(quarters.borrow().len(), 4);
    assert_eq!(eighths.borrow().len(), 8);
    // Quarter edges land on whole seconds in a 4s bar.
    for (i, t) in quarters.borrow().iter().enumerate() {
        assert!((t - i as f64).abs() <= dt + 1e-9);
    }
}

#[test]
fn listeners_of_one_kind_see_the_same_running_time() {
    let mut e = TempoEngine::new(120.0, 4);
    let a = time_log(&mut e, BeatKind::Quarter);
    let b = time_log(&mut e, BeatKind::Quarter);
    for _ in 0..500 {
        e.tick(0.013);
    }
    assert!(!a.borrow().is_empty());
    assert_eq!(*a.borrow(), *b.borrow());
}

#[test]
fn off_unsubscribes_and_tolerates_unknown_handles() {
    let mut e = TempoEngine::new(60.0, 4);
    let log = Rc::new(RefCell::new(Vec::new()));
    let writer = Rc::clone(&log);
    let sub = e.on_beat(BeatKind::Downbeat, move |t| writer.borrow_mut().push(t));
    e.tick(0.016);
    assert_eq!(log.borrow().len(), 1);
    e.off(sub);
    e.off(sub); // double-off is harmless
    for _ in 0..1000 {
        e.tick(0.016);
    }
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn no_edges_while_phase_sits_between_thresholds() {
    let mut e = TempoEngine::new(60.0, 4);
    let log = time_log(&mut e, BeatKind::Downbeat);
    e.tick(0.016); // consumes the t=0 edge
    assert_eq!(log.borrow().len(), 1);
    for _ in 0..10 {
        e.tick(0.0); // zero dt: no crossing, ever
        e.tick(0.016);
    }
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn wrap_crossing_fires_exactly_once() {
    let mut e = TempoEngine::new(60.0, 1); // 1-beat bar: wraps every second
    let log = time_log(&mut e, BeatKind::Downbeat);
    let dt = 0.03;
    let mut t = 0.0;
    while t < 3.05 {
        e.tick(dt);
        t += dt;
    }
    // t=0, 1, 2, 3.
    assert_eq!(log.borrow().len(), 4);
}

#[test]
fn oversized_dt_fires_each_edge_once() {
    let mut e = TempoEngine::new(60.0, 1);
    let log = time_log(&mut e, BeatKind::Eighth);
    e.tick(2.5); // two and a half bars in one tick
    assert_eq!(log.borrow().len(), 8);
}

#[test]
fn phase_stays_in_unit_interval_and_bpm_clamps() {
    let mut e = TempoEngine::new(1e9, 0);
    assert_eq!(e.bpm(), TEMPO_BPM_RANGE.1);
    assert_eq!(e.beats_per_bar(), 1);
    e.set_bpm(-5.0);
    assert_eq!(e.bpm(), TEMPO_BPM_RANGE.0);
    e.set_bpm(f64::NAN);
    assert_eq!(e.bpm(), 120.0);
    for _ in 0..1000 {
        e.tick(0.016);
        assert!((0.0..1.0).contains(&e.phase()));
    }
}

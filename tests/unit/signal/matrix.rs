use super::*;
use crate::breath::runtime::{BreathPhase, BreathState};
use std::cell::RefCell;
use std::rc::Rc;

fn state(breath01: f64) -> BreathState {
    BreathState {
        breath01,
        breath_ss: breath01 * 2.0 - 1.0,
        velocity: 0.0,
        phase: BreathPhase::Inhale,
        t_cycle: 0.25,
    }
}

fn spy() -> (Rc<RefCell<Vec<f64>>>, impl FnMut(f64)) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let writer = Rc::clone(&log);
    (log, move |v| writer.borrow_mut().push(v))
}

#[test]
fn clamp_then_scale_and_bias() {
    // srcMin=0, srcMax=1, scale=2, bias=-1 fed 1.5: clamps to 1,
    // output -1 + 2*1 = 1.
    let (log, sink) = spy();
    let mut m = ModMatrix::new();
    m.add(
        ModBinding::new(ModSource::Breath01, sink)
            .clamp(0.0, 1.0)
            .scale(2.0)
            .bias(-1.0),
    );
    m.apply(&state(1.5));
    assert_eq!(*log.borrow(), vec![1.0]);
}

#[test]
fn default_binding_is_identity_and_unbounded() {
    let (log, sink) = spy();
    let mut m = ModMatrix::new();
    m.add(ModBinding::new(ModSource::Velocity, sink));
    let mut s = state(0.0);
    s.velocity = -123.5;
    m.apply(&s);
    assert_eq!(*log.borrow(), vec![-123.5]);
}

#[test]
fn each_binding_fires_once_per_apply_in_registration_order() {
    let (log, _) = spy();
    let mut m = ModMatrix::new();
    for tag in [10.0, 20.0, 30.0] {
        let writer = Rc::clone(&log);
        m.add(ModBinding::new(ModSource::Breath01, move |v| {
            writer.borrow_mut().push(tag + v);
        }));
    }
    m.apply(&state(1.0));
    m.apply(&state(2.0));
    assert_eq!(*log.borrow(), vec![11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
}

#[test]
fn sources_read_the_right_fields() {
    let (log, _) = spy();
    let mut m = ModMatrix::new();
    for source in [
        ModSource::Breath01,
        ModSource::BreathSigned,
        ModSource::Velocity,
        ModSource::CycleT,
    ] {
        let writer = Rc::clone(&log);
        m.add(ModBinding::new(source, move |v| {
            writer.borrow_mut().push(v);
        }));
    }
    let mut s = state(0.75);
    s.velocity = 2.5;
    m.apply(&s);
    assert_eq!(*log.borrow(), vec![0.75, 0.5, 2.5, 0.25]);
}

#[test]
fn smoothing_is_a_per_binding_ema() {
    let (log, sink) = spy();
    let mut m = ModMatrix::new();
    m.add(ModBinding::new(ModSource::Breath01, sink).smooth(0.5));
    m.apply(&state(1.0)); // first sample seeds the EMA at raw
    m.apply(&state(0.0)); // 1.0 + (0.0 - 1.0) * 0.5 = 0.5
    m.apply(&state(0.0)); // 0.5 + (0.0 - 0.5) * 0.5 = 0.25
    assert_eq!(*log.borrow(), vec![1.0, 0.5, 0.25]);
}

#[test]
fn smoothing_state_is_independent_between_bindings() {
    let (log, _) = spy();
    for _ in 0..2 {
        // run twice to prove fresh matrices start fresh
        let mut m = ModMatrix::new();
        let a = Rc::clone(&log);
        let b = Rc::clone(&log);
        m.add(ModBinding::new(ModSource::Breath01, move |v| {
            a.borrow_mut().push(v);
        })
        .smooth(0.5));
        m.add(ModBinding::new(ModSource::Breath01, move |v| {
            b.borrow_mut().push(v);
        }));
        m.apply(&state(1.0));
        m.apply(&state(0.0));
    }
    assert_eq!(*log.borrow(), vec![1.0, 1.0, 0.5, 0.0, 1.0, 1.0, 0.5, 0.0]);
}

#[test]
fn reversed_clamp_bounds_are_reordered() {
    let (log, sink) = spy();
    let mut m = ModMatrix::new();
    m.add(ModBinding::new(ModSource::Breath01, sink).clamp(1.0, 0.0));
    m.apply(&state(0.5));
    m.apply(&state(7.0));
    assert_eq!(*log.borrow(), vec![0.5, 1.0]);
}

#[test]
#[should_panic(expected = "sink blew up")]
fn panicking_sink_propagates_out_of_apply() {
    let mut m = ModMatrix::new();
    m.add(ModBinding::new(ModSource::Breath01, |_| {
        panic!("sink blew up")
    }));
    m.apply(&state(0.5));
}

#[test]
fn empty_matrix_apply_is_a_no_op() {
    let mut m = ModMatrix::new();
    assert!(m.is_empty());
    m.apply(&state(0.5));
    assert_eq!(m.len(), 0);
}

//! Pneuma is a breath-synchronized animation runtime.
//!
//! It generates the continuous breath signal behind a generative visual
//! scene and the stateful integrators that consume it, leaving all
//! drawing to the embedding:
//!
//! 1. **Tick**: a [`FrameClock`] turns host timestamps into clamped
//!    delta-times (a backgrounded tab never explodes an integrator).
//! 2. **Breathe**: a [`BreathRuntime`] advances the shaped envelope
//!    (asymmetric segments, per-cycle seeded jitter, tempo modes) into an
//!    immutable [`BreathState`] snapshot.
//! 3. **Modulate**: a [`ModMatrix`] fans the snapshot out to registered
//!    numeric sinks, with clamping, scale/bias and per-binding smoothing.
//! 4. **Score**: a [`FlowGate`] integrates how well gesture motion aligns
//!    with a spiral field and tracks the breath, gating a one-shot
//!    "opened" event.
//! 5. **Beat**: a [`TempoEngine`] emits discrete bar-subdivision edges,
//!    independent of the continuous envelope.
//!
//! [`Session`] wires the five together in that fixed per-tick order.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: jitter and every sampled signal are
//!   pure functions of seed and elapsed time.
//! - **Degrade, never crash**: per-tick numeric paths clamp and
//!   normalize bad input; only constructors and preset loading return
//!   errors.
//! - **Single-threaded cooperative**: one synchronous pass per frame,
//!   driven through the [`Scheduler`] port (display-synced callback in a
//!   browser embedding, [`FixedStepScheduler`] headless).
#![forbid(unsafe_code)]

mod breath;
mod clock;
mod config;
mod foundation;
mod gate;
mod session;
mod signal;
mod tempo;

pub use kurbo::Vec2;

pub use breath::config::{
    BreathConfig, BreathMode, BreathShape, Curve, MIN_RATE_BPM, Variability,
};
pub use breath::osc::{BreathOsc, OscPhase, OscSample};
pub use breath::runtime::{BreathPhase, BreathRuntime, BreathState, TickCtx};
pub use clock::ticker::{FixedStepScheduler, FrameClock, FrameTick, MAX_FRAME_DT, Scheduler};
pub use config::tuning::Tuning;
pub use foundation::error::{PneumaError, PneumaResult};
pub use gate::flow::{FlowGate, FlowGateConfig, GatePreset, GateReadout, GateWeights};
pub use session::{GestureInput, Session};
pub use signal::lag::LagFilter;
pub use signal::matrix::{ModBinding, ModMatrix, ModSource};
pub use tempo::engine::{BeatKind, BeatSub, TEMPO_BPM_RANGE, TempoEngine};

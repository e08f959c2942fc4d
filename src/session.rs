use kurbo::Vec2;

use crate::breath::runtime::{BreathRuntime, BreathState, TickCtx};
use crate::clock::ticker::{FrameClock, Scheduler};
use crate::config::tuning::Tuning;
use crate::gate::flow::FlowGate;
use crate::signal::matrix::ModMatrix;
use crate::tempo::engine::TempoEngine;

/// Per-tick gesture/pointer sample supplied by an input adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureInput {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Direction of acceleration; need not be unit length.
    pub accel_dir: Vec2,
    /// Normalized effort in `[0, 1]`.
    pub thrust: f64,
}

/// One running chamber's temporal core: the frame clock, the breath
/// runtime, the modulation matrix, the flow gate and the tempo engine,
/// advanced in that fixed order every tick.
///
/// The ordering matters: the gate scores against the breath phase
/// computed earlier in the *same* tick, never a stale one, and render
/// consumers reading [`Session::breath_state`] between frames see an
/// immutable snapshot.
#[derive(Debug)]
pub struct Session {
    clock: FrameClock,
    breath: BreathRuntime,
    matrix: ModMatrix,
    gate: FlowGate,
    tempo: TempoEngine,
    motion_cadence_bpm: Option<f64>,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        let tuning = tuning.clamped();
        Self {
            clock: FrameClock::new(),
            breath: BreathRuntime::new(tuning.breath_config()),
            matrix: ModMatrix::new(),
            gate: FlowGate::new(tuning.gate_config()),
            tempo: TempoEngine::new(tuning.tempo_bpm, tuning.beats_per_bar),
            motion_cadence_bpm: None,
        }
    }

    pub fn start(&mut self) {
        self.clock.start();
    }

    /// Stop the loop; no further [`Session::frame`] call has any effect
    /// until restarted.
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Read-only snapshot of the most recent breath tick.
    pub fn breath_state(&self) -> BreathState {
        self.breath.state()
    }

    pub fn breath_mut(&mut self) -> &mut BreathRuntime {
        &mut self.breath
    }

    pub fn matrix_mut(&mut self) -> &mut ModMatrix {
        &mut self.matrix
    }

    pub fn gate(&self) -> &FlowGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut FlowGate {
        &mut self.gate
    }

    pub fn tempo(&self) -> &TempoEngine {
        &self.tempo
    }

    pub fn tempo_mut(&mut self) -> &mut TempoEngine {
        &mut self.tempo
    }

    /// Feed an observed motion cadence for `EntrainToMotion` breathing.
    pub fn set_motion_cadence(&mut self, bpm: Option<f64>) {
        self.motion_cadence_bpm = bpm;
    }

    /// Advance one frame with a host timestamp. Returns `None` while
    /// stopped; otherwise the tick's breath snapshot.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn frame(&mut self, now_ms: f64, input: Option<&GestureInput>) -> Option<BreathState> {
        let tick = self.clock.tick(now_ms)?;

        let ctx = TickCtx {
            engine_bpm: Some(self.tempo.bpm()),
            motion_cadence_bpm: self.motion_cadence_bpm,
        };
        let state = self.breath.tick(tick.dt, &ctx);
        self.matrix.apply(&state);
        if let Some(g) = input {
            self.gate
                .update(tick.dt, g.pos, g.vel, g.accel_dir, g.thrust, state.t_cycle);
        }
        self.tempo.tick(tick.dt);
        Some(state)
    }

    /// Drive the session from any [`Scheduler`] until it runs dry or the
    /// session is stopped. `input` is polled once per frame.
    pub fn run(
        &mut self,
        scheduler: &mut dyn Scheduler,
        input: &mut dyn FnMut(f64) -> Option<GestureInput>,
    ) {
        self.start();
        scheduler.run(&mut |now_ms| {
            let g = input(now_ms);
            self.frame(now_ms, g.as_ref()).is_some()
        });
    }
}

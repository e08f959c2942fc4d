use crate::breath::config::{BreathConfig, BreathMode, MIN_RATE_BPM};
use crate::foundation::math::{Rng64, wrap01};

/// Phase label within the four-segment shaped cycle. Transitions occur
/// only at segment boundaries, always in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BreathPhase {
    Inhale,
    HoldIn,
    Exhale,
    HoldOut,
}

/// Immutable per-tick snapshot of the breath signal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BreathState {
    /// Envelope in `[0, 1]`; 1 is the full-inhale peak.
    pub breath01: f64,
    /// Signed variant `breath01 * 2 - 1`.
    pub breath_ss: f64,
    /// Discrete derivative of `breath01` per second.
    pub velocity: f64,
    pub phase: BreathPhase,
    /// Position within the current cycle, `[0, 1)`.
    pub t_cycle: f64,
}

impl Default for BreathState {
    fn default() -> Self {
        Self {
            breath01: 0.0,
            breath_ss: -1.0,
            velocity: 0.0,
            phase: BreathPhase::Inhale,
            t_cycle: 0.0,
        }
    }
}

/// External inputs a tick may consume, depending on [`BreathMode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TickCtx {
    /// Tempo engine BPM, honored in `TempoLocked` mode.
    pub engine_bpm: Option<f64>,
    /// Observed motion cadence, honored in `EntrainToMotion` mode.
    pub motion_cadence_bpm: Option<f64>,
}

/// First-order slide rate toward the motion cadence, per second.
const ENTRAIN_RATE: f64 = 0.2;

/// Stateful shaped breath generator: asymmetric envelope, per-cycle
/// seeded jitter, tempo modes.
///
/// The jitter multiplier is drawn exactly once per cycle wrap, so the
/// cycle duration never changes mid-cycle (tempo-mode BPM changes do, by
/// design: they act continuously, scaled by the held multiplier).
#[derive(Debug)]
pub struct BreathRuntime {
    config: BreathConfig,
    effective_bpm: f64,
    cycle_t: f64,
    jitter_mult: f64,
    rng: Rng64,
    state: BreathState,
}

impl BreathRuntime {
    pub fn new(config: BreathConfig) -> Self {
        let config = config.sanitized();
        let mut rng = Rng64::new(config.variability.seed);
        let jitter_mult = draw_jitter(&config, &mut rng);
        let mut rt = Self {
            config,
            effective_bpm: config.rate_bpm,
            cycle_t: 0.0,
            jitter_mult,
            rng,
            state: BreathState::default(),
        };
        rt.state = rt.sample_at_rest();
        rt
    }

    pub fn config(&self) -> &BreathConfig {
        &self.config
    }

    /// Replace the whole configuration. A preset swap restarts the cycle
    /// (and the jitter stream), never mutates one mid-cycle.
    pub fn set_config(&mut self, config: BreathConfig) {
        let config = config.sanitized();
        self.config = config;
        self.effective_bpm = config.rate_bpm;
        self.cycle_t = 0.0;
        self.rng = Rng64::new(config.variability.seed);
        self.jitter_mult = draw_jitter(&config, &mut self.rng);
        self.state = self.sample_at_rest();
    }

    pub fn state(&self) -> BreathState {
        self.state
    }

    pub fn effective_bpm(&self) -> f64 {
        self.effective_bpm
    }

    /// Advance by `dt` seconds and return the new snapshot.
    pub fn tick(&mut self, dt: f64, ctx: &TickCtx) -> BreathState {
        let dt = dt.max(0.0);
        self.advance_bpm(dt, ctx);

        let mut cycle_dur = self.cycle_dur();
        self.cycle_t += dt;
        while self.cycle_t >= cycle_dur {
            self.cycle_t -= cycle_dur;
            self.jitter_mult = draw_jitter(&self.config, &mut self.rng);
            cycle_dur = self.cycle_dur();
        }

        let prev = self.state.breath01;
        let (breath01, phase, t) = self.sample_raw(self.cycle_t / cycle_dur);
        self.state = BreathState {
            breath01,
            breath_ss: breath01 * 2.0 - 1.0,
            velocity: (breath01 - prev) / dt.max(1e-6),
            phase,
            t_cycle: t,
        };
        self.state
    }

    fn advance_bpm(&mut self, dt: f64, ctx: &TickCtx) {
        match self.config.mode {
            BreathMode::FreeRun => {
                self.effective_bpm = self.config.rate_bpm;
            }
            BreathMode::TempoLocked => {
                self.effective_bpm = ctx.engine_bpm.unwrap_or(self.config.rate_bpm);
            }
            BreathMode::EntrainToMotion => {
                if let Some(target) = ctx.motion_cadence_bpm {
                    let k = 1.0 - (-ENTRAIN_RATE * dt).exp();
                    self.effective_bpm += (target - self.effective_bpm) * k;
                }
            }
        }
        self.effective_bpm = self.effective_bpm.max(MIN_RATE_BPM);
    }

    fn cycle_dur(&self) -> f64 {
        (60.0 / self.effective_bpm * self.jitter_mult).max(1e-3)
    }

    /// Envelope and phase at a normalized cycle position (phase offset
    /// applied here).
    fn sample_raw(&self, t_cycle: f64) -> (f64, BreathPhase, f64) {
        let t = wrap01(t_cycle + self.config.phase_offset);
        let [b0, b1, b2] = self.config.shape.boundaries();
        if t < b0 {
            let u = t / b0;
            (self.config.shape.curve_inhale.apply(u), BreathPhase::Inhale, t)
        } else if t < b1 {
            (1.0, BreathPhase::HoldIn, t)
        } else if t < b2 {
            let u = (t - b1) / (b2 - b1);
            (
                1.0 - self.config.shape.curve_exhale.apply(u),
                BreathPhase::Exhale,
                t,
            )
        } else {
            (0.0, BreathPhase::HoldOut, t)
        }
    }

    fn sample_at_rest(&self) -> BreathState {
        let (breath01, phase, t) = self.sample_raw(0.0);
        BreathState {
            breath01,
            breath_ss: breath01 * 2.0 - 1.0,
            velocity: 0.0,
            phase,
            t_cycle: t,
        }
    }
}

fn draw_jitter(config: &BreathConfig, rng: &mut Rng64) -> f64 {
    let j = config.variability.jitter_pct;
    if !config.variability.enabled || j <= 0.0 {
        return 1.0;
    }
    let mult = 1.0 + j * (rng.next_f64_01() * 2.0 - 1.0);
    // jitter_pct = 1 may draw 0; keep the cycle finite.
    mult.max(0.05)
}

#[cfg(test)]
#[path = "../../tests/unit/breath/runtime.rs"]
mod tests;

use kurbo::Vec2;

use crate::foundation::math::{clamp01, rot90, soft_window, unit_or_zero};

/// Alignment scores only ramp once the dot product clears this baseline;
/// full credit needs near-perfect alignment.
const ALIGN_WINDOW_LO: f64 = 0.55;

/// Integrator tunables. `Easy` and `Hard` are the two named anchor
/// presets; anything between comes from [`GatePreset::blended`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GatePreset {
    /// Combined score needed for progress to fill.
    pub open_threshold: f64,
    /// Seconds of sustained above-threshold score to fully open.
    pub open_seconds: f64,
    /// Progress drained per second below threshold.
    pub decay_per_sec: f64,
    /// Half-width of the rewarded thrust band around the breath target.
    pub breath_tolerance: f64,
    /// Fraction blending the tangent field toward the radial vector.
    pub inward_bias: f64,
}

impl GatePreset {
    pub const EASY: Self = Self {
        open_threshold: 0.62,
        open_seconds: 2.0,
        decay_per_sec: 0.25,
        breath_tolerance: 0.45,
        inward_bias: 0.35,
    };

    pub const HARD: Self = Self {
        open_threshold: 0.75,
        open_seconds: 4.0,
        decay_per_sec: 0.5,
        breath_tolerance: 0.25,
        inward_bias: 0.15,
    };

    /// Linear blend between [`HARD`](Self::HARD) (`friendliness = 0`) and
    /// [`EASY`](Self::EASY) (`friendliness = 1`).
    pub fn blended(friendliness: f64) -> Self {
        let f = clamp01(friendliness);
        let lerp = |a: f64, b: f64| a + (b - a) * f;
        Self {
            open_threshold: lerp(Self::HARD.open_threshold, Self::EASY.open_threshold),
            open_seconds: lerp(Self::HARD.open_seconds, Self::EASY.open_seconds),
            decay_per_sec: lerp(Self::HARD.decay_per_sec, Self::EASY.decay_per_sec),
            breath_tolerance: lerp(Self::HARD.breath_tolerance, Self::EASY.breath_tolerance),
            inward_bias: lerp(Self::HARD.inward_bias, Self::EASY.inward_bias),
        }
    }
}

/// Weights for the combined score. Normalized at use, so they need not
/// sum to exactly 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GateWeights {
    pub align: f64,
    pub breath: f64,
    pub coherence: f64,
}

impl Default for GateWeights {
    fn default() -> Self {
        Self {
            align: 0.5,
            breath: 0.3,
            coherence: 0.2,
        }
    }
}

/// Gate geometry and scoring configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FlowGateConfig {
    /// Spiral field center in the same space as positions fed to
    /// [`FlowGate::update`].
    pub center: Vec2,
    /// Spiral winding direction; sanitized to +1 or -1.
    pub dir: f64,
    /// Midpoint of the breath-synchronized thrust target.
    pub breath_mid: f64,
    /// Amplitude of the thrust target around the midpoint.
    pub breath_depth: f64,
    pub weights: GateWeights,
    /// `0` = hard preset, `1` = easy preset, linear in between.
    pub friendliness: f64,
}

impl Default for FlowGateConfig {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            dir: 1.0,
            breath_mid: 0.5,
            breath_depth: 0.35,
            weights: GateWeights::default(),
            friendliness: 0.5,
        }
    }
}

/// Last computed diagnostic snapshot, for debug overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GateReadout {
    pub progress: f64,
    pub s_align: f64,
    pub s_coherent: f64,
    pub s_breath: f64,
    pub target_thrust: f64,
    pub tangent: Vec2,
}

/// Hysteresis "gate": a continuous `[0, 1]` integrator that fills while
/// motion aligns with the spiral field (and thrust tracks the breath) and
/// drains at a fixed rate otherwise.
///
/// Opening does not self-reset: once progress reaches 1 the gate stays
/// open until [`FlowGate::reset`]; the one-shot edge is surfaced via
/// [`FlowGate::consume_just_opened`].
#[derive(Debug)]
pub struct FlowGate {
    config: FlowGateConfig,
    preset: GatePreset,
    progress: f64,
    was_open: bool,
    just_opened: bool,
    readout: GateReadout,
}

impl FlowGate {
    pub fn new(config: FlowGateConfig) -> Self {
        let mut config = config;
        config.dir = if config.dir < 0.0 { -1.0 } else { 1.0 };
        config.friendliness = clamp01(config.friendliness);
        Self {
            preset: GatePreset::blended(config.friendliness),
            config,
            progress: 0.0,
            was_open: false,
            just_opened: false,
            readout: GateReadout::default(),
        }
    }

    pub fn config(&self) -> &FlowGateConfig {
        &self.config
    }

    pub fn preset(&self) -> &GatePreset {
        &self.preset
    }

    /// Re-blend the tunables without touching accumulated progress.
    pub fn set_friendliness(&mut self, friendliness: f64) {
        self.config.friendliness = clamp01(friendliness);
        self.preset = GatePreset::blended(self.config.friendliness);
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_open(&self) -> bool {
        self.progress >= 1.0
    }

    /// True exactly once per open transition.
    pub fn consume_just_opened(&mut self) -> bool {
        std::mem::take(&mut self.just_opened)
    }

    pub fn readout(&self) -> GateReadout {
        self.readout
    }

    /// Drop all accumulated state (chamber remount).
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.was_open = false;
        self.just_opened = false;
        self.readout = GateReadout::default();
    }

    /// Score one tick of motion against the spiral field.
    ///
    /// `accel_dir` need not be unit length; zero-length vectors score 0
    /// rather than poisoning the math. `breath_phase` is the breath
    /// runtime's `t_cycle`.
    pub fn update(
        &mut self,
        dt: f64,
        pos: Vec2,
        vel: Vec2,
        accel_dir: Vec2,
        thrust: f64,
        breath_phase: f64,
    ) {
        let dt = dt.max(0.0);
        let v_hat = unit_or_zero(vel);

        let to_center = unit_or_zero(self.config.center - pos);
        let bias = self.preset.inward_bias;
        let tangent = unit_or_zero(rot90(to_center, self.config.dir) * (1.0 - bias) + to_center * bias);

        let s_align = soft_window(v_hat.dot(tangent), ALIGN_WINDOW_LO);
        let s_coherent = soft_window(v_hat.dot(unit_or_zero(accel_dir)), ALIGN_WINDOW_LO);

        let target_thrust = self.config.breath_mid
            + self.config.breath_depth * (std::f64::consts::TAU * breath_phase).sin();
        let s_breath =
            clamp01(1.0 - (thrust - target_thrust).abs() / self.preset.breath_tolerance.max(1e-9));

        let w = self.config.weights;
        let w_sum = (w.align + w.breath + w.coherence).max(1e-9);
        let combined = (w.align * s_align + w.breath * s_breath + w.coherence * s_coherent) / w_sum;

        if combined >= self.preset.open_threshold {
            self.progress += dt / self.preset.open_seconds.max(1e-9);
        } else {
            self.progress -= self.preset.decay_per_sec * dt;
        }
        self.progress = clamp01(self.progress);

        if self.is_open() && !self.was_open {
            self.just_opened = true;
        }
        self.was_open = self.is_open();

        self.readout = GateReadout {
            progress: self.progress,
            s_align,
            s_coherent,
            s_breath,
            target_thrust,
            tangent,
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/flow.rs"]
mod tests;

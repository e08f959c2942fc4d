use crate::foundation::error::{PneumaError, PneumaResult};

/// How the runtime's effective breathing rate is chosen each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BreathMode {
    /// Constant `rate_bpm`.
    FreeRun,
    /// Substitute the tempo engine's BPM when supplied.
    TempoLocked,
    /// Slide toward an observed motion cadence (first-order, in BPM space).
    EntrainToMotion,
}

/// Per-segment easing curve for the breath envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Curve {
    Linear,
    InOutSine,
    InOutCubic,
}

impl Curve {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutSine => 0.5 - 0.5 * (std::f64::consts::PI * t).cos(),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Asymmetric envelope shape: four segment ratios (need not sum to 1;
/// normalized internally) plus the easing applied to the two moving
/// segments.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BreathShape {
    pub inhale: f64,
    pub hold_in: f64,
    pub exhale: f64,
    pub hold_out: f64,
    pub curve_inhale: Curve,
    pub curve_exhale: Curve,
}

impl Default for BreathShape {
    fn default() -> Self {
        Self {
            inhale: 0.4,
            hold_in: 0.1,
            exhale: 0.4,
            hold_out: 0.1,
            curve_inhale: Curve::InOutSine,
            curve_exhale: Curve::InOutSine,
        }
    }
}

impl BreathShape {
    /// Cumulative segment boundaries in cycle space:
    /// `[inhale_end, hold_in_end, exhale_end]` (hold-out runs to 1).
    ///
    /// A zero ratio sum is treated as 1, which collapses every boundary to
    /// 0 and leaves a hold-out-only envelope.
    pub(crate) fn boundaries(&self) -> [f64; 3] {
        let a = self.inhale.max(0.0);
        let b = self.hold_in.max(0.0);
        let c = self.exhale.max(0.0);
        let d = self.hold_out.max(0.0);
        let sum = a + b + c + d;
        let sum = if sum > 0.0 { sum } else { 1.0 };
        [a / sum, (a + b) / sum, (a + b + c) / sum]
    }
}

/// Per-cycle duration jitter. Deterministic for a given seed.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Variability {
    pub enabled: bool,
    /// Half-width of the jitter multiplier range, in `[0, 1]`.
    pub jitter_pct: f64,
    pub seed: u64,
}

impl Default for Variability {
    fn default() -> Self {
        Self {
            enabled: false,
            jitter_pct: 0.05,
            seed: 0,
        }
    }
}

/// Full configuration for the shaped breath runtime.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BreathConfig {
    pub mode: BreathMode,
    pub rate_bpm: f64,
    /// Cycle-space phase offset in `[0, 1)`.
    pub phase_offset: f64,
    pub shape: BreathShape,
    pub variability: Variability,
}

impl Default for BreathConfig {
    fn default() -> Self {
        Self {
            mode: BreathMode::FreeRun,
            rate_bpm: 6.0,
            phase_offset: 0.0,
            shape: BreathShape::default(),
            variability: Variability::default(),
        }
    }
}

/// Lowest breathing rate accepted; keeps cycle durations finite.
pub const MIN_RATE_BPM: f64 = 2.0;

impl BreathConfig {
    /// Copy with every field forced into its valid range. Never errors:
    /// a broken frame is preferable to a crashed session.
    pub fn sanitized(&self) -> Self {
        let mut c = *self;
        c.rate_bpm = if c.rate_bpm.is_finite() {
            c.rate_bpm.max(MIN_RATE_BPM)
        } else {
            Self::default().rate_bpm
        };
        c.phase_offset = crate::foundation::math::wrap01(if c.phase_offset.is_finite() {
            c.phase_offset
        } else {
            0.0
        });
        c.variability.jitter_pct = c.variability.jitter_pct.clamp(0.0, 1.0);
        c.shape.inhale = c.shape.inhale.max(0.0);
        c.shape.hold_in = c.shape.hold_in.max(0.0);
        c.shape.exhale = c.shape.exhale.max(0.0);
        c.shape.hold_out = c.shape.hold_out.max(0.0);
        c
    }

    /// Load a preset from JSON. Unknown or out-of-range numeric fields
    /// are sanitized, not rejected; only malformed JSON errors.
    pub fn from_json(json: &str) -> PneumaResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| PneumaError::config(format!("breath preset: {e}")))?;
        Ok(cfg.sanitized())
    }
}

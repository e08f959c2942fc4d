use crate::breath::config::MIN_RATE_BPM;
use crate::foundation::math::wrap01;

/// Phase label for the simple oscillator's three-segment cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OscPhase {
    Inhale,
    Pause,
    Exhale,
}

/// One sample of the simple oscillator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscSample {
    /// Signed breath value in `[-1, 1]`: -1 at the inhale start, 0 across
    /// the pause band, +1 at the exhale end.
    pub value: f64,
    pub phase: OscPhase,
}

/// Free-run breath oscillator: a pure function of absolute time.
///
/// Because every sample is computed from `t_abs mod period` there is no
/// integration state and therefore no drift, regardless of how
/// irregularly it is sampled. Cycle layout: inhale over the first
/// `0.5 - pause/2` of the cycle mapping linearly `[-1, 0]`, a centered
/// pause band of width `pause` holding 0, exhale over the remainder
/// mapping `[0, +1]`.
#[derive(Clone, Copy, Debug)]
pub struct BreathOsc {
    bpm: f64,
    pause_frac: f64,
}

impl BreathOsc {
    /// `bpm` clamps to at least [`MIN_RATE_BPM`]; `pause_frac` clamps
    /// into `[0, 1)`.
    pub fn new(bpm: f64, pause_frac: f64) -> Self {
        let bpm = if bpm.is_finite() {
            bpm.max(MIN_RATE_BPM)
        } else {
            MIN_RATE_BPM
        };
        let pause_frac = if pause_frac.is_finite() {
            pause_frac.clamp(0.0, 1.0 - 1e-9)
        } else {
            0.0
        };
        Self { bpm, pause_frac }
    }

    pub fn period_secs(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Sample at an absolute time in seconds.
    pub fn sample(&self, t_abs_sec: f64) -> OscSample {
        let t = wrap01(t_abs_sec / self.period_secs());
        let inhale_end = 0.5 - self.pause_frac / 2.0;
        let pause_end = inhale_end + self.pause_frac;

        if t < inhale_end {
            let u = t / inhale_end.max(1e-9);
            OscSample {
                value: -1.0 + u,
                phase: OscPhase::Inhale,
            }
        } else if t < pause_end {
            OscSample {
                value: 0.0,
                phase: OscPhase::Pause,
            }
        } else {
            let u = (t - pause_end) / (1.0 - pause_end).max(1e-9);
            OscSample {
                value: u,
                phase: OscPhase::Exhale,
            }
        }
    }
}

use crate::breath::config::{BreathConfig, MIN_RATE_BPM};
use crate::foundation::error::{PneumaError, PneumaResult};
use crate::foundation::math::wrap01;
use crate::gate::flow::FlowGateConfig;
use crate::tempo::engine::TEMPO_BPM_RANGE;

/// Session-level numeric tunables, overridable at startup from a
/// query-string-style override (e.g. persisted preferences or a URL).
///
/// Recognized keys: `bpm` (breath rate), `phase`, `jitter`, `friend`
/// (gate friendliness), `tempo` (beat clock BPM), `bar` (beats per bar).
/// Unknown keys and unparsable values are ignored silently; recognized
/// values clamp into range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tuning {
    pub rate_bpm: f64,
    pub phase_offset: f64,
    pub jitter_pct: f64,
    pub friendliness: f64,
    pub tempo_bpm: f64,
    pub beats_per_bar: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rate_bpm: 6.0,
            phase_offset: 0.0,
            jitter_pct: 0.05,
            friendliness: 0.5,
            tempo_bpm: 120.0,
            beats_per_bar: 4,
        }
    }
}

/// Highest breath rate the tuning surface accepts.
const MAX_RATE_BPM: f64 = 40.0;

impl Tuning {
    /// Copy with every field in range.
    pub fn clamped(&self) -> Self {
        Self {
            rate_bpm: self.rate_bpm.clamp(MIN_RATE_BPM, MAX_RATE_BPM),
            phase_offset: wrap01(self.phase_offset),
            jitter_pct: self.jitter_pct.clamp(0.0, 1.0),
            friendliness: self.friendliness.clamp(0.0, 1.0),
            tempo_bpm: self.tempo_bpm.clamp(TEMPO_BPM_RANGE.0, TEMPO_BPM_RANGE.1),
            beats_per_bar: self.beats_per_bar.clamp(1, 16),
        }
    }

    /// Apply `k=v&k2=v2` overrides in place. Forgiving by design: this
    /// is startup input from a URL or storage, not an API surface.
    pub fn apply_query(&mut self, query: &str) {
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "bpm" => {
                    if let Ok(v) = value.parse::<f64>() {
                        self.rate_bpm = v;
                    }
                }
                "phase" => {
                    if let Ok(v) = value.parse::<f64>() {
                        self.phase_offset = v;
                    }
                }
                "jitter" => {
                    if let Ok(v) = value.parse::<f64>() {
                        self.jitter_pct = v;
                    }
                }
                "friend" => {
                    if let Ok(v) = value.parse::<f64>() {
                        self.friendliness = v;
                    }
                }
                "tempo" => {
                    if let Ok(v) = value.parse::<f64>() {
                        self.tempo_bpm = v;
                    }
                }
                "bar" => {
                    if let Ok(v) = value.parse::<u32>() {
                        self.beats_per_bar = v;
                    }
                }
                _ => {}
            }
        }
        *self = self.clamped();
    }

    /// Load persisted tunables from JSON, clamped into range.
    pub fn from_json(json: &str) -> PneumaResult<Self> {
        let t: Self = serde_json::from_str(json)
            .map_err(|e| PneumaError::config(format!("tuning: {e}")))?;
        Ok(t.clamped())
    }

    /// Breath configuration carrying this tuning's rate, offset and
    /// jitter over the defaults.
    pub fn breath_config(&self) -> BreathConfig {
        let t = self.clamped();
        let mut cfg = BreathConfig::default();
        cfg.rate_bpm = t.rate_bpm;
        cfg.phase_offset = t.phase_offset;
        cfg.variability.enabled = t.jitter_pct > 0.0;
        cfg.variability.jitter_pct = t.jitter_pct;
        cfg
    }

    /// Gate configuration carrying this tuning's friendliness.
    pub fn gate_config(&self) -> FlowGateConfig {
        FlowGateConfig {
            friendliness: self.clamped().friendliness,
            ..FlowGateConfig::default()
        }
    }
}

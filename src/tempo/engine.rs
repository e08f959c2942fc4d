use crate::foundation::math::wrap01;

/// Beat subdivision kinds the engine emits edges for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BeatKind {
    /// Bar start only.
    Downbeat,
    /// Four evenly spaced edges per bar.
    Quarter,
    /// Eight evenly spaced edges per bar.
    Eighth,
}

impl BeatKind {
    fn divisions(self) -> u32 {
        match self {
            Self::Downbeat => 1,
            Self::Quarter => 4,
            Self::Eighth => 8,
        }
    }
}

/// Listener handle returned by [`TempoEngine::on_beat`]; pass to
/// [`TempoEngine::off`] to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeatSub(u64);

type Listener = Box<dyn FnMut(f64)>;

struct Entry {
    id: u64,
    kind: BeatKind,
    f: Listener,
}

/// Discrete musical clock: a single bar phase in `[0, 1)` advanced each
/// tick, with wrap-aware threshold crossing for each subdivision grid.
/// Independent of, and complementary to, the continuous breath signal.
///
/// Every listener of a kind fired within one tick observes the same
/// running time.
pub struct TempoEngine {
    bpm: f64,
    beats_per_bar: u32,
    bar_phase: f64,
    running_time: f64,
    listeners: Vec<Entry>,
    next_id: u64,
}

impl std::fmt::Debug for TempoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempoEngine")
            .field("bpm", &self.bpm)
            .field("beats_per_bar", &self.beats_per_bar)
            .field("bar_phase", &self.bar_phase)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Accepted BPM range for the beat clock.
pub const TEMPO_BPM_RANGE: (f64, f64) = (20.0, 300.0);

impl TempoEngine {
    pub fn new(bpm: f64, beats_per_bar: u32) -> Self {
        Self {
            bpm: clamp_bpm(bpm),
            beats_per_bar: beats_per_bar.clamp(1, 16),
            bar_phase: 0.0,
            running_time: 0.0,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = clamp_bpm(bpm);
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    /// Current bar phase in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.bar_phase
    }

    pub fn running_time(&self) -> f64 {
        self.running_time
    }

    /// Register a listener; it fires synchronously from `tick` with the
    /// current running time whenever an edge of `kind` is crossed.
    pub fn on_beat(&mut self, kind: BeatKind, f: impl FnMut(f64) + 'static) -> BeatSub {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push(Entry {
            id,
            kind,
            f: Box::new(f),
        });
        BeatSub(id)
    }

    /// Remove a listener. Unknown handles are ignored.
    pub fn off(&mut self, sub: BeatSub) {
        self.listeners.retain(|e| e.id != sub.0);
    }

    /// Advance by `dt` seconds, firing any crossed subdivision edges in
    /// listener registration order.
    pub fn tick(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.running_time += dt;

        let bar_dur = f64::from(self.beats_per_bar) * 60.0 / self.bpm;
        let delta = dt / bar_dur;
        let prev = self.bar_phase;
        let cur = wrap01(prev + delta);
        self.bar_phase = cur;

        // More than a full bar in one tick (cannot happen with a clamped
        // frame dt, but dt is a caller argument): every edge fired once.
        let full_wrap = delta >= 1.0;

        let now = self.running_time;
        for entry in &mut self.listeners {
            let div = entry.kind.divisions();
            for i in 0..div {
                let threshold = f64::from(i) / f64::from(div);
                if full_wrap || crossed(prev, cur, threshold) {
                    (entry.f)(now);
                }
            }
        }
    }
}

fn clamp_bpm(bpm: f64) -> f64 {
    if bpm.is_finite() {
        bpm.clamp(TEMPO_BPM_RANGE.0, TEMPO_BPM_RANGE.1)
    } else {
        120.0
    }
}

/// Did the forward arc `[prev, cur)` (unwrapped across 1.0) cover `t`?
fn crossed(prev: f64, cur: f64, t: f64) -> bool {
    if cur > prev {
        prev <= t && t < cur
    } else if cur < prev {
        t >= prev || t < cur
    } else {
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tempo/engine.rs"]
mod tests;

/// Largest delta-time one frame may observe, in seconds.
///
/// Stalls longer than this (backgrounded tab, debugger pause) are absorbed
/// here so downstream integrators never see a multi-second jump.
pub const MAX_FRAME_DT: f64 = 0.05;

/// One clock tick: absolute host time plus the clamped delta since the
/// previous tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Host timestamp in milliseconds.
    pub time_ms: f64,
    /// Seconds since the previous tick, clamped to `[0, MAX_FRAME_DT]`.
    pub dt: f64,
}

/// Delta-time pump fed by a host frame callback.
///
/// The clock does not schedule anything itself; the host (a display-synced
/// animation callback in a browser embedding, a [`Scheduler`] headless)
/// calls [`FrameClock::tick`] with its timestamps. While stopped, `tick`
/// returns `None`, so a cancelled loop can never deliver a stray tick.
#[derive(Debug, Default)]
pub struct FrameClock {
    running: bool,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin accepting ticks. Idempotent: starting a running clock is a
    /// no-op and does not reset the dt baseline.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop accepting ticks and forget the dt baseline, so a later
    /// restart begins with `dt = 0` rather than the stopped span.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance with a host timestamp. Returns `None` while stopped.
    ///
    /// The first tick after `start()` observes `dt = 0`. Backwards time
    /// (host clock adjustment) clamps to `dt = 0` as well.
    pub fn tick(&mut self, now_ms: f64) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        Some(FrameTick { time_ms: now_ms, dt })
    }
}

/// Scheduling port: something that can deliver host timestamps once per
/// frame. Lets the runtime run unchanged under a display-synced callback
/// or a headless fixed-step driver.
pub trait Scheduler {
    /// Call `frame(now_ms)` once per host frame until it returns `false`.
    fn run(&mut self, frame: &mut dyn FnMut(f64) -> bool);
}

/// Headless scheduler that delivers evenly spaced timestamps, for tests
/// and non-browser embeddings.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepScheduler {
    /// Milliseconds between frames.
    pub step_ms: f64,
    /// Upper bound on delivered frames (guards runaway loops).
    pub max_frames: u64,
}

impl FixedStepScheduler {
    pub fn new(step_ms: f64, max_frames: u64) -> Self {
        Self {
            step_ms: step_ms.max(1e-3),
            max_frames,
        }
    }
}

impl Scheduler for FixedStepScheduler {
    fn run(&mut self, frame: &mut dyn FnMut(f64) -> bool) {
        for n in 0..self.max_frames {
            let now_ms = n as f64 * self.step_ms;
            if !frame(now_ms) {
                break;
            }
        }
    }
}

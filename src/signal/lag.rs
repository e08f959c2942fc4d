/// One-pole exponential smoother with a time constant, used to keep
/// derived visual parameters from popping when their target jumps.
///
/// The per-step decay is `exp(-dt / tau)`, which makes the response
/// independent of frame rate: two half-dt steps land where one full-dt
/// step does.
#[derive(Clone, Copy, Debug)]
pub struct LagFilter {
    y: f64,
    tau: f64,
}

impl LagFilter {
    /// `tau` is the time constant in seconds; non-positive or non-finite
    /// values clamp to a small positive floor.
    pub fn new(initial: f64, tau: f64) -> Self {
        Self {
            y: initial,
            tau: sane_tau(tau),
        }
    }

    pub fn value(&self) -> f64 {
        self.y
    }

    pub fn set_tau(&mut self, tau: f64) {
        self.tau = sane_tau(tau);
    }

    /// Move toward `target` over `dt` seconds and return the new value.
    /// `dt = 0` leaves the value unchanged.
    pub fn step(&mut self, target: f64, dt: f64) -> f64 {
        let k = (-dt.max(0.0) / self.tau).exp();
        self.y = k * self.y + (1.0 - k) * target;
        self.y
    }

    /// Forcibly set the value, for intentional discontinuities
    /// (e.g. a chamber remount).
    pub fn reset(&mut self, v: f64) {
        self.y = v;
    }
}

fn sane_tau(tau: f64) -> f64 {
    if tau.is_finite() { tau.max(1e-6) } else { 1e-6 }
}

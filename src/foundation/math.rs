use kurbo::Vec2;

pub(crate) fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Wrap into `[0, 1)`, correct for negative inputs.
pub(crate) fn wrap01(x: f64) -> f64 {
    let w = x.fract();
    if w < 0.0 { w + 1.0 } else { w }
}

/// Soft-windowed score: ramps 0 -> 1 as `x` climbs from `lo` to 1.
pub(crate) fn soft_window(x: f64, lo: f64) -> f64 {
    clamp01((x - lo) / (1.0 - lo).max(1e-9))
}

/// Normalize with a unit fallback divisor: the zero vector stays zero
/// instead of going NaN.
pub(crate) fn unit_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    let div = if len > 0.0 { len } else { 1.0 };
    v / div
}

/// Rotate 90 degrees; `dir = +1.0` is counter-clockwise in y-up space.
pub(crate) fn rot90(v: Vec2, dir: f64) -> Vec2 {
    Vec2::new(-v.y * dir, v.x * dir)
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

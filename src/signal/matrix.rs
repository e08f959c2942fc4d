use crate::breath::runtime::BreathState;

/// Named signal sources a binding can read from the breath snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ModSource {
    /// Envelope in `[0, 1]`.
    Breath01,
    /// Signed envelope in `[-1, 1]`.
    BreathSigned,
    /// Envelope derivative per second.
    Velocity,
    /// Cycle position in `[0, 1)`.
    CycleT,
}

impl ModSource {
    pub fn read(self, state: &BreathState) -> f64 {
        match self {
            Self::Breath01 => state.breath01,
            Self::BreathSigned => state.breath_ss,
            Self::Velocity => state.velocity,
            Self::CycleT => state.t_cycle,
        }
    }
}

/// One source-to-sink route: clamp, then `bias + scale * value`, then
/// optional per-binding EMA, then the sink call.
pub struct ModBinding {
    source: ModSource,
    scale: f64,
    bias: f64,
    src_min: f64,
    src_max: f64,
    smooth_factor: f64,
    sink: Box<dyn FnMut(f64)>,
}

impl std::fmt::Debug for ModBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModBinding")
            .field("source", &self.source)
            .field("scale", &self.scale)
            .field("bias", &self.bias)
            .field("src_min", &self.src_min)
            .field("src_max", &self.src_max)
            .field("smooth_factor", &self.smooth_factor)
            .finish_non_exhaustive()
    }
}

impl ModBinding {
    /// Identity route: unclamped, `scale = 1`, `bias = 0`, no smoothing.
    pub fn new(source: ModSource, sink: impl FnMut(f64) + 'static) -> Self {
        Self {
            source,
            scale: 1.0,
            bias: 0.0,
            src_min: f64::NEG_INFINITY,
            src_max: f64::INFINITY,
            smooth_factor: 0.0,
            sink: Box::new(sink),
        }
    }

    /// Clamp the source value before scale/bias.
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        self.src_min = min.min(max);
        self.src_max = max.max(min);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Per-binding EMA: `smoothed += (raw - smoothed) * (1 - factor)`.
    /// `factor = 0` disables; values clamp into `[0, 1)`.
    pub fn smooth(mut self, factor: f64) -> Self {
        self.smooth_factor = factor.clamp(0.0, 1.0 - 1e-6);
        self
    }
}

struct Slot {
    binding: ModBinding,
    smoothed: Option<f64>,
}

/// Declarative modulation routing: registered bindings fire exactly once
/// per [`ModMatrix::apply`], in registration order.
///
/// Panic policy: a panicking sink propagates out of `apply`; the matrix
/// does not catch unwinds. (The matrix itself holds no invariants that a
/// mid-iteration unwind could corrupt — smoothing state is per-slot.)
#[derive(Default)]
pub struct ModMatrix {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for ModMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModMatrix")
            .field("bindings", &self.slots.len())
            .finish()
    }
}

impl ModMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, binding: ModBinding) {
        self.slots.push(Slot {
            binding,
            smoothed: None,
        });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Dispatch the snapshot to every binding. Side-effect only.
    pub fn apply(&mut self, state: &BreathState) {
        for slot in &mut self.slots {
            let b = &mut slot.binding;
            let v = b.source.read(state).clamp(b.src_min, b.src_max);
            let raw = b.bias + b.scale * v;
            let out = if b.smooth_factor > 0.0 {
                let prev = slot.smoothed.unwrap_or(raw);
                let sm = prev + (raw - prev) * (1.0 - b.smooth_factor);
                slot.smoothed = Some(sm);
                sm
            } else {
                raw
            };
            (b.sink)(out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/signal/matrix.rs"]
mod tests;

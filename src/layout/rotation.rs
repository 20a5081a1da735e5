use crate::foundation::error::{CloudError, CloudResult};

pub const DEFAULT_ROTATIONS: [f64; 5] = [0.0, 90.0, -90.0, 45.0, -45.0];

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// SplitMix64 generator.
#[derive(Clone, Debug)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeded from the wall clock: placements are not reproducible across runs.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(nanos)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for SplitMix64 {
    fn next_unit(&mut self) -> f64 {
        // Top 53 bits -> [0, 1).
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos = self.pos.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Picks a rotation (degrees) for each word.
pub trait RotationPolicy {
    fn pick(&mut self, text: &str) -> f64;
}

/// Uniform independent choice among a fixed set of angles.
pub struct UniformRotation {
    choices: Vec<f64>,
    source: Box<dyn RandomSource + Send>,
}

impl UniformRotation {
    pub fn new(
        choices: impl Into<Vec<f64>>,
        source: impl RandomSource + Send + 'static,
    ) -> CloudResult<Self> {
        let choices = choices.into();
        if choices.is_empty() {
            return Err(CloudError::validation("rotation choices must be non-empty"));
        }
        if choices.iter().any(|a| !a.is_finite()) {
            return Err(CloudError::validation("rotation angles must be finite"));
        }
        Ok(Self {
            choices,
            source: Box::new(source),
        })
    }

    pub fn choices(&self) -> &[f64] {
        &self.choices
    }
}

impl RotationPolicy for UniformRotation {
    fn pick(&mut self, _text: &str) -> f64 {
        let n = self.choices.len();
        let idx = ((self.source.next_unit() * n as f64) as usize).min(n - 1);
        self.choices[idx]
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Decides whether a successful tick produces a log entry.
pub trait Sampler: Send + Sync {
    fn should_record(&mut self) -> bool;

    fn describe(&self) -> String;
}

/// Records each tick independently with a fixed probability.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    probability: f64,
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(probability: f64) -> Self {
        Self::with_rng(probability, StdRng::from_entropy())
    }

    /// Deterministic sampler for reproducible runs.
    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(probability: f64, rng: StdRng) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { probability, rng }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Sampler for RandomSampler {
    fn should_record(&mut self) -> bool {
        self.rng.gen_bool(self.probability)
    }

    fn describe(&self) -> String {
        format!("random(p={})", self.probability)
    }
}

/// Records every `n`th tick, starting with the `n`th.
#[derive(Debug, Clone)]
pub struct EveryNthSampler {
    n: u64,
    seen: u64,
}

impl EveryNthSampler {
    pub fn new(n: u64) -> Self {
        Self { n: n.max(1), seen: 0 }
    }
}

impl Sampler for EveryNthSampler {
    fn should_record(&mut self) -> bool {
        self.seen += 1;
        self.seen % self.n == 0
    }

    fn describe(&self) -> String {
        format!("every-{}", self.n)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSample;

impl Sampler for AlwaysSample {
    fn should_record(&mut self) -> bool {
        true
    }

    fn describe(&self) -> String {
        "always".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSample;

impl Sampler for NeverSample {
    fn should_record(&mut self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "never".to_string()
    }
}

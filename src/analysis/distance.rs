use serde::{Deserialize, Serialize};

/// A fully-defined (F1, F2, F3) measurement in Hz.
///
/// Partial readings never reach this type; see [`super::validity::complete_formants`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormantTriple {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
}

impl FormantTriple {
    pub const fn new(f1: f64, f2: f64, f3: f64) -> Self {
        Self { f1, f2, f3 }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.f1, self.f2, self.f3]
    }
}

impl From<[f64; 3]> for FormantTriple {
    fn from([f1, f2, f3]: [f64; 3]) -> Self {
        Self { f1, f2, f3 }
    }
}

impl Serialize for FormantTriple {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_array().serialize(serializer)
    }
}

/// Per-formant weights of the distance function.
///
/// F3 is down-weighted by default: it separates vowels less and is noisier to estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormantWeights {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
}

impl FormantWeights {
    pub const DEFAULT: Self = Self::new(1.0, 1.0, 0.3);

    pub const fn new(f1: f64, f2: f64, f3: f64) -> Self {
        Self { f1, f2, f3 }
    }

    pub fn with_f3(self, f3: f64) -> Self {
        Self { f3, ..self }
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.f1, self.f2, self.f3]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

impl Default for FormantWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Weighted Euclidean distance between two triples.
pub fn distance(a: &FormantTriple, b: &FormantTriple, weights: &FormantWeights) -> f64 {
    let d1 = a.f1 - b.f1;
    let d2 = a.f2 - b.f2;
    let d3 = a.f3 - b.f3;
    (weights.f1 * d1 * d1 + weights.f2 * d2 * d2 + weights.f3 * d3 * d3).sqrt()
}

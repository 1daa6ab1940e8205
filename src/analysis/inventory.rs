use std::borrow::Cow;

use serde::Serialize;

use super::distance::FormantTriple;
use super::{AnalysisError, Result};

/// Canonical formant triple for one vowel symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VowelPrototype {
    pub symbol: &'static str,
    pub formants: FormantTriple,
}

impl VowelPrototype {
    pub const fn new(symbol: &'static str, f1: f64, f2: f64, f3: f64) -> Self {
        Self {
            symbol,
            formants: FormantTriple::new(f1, f2, f3),
        }
    }
}

/// Built-in prototypes, one reference speaker's vowel space.
///
/// Order matters: classification ties go to the earlier entry. Schwa
/// (500, 1500, 2100) is left out on purpose; it overlaps the mid vowels
/// under the default weights.
pub const BUILTIN_PROTOTYPES: [VowelPrototype; 12] = [
    VowelPrototype::new("i", 270.0, 2290.0, 3010.0),
    VowelPrototype::new("ɪ", 390.0, 1990.0, 2550.0),
    VowelPrototype::new("e", 530.0, 1840.0, 2480.0),
    VowelPrototype::new("ɛ", 610.0, 1720.0, 2410.0),
    VowelPrototype::new("æ", 860.0, 1660.0, 2380.0),
    VowelPrototype::new("ɑ", 730.0, 1090.0, 2440.0),
    VowelPrototype::new("ɔ", 570.0, 840.0, 2410.0),
    VowelPrototype::new("o", 500.0, 905.0, 2400.0),
    VowelPrototype::new("ʊ", 440.0, 1020.0, 2240.0),
    VowelPrototype::new("u", 300.0, 870.0, 2240.0),
    VowelPrototype::new("ʌ", 640.0, 1190.0, 2390.0),
    VowelPrototype::new("ɝ", 490.0, 1350.0, 1690.0),
];

/// The built-in table in its fixed iteration order.
pub fn prototypes() -> &'static [VowelPrototype] {
    &BUILTIN_PROTOTYPES
}

/// Ordered, non-empty set of prototypes the classifier scans.
#[derive(Debug, Clone, PartialEq)]
pub struct VowelInventory {
    prototypes: Cow<'static, [VowelPrototype]>,
}

impl VowelInventory {
    pub fn builtin() -> Self {
        Self {
            prototypes: Cow::Borrowed(&BUILTIN_PROTOTYPES),
        }
    }

    /// Custom inventory; iteration follows the order given.
    pub fn new(prototypes: Vec<VowelPrototype>) -> Result<Self> {
        if prototypes.is_empty() {
            return Err(AnalysisError::EmptyInventory);
        }
        Ok(Self {
            prototypes: Cow::Owned(prototypes),
        })
    }

    pub fn as_slice(&self) -> &[VowelPrototype] {
        &self.prototypes
    }

    pub fn get(&self, symbol: &str) -> Option<&VowelPrototype> {
        self.prototypes.iter().find(|p| p.symbol == symbol)
    }
}

impl Default for VowelInventory {
    fn default() -> Self {
        Self::builtin()
    }
}

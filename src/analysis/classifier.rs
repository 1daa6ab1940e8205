use super::distance::{distance, FormantTriple, FormantWeights};
use super::inventory::{VowelInventory, VowelPrototype};

/// Nearest-prototype vowel classifier.
#[derive(Debug, Clone, Default)]
pub struct VowelClassifier {
    inventory: VowelInventory,
    weights: FormantWeights,
}

impl VowelClassifier {
    pub fn new(inventory: VowelInventory, weights: FormantWeights) -> Self {
        Self { inventory, weights }
    }

    pub fn with_weights(weights: FormantWeights) -> Self {
        Self::new(VowelInventory::builtin(), weights)
    }

    pub fn inventory(&self) -> &VowelInventory {
        &self.inventory
    }

    pub fn classify(&self, triple: &FormantTriple) -> &'static str {
        classify(triple, &self.inventory, &self.weights)
    }
}

/// Symbol of the prototype closest to `triple`.
///
/// Scans the inventory in order; only a strictly smaller distance replaces the
/// current best, so ties resolve to the earlier prototype.
pub fn classify(
    triple: &FormantTriple,
    inventory: &VowelInventory,
    weights: &FormantWeights,
) -> &'static str {
    nearest(triple, inventory.as_slice(), weights).symbol
}

fn nearest<'a>(
    triple: &FormantTriple,
    prototypes: &'a [VowelPrototype],
    weights: &FormantWeights,
) -> &'a VowelPrototype {
    let (first, rest) = prototypes
        .split_first()
        .unwrap_or_else(|| unreachable!("vowel inventories are non-empty by construction"));
    let mut best = first;
    let mut best_distance = distance(triple, &first.formants, weights);
    for candidate in rest {
        let d = distance(triple, &candidate.formants, weights);
        if d < best_distance {
            best = candidate;
            best_distance = d;
        }
    }
    best
}

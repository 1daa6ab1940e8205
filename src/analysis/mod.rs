//! Aligns raw engine measurements onto one time grid and labels voiced frames
//! with the nearest vowel prototype.

pub mod classifier;
pub mod compare;
pub mod distance;
pub mod frame;
pub mod inventory;
pub mod orchestrator;
pub mod validity;

pub use classifier::{classify, VowelClassifier};
pub use compare::{compare, ComparisonReport};
pub use distance::{distance, FormantTriple, FormantWeights};
pub use frame::{AnalysisColumns, AnalysisFrame, AnalysisResult, VowelReading};
pub use inventory::{prototypes, VowelInventory, VowelPrototype};
pub use orchestrator::{analyze, analyze_file, FrameAligner};

/// Convenient alias for results returned by the analysis modules.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The signal-processing engine could not process the source.
    #[error("{message}")]
    Extraction { message: String },
    #[error("invalid analysis parameters: {0}")]
    InvalidParameters(String),
    #[error("vowel inventory must contain at least one prototype")]
    EmptyInventory,
}

impl AnalysisError {
    pub(crate) fn extraction(err: &anyhow::Error) -> Self {
        Self::Extraction {
            message: format!("{err:#}"),
        }
    }

    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction { .. })
    }
}

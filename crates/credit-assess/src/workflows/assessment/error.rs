use std::path::PathBuf;

use super::domain::AssessmentStage;

/// Missing or invalid input that blocks an action. Correct the input and retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("retailer name is required")]
    MissingRetailerName,
    #[error("{component} '{value}' cannot be used as a folder name")]
    InvalidPathComponent {
        component: &'static str,
        value: String,
    },
    #[error("district '{district}' needs a state")]
    DistrictWithoutState { district: String },
    #[error("cannot {action} while in the {} stage", stage.label())]
    ActionNotAllowed {
        action: &'static str,
        stage: AssessmentStage,
    },
    #[error("ratios have not been computed for this visit")]
    RatiosMissing,
}

/// Arithmetic that cannot produce a result. Not expected for realistic inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputationError {
    #[error("arithmetic overflow while computing {context}")]
    Overflow { context: &'static str },
    #[error("{field} score {value} is outside 0..={max}")]
    ScoreOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },
}

/// Failure reported by a document store or report writer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to serialize report: {0}")]
    Serialization(String),
    #[error("'{0}' is not a usable file name")]
    InvalidFileName(String),
}

impl From<csv::Error> for StorageError {
    fn from(err: csv::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Every way a workflow action can fail. State is untouched on any of them.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

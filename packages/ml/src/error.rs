use std::path::PathBuf;

/// Failure to load one of the startup artifacts. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid classifier artifact {}: {source:#}", path.display())]
    Classifier {
        path: PathBuf,
        #[source]
        source: fauna_types::Error,
    },

    #[error("Invalid class mapping artifact {}: {source:#}", path.display())]
    Mapping {
        path: PathBuf,
        #[source]
        source: fauna_types::Error,
    },
}

/// Failure while turning a feature record into a labelled prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Predicted class {0} is not present in the class mapping")]
    UnknownClass(usize),

    #[error("Classifier returned an invalid probability distribution: {0}")]
    InvalidDistribution(String),

    #[error(transparent)]
    Input(#[from] FormError),

    #[error("Classifier failed: {0:#}")]
    Model(#[from] fauna_types::Error),
}

/// Rejected feature input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown feature `{0}`")]
    UnknownField(String),

    #[error("Feature `{field}` does not accept value `{value}`")]
    OutOfRange { field: &'static str, value: String },
}

//! Startup artifacts: the classifier and its class mapping
//!
//! [`Artifacts::load`] reads both files once. The result is immutable; callers share it
//! behind an `Arc` instead of reloading on every request.

use crate::classifier::Classifier;
use crate::error::ArtifactError;
use crate::mapping::ClassMapping;
use crate::ml::MLModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const MODEL_FILE: &str = "animal_classifier.json";
pub const CLASS_MAP_FILE: &str = "class_mapping.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub class_map: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            class_map: dir.join(CLASS_MAP_FILE),
        }
    }

    /// Paths next to the running executable, independent of the working directory.
    pub fn beside_executable() -> Result<Self, ArtifactError> {
        let exe = std::env::current_exe().map_err(|source| ArtifactError::Io {
            path: PathBuf::from("<current executable>"),
            source,
        })?;
        let dir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::in_dir(dir))
    }
}

pub struct Artifacts {
    classifier: Arc<dyn Classifier>,
    class_map: ClassMapping,
    description: String,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("classifier", &self.description)
            .field("class_map", &self.class_map)
            .finish()
    }
}

impl Artifacts {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        class_map: ClassMapping,
        description: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            class_map,
            description: description.into(),
        }
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let bytes = read_artifact(&paths.model)?;
        let model =
            MLModel::from_json_slice(&bytes).map_err(|source| ArtifactError::Classifier {
                path: paths.model.clone(),
                source,
            })?;
        tracing::info!(
            path = %paths.model.display(),
            model = %model,
            classes = model.classes().len(),
            "Loaded classifier"
        );

        let bytes = read_artifact(&paths.class_map)?;
        let class_map = ClassMapping::from_csv_reader(bytes.as_slice()).map_err(|source| {
            ArtifactError::Mapping {
                path: paths.class_map.clone(),
                source,
            }
        })?;
        tracing::info!(
            path = %paths.class_map.display(),
            classes = class_map.len(),
            "Loaded class mapping"
        );

        for class in model.classes() {
            if class_map.label(*class).is_err() {
                tracing::warn!(
                    class,
                    "Classifier can emit a class that has no entry in the class mapping"
                );
            }
        }

        let description = model.to_string();
        Ok(Self::new(Arc::new(model), class_map, description))
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn class_map(&self) -> &ClassMapping {
        &self.class_map
    }

    /// Human readable model kind, e.g. for health checks.
    pub fn description(&self) -> &str {
        &self.description
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing(path.to_path_buf()),
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

use crate::features::FeatureRecord;
use fauna_types::Result;

/// Probability per class, aligned with [`Classifier::classes`].
pub type Distribution = Vec<f64>;

/// A pre-trained classifier over [`FeatureRecord`]s.
///
/// Implementations are immutable after loading and must return the same output for the
/// same record on every call.
pub trait Classifier: Send + Sync {
    /// Class numbers the model can emit, in the order of [`Classifier::predict_proba`].
    fn classes(&self) -> &[usize];

    /// Point prediction: the class number for `record`.
    fn predict(&self, record: &FeatureRecord) -> Result<usize>;

    /// Probability of each class in [`Classifier::classes`] for `record`.
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Distribution>;
}

/// Index of the largest value, first one on ties.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.iter().copied().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

//! Classification reports and confusion matrices.

mod confusion;
mod metrics;

use serde::Serialize;

use crate::error::EvalError;

pub use confusion::ConfusionMatrix;
pub use metrics::{AverageRow, ClassMetrics, ClassRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub metrics: ClassMetrics,
    pub confusion: ConfusionMatrix,
}

impl Report {
    pub fn build(predicted: &[u8], truth: &[u8]) -> Result<Self, EvalError> {
        let (metrics, confusion) = build_report(predicted, truth)?;
        Ok(Self { metrics, confusion })
    }
}

/// Compares `predicted` against `truth`, element by element.
///
/// Argument order matters: the confusion matrix rows are predicted classes.
pub fn build_report(
    predicted: &[u8],
    truth: &[u8],
) -> Result<(ClassMetrics, ConfusionMatrix), EvalError> {
    if predicted.len() != truth.len() || predicted.is_empty() {
        return Err(EvalError::ReportInputMismatch {
            predicted: predicted.len(),
            truth: truth.len(),
        });
    }
    let confusion = ConfusionMatrix::from_pairs(predicted, truth);
    let metrics = ClassMetrics::from_confusion(&confusion);
    Ok((metrics, confusion))
}

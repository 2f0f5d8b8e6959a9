//! Error kinds raised by the evaluation core.
//!
//! Every variant is fatal for the run. Pipeline stages lift these into
//! `anyhow::Error` so the failing stage shows up as context.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum EvalError {
    /// Slice count is zero, not a multiple of the structure size, or a
    /// structure does not own exactly `slices_per_structure` slices.
    #[error("invalid cardinality: {0}")]
    InvalidCardinality(String),

    /// Predicted and true label sequences cannot be compared.
    #[error("report input mismatch: {predicted} predicted labels vs {truth} true labels")]
    ReportInputMismatch { predicted: usize, truth: usize },

    /// Inference, label lookup or file access failed.
    #[error("{stage} failed for {subject}")]
    ExternalCollaboratorFailure {
        stage: &'static str,
        subject: String,
        #[source]
        source: BoxError,
    },
}

impl EvalError {
    pub fn external(
        stage: &'static str,
        subject: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::ExternalCollaboratorFailure {
            stage,
            subject: subject.into(),
            source: source.into(),
        }
    }
}

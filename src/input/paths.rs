use std::path::{Path, PathBuf};

use crate::error::EvalError;

/// Validated locations of the evaluation inputs.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub test_dir: PathBuf,
    pub labels: PathBuf,
    pub scores: Option<PathBuf>,
}

impl InputPaths {
    pub fn builder() -> InputPathsBuilder {
        InputPathsBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct InputPathsBuilder {
    test_dir: Option<PathBuf>,
    labels: Option<PathBuf>,
    scores: Option<PathBuf>,
}

impl InputPathsBuilder {
    pub fn test_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_dir = Some(path.into());
        self
    }

    pub fn labels(mut self, path: impl Into<PathBuf>) -> Self {
        self.labels = Some(path.into());
        self
    }

    pub fn scores(mut self, path: impl Into<PathBuf>) -> Self {
        self.scores = Some(path.into());
        self
    }

    pub fn build(self) -> Result<InputPaths, EvalError> {
        let test_dir = require(self.test_dir, "test directory")?;
        if !test_dir.is_dir() {
            return Err(missing(&test_dir, "test directory does not exist"));
        }
        let labels = require(self.labels, "label table")?;
        if !labels.is_file() {
            return Err(missing(&labels, "label table does not exist"));
        }
        if let Some(scores) = &self.scores {
            if !scores.is_file() {
                return Err(missing(scores, "score table does not exist"));
            }
        }
        Ok(InputPaths {
            test_dir,
            labels,
            scores: self.scores,
        })
    }
}

fn require(path: Option<PathBuf>, what: &str) -> Result<PathBuf, EvalError> {
    path.ok_or_else(|| EvalError::external("input validation", what, "path not provided"))
}

fn missing(path: &Path, reason: &'static str) -> EvalError {
    EvalError::external("input validation", path.display().to_string(), reason)
}

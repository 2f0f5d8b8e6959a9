//! Inference providers.
//!
//! The model itself is opaque: a provider turns an ordered slice stack into
//! one [`Prediction`] per slice, in the same order.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Result, bail};

use crate::aggregate::Prediction;
use crate::ctx::ImageDim;
use crate::error::EvalError;
use crate::input::SliceImage;

pub trait InferenceProvider {
    fn name(&self) -> &str;
    fn predict(&self, slices: &[SliceImage], image_dim: ImageDim) -> Result<Vec<Prediction>>;
}

/// Replays scores recorded by an earlier model run.
///
/// Rows are `file<TAB>score_0<TAB>score_1`; a comma-separated table with the
/// same leading columns (such as an earlier raw prediction dump) is also
/// accepted. Extra trailing columns are ignored, as is a leading header row
/// (first column `file`, or no numeric score cells). Files are
/// matched by file name, so recorded paths may point anywhere.
#[derive(Debug, Clone)]
pub struct ScoreTableProvider {
    source: String,
    scores: HashMap<String, Prediction>,
}

impl ScoreTableProvider {
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let content = crate::io::read_table(path)
            .map_err(|e| EvalError::external("score table", path.display().to_string(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, source: &str) -> Result<Self, EvalError> {
        let mut scores = HashMap::new();
        let mut seen_data = false;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let at = format!("{}:{}", source, line_no);
            let delim = if trimmed.contains('\t') { '\t' } else { ',' };
            let parts: Vec<&str> = trimmed.split(delim).map(str::trim).collect();
            if parts.len() < 3 {
                return Err(EvalError::external(
                    "score table",
                    at,
                    "malformed row (expected file, score_0, score_1)",
                ));
            }

            let first_data = !seen_data;
            seen_data = true;
            // Raw dumps carry the class names "0" and "1" in their header.
            if first_data && parts[0].eq_ignore_ascii_case("file") {
                continue;
            }
            let (neg, pos) = match (parts[1].parse::<f64>(), parts[2].parse::<f64>()) {
                (Ok(neg), Ok(pos)) => (neg, pos),
                (Err(_), Err(_)) if first_data => continue,
                _ => {
                    return Err(EvalError::external(
                        "score table",
                        at,
                        format!("invalid scores '{}', '{}'", parts[1], parts[2]),
                    ));
                }
            };
            if !neg.is_finite() || !pos.is_finite() {
                return Err(EvalError::external("score table", at, "non-finite score"));
            }

            let key = Path::new(parts[0])
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(parts[0])
                .to_string();
            if scores.insert(key.clone(), Prediction::new(neg, pos)).is_some() {
                return Err(EvalError::external(
                    "score table",
                    at,
                    format!("duplicate scores for slice '{}'", key),
                ));
            }
        }

        Ok(Self {
            source: source.to_string(),
            scores,
        })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl InferenceProvider for ScoreTableProvider {
    fn name(&self) -> &str {
        &self.source
    }

    fn predict(&self, slices: &[SliceImage], _image_dim: ImageDim) -> Result<Vec<Prediction>> {
        let mut out = Vec::with_capacity(slices.len());
        for slice in slices {
            match self.scores.get(&slice.file_name) {
                Some(p) => out.push(*p),
                None => bail!("no score recorded for slice {}", slice.file_name),
            }
        }
        Ok(out)
    }
}

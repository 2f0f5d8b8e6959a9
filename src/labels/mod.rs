//! Ground-truth labels keyed by structure name.
//!
//! The table is a two-column TSV (`name<TAB>label`) with labels 0 or 1.
//! A leading header row and `#` comments are ignored.

use std::collections::HashMap;
use std::path::Path;

use crate::error::EvalError;
use crate::input::SliceImage;

#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: HashMap<String, u8>,
}

impl LabelTable {
    pub fn from_records<I, S>(records: I) -> Result<Self, EvalError>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, label) in records {
            let name = name.into();
            table.insert(name.clone(), label, &name)?;
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let content = crate::io::read_table(path)
            .map_err(|e| EvalError::external("label table", path.display().to_string(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, source: &str) -> Result<Self, EvalError> {
        let mut table = Self::default();
        let mut seen_data = false;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let at = format!("{}:{}", source, line_no);
            let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
            if parts.len() != 2 {
                return Err(EvalError::external(
                    "label table",
                    at,
                    "malformed TSV (expected 2 columns)",
                ));
            }
            let (name, raw_label) = (parts[0], parts[1]);
            let first_data = !seen_data;
            seen_data = true;
            if first_data && raw_label.eq_ignore_ascii_case("label") {
                continue;
            }
            if name.is_empty() {
                return Err(EvalError::external("label table", at, "empty structure name"));
            }
            let label = match raw_label {
                "0" => 0,
                "1" => 1,
                other => {
                    return Err(EvalError::external(
                        "label table",
                        at,
                        format!("label must be 0 or 1, got '{}'", other),
                    ));
                }
            };
            table.insert(name.to_string(), label, &at)?;
        }

        Ok(table)
    }

    fn insert(&mut self, name: String, label: u8, at: &str) -> Result<(), EvalError> {
        if label > 1 {
            return Err(EvalError::external(
                "label table",
                at.to_string(),
                format!("label must be 0 or 1, got {}", label),
            ));
        }
        if let Some(&existing) = self.labels.get(&name) {
            if existing != label {
                return Err(EvalError::external(
                    "label table",
                    at.to_string(),
                    format!("conflicting labels for structure '{}'", name),
                ));
            }
            return Ok(());
        }
        self.labels.insert(name, label);
        Ok(())
    }

    pub fn label(&self, structure: &str) -> Result<u8, EvalError> {
        self.labels.get(structure).copied().ok_or_else(|| {
            EvalError::external("label lookup", structure.to_string(), "structure not in label table")
        })
    }

    /// Repeats each structure's label for every one of its slices.
    pub fn broadcast(&self, slices: &[SliceImage]) -> Result<Vec<u8>, EvalError> {
        slices.iter().map(|s| self.label(&s.structure)).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

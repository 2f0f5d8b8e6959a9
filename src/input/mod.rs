//! Slice discovery and structure naming.
//!
//! A slice file is named `<structure>_<index>.<ext>`. Files are ordered by
//! structure name and then by numeric slice index so that every structure
//! forms one contiguous block regardless of directory listing order.

mod paths;

use std::path::{Path, PathBuf};

use crate::error::EvalError;

pub use paths::{InputPaths, InputPathsBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceImage {
    pub path: PathBuf,
    pub file_name: String,
    pub structure: String,
    pub index: u64,
}

impl SliceImage {
    pub fn from_path(path: PathBuf) -> Result<Self, EvalError> {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                EvalError::external(
                    "filename parsing",
                    path.display().to_string(),
                    "file name is not valid UTF-8",
                )
            })?
            .to_string();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name.as_str());
        let (structure, index) = split_slice_stem(stem)?;
        Ok(Self {
            structure: structure.to_string(),
            index,
            file_name,
            path,
        })
    }
}

/// Strips the trailing `_<integer>` suffix from a slice stem.
///
/// `"1abc_3"` yields `"1abc"`.
pub fn structure_name(stem: &str) -> Result<&str, EvalError> {
    split_slice_stem(stem).map(|(name, _)| name)
}

fn split_slice_stem(stem: &str) -> Result<(&str, u64), EvalError> {
    let invalid = |reason: &str| {
        EvalError::external("filename parsing", stem.to_string(), reason.to_string())
    };
    let (name, suffix) = stem
        .rsplit_once('_')
        .ok_or_else(|| invalid("missing _<index> suffix"))?;
    if name.is_empty() {
        return Err(invalid("empty structure name"));
    }
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("slice suffix is not an integer"));
    }
    let index = suffix
        .parse::<u64>()
        .map_err(|_| invalid("slice index out of range"))?;
    Ok((name, index))
}

/// Lists the slice files of `test_dir` in evaluation order.
///
/// Hidden files and subdirectories are skipped.
pub fn discover_slices(test_dir: &Path) -> Result<Vec<SliceImage>, EvalError> {
    let read_err = |e: std::io::Error| {
        EvalError::external("slice discovery", test_dir.display().to_string(), e)
    };
    let mut slices = Vec::new();
    for entry in std::fs::read_dir(test_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let hidden = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.starts_with('.'));
        if hidden {
            continue;
        }
        slices.push(SliceImage::from_path(path)?);
    }

    if slices.is_empty() {
        return Err(EvalError::InvalidCardinality(format!(
            "no slice files found in {}",
            test_dir.display()
        )));
    }

    slices.sort_by(|a, b| {
        a.structure
            .cmp(&b.structure)
            .then(a.index.cmp(&b.index))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    Ok(slices)
}

/// Checks that `slices` splits into whole structures of
/// `slices_per_structure` each and returns the structure names in order.
pub fn validate_structure_layout(
    slices: &[SliceImage],
    slices_per_structure: usize,
    source: &Path,
) -> Result<Vec<String>, EvalError> {
    if slices.is_empty() {
        return Err(EvalError::InvalidCardinality(format!(
            "no slice files found in {}",
            source.display()
        )));
    }
    if slices_per_structure == 0 {
        return Err(EvalError::InvalidCardinality(
            "slices per structure must be positive".to_string(),
        ));
    }
    if slices.len() % slices_per_structure != 0 {
        return Err(EvalError::InvalidCardinality(format!(
            "{} slice files in {} is not an exact multiple of {} slices per structure",
            slices.len(),
            source.display(),
            slices_per_structure
        )));
    }

    let mut structures: Vec<String> = Vec::with_capacity(slices.len() / slices_per_structure);
    for chunk in slices.chunks(slices_per_structure) {
        let name = &chunk[0].structure;
        let owned = chunk.iter().filter(|s| &s.structure == name).count();
        if owned != chunk.len() {
            let total = slices.iter().filter(|s| &s.structure == name).count();
            return Err(EvalError::InvalidCardinality(format!(
                "structure {} has {} slices in {}, expected {}",
                name,
                total,
                source.display(),
                slices_per_structure
            )));
        }
        if structures.last() == Some(name) {
            return Err(EvalError::InvalidCardinality(format!(
                "structure {} has more than {} slices in {}",
                name,
                slices_per_structure,
                source.display()
            )));
        }
        structures.push(name.clone());
    }
    Ok(structures)
}

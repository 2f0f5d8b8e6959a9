use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationResult;
use crate::input::{InputPaths, SliceImage};
use crate::labels::LabelTable;

pub const DEFAULT_SLICES_PER_STRUCTURE: usize = 60;
pub const DEFAULT_IMAGE_DIM: ImageDim = ImageDim {
    width: 201,
    height: 201,
};

/// Target size of every slice image handed to the inference provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDim {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageDim {
    fn default() -> Self {
        DEFAULT_IMAGE_DIM
    }
}

impl fmt::Display for ImageDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageDim {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid image width '{}'", w))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid image height '{}'", h))?;
        if width == 0 || height == 0 {
            return Err(format!("image dimensions must be positive, got '{}'", s));
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub slices_per_structure: usize,
    pub image_dim: ImageDim,
    /// Worker threads for per-structure aggregation (0 = auto).
    pub threads: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            slices_per_structure: DEFAULT_SLICES_PER_STRUCTURE,
            image_dim: DEFAULT_IMAGE_DIM,
            threads: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
}

#[derive(Debug)]
pub struct Ctx {
    pub inputs: InputPaths,
    pub config: EvalConfig,
    pub write_json: bool,
    pub write_tsv: bool,
    pub slices: Vec<SliceImage>,
    pub structures: Vec<String>,
    pub label_table: Option<LabelTable>,
    pub slice_labels: Vec<u8>,
    pub result: Option<EvaluationResult>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
}

impl Ctx {
    pub fn new(
        inputs: InputPaths,
        out_dir: PathBuf,
        config: EvalConfig,
        write_json: bool,
        write_tsv: bool,
    ) -> Self {
        let json_path = out_dir.join("evaluation.json");
        Self {
            inputs,
            config,
            write_json,
            write_tsv,
            slices: Vec::new(),
            structures: Vec::new(),
            label_table: None,
            slice_labels: Vec::new(),
            result: None,
            warnings: Vec::new(),
            output: OutputPaths { out_dir, json_path },
        }
    }
}

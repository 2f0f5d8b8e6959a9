use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::ctx::{DEFAULT_SLICES_PER_STRUCTURE, ImageDim};

#[derive(Debug, Parser)]
#[command(
    name = "topaz-eval",
    version,
    about = "Evaluate a slice classifier per slice and per structure"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Evaluate(EvaluateArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[arg(long, help = "Directory of slice images named <structure>_<index>.<ext>")]
    pub test_dir: PathBuf,

    #[arg(long, help = "Recorded model scores (file, score_0, score_1), TSV or CSV, optionally .gz")]
    pub scores: PathBuf,

    #[arg(long, help = "Structure label table (name<TAB>label)")]
    pub labels: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_SLICES_PER_STRUCTURE)]
    pub slices_per_structure: usize,

    #[arg(long, default_value = "201x201", help = "Slice image size WIDTHxHEIGHT")]
    pub image_dim: ImageDim,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false, help = "Skip writing TSV score tables and reports")]
    pub no_tsv: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Directory of slice images named <structure>_<index>.<ext>")]
    pub test_dir: PathBuf,

    #[arg(long, help = "Structure label table (name<TAB>label)")]
    pub labels: PathBuf,

    #[arg(long, default_value_t = DEFAULT_SLICES_PER_STRUCTURE)]
    pub slices_per_structure: usize,
}

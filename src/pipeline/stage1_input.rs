use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::input::{discover_slices, validate_structure_layout};
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let test_dir = &ctx.inputs.test_dir;
        let slices = discover_slices(test_dir)?;
        info!(
            test_dir = %test_dir.display(),
            files = slices.len(),
            "slice_files_found"
        );

        let structures =
            validate_structure_layout(&slices, ctx.config.slices_per_structure, test_dir)?;
        info!(structures = structures.len(), "structures_resolved");

        ctx.slices = slices;
        ctx.structures = structures;
        Ok(())
    }
}

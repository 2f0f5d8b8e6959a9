use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::labels::LabelTable;
use crate::pipeline::Stage;

pub struct Stage2Labels;

impl Stage2Labels {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Labels {
    fn name(&self) -> &'static str {
        "stage2_labels"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.slices.is_empty() {
            bail!("slices not discovered before Stage 2");
        }
        let table = LabelTable::load(&ctx.inputs.labels)?;
        info!(
            labels = %ctx.inputs.labels.display(),
            entries = table.len(),
            "label_table_loaded"
        );

        let slice_labels = table.broadcast(&ctx.slices)?;
        let unused = table.len().saturating_sub(ctx.structures.len());
        if unused > 0 {
            ctx.warnings.push(format!(
                "{} label table entries have no slices in {}",
                unused,
                ctx.inputs.test_dir.display()
            ));
        }

        ctx.slice_labels = slice_labels;
        ctx.label_table = Some(table);
        Ok(())
    }
}

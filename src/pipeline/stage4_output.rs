use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage4Output;

impl Stage4Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Output {
    fn name(&self) -> &'static str {
        "stage4_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let result = ctx
            .result
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("evaluation result missing"))?;

        if ctx.write_tsv {
            let written = tsv_writer::write_tables(&ctx.output.out_dir, result)?;
            info!(tables = written.len(), "tsv_tables_written");
        }
        if ctx.write_json {
            json_writer::write_json(&ctx.output.json_path, ctx)?;
            info!(path = %ctx.output.json_path.display(), "json_report_written");
        }

        info!(out_dir = %ctx.output.out_dir.display(), "evaluations complete");
        Ok(())
    }
}

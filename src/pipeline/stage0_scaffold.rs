use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage0Scaffold;

impl Stage0Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Scaffold {
    fn name(&self) -> &'static str {
        "stage0_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let out_dir = &ctx.output.out_dir;
        if !out_dir.exists() {
            fs::create_dir_all(out_dir).with_context(|| {
                format!(
                    "could not create output directory {}; check permissions and location",
                    out_dir.display()
                )
            })?;
            info!(out_dir = %out_dir.display(), "output_dir_created");
        }
        info!(out_dir = %out_dir.display(), "output_dir_ready");
        Ok(())
    }
}

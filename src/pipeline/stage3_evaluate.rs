use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::evaluation::evaluate;
use crate::inference::InferenceProvider;
use crate::pipeline::Stage;

pub struct Stage3Evaluate {
    provider: Box<dyn InferenceProvider>,
}

impl Stage3Evaluate {
    pub fn new(provider: Box<dyn InferenceProvider>) -> Self {
        Self { provider }
    }
}

impl Stage for Stage3Evaluate {
    fn name(&self) -> &'static str {
        "stage3_evaluate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.slice_labels.len() != ctx.slices.len() {
            bail!("labels not resolved before Stage 3");
        }

        info!(provider = self.provider.name(), "getting predictions");
        let result = evaluate(
            self.provider.as_ref(),
            &ctx.slices,
            &ctx.slice_labels,
            &ctx.config,
        )?;

        info!(count = result.tally.good, "predicted good value");
        info!(count = result.tally.bad, "predicted bad value");
        if result.tally.tied > 0 {
            info!(count = result.tally.tied, "tied slice predictions");
        }
        for (name, report) in [
            ("per_image", &result.per_image),
            ("structure_average", &result.structure_average),
            ("structure_count", &result.structure_count),
        ] {
            info!(
                report = name,
                accuracy = report.metrics.accuracy,
                samples = report.confusion.total(),
                "classification report ready"
            );
            info!(report = name, "confusion matrix\n{}", report.confusion);
        }

        ctx.result = Some(result);
        Ok(())
    }
}

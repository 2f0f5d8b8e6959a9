use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let result = ctx.result.as_ref().context("evaluation result missing")?;

    let mut out = String::new();
    out.push_str(&format!("topaz-eval v{}\n", version));
    out.push_str(&format!(
        "Input: {} slices, {} structures, {} slices/structure\n",
        result.n_slices(),
        result.n_structures(),
        result.slices_per_structure
    ));
    out.push_str(&format!(
        "Slices: good={} bad={} tied={}\n",
        result.tally.good, result.tally.bad, result.tally.tied
    ));
    for (name, report) in [
        ("per image", &result.per_image),
        ("per structure (average)", &result.structure_average),
        ("per structure (count)", &result.structure_count),
    ] {
        out.push_str(&format!(
            "Accuracy {}: {:.4} (macro F1 {:.4})\n",
            name, report.metrics.accuracy, report.metrics.macro_avg.f1
        ));
    }
    Ok(out)
}

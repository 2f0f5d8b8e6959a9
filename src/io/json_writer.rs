use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::io::tsv_writer::ALL_TABLES;
use crate::report::{AverageRow, Report};
use crate::schema::v1::{
    Artifacts, AverageScore, ClassScore, ClassificationReport, Confusion, EvaluationV1, InputMeta,
    Reports, SliceTally,
};

pub fn build_report(ctx: &Ctx) -> Result<EvaluationV1> {
    let result = ctx.result.as_ref().context("evaluation result missing")?;

    let input_meta = InputMeta {
        test_dir: ctx.inputs.test_dir.display().to_string(),
        labels: ctx.inputs.labels.display().to_string(),
        slices: Some(result.n_slices() as u64),
        structures: Some(result.n_structures() as u64),
        slices_per_structure: result.slices_per_structure as u64,
        image_dim: ctx.config.image_dim.to_string(),
    };

    let tables = if ctx.write_tsv {
        ALL_TABLES.iter().map(|s| s.to_string()).collect()
    } else {
        Vec::new()
    };

    Ok(EvaluationV1 {
        tool: "topaz-eval".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        slice_tally: Some(SliceTally {
            good: result.tally.good as u64,
            bad: result.tally.bad as u64,
            tied: result.tally.tied as u64,
        }),
        reports: Reports {
            per_image: Some(to_schema(&result.per_image)),
            structure_average: Some(to_schema(&result.structure_average)),
            structure_count: Some(to_schema(&result.structure_count)),
        },
        artifacts: Artifacts { tables },
    })
}

pub fn write_json(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = build_report(ctx)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

fn to_schema(report: &Report) -> ClassificationReport {
    let metrics = &report.metrics;
    ClassificationReport {
        classes: metrics
            .classes
            .iter()
            .map(|c| ClassScore {
                label: c.label,
                precision: c.precision,
                recall: c.recall,
                f1_score: c.f1,
                support: c.support as u64,
            })
            .collect(),
        accuracy: metrics.accuracy,
        macro_avg: average(&metrics.macro_avg),
        weighted_avg: average(&metrics.weighted_avg),
        confusion: Confusion {
            labels: report.confusion.labels().to_vec(),
            matrix: report
                .confusion
                .cells()
                .iter()
                .map(|row| row.iter().map(|&c| c as u64).collect())
                .collect(),
        },
    }
}

fn average(row: &AverageRow) -> AverageScore {
    AverageScore {
        precision: row.precision,
        recall: row.recall,
        f1_score: row.f1,
        support: row.support as u64,
    }
}

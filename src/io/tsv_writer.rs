use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::evaluation::{EvaluationResult, SliceScoreRow, StructureScoreRow};
use crate::report::{ClassMetrics, ConfusionMatrix};

pub const RAW_PREDICTIONS: &str = "raw_predictions.tsv";
pub const AVERAGED_PREDICTIONS: &str = "averaged_predictions.tsv";
pub const COUNTED_PREDICTIONS: &str = "counted_predictions.tsv";
pub const PER_IMAGE_CLASS: &str = "per_image_class.tsv";
pub const PER_IMAGE_CONF: &str = "per_image_conf.tsv";
pub const AVERAGE_CLASS: &str = "average_class.tsv";
pub const AVERAGE_CONF: &str = "average_conf.tsv";
pub const COUNT_CLASS: &str = "count_class.tsv";
pub const COUNT_CONF: &str = "count_conf.tsv";

pub const ALL_TABLES: [&str; 9] = [
    RAW_PREDICTIONS,
    AVERAGED_PREDICTIONS,
    COUNTED_PREDICTIONS,
    PER_IMAGE_CLASS,
    PER_IMAGE_CONF,
    AVERAGE_CLASS,
    AVERAGE_CONF,
    COUNT_CLASS,
    COUNT_CONF,
];

/// Writes every score table and report of `result` into `out_dir`.
pub fn write_tables(out_dir: &Path, result: &EvaluationResult) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(ALL_TABLES.len());

    written.push(write_file(out_dir, RAW_PREDICTIONS, |w| {
        write_slice_table(w, &result.raw)
    })?);
    written.push(write_file(out_dir, AVERAGED_PREDICTIONS, |w| {
        write_structure_table(w, &result.averaged)
    })?);
    written.push(write_file(out_dir, COUNTED_PREDICTIONS, |w| {
        write_structure_table(w, &result.counted)
    })?);

    for (class_name, conf_name, report) in [
        (PER_IMAGE_CLASS, PER_IMAGE_CONF, &result.per_image),
        (AVERAGE_CLASS, AVERAGE_CONF, &result.structure_average),
        (COUNT_CLASS, COUNT_CONF, &result.structure_count),
    ] {
        written.push(write_file(out_dir, class_name, |w| {
            write_class_report(w, &report.metrics)
        })?);
        written.push(write_file(out_dir, conf_name, |w| {
            write_confusion(w, &report.confusion)
        })?);
    }

    Ok(written)
}

fn write_file<F>(out_dir: &Path, name: &str, body: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let path = out_dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    body(&mut w).with_context(|| format!("failed to write {}", path.display()))?;
    w.flush()?;
    Ok(path)
}

pub fn write_slice_table<W: Write>(w: &mut W, rows: &[SliceScoreRow]) -> Result<()> {
    writeln!(w, "file\t0\t1\ttrue_label")?;
    for row in rows {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{}",
            row.file, row.score_0, row.score_1, row.true_label
        )?;
    }
    Ok(())
}

pub fn write_structure_table<W: Write>(w: &mut W, rows: &[StructureScoreRow]) -> Result<()> {
    writeln!(w, "structure\t0\t1\ttrue_label")?;
    for row in rows {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{}",
            row.structure, row.score_0, row.score_1, row.true_label
        )?;
    }
    Ok(())
}

pub fn write_class_report<W: Write>(w: &mut W, metrics: &ClassMetrics) -> Result<()> {
    writeln!(w, "\tprecision\trecall\tf1-score\tsupport")?;
    for class in &metrics.classes {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{:.6}\t{}",
            class.label, class.precision, class.recall, class.f1, class.support
        )?;
    }
    // Accuracy is repeated in every column, support included.
    let acc = metrics.accuracy;
    writeln!(w, "accuracy\t{:.6}\t{:.6}\t{:.6}\t{:.6}", acc, acc, acc, acc)?;
    for (name, avg) in [
        ("macro avg", &metrics.macro_avg),
        ("weighted avg", &metrics.weighted_avg),
    ] {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6}\t{:.6}\t{}",
            name, avg.precision, avg.recall, avg.f1, avg.support
        )?;
    }
    Ok(())
}

/// Header row holds the true labels, each following row one predicted label.
pub fn write_confusion<W: Write>(w: &mut W, cm: &ConfusionMatrix) -> Result<()> {
    let header: Vec<String> = cm.labels().iter().map(|l| l.to_string()).collect();
    writeln!(w, "predicted\\true\t{}", header.join("\t"))?;
    for (label, row) in cm.labels().iter().zip(cm.cells()) {
        let counts: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        writeln!(w, "{}\t{}", label, counts.join("\t"))?;
    }
    Ok(())
}

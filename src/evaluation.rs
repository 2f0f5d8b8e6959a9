//! End-to-end evaluation of one slice set.
//!
//! Inference runs once; everything after it is a pure function of the
//! predictions, the broadcast labels and the configuration.

use std::collections::HashSet;

use serde::Serialize;

use crate::aggregate::decision::{average_decision, count_decision, slice_decision};
use crate::aggregate::{Prediction, check_cardinality, partition_with_threads};
use crate::ctx::EvalConfig;
use crate::error::EvalError;
use crate::inference::InferenceProvider;
use crate::input::SliceImage;
use crate::report::Report;

/// Scores of one slice as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceScoreRow {
    pub file: String,
    pub score_0: f64,
    pub score_1: f64,
    pub true_label: u8,
}

/// Aggregate scores of one structure. For the averaged table the columns
/// are mean channel scores; for the counted table they are the fractions of
/// slices won by each channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureScoreRow {
    pub structure: String,
    pub score_0: f64,
    pub score_1: f64,
    pub true_label: u8,
}

/// Per-slice channel wins. Exact ties count toward neither channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SliceTally {
    pub good: usize,
    pub bad: usize,
    pub tied: usize,
}

impl SliceTally {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let mut tally = Self::default();
        for p in predictions {
            if p.is_positive_dominant() {
                tally.good += 1;
            } else if p.is_negative_dominant() {
                tally.bad += 1;
            } else {
                tally.tied += 1;
            }
        }
        tally
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub slices_per_structure: usize,
    pub per_image: Report,
    pub structure_average: Report,
    pub structure_count: Report,
    pub raw: Vec<SliceScoreRow>,
    pub averaged: Vec<StructureScoreRow>,
    pub counted: Vec<StructureScoreRow>,
    pub tally: SliceTally,
}

impl EvaluationResult {
    pub fn n_slices(&self) -> usize {
        self.raw.len()
    }

    pub fn n_structures(&self) -> usize {
        self.averaged.len()
    }
}

/// Runs inference on `slices` and scores the predictions against `labels`.
pub fn evaluate(
    provider: &dyn InferenceProvider,
    slices: &[SliceImage],
    labels: &[u8],
    config: &EvalConfig,
) -> Result<EvaluationResult, EvalError> {
    check_cardinality(slices.len(), config.slices_per_structure)?;
    if labels.len() != slices.len() {
        return Err(EvalError::InvalidCardinality(format!(
            "{} slices but {} labels",
            slices.len(),
            labels.len()
        )));
    }

    let predictions = provider
        .predict(slices, config.image_dim)
        .map_err(|e| EvalError::external("inference", provider.name(), e))?;
    if predictions.len() != slices.len() {
        return Err(EvalError::external(
            "inference",
            provider.name(),
            format!(
                "returned {} predictions for {} slices",
                predictions.len(),
                slices.len()
            ),
        ));
    }

    score_predictions(slices, &predictions, labels, config)
}

/// Aggregates already computed predictions and builds the three reports.
pub fn score_predictions(
    slices: &[SliceImage],
    predictions: &[Prediction],
    labels: &[u8],
    config: &EvalConfig,
) -> Result<EvaluationResult, EvalError> {
    if slices.len() != predictions.len() || labels.len() != predictions.len() {
        return Err(EvalError::InvalidCardinality(format!(
            "{} slices, {} predictions and {} labels do not line up",
            slices.len(),
            predictions.len(),
            labels.len()
        )));
    }
    if let Some(label) = labels.iter().find(|&&l| l > 1) {
        return Err(EvalError::InvalidCardinality(format!(
            "true labels must be 0 or 1, got {}",
            label
        )));
    }
    let sps = config.slices_per_structure;
    let batches = partition_with_threads(predictions, sps, config.threads)?;
    check_batches(slices, labels, sps)?;

    let slice_predicted: Vec<u8> = predictions.iter().map(slice_decision).collect();
    let per_image = Report::build(&slice_predicted, labels)?;

    // Checked above: every batch carries a single label.
    let structure_truth: Vec<u8> = batches.iter().map(|b| labels[b.index() * sps]).collect();
    let average_predicted: Vec<u8> = batches
        .iter()
        .map(|b| average_decision(b.score()))
        .collect();
    let count_predicted: Vec<u8> = batches.iter().map(|b| count_decision(b.score())).collect();
    let structure_average = Report::build(&average_predicted, &structure_truth)?;
    let structure_count = Report::build(&count_predicted, &structure_truth)?;

    let raw = slices
        .iter()
        .zip(predictions.iter())
        .zip(labels.iter())
        .map(|((slice, p), &label)| SliceScoreRow {
            file: slice.file_name.clone(),
            score_0: p.negative,
            score_1: p.positive,
            true_label: label,
        })
        .collect();

    let mut averaged = Vec::with_capacity(batches.len());
    let mut counted = Vec::with_capacity(batches.len());
    for (batch, &truth) in batches.iter().zip(structure_truth.iter()) {
        let structure = slices[batch.index() * sps].structure.clone();
        let score = batch.score();
        averaged.push(StructureScoreRow {
            structure: structure.clone(),
            score_0: score.mean_negative,
            score_1: score.mean_positive,
            true_label: truth,
        });
        counted.push(StructureScoreRow {
            structure,
            score_0: score.count_fraction_negative,
            score_1: score.count_fraction,
            true_label: truth,
        });
    }

    Ok(EvaluationResult {
        slices_per_structure: sps,
        per_image,
        structure_average,
        structure_count,
        raw,
        averaged,
        counted,
        tally: SliceTally::from_predictions(predictions),
    })
}

/// Every batch must hold the slices of exactly one structure, sharing one label.
fn check_batches(slices: &[SliceImage], labels: &[u8], sps: usize) -> Result<(), EvalError> {
    let mut seen = HashSet::new();
    for (i, (chunk, chunk_labels)) in slices.chunks(sps).zip(labels.chunks(sps)).enumerate() {
        let name = &chunk[0].structure;
        if let Some(other) = chunk.iter().find(|s| &s.structure != name) {
            return Err(EvalError::InvalidCardinality(format!(
                "batch {} mixes structures {} and {}",
                i, name, other.structure
            )));
        }
        if chunk_labels.iter().any(|&l| l != chunk_labels[0]) {
            return Err(EvalError::InvalidCardinality(format!(
                "structure {} has slices with different true labels",
                name
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(EvalError::InvalidCardinality(format!(
                "structure {} has more than {} slices",
                name, sps
            )));
        }
    }
    Ok(())
}

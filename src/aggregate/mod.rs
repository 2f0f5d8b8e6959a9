//! Grouping of per-slice predictions into per-structure batches.

pub mod decision;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

#[cfg(feature = "mt")]
use rayon::prelude::*;

/// Classifier output for one slice: class-0 ("bad") and class-1 ("good")
/// scores. Scores are not assumed to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub negative: f64,
    pub positive: f64,
}

impl Prediction {
    pub fn new(negative: f64, positive: f64) -> Self {
        Self { negative, positive }
    }

    pub fn is_positive_dominant(&self) -> bool {
        self.positive > self.negative
    }

    pub fn is_negative_dominant(&self) -> bool {
        self.negative > self.positive
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateScore {
    pub mean_positive: f64,
    pub mean_negative: f64,
    /// Fraction of slices whose positive score beats the negative one.
    pub count_fraction: f64,
    pub count_fraction_negative: f64,
}

impl AggregateScore {
    fn from_predictions(predictions: &[Prediction]) -> Self {
        let n = predictions.len() as f64;
        let mut sum_pos = 0.0;
        let mut sum_neg = 0.0;
        let mut dominant = 0usize;
        for p in predictions {
            sum_pos += p.positive;
            sum_neg += p.negative;
            if p.is_positive_dominant() {
                dominant += 1;
            }
        }
        let count_fraction = dominant as f64 / n;
        Self {
            mean_positive: sum_pos / n,
            mean_negative: sum_neg / n,
            count_fraction,
            count_fraction_negative: 1.0 - count_fraction,
        }
    }
}

/// The predictions of one structure, in slice order.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceBatch<'a> {
    index: usize,
    predictions: &'a [Prediction],
    score: AggregateScore,
}

impl<'a> SliceBatch<'a> {
    fn new(index: usize, predictions: &'a [Prediction]) -> Self {
        Self {
            index,
            score: AggregateScore::from_predictions(predictions),
            predictions,
        }
    }

    /// Position of the structure within the run.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn predictions(&self) -> &'a [Prediction] {
        self.predictions
    }

    pub fn score(&self) -> &AggregateScore {
        &self.score
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

pub fn check_cardinality(len: usize, slices_per_structure: usize) -> Result<(), EvalError> {
    if len == 0 {
        return Err(EvalError::InvalidCardinality(
            "no slice predictions to evaluate".to_string(),
        ));
    }
    if slices_per_structure == 0 {
        return Err(EvalError::InvalidCardinality(
            "slices per structure must be positive".to_string(),
        ));
    }
    if len % slices_per_structure != 0 {
        return Err(EvalError::InvalidCardinality(format!(
            "{} slice predictions is not an exact multiple of {} slices per structure",
            len, slices_per_structure
        )));
    }
    Ok(())
}

/// Splits `predictions` into contiguous batches of `slices_per_structure`.
pub fn partition(
    predictions: &[Prediction],
    slices_per_structure: usize,
) -> Result<Vec<SliceBatch<'_>>, EvalError> {
    partition_with_threads(predictions, slices_per_structure, 1)
}

/// Same as [`partition`], aggregating batches on `threads` workers
/// (0 = auto). Batch order always follows the input order.
pub fn partition_with_threads(
    predictions: &[Prediction],
    slices_per_structure: usize,
    threads: usize,
) -> Result<Vec<SliceBatch<'_>>, EvalError> {
    check_cardinality(predictions.len(), slices_per_structure)?;

    #[cfg(feature = "mt")]
    {
        if threads != 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| EvalError::external("aggregation", "thread pool", e))?;
            let batches: Vec<SliceBatch<'_>> = pool.install(|| {
                predictions
                    .par_chunks(slices_per_structure)
                    .enumerate()
                    .map(|(i, chunk)| SliceBatch::new(i, chunk))
                    .collect()
            });
            return Ok(batches);
        }
    }

    #[cfg(not(feature = "mt"))]
    let _ = threads;

    Ok(predictions
        .chunks(slices_per_structure)
        .enumerate()
        .map(|(i, chunk)| SliceBatch::new(i, chunk))
        .collect())
}

//! Binary decision rules.
//!
//! Slices are decided by comparing the two channels directly; structures are
//! decided by thresholding an aggregate score. The two rules only agree when
//! the channel scores sum to one, so they are kept separate. Ties go to 0.

use crate::aggregate::{AggregateScore, Prediction};

pub const DECISION_THRESHOLD: f64 = 0.5;

pub fn decide(score: f64) -> u8 {
    u8::from(score > DECISION_THRESHOLD)
}

pub fn slice_decision(prediction: &Prediction) -> u8 {
    u8::from(prediction.positive > prediction.negative)
}

pub fn average_decision(score: &AggregateScore) -> u8 {
    decide(score.mean_positive)
}

pub fn count_decision(score: &AggregateScore) -> u8 {
    decide(score.count_fraction)
}

use serde::Serialize;

use crate::report::confusion::ConfusionMatrix;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true instances of `label`.
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageRow {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1 plus accuracy and the macro and
/// support-weighted averages. Zero denominators yield 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub classes: Vec<ClassRow>,
    pub accuracy: f64,
    pub macro_avg: AverageRow,
    pub weighted_avg: AverageRow,
}

impl ClassMetrics {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let classes: Vec<ClassRow> = cm
            .labels()
            .iter()
            .map(|&label| {
                let tp = cm.get(label, label) as f64;
                let predicted = cm.predicted_count(label) as f64;
                let support = cm.true_count(label);
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support as f64);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassRow {
                    label,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let total_support: usize = classes.iter().map(|c| c.support).sum();
        let n = classes.len() as f64;
        let macro_avg = AverageRow {
            precision: ratio(classes.iter().map(|c| c.precision).sum(), n),
            recall: ratio(classes.iter().map(|c| c.recall).sum(), n),
            f1: ratio(classes.iter().map(|c| c.f1).sum(), n),
            support: total_support,
        };
        let weighted = |value: fn(&ClassRow) -> f64| {
            ratio(
                classes.iter().map(|c| value(c) * c.support as f64).sum(),
                total_support as f64,
            )
        };
        let weighted_avg = AverageRow {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: total_support,
        };

        Self {
            accuracy: cm.accuracy(),
            classes,
            macro_avg,
            weighted_avg,
        }
    }

    pub fn class(&self, label: u8) -> Option<&ClassRow> {
        self.classes.iter().find(|c| c.label == label)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

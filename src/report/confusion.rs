use std::fmt;

use serde::Serialize;

/// Square count matrix over the sorted labels seen in either input.
///
/// Rows are predicted classes and columns are true classes:
/// `cells[i][j]` counts samples predicted `labels[i]` whose truth is
/// `labels[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    labels: Vec<u8>,
    cells: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub(crate) fn from_pairs(predicted: &[u8], truth: &[u8]) -> Self {
        let mut labels: Vec<u8> = predicted.iter().chain(truth.iter()).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let n = labels.len();
        let mut cells = vec![vec![0usize; n]; n];
        for (p, t) in predicted.iter().zip(truth.iter()) {
            // Both labels come from `labels`, so the lookups cannot miss.
            if let (Ok(i), Ok(j)) = (labels.binary_search(p), labels.binary_search(t)) {
                cells[i][j] += 1;
            }
        }
        Self { labels, cells }
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Count of samples predicted `predicted` with truth `truth`.
    pub fn get(&self, predicted: u8, truth: u8) -> usize {
        match (self.position(predicted), self.position(truth)) {
            (Some(i), Some(j)) => self.cells[i][j],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.cells[i][i]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f64 / total as f64
    }

    /// Samples predicted as `label` (row sum).
    pub fn predicted_count(&self, label: u8) -> usize {
        self.position(label)
            .map(|i| self.cells[i].iter().sum())
            .unwrap_or(0)
    }

    /// Samples whose truth is `label` (column sum).
    pub fn true_count(&self, label: u8) -> usize {
        self.position(label)
            .map(|j| self.cells.iter().map(|row| row[j]).sum())
            .unwrap_or(0)
    }

    fn position(&self, label: u8) -> Option<usize> {
        self.labels.binary_search(&label).ok()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>9}", "pred\\true")?;
        for label in &self.labels {
            write!(f, " {:>6}", label)?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(self.cells.iter()) {
            write!(f, "{:>9}", label)?;
            for count in row {
                write!(f, " {:>6}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

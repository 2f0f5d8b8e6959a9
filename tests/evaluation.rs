use std::path::PathBuf;

use anyhow::Result;
use topaz_eval::aggregate::Prediction;
use topaz_eval::ctx::{EvalConfig, ImageDim};
use topaz_eval::error::EvalError;
use topaz_eval::evaluation::{evaluate, score_predictions};
use topaz_eval::inference::InferenceProvider;
use topaz_eval::input::SliceImage;

struct FixedProvider {
    predictions: Vec<Prediction>,
}

impl InferenceProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _slices: &[SliceImage], _image_dim: ImageDim) -> Result<Vec<Prediction>> {
        Ok(self.predictions.clone())
    }
}

struct FailingProvider;

impl InferenceProvider for FailingProvider {
    fn name(&self) -> &str {
        "broken-model"
    }

    fn predict(&self, _slices: &[SliceImage], _image_dim: ImageDim) -> Result<Vec<Prediction>> {
        anyhow::bail!("model file not found")
    }
}

fn slices(structures: &[&str], per_structure: usize) -> Vec<SliceImage> {
    let mut out = Vec::new();
    for name in structures {
        for i in 0..per_structure {
            let file_name = format!("{}_{}.png", name, i);
            out.push(SliceImage {
                path: PathBuf::from("test").join(&file_name),
                file_name,
                structure: name.to_string(),
                index: i as u64,
            });
        }
    }
    out
}

fn config(slices_per_structure: usize) -> EvalConfig {
    EvalConfig {
        slices_per_structure,
        threads: 1,
        ..EvalConfig::default()
    }
}

#[test]
fn per_slice_report_for_two_slices() {
    let provider = FixedProvider {
        predictions: vec![Prediction::new(0.3, 0.7), Prediction::new(0.6, 0.4)],
    };
    let input = slices(&["1abc", "2xyz"], 1);
    let result = evaluate(&provider, &input, &[1, 0], &config(1)).unwrap();

    let cm = &result.per_image.confusion;
    assert_eq!(cm.labels(), &[0, 1]);
    assert_eq!(cm.cells(), &[vec![1, 0], vec![0, 1]]);
    assert_eq!(result.per_image.metrics.accuracy, 1.0);
    assert_eq!(result.tally.good, 1);
    assert_eq!(result.tally.bad, 1);
    assert_eq!(result.tally.tied, 0);
}

#[test]
fn structure_tables_and_reports() {
    let mut predictions = Vec::new();
    // Structure A: 3 of 4 slices good, high mean.
    predictions.extend([
        Prediction::new(0.1, 0.9),
        Prediction::new(0.2, 0.8),
        Prediction::new(0.3, 0.7),
        Prediction::new(0.6, 0.4),
    ]);
    // Structure B: 1 of 4 slices good.
    predictions.extend([
        Prediction::new(0.9, 0.1),
        Prediction::new(0.8, 0.2),
        Prediction::new(0.7, 0.3),
        Prediction::new(0.4, 0.6),
    ]);
    let input = slices(&["aaaa", "bbbb"], 4);
    let labels = vec![1, 1, 1, 1, 0, 0, 0, 0];
    let provider = FixedProvider { predictions };
    let result = evaluate(&provider, &input, &labels, &config(4)).unwrap();

    assert_eq!(result.n_slices(), 8);
    assert_eq!(result.n_structures(), 2);
    assert_eq!(result.raw[0].file, "aaaa_0.png");
    assert_eq!(result.raw[4].true_label, 0);

    assert_eq!(result.averaged[0].structure, "aaaa");
    assert!((result.averaged[0].score_1 - 0.7).abs() < 1e-9);
    assert!((result.averaged[0].score_0 - 0.3).abs() < 1e-9);
    assert_eq!(result.averaged[1].structure, "bbbb");
    assert_eq!(result.averaged[1].true_label, 0);

    assert_eq!(result.counted[0].score_1, 0.75);
    assert_eq!(result.counted[0].score_0, 0.25);
    assert_eq!(result.counted[1].score_1, 0.25);

    assert_eq!(result.structure_average.confusion.total(), 2);
    assert_eq!(result.structure_average.metrics.accuracy, 1.0);
    assert_eq!(result.structure_count.metrics.accuracy, 1.0);
    assert!((result.per_image.metrics.accuracy - 0.75).abs() < 1e-12);
}

#[test]
fn threaded_and_sequential_runs_agree() {
    let mut predictions = Vec::new();
    for s in 0..12 {
        for i in 0..5 {
            let pos = ((s * 5 + i) % 7) as f64 / 7.0;
            predictions.push(Prediction::new(1.0 - pos, pos));
        }
    }
    let names: Vec<String> = (0..12).map(|s| format!("s{:02}", s)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let input = slices(&refs, 5);
    let labels: Vec<u8> = (0..60).map(|i| ((i / 5) % 2) as u8).collect();

    let seq = score_predictions(&input, &predictions, &labels, &config(5)).unwrap();
    let par_config = EvalConfig {
        threads: 3,
        ..config(5)
    };
    let par = score_predictions(&input, &predictions, &labels, &par_config).unwrap();
    assert_eq!(seq.averaged, par.averaged);
    assert_eq!(seq.counted, par.counted);
    assert_eq!(seq.structure_count, par.structure_count);
}

#[test]
fn empty_input_is_invalid_cardinality() {
    let provider = FixedProvider {
        predictions: Vec::new(),
    };
    let err = evaluate(&provider, &[], &[], &config(60)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCardinality(_)));
}

#[test]
fn partial_structure_is_invalid_cardinality() {
    let provider = FixedProvider {
        predictions: vec![Prediction::new(0.5, 0.5); 59],
    };
    let input = slices(&["1abc"], 59);
    let labels = vec![1; 59];
    let err = evaluate(&provider, &input, &labels, &config(60)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCardinality(_)));
}

#[test]
fn inference_failure_names_provider() {
    let input = slices(&["1abc"], 2);
    let err = evaluate(&FailingProvider, &input, &[1, 1], &config(2)).unwrap_err();
    match err {
        EvalError::ExternalCollaboratorFailure { stage, subject, .. } => {
            assert_eq!(stage, "inference");
            assert_eq!(subject, "broken-model");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn short_prediction_set_is_rejected() {
    let provider = FixedProvider {
        predictions: vec![Prediction::new(0.2, 0.8)],
    };
    let input = slices(&["1abc"], 2);
    let err = evaluate(&provider, &input, &[1, 1], &config(2)).unwrap_err();
    assert!(matches!(
        err,
        EvalError::ExternalCollaboratorFailure {
            stage: "inference",
            ..
        }
    ));
}

#[test]
fn interleaved_structures_are_rejected() {
    let mut input = slices(&["a", "b"], 2);
    input.swap(1, 2);
    assert_eq!(input[0].structure, "a");
    assert_eq!(input[1].structure, "b");
    let predictions = vec![
        Prediction::new(0.5, 0.5),
        Prediction::new(0.5, 0.5),
        Prediction::new(0.5, 0.5),
        Prediction::new(0.5, 0.5),
    ];
    let err = score_predictions(&input, &predictions, &[1, 0, 1, 0], &config(2)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCardinality(_)));
    assert!(err.to_string().contains("mixes structures a and b"));
}

#[test]
fn structure_split_across_batches_is_rejected() {
    let input = slices(&["a"], 4);
    let predictions = vec![Prediction::new(0.2, 0.8); 4];
    let err = score_predictions(&input, &predictions, &[1, 1, 1, 1], &config(2)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCardinality(_)));
}

#[test]
fn mixed_labels_within_structure_are_rejected() {
    let input = slices(&["a", "b"], 2);
    let predictions = vec![Prediction::new(0.2, 0.8); 4];
    let err = score_predictions(&input, &predictions, &[1, 0, 0, 0], &config(2)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCardinality(_)));
    assert!(err.to_string().contains("structure a"));
}

#[test]
fn non_binary_labels_are_rejected() {
    let input = slices(&["a"], 2);
    let predictions = vec![Prediction::new(0.2, 0.8); 2];
    let err = score_predictions(&input, &predictions, &[2, 2], &config(2)).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCardinality(_)));
}

use std::path::PathBuf;

use topaz_eval::ctx::ImageDim;
use topaz_eval::inference::{InferenceProvider, ScoreTableProvider};
use topaz_eval::input::SliceImage;

fn slice(file_name: &str) -> SliceImage {
    let stem = file_name.trim_end_matches(".png");
    let (structure, index) = stem.rsplit_once('_').unwrap();
    SliceImage {
        path: PathBuf::from("test").join(file_name),
        file_name: file_name.to_string(),
        structure: structure.to_string(),
        index: index.parse().unwrap(),
    }
}

#[test]
fn replays_scores_in_slice_order() {
    let content = "file\t0\t1\n1abc_1.png\t0.2\t0.8\n1abc_0.png\t0.9\t0.1\n";
    let provider = ScoreTableProvider::parse(content, "scores.tsv").unwrap();
    assert_eq!(provider.len(), 2);

    let preds = provider
        .predict(&[slice("1abc_0.png"), slice("1abc_1.png")], ImageDim::default())
        .unwrap();
    assert_eq!(preds[0].negative, 0.9);
    assert_eq!(preds[1].positive, 0.8);
}

#[test]
fn accepts_raw_prediction_csv_dump() {
    let content = "File,0,1,True Score\n/data/test/1abc_0.png,0.4,0.6,1\n";
    let provider = ScoreTableProvider::parse(content, "raw_predictions.csv").unwrap();
    assert_eq!(provider.len(), 1);
    let preds = provider
        .predict(&[slice("1abc_0.png")], ImageDim::default())
        .unwrap();
    assert_eq!(preds[0].positive, 0.6);
}

#[test]
fn missing_slice_is_reported() {
    let provider = ScoreTableProvider::parse("a_0.png\t0.5\t0.5\n", "scores.tsv").unwrap();
    let err = provider
        .predict(&[slice("a_1.png")], ImageDim::default())
        .unwrap_err();
    assert!(err.to_string().contains("a_1.png"));
}

#[test]
fn rejects_bad_rows() {
    assert!(ScoreTableProvider::parse("a_0.png\t0.5\n", "s").is_err());
    assert!(ScoreTableProvider::parse("a_0.png\t0.1\t0.9\na_1.png\tx\t0.9\n", "s").is_err());
    assert!(ScoreTableProvider::parse("a_0.png\tNaN\t0.9\n", "s").is_err());
    assert!(ScoreTableProvider::parse("a_0.png\t0.1\t0.9\na_0.png\t0.1\t0.9\n", "s").is_err());
}

#[test]
fn named_header_row_is_skipped() {
    let content = "slice\tbad\tgood\na_0.png\t0.3\t0.7\n";
    let provider = ScoreTableProvider::parse(content, "scores.tsv").unwrap();
    assert_eq!(provider.len(), 1);
}

#[test]
fn typo_in_first_row_is_an_error() {
    let err = ScoreTableProvider::parse("a_0.png\t0.1\t0.9x\na_1.png\t0.2\t0.8\n", "scores.tsv")
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("scores.tsv:1"), "{msg}");
}

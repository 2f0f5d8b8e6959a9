use std::path::PathBuf;

use topaz_eval::aggregate::Prediction;
use topaz_eval::ctx::{Ctx, EvalConfig};
use topaz_eval::evaluation::score_predictions;
use topaz_eval::input::{InputPaths, SliceImage};
use topaz_eval::io::json_writer::build_report;

#[test]
fn json_report_populated() {
    let config = EvalConfig {
        slices_per_structure: 2,
        threads: 1,
        ..EvalConfig::default()
    };
    let inputs = InputPaths {
        test_dir: PathBuf::from("test"),
        labels: PathBuf::from("labels.tsv"),
        scores: None,
    };
    let mut ctx = Ctx::new(inputs, PathBuf::from("out"), config, true, true);

    let slices: Vec<SliceImage> = (0..4)
        .map(|i| SliceImage {
            path: PathBuf::from(format!("s{}_{}.png", i / 2, i % 2)),
            file_name: format!("s{}_{}.png", i / 2, i % 2),
            structure: format!("s{}", i / 2),
            index: (i % 2) as u64,
        })
        .collect();
    let predictions = vec![
        Prediction::new(0.1, 0.9),
        Prediction::new(0.2, 0.8),
        Prediction::new(0.5, 0.5),
        Prediction::new(0.9, 0.1),
    ];
    let result = score_predictions(&slices, &predictions, &[1, 1, 0, 0], &ctx.config).unwrap();
    ctx.result = Some(result);

    let report = build_report(&ctx).unwrap();
    let json = serde_json::to_value(report).unwrap();

    assert_eq!(json["tool"], "topaz-eval");
    assert_eq!(json["schema_version"], "v1");
    assert_eq!(json["input_meta"]["slices"], 4);
    assert_eq!(json["input_meta"]["structures"], 2);
    assert_eq!(json["input_meta"]["image_dim"], "201x201");
    assert_eq!(json["slice_tally"]["tied"], 1);
    assert_eq!(json["reports"]["per_image"]["accuracy"], 1.0);
    assert_eq!(
        json["reports"]["structure_count"]["confusion"]["matrix"],
        serde_json::json!([[1, 0], [0, 1]])
    );
    assert!(json["reports"]["structure_average"]["classes"][0]["f1-score"].is_number());
    assert_eq!(json["artifacts"]["tables"].as_array().unwrap().len(), 9);
}

use topaz_eval::schema::v1::EvaluationV1;

#[test]
fn schema_roundtrip_v1() {
    let report = EvaluationV1::empty("0.0.0-test", 60, "201x201");
    let json = serde_json::to_string(&report).unwrap();
    let decoded: EvaluationV1 = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.tool, "topaz-eval");
    assert_eq!(decoded.schema_version, "v1");
    assert_eq!(decoded.input_meta.slices_per_structure, 60);
    assert!(decoded.reports.per_image.is_none());
}

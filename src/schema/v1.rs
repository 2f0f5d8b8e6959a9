use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub test_dir: String,
    pub labels: String,
    pub slices: Option<u64>,
    pub structures: Option<u64>,
    pub slices_per_structure: u64,
    pub image_dim: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceTally {
    pub good: u64,
    pub bad: u64,
    pub tied: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassScore {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageScore {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confusion {
    /// Row and column keys, ascending.
    pub labels: Vec<u8>,
    /// `matrix[predicted][true]`.
    pub matrix: Vec<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassScore>,
    pub accuracy: f64,
    pub macro_avg: AverageScore,
    pub weighted_avg: AverageScore,
    pub confusion: Confusion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reports {
    pub per_image: Option<ClassificationReport>,
    pub structure_average: Option<ClassificationReport>,
    pub structure_count: Option<ClassificationReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifacts {
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub slice_tally: Option<SliceTally>,
    pub reports: Reports,
    pub artifacts: Artifacts,
}

impl EvaluationV1 {
    pub fn empty(tool_version: &str, slices_per_structure: u64, image_dim: &str) -> Self {
        Self {
            tool: "topaz-eval".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                test_dir: String::new(),
                labels: String::new(),
                slices: None,
                structures: None,
                slices_per_structure,
                image_dim: image_dim.to_string(),
            },
            slice_tally: None,
            reports: Reports {
                per_image: None,
                structure_average: None,
                structure_count: None,
            },
            artifacts: Artifacts { tables: Vec::new() },
        }
    }
}

// src/report/datasets.rs

use serde::{Deserialize, Serialize};

// Wire keys are the exact Spanish strings the prompt instructs the model
// to emit; the interpreter validates against these same names.

/// One row of the thematic-DNA bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicShare {
    #[serde(rename = "Personaje")]
    pub character: String,
    #[serde(rename = "Tema")]
    pub theme: String,
    #[serde(rename = "Porcentaje")]
    pub percentage: f64,
}

/// One of the eight story beats in the emotional-arc line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcPoint {
    #[serde(rename = "Momento")]
    pub moment: String,
    #[serde(rename = "Alegría", skip_serializing_if = "Option::is_none")]
    pub joy: Option<f64>,
    #[serde(rename = "Tristeza", skip_serializing_if = "Option::is_none")]
    pub sadness: Option<f64>,
    #[serde(rename = "Ira", skip_serializing_if = "Option::is_none")]
    pub anger: Option<f64>,
    #[serde(rename = "Miedo", skip_serializing_if = "Option::is_none")]
    pub fear: Option<f64>,
    #[serde(rename = "Tensión", skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// Dialogue share per gender; the prompt asks the model to make these sum
/// to 100, which is not re-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityBreakdown {
    #[serde(rename = "Hombres")]
    pub men: f64,
    #[serde(rename = "Mujeres")]
    pub women: f64,
    #[serde(rename = "Disidencias")]
    pub dissidences: f64,
}

/// A classified fenced-JSON block.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetPayload {
    Topics(Vec<TopicShare>),
    EmotionalArc(Vec<ArcPoint>),
    Diversity(DiversityBreakdown),
    /// Valid JSON that fits none of the known shapes.
    Unrecognized,
}

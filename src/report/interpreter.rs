//! Pulls the hidden fenced JSON blocks out of the model's response,
//! classifies each into one of the known chart datasets, and produces a
//! clean copy of the text for display.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::datasets::{ArcPoint, DatasetPayload, DiversityBreakdown, TopicShare};

// Non-greedy across newlines; matches exactly the fence shape the prompt
// asks the model to emit.
static JSON_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("valid fence regex"));

/// Everything extracted from one raw model response.
#[derive(Debug, Default)]
pub struct ReportDatasets {
    pub topics: Option<Vec<TopicShare>>,
    pub emotional_arc: Option<Vec<ArcPoint>>,
    pub diversity: Option<DiversityBreakdown>,
    /// Blocks that parsed as JSON but matched no dataset schema.
    pub unrecognized: usize,
    /// The response with every matched fenced JSON block removed.
    pub display_text: String,
}

/// Extract and classify all fenced JSON blocks in `raw`.
///
/// Blocks that fail to parse as JSON are dropped per block. Blocks that
/// parse but fit no schema are counted as unrecognized. When the model
/// emits two blocks of the same kind the later one wins.
pub fn interpret_response(raw: &str) -> ReportDatasets {
    let mut datasets = ReportDatasets::default();

    for captures in JSON_BLOCK_RE.captures_iter(raw) {
        let block = &captures[1];
        let value: Value = match serde_json::from_str(block) {
            Ok(value) => value,
            Err(err) => {
                debug!("Discarding unparseable JSON block: {}", err);
                continue;
            }
        };

        match classify(value) {
            DatasetPayload::Topics(topics) => datasets.topics = Some(topics),
            DatasetPayload::EmotionalArc(points) => datasets.emotional_arc = Some(points),
            DatasetPayload::Diversity(breakdown) => datasets.diversity = Some(breakdown),
            DatasetPayload::Unrecognized => {
                warn!("JSON block matched no known dataset shape");
                datasets.unrecognized += 1;
            }
        }
    }

    datasets.display_text = JSON_BLOCK_RE.replace_all(raw, "").into_owned();
    datasets
}

/// Classify by the first element's keys (lists) or by object shape, then
/// validate the whole payload against the typed schema.
fn classify(value: Value) -> DatasetPayload {
    match value {
        Value::Array(items) => {
            let (has_theme, has_emotion) = match items.first().and_then(Value::as_object) {
                Some(first) => (
                    first.contains_key("Tema"),
                    first.contains_key("Alegría") || first.contains_key("Tensión"),
                ),
                None => return DatasetPayload::Unrecognized,
            };
            let value = Value::Array(items);

            if has_theme {
                if let Ok(topics) = serde_json::from_value::<Vec<TopicShare>>(value) {
                    return DatasetPayload::Topics(topics);
                }
            } else if has_emotion {
                if let Ok(points) = serde_json::from_value::<Vec<ArcPoint>>(value) {
                    return DatasetPayload::EmotionalArc(points);
                }
            }

            DatasetPayload::Unrecognized
        }
        value @ Value::Object(_) => match serde_json::from_value::<DiversityBreakdown>(value) {
            Ok(breakdown) => DatasetPayload::Diversity(breakdown),
            Err(_) => DatasetPayload::Unrecognized,
        },
        _ => DatasetPayload::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diversity_object_is_extracted_and_stripped() {
        let raw = "### 3. DIVERSIDAD\nEl guion pasa el test.\n```json\n{ \"Hombres\": 60, \"Mujeres\": 35, \"Disidencias\": 5 }\n```\nFin.";
        let datasets = interpret_response(raw);

        let diversity = datasets.diversity.expect("diversity dataset");
        assert_eq!(diversity.men, 60.0);
        assert_eq!(diversity.women, 35.0);
        assert_eq!(diversity.dissidences, 5.0);

        assert!(!datasets.display_text.contains("```json"));
        assert!(datasets.display_text.contains("El guion pasa el test."));
        assert!(datasets.display_text.contains("Fin."));
    }

    #[test]
    fn no_blocks_means_no_datasets_and_unchanged_text() {
        let raw = "### 1. ANÁLISIS NARRATIVO\nSolo prosa, sin datos.";
        let datasets = interpret_response(raw);

        assert!(datasets.topics.is_none());
        assert!(datasets.emotional_arc.is_none());
        assert!(datasets.diversity.is_none());
        assert_eq!(datasets.unrecognized, 0);
        assert_eq!(datasets.display_text, raw);
    }

    #[test]
    fn theme_key_classifies_as_topics_only() {
        let raw = "\
```json
[{\"Personaje\": \"ANA\", \"Tema\": \"Duelo\", \"Porcentaje\": 60}, {\"Personaje\": \"LUIS\", \"Tema\": \"Culpa\", \"Porcentaje\": 40}]
```";
        let datasets = interpret_response(raw);

        let topics = datasets.topics.expect("topics dataset");
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].character, "ANA");
        assert_eq!(topics[0].theme, "Duelo");
        assert!(datasets.emotional_arc.is_none());
        assert!(datasets.diversity.is_none());
    }

    #[test]
    fn emotion_keys_classify_as_arc() {
        let raw = "\
```json
[{\"Momento\": \"1. Setup\", \"Alegría\": 80, \"Tristeza\": 10, \"Ira\": 5, \"Miedo\": 5, \"Tensión\": 10},
 {\"Momento\": \"2. Detonante\", \"Alegría\": 40, \"Tristeza\": 30, \"Ira\": 10, \"Miedo\": 10, \"Tensión\": 45}]
```";
        let datasets = interpret_response(raw);

        let arc = datasets.emotional_arc.expect("arc dataset");
        assert_eq!(arc.len(), 2);
        assert_eq!(arc[1].moment, "2. Detonante");
        assert_eq!(arc[1].tension, Some(45.0));
        assert!(datasets.topics.is_none());
    }

    #[test]
    fn unparseable_block_is_silently_dropped() {
        let raw = "Texto.\n```json\n{not valid json\n```\nMás texto.";
        let datasets = interpret_response(raw);

        assert!(datasets.diversity.is_none());
        assert_eq!(datasets.unrecognized, 0);
        // The fence still matched, so the display copy drops it.
        assert!(!datasets.display_text.contains("not valid json"));
    }

    #[test]
    fn parsed_but_unknown_shape_is_counted() {
        let raw = "```json\n[{\"Escena\": 1, \"Duración\": 3}]\n```";
        let datasets = interpret_response(raw);

        assert_eq!(datasets.unrecognized, 1);
        assert!(datasets.topics.is_none());
        assert!(datasets.emotional_arc.is_none());
    }

    #[test]
    fn object_missing_diversity_keys_is_unrecognized() {
        let raw = "```json\n{ \"Hombres\": 50, \"Mujeres\": 50 }\n```";
        let datasets = interpret_response(raw);

        assert!(datasets.diversity.is_none());
        assert_eq!(datasets.unrecognized, 1);
    }

    #[test]
    fn later_block_of_same_kind_wins() {
        let raw = "\
```json
{ \"Hombres\": 70, \"Mujeres\": 25, \"Disidencias\": 5 }
```
corrección:
```json
{ \"Hombres\": 55, \"Mujeres\": 40, \"Disidencias\": 5 }
```";
        let datasets = interpret_response(raw);

        assert_eq!(datasets.diversity.unwrap().men, 55.0);
    }

    #[test]
    fn multiple_kinds_in_one_response() {
        let raw = "\
### Reporte
```json
[{\"Personaje\": \"ANA\", \"Tema\": \"Duelo\", \"Porcentaje\": 100}]
```
prosa intermedia
```json
[{\"Momento\": \"1. Setup\", \"Tensión\": 20}]
```
cierre
```json
{ \"Hombres\": 50, \"Mujeres\": 45, \"Disidencias\": 5 }
```";
        let datasets = interpret_response(raw);

        assert!(datasets.topics.is_some());
        assert!(datasets.emotional_arc.is_some());
        assert!(datasets.diversity.is_some());
        assert_eq!(datasets.unrecognized, 0);
        assert!(datasets.display_text.contains("prosa intermedia"));
        assert!(datasets.display_text.contains("cierre"));
    }

    #[test]
    fn empty_list_is_unrecognized() {
        let raw = "```json\n[]\n```";
        let datasets = interpret_response(raw);

        assert!(datasets.topics.is_none());
        assert_eq!(datasets.unrecognized, 1);
    }
}

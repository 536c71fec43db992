//! Report domain: the request/response types and the interpreter that
//! pulls chart datasets out of the model's markdown.

pub mod datasets;
pub mod interpreter;

use serde::{Deserialize, Serialize};

pub use datasets::{ArcPoint, DatasetPayload, DiversityBreakdown, TopicShare};
pub use interpreter::{interpret_response, ReportDatasets};

use crate::llm::GenerateError;

/// Which report sections the user asked for.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SectionToggles {
    #[serde(default)]
    pub narrative: bool,
    #[serde(default)]
    pub production: bool,
    #[serde(default)]
    pub diversity: bool,
}

impl SectionToggles {
    pub fn any(&self) -> bool {
        self.narrative || self.production || self.diversity
    }
}

/// One report request; immutable once issued.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub script_text: String,
    pub currency_rate: f64,
    pub sections: SectionToggles,
}

/// The finished report handed back to the page.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Model output with the fenced JSON blocks stripped.
    pub markdown: String,
    /// Server-rendered HTML of `markdown`.
    pub html: String,
    pub topics: Option<Vec<TopicShare>>,
    pub emotional_arc: Option<Vec<ArcPoint>>,
    pub diversity: Option<DiversityBreakdown>,
    /// JSON blocks that parsed but matched no known dataset shape.
    pub unrecognized_blocks: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Select at least one section to begin.")]
    NoSectionsSelected,

    #[error(transparent)]
    Generation(#[from] GenerateError),
}

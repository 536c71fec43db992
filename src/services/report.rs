// src/services/report.rs

use std::sync::Arc;
use std::time::Instant;

use pulldown_cmark::{html, Options, Parser};
use tracing::{info, instrument};

use crate::llm::{RetryPolicy, TextGenerator};
use crate::prompt::PromptBuilder;
use crate::report::{interpret_response, Report, ReportError, ReportRequest, SectionToggles};
use crate::services::{extract, ReferenceSource};

/// Orchestrates one report: validate toggles, extract the script, fetch
/// pricing context, build the prompt, generate with retry, interpret.
pub struct ReportService {
    generator: Arc<dyn TextGenerator>,
    reference: Arc<dyn ReferenceSource>,
    prompt_builder: PromptBuilder,
    retry: RetryPolicy,
}

impl ReportService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        reference: Arc<dyn ReferenceSource>,
        prompt_builder: PromptBuilder,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            reference,
            prompt_builder,
            retry,
        }
    }

    #[instrument(skip(self, pdf_bytes))]
    pub async fn create_report(
        &self,
        pdf_bytes: &[u8],
        currency_rate: f64,
        sections: SectionToggles,
    ) -> Result<Report, ReportError> {
        // Validated before any outbound call is attempted.
        if !sections.any() {
            return Err(ReportError::NoSectionsSelected);
        }

        let start = Instant::now();

        let script_text = extract::extract_script_text(pdf_bytes);
        info!("Extracted {} chars of script text", script_text.len());

        // Pricing context only matters to the budget table.
        let reference = if sections.production {
            self.reference.fetch().await
        } else {
            None
        };
        if sections.production && reference.is_none() {
            info!("No reference pricing data available, continuing without it");
        }

        let request = ReportRequest {
            script_text,
            currency_rate,
            sections,
        };
        let prompt = self.prompt_builder.build(&request, reference.as_deref());

        let raw = self.retry.generate(self.generator.as_ref(), &prompt).await?;

        let datasets = interpret_response(&raw);
        let html = render_markdown(&datasets.display_text);

        info!(
            "Report generated in {:?} (topics: {}, arc: {}, diversity: {}, unrecognized: {})",
            start.elapsed(),
            datasets.topics.is_some(),
            datasets.emotional_arc.is_some(),
            datasets.diversity.is_some(),
            datasets.unrecognized,
        );

        Ok(Report {
            markdown: datasets.display_text,
            html,
            topics: datasets.topics,
            emotional_arc: datasets.emotional_arc,
            diversity: datasets.diversity,
            unrecognized_blocks: datasets.unrecognized,
        })
    }
}

/// The budget table arrives as a markdown table, so table support is on.
fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

//! LLM annotation of flagged entries.
//!
//! Flagged names are sent to a chat-completions endpoint in batches for a
//! free-text taxonomy review. A failed batch records the error text as its
//! annotation and the run moves on; annotation never fails the pipeline.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cleanup::Candidate;
use crate::config::AnnotateConfig;
use crate::error::{Error, Result};

/// Names per chat-completions request.
pub const BATCH_SIZE: usize = 20;

/// Delay between batch requests, to stay under rate limits.
pub const BATCH_PACE: Duration = Duration::from_millis(1200);

const MAX_TOKENS: u32 = 1200;
const TEMPERATURE: f64 = 0.2;

/// One batch of names and the model's free-text review of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAnnotation {
    pub batch_start: usize,
    pub batch_end: usize,
    pub names: Vec<String>,
    pub annotation: String,
}

pub struct Annotator {
    client: Client,
    config: AnnotateConfig,
    prompt_header: String,
}

impl Annotator {
    pub fn new(config: AnnotateConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            prompt_header: default_prompt_header(),
        }
    }

    /// Replace the instruction block that precedes the name list.
    pub fn with_prompt_header(mut self, header: impl Into<String>) -> Self {
        self.prompt_header = header.into();
        self
    }

    /// Annotate `candidates` in batches. Always returns one annotation per
    /// batch; a failed request is recorded in place of the model's text.
    pub fn annotate(&self, candidates: &[Candidate]) -> Vec<BatchAnnotation> {
        let batch_count = candidates.len().div_ceil(BATCH_SIZE);
        log_status!(
            "annotate",
            "Annotating {} entries in {} batches",
            candidates.len(),
            batch_count
        );

        let mut annotations = Vec::with_capacity(batch_count);

        for (batch_index, batch) in candidates.chunks(BATCH_SIZE).enumerate() {
            let batch_start = batch_index * BATCH_SIZE;
            let batch_end = batch_start + batch.len() - 1;

            let annotation = match self.request_annotation(batch) {
                Ok(text) => text,
                Err(err) => {
                    log_status!(
                        "annotate",
                        "Batch {}-{} failed: {}",
                        batch_start,
                        batch_end,
                        err.message
                    );
                    format!("Annotation failed: {}", err.message)
                }
            };

            annotations.push(BatchAnnotation {
                batch_start,
                batch_end,
                names: batch.iter().map(|c| c.name.clone()).collect(),
                annotation,
            });
            log_status!("annotate", "Annotated batch {} to {}", batch_start, batch_end);

            if batch_end + 1 < candidates.len() {
                thread::sleep(BATCH_PACE);
            }
        }

        annotations
    }

    fn request_annotation(&self, batch: &[Candidate]) -> Result<String> {
        let prompt = build_prompt(&self.prompt_header, batch);
        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });
        let context = "annotation request".to_string();

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::api_request_failed(None, e.to_string(), Some(context.clone())))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::api_request_failed(None, e.to_string(), Some(context.clone())))?;

        if !status.is_success() {
            return Err(Error::api_request_failed(
                Some(status.as_u16()),
                text.chars().take(200).collect::<String>(),
                Some(context),
            ));
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| Error::api_unexpected_format(context.clone(), Some(e.to_string())))?;

        extract_content(&value, &context)
    }
}

fn default_prompt_header() -> String {
    [
        "You are a data taxonomy reviewer. The tracking plan entries below were flagged by automated naming checks.",
        "For each entry, assess whether the name is unclear, generic, or redundant, and suggest a better snake_case name where one exists.",
        "Answer as a short list, one line per entry.",
    ]
    .join("\n")
}

/// Build the prompt text for one batch. Pure so tests can pin the format.
pub fn build_prompt(header: &str, batch: &[Candidate]) -> String {
    let mut prompt = String::from(header);
    prompt.push('\n');
    for candidate in batch {
        prompt.push_str(&format!(
            "- {} (flags: {})\n",
            candidate.name,
            candidate.reasons.join(", ")
        ));
    }
    prompt
}

fn extract_content(value: &Value, context: &str) -> Result<String> {
    value["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| {
            let snippet = value.to_string().chars().take(200).collect::<String>();
            Error::api_unexpected_format(context.to_string(), Some(snippet))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(name: &str, reasons: &[&str]) -> Candidate {
        Candidate {
            id: format!("id-{name}"),
            name: name.to_string(),
            reasons: reasons.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn prompt_lists_names_with_their_flags() {
        let batch = vec![
            candidate("zip_code", &["ZIP_CODE"]),
            candidate("old_flag", &["DEBUG_TEMP", "TOO_SHORT"]),
        ];
        let prompt = build_prompt("Review these:", &batch);

        assert!(prompt.starts_with("Review these:\n"));
        assert!(prompt.contains("- zip_code (flags: ZIP_CODE)\n"));
        assert!(prompt.contains("- old_flag (flags: DEBUG_TEMP, TOO_SHORT)\n"));
    }

    #[test]
    fn content_is_extracted_from_chat_completion_payload() {
        let value = json!({
            "choices": [{"message": {"content": "  looks fine  "}}]
        });
        assert_eq!(extract_content(&value, "test").unwrap(), "looks fine");
    }

    #[test]
    fn missing_content_is_a_format_error() {
        let err = extract_content(&json!({"error": "rate limited"}), "test").unwrap_err();
        assert_eq!(err.code.as_str(), "api.unexpected_format");
    }
}

//! Prompt store - the two text templates loaded once at startup.

use crate::error::{Error, Result};

/// Placeholder in the classification template replaced by the
/// entity-name context string.
const PRODUCT_LIST_PLACEHOLDER: &str = "{product_list}";

/// Placeholder in the summarize template replaced by the query and
/// its stringified result.
const RESULT_CONTEXT_PLACEHOLDER: &str = "{query_and_result_context}";

#[derive(Debug)]
pub struct PromptStore {
    classify: String,
    summarize: String,
}

impl PromptStore {
    /// Load both templates from disk. A missing file is fatal here,
    /// at startup, rather than surfacing per turn.
    pub fn load(classify_path: &str, summarize_path: &str) -> Result<Self> {
        Ok(Self::from_templates(
            read_template(classify_path)?,
            read_template(summarize_path)?,
        ))
    }

    pub fn from_templates(classify: impl Into<String>, summarize: impl Into<String>) -> Self {
        Self {
            classify: classify.into(),
            summarize: summarize.into(),
        }
    }

    pub fn classify_prompt(&self, product_context: &str) -> String {
        self.classify.replace(PRODUCT_LIST_PLACEHOLDER, product_context)
    }

    pub fn summarize_prompt(&self, original_sql: &str, result: &str) -> String {
        let context = format!(
            "The SQL query was: '{}'.\nThe database result was: '{}'.",
            original_sql, result
        );
        self.summarize.replace(RESULT_CONTEXT_PLACEHOLDER, &context)
    }
}

fn read_template(path: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| Error::Config(format!("prompt file '{}': {}", path, e)))
}

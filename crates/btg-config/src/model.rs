//! The typed translator configuration

use serde::{Deserialize, Deserializer, Serialize};

use crate::Mapping;
use crate::defaults::{self, ParallelismProvider, SystemParallelism};

/// Effective configuration of the translator.
///
/// One field per persisted setting. Persisted fields this struct does not know
/// about are kept in [`extra`](Self::extra) so a load followed by a save does
/// not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Singular API key; mirrors `api_keys[0]` once reconciled.
    pub api_key: String,
    /// API keys in rotation order.
    pub api_keys: Vec<String>,
    pub service_account_file_path: Option<String>,
    pub use_vertex_ai: bool,
    pub gcp_project: Option<String>,
    pub gcp_location: Option<String>,
    /// Inline credentials blob; empty when unused.
    pub auth_credentials: String,
    pub model_name: String,
    pub temperature: f64,
    pub top_p: f64,
    /// Prompt template. Older files may store it as a one-element list.
    #[serde(deserialize_with = "prompt_text")]
    pub prompts: String,

    // Content-safety retry
    pub use_content_safety_retry: bool,
    pub max_content_safety_split_attempts: i64,
    pub min_content_safety_chunk_size: i64,
    pub content_safety_split_by_sentences: bool,

    // Pronoun extraction
    pub max_pronoun_entries: i64,
    pub pronoun_sample_ratio: f64,

    /// Parallel translation workers; always positive once reconciled.
    pub max_workers: usize,
    pub chunk_size: i64,

    // Post-processing
    pub enable_post_processing: bool,
    pub remove_translation_headers: bool,
    pub remove_markdown_blocks: bool,
    pub remove_chunk_indexes: bool,
    pub clean_html_structure: bool,
    pub validate_html_after_processing: bool,

    /// Persisted fields with no counterpart above.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Configuration {
    /// The default configuration with `max_workers` set to `workers`
    /// (clamped to at least 1).
    pub fn with_worker_count(workers: usize) -> Self {
        Self {
            api_key: String::new(),
            api_keys: Vec::new(),
            service_account_file_path: None,
            use_vertex_ai: false,
            gcp_project: None,
            gcp_location: None,
            auth_credentials: String::new(),
            model_name: defaults::DEFAULT_MODEL_NAME.to_string(),
            temperature: defaults::DEFAULT_TEMPERATURE,
            top_p: defaults::DEFAULT_TOP_P,
            prompts: defaults::DEFAULT_PROMPT.to_string(),
            use_content_safety_retry: true,
            max_content_safety_split_attempts: defaults::DEFAULT_MAX_CONTENT_SAFETY_SPLIT_ATTEMPTS,
            min_content_safety_chunk_size: defaults::DEFAULT_MIN_CONTENT_SAFETY_CHUNK_SIZE,
            content_safety_split_by_sentences: true,
            max_pronoun_entries: defaults::DEFAULT_MAX_PRONOUN_ENTRIES,
            pronoun_sample_ratio: defaults::DEFAULT_PRONOUN_SAMPLE_RATIO,
            max_workers: workers.max(1),
            chunk_size: defaults::DEFAULT_CHUNK_SIZE,
            enable_post_processing: true,
            remove_translation_headers: true,
            remove_markdown_blocks: true,
            remove_chunk_indexes: true,
            clean_html_structure: true,
            validate_html_after_processing: true,
            extra: Mapping::new(),
        }
    }

    /// The key requests should use: the head of `api_keys`, falling back to
    /// `api_key` when the list is empty.
    pub fn primary_api_key(&self) -> &str {
        self.api_keys.first().map_or(self.api_key.as_str(), String::as_str)
    }

    /// Serialize into a structured document, `extra` fields included.
    pub fn to_document(&self) -> serde_json::Result<Mapping> {
        serde_json::from_value(serde_json::to_value(self)?)
    }

    /// Build from a complete document. Fields missing from `document` are an
    /// error, except the optional ones.
    pub fn from_document(document: Mapping) -> serde_json::Result<Self> {
        serde_json::from_value(serde_json::Value::Object(document))
    }
}

/// Defaults sized from the operating system's processor count.
///
/// Not reproducible across machines; code that needs a deterministic worker
/// count should use [`ConfigReconciler::get_default_config`] with an injected
/// provider, or [`Configuration::with_worker_count`].
///
/// [`ConfigReconciler::get_default_config`]: crate::ConfigReconciler::get_default_config
impl Default for Configuration {
    fn default() -> Self {
        Self::with_worker_count(SystemParallelism.default_worker_count())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PromptText {
    Text(String),
    Sequence(Vec<String>),
}

fn prompt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match PromptText::deserialize(deserializer)? {
        PromptText::Text(text) => text,
        PromptText::Sequence(items) => items.into_iter().next().unwrap_or_default(),
    })
}

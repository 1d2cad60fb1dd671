//! Local model inference and the cached request flow.

use crate::domain::ModelConfig;
use crate::store::ContextCache;
use anyhow::Result;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Stop sequences applied to completions.
pub const COMPLETION_STOPS: &[&str] = &["\n\n", "```"];

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to start '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{binary}' exited with {status}: {stderr}")]
    ExitStatus { binary: String, status: ExitStatus, stderr: String },
    #[error("model returned no output")]
    EmptyOutput,
}

/// Blocking text generation. Output length is bounded by the implementation.
pub trait InferenceEngine {
    fn complete(&self, context: &str) -> Result<String, InferenceError>;
    fn explain(&self, code: &str) -> Result<String, InferenceError>;
}

pub fn completion_prompt(context: &str) -> String {
    format!("Complete this Python code:\n\n{context}\n\nCOMPLETION:")
}

pub fn explanation_prompt(code: &str) -> String {
    format!("Explain this Python code briefly:\n\n{code}\n\nEXPLANATION:")
}

/// Cut `text` at the earliest stop sequence.
pub fn apply_stops<'t>(text: &'t str, stops: &[&str]) -> &'t str {
    let cut = stops.iter().filter_map(|stop| text.find(stop)).min().unwrap_or(text.len());
    &text[..cut]
}

/// Runs a llama.cpp-style command-line binary once per request.
pub struct LlamaCliEngine {
    config: ModelConfig,
}

impl LlamaCliEngine {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String, InferenceError> {
        let binary = &self.config.binary;
        tracing::debug!("Running {} with {} max tokens", binary, max_tokens);
        let output = Command::new(binary)
            .arg("-m")
            .arg(&self.config.model_path)
            .arg("-c")
            .arg(self.config.context_size.to_string())
            .arg("-t")
            .arg(self.config.threads.to_string())
            .arg("-n")
            .arg(max_tokens.to_string())
            .arg("--no-display-prompt")
            .arg("-p")
            .arg(prompt)
            .output()
            .map_err(|source| InferenceError::Spawn { binary: binary.clone(), source })?;

        if !output.status.success() {
            return Err(InferenceError::ExitStatus {
                binary: binary.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl InferenceEngine for LlamaCliEngine {
    fn complete(&self, context: &str) -> Result<String, InferenceError> {
        let raw = self.generate(&completion_prompt(context), self.config.complete_max_tokens)?;
        let text = apply_stops(raw.trim_start(), COMPLETION_STOPS).trim();
        if text.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        Ok(text.to_string())
    }

    fn explain(&self, code: &str) -> Result<String, InferenceError> {
        let raw = self.generate(&explanation_prompt(code), self.config.explain_max_tokens)?;
        let text = raw.trim();
        if text.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        Ok(text.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Complete,
    Explain,
}

#[derive(Debug)]
pub enum Outcome {
    Cached(String),
    Generated(String),
    /// The engine failed; nothing was cached.
    Failed(InferenceError),
}

/// Serve a request from the cache, or run the engine and cache its result.
///
/// Only cache I/O errors are returned as `Err`; engine failures come back as
/// [`Outcome::Failed`].
pub fn cached_request(
    cache: &ContextCache,
    engine: &dyn InferenceEngine,
    kind: RequestKind,
    content: &str,
) -> Result<Outcome> {
    let key = ContextCache::key_for(content);
    if let Some(hit) = cache.get(&key)? {
        return Ok(Outcome::Cached(hit));
    }

    let generated = match kind {
        RequestKind::Complete => engine.complete(content),
        RequestKind::Explain => engine.explain(content),
    };
    match generated {
        Ok(result) => {
            cache.put(&key, &result)?;
            Ok(Outcome::Generated(result))
        }
        Err(err) => {
            tracing::warn!("Inference failed: {}", err);
            Ok(Outcome::Failed(err))
        }
    }
}

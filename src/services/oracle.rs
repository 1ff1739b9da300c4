// SPDX-License-Identifier: MIT

//! Definition oracle client.
//!
//! Wraps a chat-completion style API that synthesizes structured word
//! definitions. The response is untrusted text: it is fence-stripped and
//! strictly parsed, and anything that does not match the expected shape
//! is rejected rather than defaulted.

use crate::config::Config;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Instruction sent ahead of the target word. Describes the exact JSON
/// shape the catalog persists.
const DEFINE_INSTRUCTION: &str = "You are a dictionary service. For the word the user sends, \
reply with ONLY a JSON object of this exact shape and nothing else: \
{\"word\": \"<the word>\", \"meanings\": [{\"definition\": \"<required definition>\", \
\"usageExample\": \"<optional example sentence>\"}], \"grammarNotes\": \"<optional notes>\"}. \
Include at least one meaning. Omit usageExample and grammarNotes if you have nothing useful.";

/// Structured definition payload parsed from the oracle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionPayload {
    pub word: String,
    pub meanings: Vec<MeaningPayload>,
    #[serde(default)]
    pub grammar_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningPayload {
    pub definition: String,
    #[serde(default)]
    pub usage_example: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Oracle API client.
#[derive(Clone)]
pub struct DefinitionOracle {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl DefinitionOracle {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.oracle_api_url.clone(),
            api_key: config.oracle_api_key.clone(),
            model: config.oracle_model.clone(),
            timeout: Duration::from_secs(config.oracle_timeout_secs),
        }
    }

    /// Ask the oracle for a structured definition of `surface`.
    pub async fn define_word(&self, surface: &str) -> Result<DefinitionPayload, AppError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: DEFINE_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: surface,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Oracle(AppError::ORACLE_TIMEOUT.to_string())
                } else {
                    AppError::Oracle(format!("Oracle request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Oracle(format!("HTTP {}: {}", status, body)));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Oracle(format!("Oracle response unreadable: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Oracle(AppError::ORACLE_INVALID.to_string()))?;

        parse_definition(&content)
    }
}

/// Parse the oracle's raw completion text into a definition payload.
///
/// Surrounding markdown code fences are stripped first; the remainder must
/// parse as the exact payload shape with at least one non-empty definition.
pub fn parse_definition(raw: &str) -> Result<DefinitionPayload, AppError> {
    let cleaned = strip_code_fences(raw);

    let payload: DefinitionPayload = serde_json::from_str(cleaned)
        .map_err(|_| AppError::Oracle(AppError::ORACLE_INVALID.to_string()))?;

    if payload.word.trim().is_empty()
        || payload.meanings.is_empty()
        || payload
            .meanings
            .iter()
            .any(|m| m.definition.trim().is_empty())
    {
        return Err(AppError::Oracle(AppError::ORACLE_INVALID.to_string()));
    }

    Ok(payload)
}

/// Strip a surrounding ``` fence (with or without a language tag).
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

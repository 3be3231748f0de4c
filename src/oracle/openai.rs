#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! OpenAI-backed oracle implementation.

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageUrlArgs, ResponseFormat,
    },
};
use async_trait::async_trait;
use bon::Builder;
use serde::Deserialize;
use tokio::time::timeout;

use super::{AdjudicationRequest, ImageContent, Oracle, OracleError, Verdict};
use crate::config;

/// System message sent with every oracle request.
const SYSTEM_MESSAGE: &str =
    "You are a helpful teacher's assistant that always responds using JSON.";

/// Token budget for a single adjudication response.
const ADJUDICATION_MAX_TOKENS: u32 = 1000;

/// Token budget for the performance overview response.
const OVERVIEW_MAX_TOKENS: u32 = 2500;

/// Wire shape of an adjudication response. `correct` is required; the rest
/// is optional.
#[derive(Deserialize)]
struct VerdictWire {
    /// The oracle's correctness judgment.
    correct:        Option<bool>,
    /// Whether partial credit applies.
    #[serde(default)]
    partial_credit: Option<bool>,
    /// Free-text rationale.
    #[serde(default)]
    explanation:    Option<String>,
}

/// Wire shape of a performance-overview response.
#[derive(Deserialize)]
struct OverviewWire {
    /// The overview text.
    overview: Option<String>,
}

/// An [`Oracle`] that calls an OpenAI-compatible chat-completion endpoint.
///
/// Holds no mutable state; a fresh client is constructed per request, so a
/// single instance may serve many concurrent adjudications.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct OpenAiOracle {
    /// Base URL of the OpenAI-compatible endpoint.
    api_base:    String,
    /// API key for the endpoint.
    api_key:     String,
    /// Model identifier to request.
    model:       String,
    /// Sampling temperature. Zero keeps verdicts as stable as the model
    /// allows.
    #[builder(default = 0.0)]
    temperature: f32,
    /// Timeout for a single request. Elapsing is treated as the oracle
    /// being unavailable.
    #[builder(default = Duration::from_secs(45))]
    timeout:     Duration,
}

impl OpenAiOracle {
    /// Builds an oracle from the process-wide configuration. Fails when the
    /// `OPENAI_API_KEY` environment variable is not set.
    pub fn from_config() -> Result<Self> {
        let openai = config::openai_config()
            .ok_or_else(|| anyhow!("OPENAI_API_KEY must be set to consult the grading oracle"))?;

        Ok(Self::builder()
            .api_base(openai.api_base())
            .api_key(openai.api_key())
            .model(openai.model())
            .temperature(openai.temperature().unwrap_or(0.0))
            .timeout(config::oracle_timeout())
            .build())
    }

    /// Sends one chat completion and returns the raw message content.
    async fn complete(
        &self,
        prompt: String,
        image: Option<&ImageContent>,
        max_tokens: u32,
    ) -> Result<String, OracleError> {
        let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(prompt)
                .build()
                .map_err(|e| OracleError::Unavailable(e.to_string()))?
                .into(),
        ];

        if let Some(image) = image {
            tracing::info!(source = image.source(), "attaching image to oracle request");
            parts.push(
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(
                        ImageUrlArgs::default()
                            .url(image.data_url())
                            .build()
                            .map_err(|e| OracleError::Unavailable(e.to_string()))?,
                    )
                    .build()
                    .map_err(|e| OracleError::Unavailable(e.to_string()))?
                    .into(),
            );
        }

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_MESSAGE)
                .build()
                .map_err(|e| OracleError::Unavailable(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(parts)
                .build()
                .map_err(|e| OracleError::Unavailable(e.to_string()))?
                .into(),
        ];

        let client = OpenAIClient::with_config(
            OpenAIConfig::new()
                .with_api_base(&self.api_base)
                .with_api_key(&self.api_key),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .temperature(self.temperature)
            .max_completion_tokens(max_tokens)
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let response = timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| OracleError::Unavailable("request timed out".to_string()))?
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| OracleError::MalformedResponse {
                reason: "completion contained no content".to_string(),
                raw:    String::new(),
            })
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn adjudicate(&self, request: &AdjudicationRequest<'_>) -> Result<Verdict, OracleError> {
        let prompt = format!(
            include_str!("prompts/evaluate_answer.md"),
            question = request.question_text,
            accepted = request.accepted_answers.join(", "),
            student_answer = request.student_answer,
        );

        let content = self
            .complete(prompt, request.image, ADJUDICATION_MAX_TOKENS)
            .await?;
        let wire: VerdictWire =
            serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
                OracleError::MalformedResponse {
                    reason: e.to_string(),
                    raw:    content.clone(),
                }
            })?;

        let correct = wire.correct.ok_or_else(|| OracleError::MalformedResponse {
            reason: "`correct` field missing".to_string(),
            raw:    content.clone(),
        })?;

        Ok(Verdict {
            correct,
            partial_credit: wire.partial_credit.unwrap_or(false),
            explanation: wire.explanation,
        })
    }

    async fn summarize(&self, explanations: &str) -> Result<String, OracleError> {
        let prompt = format!(
            include_str!("prompts/summarize_performance.md"),
            explanations = explanations,
        );

        let content = self.complete(prompt, None, OVERVIEW_MAX_TOKENS).await?;
        let wire: OverviewWire =
            serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
                OracleError::MalformedResponse {
                    reason: e.to_string(),
                    raw:    content.clone(),
                }
            })?;

        wire.overview.ok_or_else(|| OracleError::MalformedResponse {
            reason: "`overview` field missing".to_string(),
            raw:    content,
        })
    }
}

/// Strips a surrounding markdown code fence, which some models emit despite
/// the JSON response format.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

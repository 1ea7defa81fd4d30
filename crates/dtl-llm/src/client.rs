//! Chat-completion client with a fail-to-stub policy.

use std::future::Future;

use serde::{Deserialize, Serialize};

use dtl_config::LlmConfig;
use dtl_core::text::truncate_chars;

use crate::error::LlmError;
use crate::extract::{JsonExtraction, extract_json};

/// Prefix of the response returned when no remote service is configured.
pub const STUB_PREFIX: &str = "[stubbed LLM response for prompt: ";

/// Prefix of the response returned when a configured remote call fails.
pub const NO_RESPONSE_PREFIX: &str = "[No LLM-Response] ";

const PREVIEW_CHARS: usize = 120;

/// Log target for verbatim prompt/response mirroring.
const DEBUG_TARGET: &str = "dtl_llm::debug";

/// Whether `text` is one of the client's placeholder responses.
#[must_use]
pub fn is_stub_response(text: &str) -> bool {
    text.starts_with(STUB_PREFIX) || text.starts_with(NO_RESPONSE_PREFIX)
}

fn unconfigured_stub(prompt: &str) -> String {
    format!("{STUB_PREFIX}{}...]", truncate_chars(prompt, PREVIEW_CHARS))
}

fn failure_stub(prompt: &str) -> String {
    format!("{NO_RESPONSE_PREFIX}{}...", truncate_chars(prompt, PREVIEW_CHARS))
}

// ── TextGenerator ──────────────────────────────────────────────────

/// Anything that turns a prompt into text. Implementations must not fail;
/// errors degrade to placeholder text.
pub trait TextGenerator: Send + Sync {
    fn generate_text(&self, prompt: &str) -> impl Future<Output = String> + Send;

    /// Generate, then pull a JSON value out of the response.
    ///
    /// The raw text is returned unchanged alongside the extraction.
    fn generate_structured(
        &self,
        prompt: &str,
    ) -> impl Future<Output = (String, JsonExtraction)> + Send {
        async move {
            let raw = self.generate_text(prompt).await;
            let parsed = extract_json(&raw);
            (raw, parsed)
        }
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Read the first completion's text from a chat-completion response.
async fn read_completion(resp: reqwest::Response) -> Result<String, LlmError> {
    if !resp.status().is_success() {
        return Err(LlmError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    let body: ChatResponse = resp.json().await?;
    let choice = body.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
    Ok(choice.message.content.unwrap_or_default())
}

// ── GenerationClient ───────────────────────────────────────────────

/// Client for an Azure-OpenAI-style chat completion deployment.
///
/// One attempt per call, no retries. Timeouts are left to the transport.
pub struct GenerationClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl GenerationClient {
    /// Build a client. An unconfigured `config` is valid and yields stub
    /// responses.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the HTTP client cannot be constructed.
    pub fn new(config: LlmConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("dtl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    #[must_use]
    pub const fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.deployment,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_completion_tokens: self.config.max_completion_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let resp = self
            .http
            .post(self.completions_url())
            .header("api-key", &self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;
        read_completion(resp).await
    }

    fn mirror(&self, kind: &str, text: &str) {
        if self.config.debug {
            tracing::info!(target: DEBUG_TARGET, kind, text, "llm exchange");
        }
    }
}

impl TextGenerator for GenerationClient {
    async fn generate_text(&self, prompt: &str) -> String {
        self.mirror("prompt", prompt);

        if !self.is_configured() {
            let stub = unconfigured_stub(prompt);
            self.mirror("response", &stub);
            return stub;
        }

        let response = match self.complete(prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(
                    deployment = %self.config.deployment,
                    endpoint = %self.config.endpoint,
                    prompt_preview = truncate_chars(prompt, PREVIEW_CHARS),
                    %error,
                    "generation failed; returning stub response"
                );
                failure_stub(prompt)
            }
        };
        self.mirror("response", &response);
        response
    }
}

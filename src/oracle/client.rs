use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::oracle::{CompletionOracle, OracleError, ResponseFormat};

const USER_AGENT: &str = "letterbox/0.1";

/// Connection settings of an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    /// Without a key every call fails with [`OracleError::NotConfigured`].
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// [`CompletionOracle`] backed by an HTTP chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpOracle {
    pub fn new(settings: OracleSettings) -> Result<Self, OracleError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| OracleError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model,
            api_key: settings.api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl CompletionOracle for HttpOracle {
    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str, format: ResponseFormat) -> Result<String, OracleError> {
        let api_key = self.api_key.as_deref().ok_or(OracleError::NotConfigured)?;

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
            response_format: match format {
                ResponseFormat::Json => Some(ResponseFormatSpec {
                    kind: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(OracleError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::from_status(
                status,
                retry_after(response.headers()),
            ));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::MalformedResponse("response has no content".to_string()))?;

        debug!(response_chars = content.len(), "Oracle responded");
        Ok(content)
    }
}

/// `Retry-After` given in seconds. HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

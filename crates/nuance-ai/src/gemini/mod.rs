mod catalog;
mod chat;
mod wire;

use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use nuance_config::gemini::GeminiConfig;
use serde::Serialize;

use crate::{AiError, ChatService, ChatSession};

use self::chat::GeminiChatSession;
use self::wire::{Content, ErrorEnvelope, GenerateContentRequest};

/// Client for the Gemini REST API. Cheap to clone; the credential is only
/// checked when a request is about to be made.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("failed to build tuned HTTP client, using defaults: {e}");
                reqwest::Client::new()
            });

        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn ensure_credential(&self) -> Result<(), AiError> {
        if self.config.has_credential() {
            Ok(())
        } else {
            Err(AiError::Configuration)
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    /// POST a JSON body and fail on any non-success status
    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, AiError> {
        self.ensure_credential()?;

        let mut request = self
            .client
            .post(url)
            .header("x-goog-api-key", self.config.api_key.trim())
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        check_status(response).await
    }

    /// Open a streamed turn over the given history
    async fn open_stream(
        &self,
        system: &str,
        contents: &[Content],
    ) -> Result<BoxStream<'static, reqwest::Result<Vec<u8>>>, AiError> {
        let request = GenerateContentRequest {
            system_instruction: Content::system(system),
            contents,
            generation_config: None,
        };

        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let response = self.post(&url, &request, None).await?;
        tracing::debug!("chat stream opened ({})", response.status());

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed())
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }
}

impl ChatService for GeminiClient {
    fn open_session(&self) -> Result<Box<dyn ChatSession>, AiError> {
        self.ensure_credential()?;
        tracing::info!("opening chat session with {}", self.config.model);
        Ok(Box::new(GeminiChatSession::new(self.clone())))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.describe())
        .unwrap_or(body);

    tracing::error!("Gemini returned HTTP {status}: {detail}");
    Err(AiError::Service(format!("HTTP {status}: {detail}")))
}

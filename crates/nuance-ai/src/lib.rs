mod gemini;
mod sse;

pub use gemini::GeminiClient;
pub use sse::SseDecoder;

use futures_util::stream::BoxStream;
use nuance_types::WordEntry;

/// Incrementally delivered reply text. Chunks must be concatenated in
/// delivery order; a boundary may fall anywhere, even mid-word.
pub type ChunkStream<'a> = BoxStream<'a, Result<String, AiError>>;

/// Themed word lookup backed by a generative model
#[async_trait::async_trait]
pub trait WordCatalog: Send + Sync {
    /// Request 3 to 5 entries for a topic. The service decides the actual
    /// count, so callers must accept anything from zero up.
    async fn fetch_by_topic(&self, topic: &str) -> Result<Vec<WordEntry>, AiError>;
}

/// Opens conversational sessions
pub trait ChatService: Send + Sync {
    fn open_session(&self) -> Result<Box<dyn ChatSession>, AiError>;
}

/// One stateful conversation. Turns must not overlap: drain the stream of
/// one `send` before issuing the next.
pub trait ChatSession: Send {
    fn send(&mut self, text: &str) -> ChunkStream<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("API key missing")]
    Configuration,

    #[error("Unexpected response format: {0}")]
    ResponseFormat(String),

    #[error("Service error: {0}")]
    Service(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Service(e.to_string())
    }
}

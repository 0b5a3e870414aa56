//! Scripted stand-ins for the AI services.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use futures_util::stream;
use nuance_ai::{AiError, ChatService, ChatSession, ChunkStream, WordCatalog};
use nuance_types::WordEntry;

pub struct FakeCatalog {
    responses: Mutex<VecDeque<Result<Vec<WordEntry>, AiError>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new(responses: Vec<Result<Vec<WordEntry>, AiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl WordCatalog for FakeCatalog {
    async fn fetch_by_topic(&self, topic: &str) -> Result<Vec<WordEntry>, AiError> {
        self.requests.lock().unwrap().push(topic.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

type Script = Arc<Mutex<VecDeque<Vec<Result<String, AiError>>>>>;

/// Each `send` replays the next scripted list of chunks
#[derive(Clone, Default)]
pub struct FakeChat {
    script: Script,
    sent: Arc<Mutex<Vec<String>>>,
    opened: Arc<Mutex<usize>>,
    missing_key: bool,
}

impl FakeChat {
    pub fn new(turns: Vec<Vec<Result<String, AiError>>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(turns.into())),
            ..Self::default()
        }
    }

    pub fn without_key() -> Self {
        Self {
            missing_key: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn opened(&self) -> usize {
        *self.opened.lock().unwrap()
    }
}

impl ChatService for FakeChat {
    fn open_session(&self) -> Result<Box<dyn ChatSession>, AiError> {
        if self.missing_key {
            return Err(AiError::Configuration);
        }
        *self.opened.lock().unwrap() += 1;
        Ok(Box::new(self.clone()))
    }
}

impl ChatSession for FakeChat {
    fn send(&mut self, text: &str) -> ChunkStream<'_> {
        self.sent.lock().unwrap().push(text.to_string());
        let chunks = self.script.lock().unwrap().pop_front().unwrap_or_default();
        stream::iter(chunks).boxed()
    }
}

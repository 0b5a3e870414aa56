use futures_util::StreamExt;
use nuance_ai::{AiError, ChatService, ChatSession};
use nuance_types::ChatMessage;

pub const GREETING: &str = "আসসালামু আলাইকুম। আমি আপনার কোরআনিক অ্যাসিস্ট্যান্ট। কোনো নির্দিষ্ট শব্দ বা আয়াতের অর্থ জানতে চাইলে আমাকে প্রশ্ন করতে পারেন।";

/// Appended when a reply fails part way
pub const FALLBACK_NOTICE: &str = "দুঃখিত, যান্ত্রিক ত্রুটির কারণে উত্তর দেওয়া সম্ভব হচ্ছে না।";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Swap the tail for a new value; earlier entries are never touched
    pub fn replace_last(&mut self, message: ChatMessage) {
        match self.messages.last_mut() {
            Some(last) => *last = message,
            None => self.messages.push(message),
        }
    }
}

/// Collects streamed chunks into the reply text
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: &str) -> &str {
        self.text.push_str(chunk);
        &self.text
    }

    pub fn snapshot(&self) -> String {
        self.text.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("Message is empty")]
    Blank,

    #[error("A reply is still streaming")]
    Busy,

    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Drain one reply stream, handing each non-empty chunk to `on_chunk` in order
pub async fn stream_turn(
    session: &mut dyn ChatSession,
    text: &str,
    mut on_chunk: impl FnMut(String) + Send,
) -> Result<(), AiError> {
    let mut chunks = session.send(text);
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if !chunk.is_empty() {
            on_chunk(chunk);
        }
    }
    Ok(())
}

/// A turn in progress. Owns the session until it finishes, which is what
/// keeps turns from overlapping.
pub struct Turn {
    id: u64,
    text: String,
    session: Box<dyn ChatSession>,
}

impl Turn {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub async fn run(mut self, on_chunk: impl FnMut(String) + Send) -> FinishedTurn {
        let outcome = stream_turn(self.session.as_mut(), &self.text, on_chunk).await;
        FinishedTurn {
            id: self.id,
            session: self.session,
            outcome,
        }
    }
}

pub struct FinishedTurn {
    pub id: u64,
    pub session: Box<dyn ChatSession>,
    pub outcome: Result<(), AiError>,
}

enum SessionSlot {
    Uninitialized,
    Idle(Box<dyn ChatSession>),
    InTurn,
}

struct ActiveTurn {
    id: u64,
    accumulator: StreamAccumulator,
    replied: bool,
}

/// The assistant widget: open flag, lazily opened session and transcript.
/// Dropping the panel closes the session.
pub struct AssistantPanel {
    open: bool,
    slot: SessionSlot,
    transcript: ChatTranscript,
    active: Option<ActiveTurn>,
    next_turn: u64,
    last_error: Option<AiError>,
}

impl Default for AssistantPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl AssistantPanel {
    pub fn new() -> Self {
        Self {
            open: false,
            slot: SessionSlot::Uninitialized,
            transcript: ChatTranscript::new(),
            active: None,
            next_turn: 0,
            last_error: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_session(&self) -> bool {
        !matches!(self.slot, SessionSlot::Uninitialized)
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// Problem to show inline, e.g. a missing API key
    pub fn last_error(&self) -> Option<&AiError> {
        self.last_error.as_ref()
    }

    /// Flip open/closed. Opening creates the session on first use.
    pub fn toggle_open(&mut self, service: &dyn ChatService) -> bool {
        self.open = !self.open;
        if self.open
            && let Err(e) = self.ensure_session(service)
        {
            tracing::warn!("assistant opened without a session: {e}");
        }
        self.open
    }

    fn ensure_session(&mut self, service: &dyn ChatService) -> Result<(), AiError> {
        if !matches!(self.slot, SessionSlot::Uninitialized) {
            return Ok(());
        }

        match service.open_session() {
            Ok(session) => {
                self.slot = SessionSlot::Idle(session);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Record the user's message and check the session out for the reply
    pub fn begin_turn(
        &mut self,
        service: &dyn ChatService,
        text: &str,
    ) -> Result<Turn, AssistantError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::Blank);
        }
        if self.active.is_some() {
            return Err(AssistantError::Busy);
        }
        self.ensure_session(service)?;

        let session = match std::mem::replace(&mut self.slot, SessionSlot::InTurn) {
            SessionSlot::Idle(session) => session,
            previous => {
                self.slot = previous;
                return Err(AssistantError::Busy);
            }
        };

        self.next_turn += 1;
        let id = self.next_turn;
        self.transcript.push(ChatMessage::user(text));
        self.active = Some(ActiveTurn {
            id,
            accumulator: StreamAccumulator::new(),
            replied: false,
        });
        tracing::debug!("chat turn #{id} started");

        Ok(Turn {
            id,
            text: text.to_string(),
            session,
        })
    }

    /// Grow the reply of the active turn. The first chunk adds the assistant
    /// entry; later ones replace it with the longer text.
    pub fn apply_chunk(&mut self, turn_id: u64, chunk: &str) -> bool {
        let Some(active) = self.active.as_mut().filter(|a| a.id == turn_id) else {
            tracing::debug!("ignoring chunk for inactive turn #{turn_id}");
            return false;
        };

        let message = ChatMessage::assistant(active.accumulator.append(chunk));
        if active.replied {
            self.transcript.replace_last(message);
        } else {
            self.transcript.push(message);
            active.replied = true;
        }
        true
    }

    /// Take the session back. A failed turn keeps whatever text already
    /// arrived and adds the fallback notice as its own entry.
    pub fn finish_turn(&mut self, finished: FinishedTurn) -> Result<(), AiError> {
        if matches!(self.slot, SessionSlot::InTurn) {
            self.slot = SessionSlot::Idle(finished.session);
        }

        match self.active.take() {
            Some(active) if active.id == finished.id => {}
            other => {
                self.active = other;
                tracing::warn!("finish for unknown turn #{}", finished.id);
                return finished.outcome;
            }
        }

        if let Err(e) = &finished.outcome {
            tracing::error!("chat turn #{} failed: {e}", finished.id);
            self.transcript.push(ChatMessage::assistant(FALLBACK_NOTICE));
        }
        finished.outcome
    }

    /// Run a whole turn in place
    pub async fn send(
        &mut self,
        service: &dyn ChatService,
        text: &str,
    ) -> Result<(), AssistantError> {
        let turn = self.begin_turn(service, text)?;
        let id = turn.id();
        let finished = turn
            .run(|chunk| {
                self.apply_chunk(id, &chunk);
            })
            .await;
        self.finish_turn(finished)?;
        Ok(())
    }
}

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use tokio::time::timeout;

use super::GeminiClient;
use super::wire::{Content, parse_stream_event};
use crate::sse::SseDecoder;
use crate::{AiError, ChatSession, ChunkStream};

const PERSONA: &str = "\
আপনি একজন প্রাজ্ঞ কোরআন গবেষক, ভাষাবিদ এবং আধ্যাত্মিক মেন্টর। আপনি বাংলা এবং আরবি ভাষায় পারদর্শী।
আপনার উদ্দেশ্য হলো ব্যবহারকারীদের কোরআনের শব্দের গভীর অর্থ, ব্যুৎপত্তি (Etymology) এবং ব্যাখ্যা সম্পর্কে সহায়তা করা।

আপনার আচরণের নিয়মাবলি:
১. সর্বদা সাবলীল বাংলায় উত্তর দেবেন।
২. উত্তরগুলো হবে তথ্যবহুল, গভীর কিন্তু সহজবোধ্য।
৩. ব্যবহারকারীর প্রশ্নের সাথে প্রাসঙ্গিক কোরআনের আয়াত বা হাদিস উল্লেখ করার চেষ্টা করবেন।
৪. যদি ব্যবহারকারী এমন কোনো প্রশ্ন করে যা কোরআন বা ইসলামের সাথে সম্পর্কিত নয়, তবে বিনয়ের সাথে তাকে মূল বিষয়ের দিকে ফিরিয়ে আনার চেষ্টা করবেন অথবা সংক্ষেপে উত্তর দেবেন।
৫. আপনার টোন হবে শান্ত, শ্রদ্ধাপূর্ণ এবং উৎসাহব্যঞ্জক।";

/// Conversation with the mentor persona. The API itself is stateless, so the
/// session keeps the history and replays it on every turn.
pub(crate) struct GeminiChatSession {
    client: GeminiClient,
    history: Vec<Content>,
}

impl GeminiChatSession {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            history: Vec::new(),
        }
    }
}

impl ChatSession for GeminiChatSession {
    fn send(&mut self, text: &str) -> ChunkStream<'_> {
        let user = Content::user(text);
        let mut contents = self.history.clone();
        contents.push(user.clone());

        let turn = Turn {
            idle: self.client.request_timeout(),
            phase: Phase::Pending {
                client: self.client.clone(),
                contents,
            },
            history: &mut self.history,
            user,
            reply: String::new(),
            decoder: SseDecoder::new(),
            ready: VecDeque::new(),
            failed: None,
        };

        stream::unfold(turn, |mut turn| async move {
            let item = turn.next_chunk().await?;
            Some((item, turn))
        })
        .boxed()
    }
}

enum Phase {
    Pending {
        client: GeminiClient,
        contents: Vec<Content>,
    },
    Streaming(BoxStream<'static, reqwest::Result<Vec<u8>>>),
    Done,
}

/// State of one streamed turn. Once `failed` is set the phase is `Done`, so
/// the error is always the last item.
struct Turn<'a> {
    /// Longest wait for the stream to open or for the next read
    idle: Duration,
    phase: Phase,
    history: &'a mut Vec<Content>,
    user: Content,
    reply: String,
    decoder: SseDecoder,
    ready: VecDeque<String>,
    failed: Option<AiError>,
}

impl Turn<'_> {
    async fn next_chunk(&mut self) -> Option<Result<String, AiError>> {
        loop {
            if let Some(chunk) = self.ready.pop_front() {
                return Some(Ok(chunk));
            }
            if let Some(e) = self.failed.take() {
                return Some(Err(e));
            }

            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Done => return None,
                Phase::Pending { client, contents } => {
                    match timeout(self.idle, client.open_stream(PERSONA, &contents)).await {
                        Ok(Ok(body)) => self.phase = Phase::Streaming(body),
                        Ok(Err(e)) => return Some(Err(e)),
                        Err(_) => return Some(Err(self.stalled())),
                    }
                }
                Phase::Streaming(mut body) => match timeout(self.idle, body.next()).await {
                    Err(_) => return Some(Err(self.stalled())),
                    Ok(Some(Ok(bytes))) => {
                        let events = self.decoder.push(&bytes);
                        if self.accept(events) {
                            self.phase = Phase::Streaming(body);
                        }
                    }
                    Ok(Some(Err(e))) => {
                        tracing::error!("chat stream broke off: {e}");
                        return Some(Err(e.into()));
                    }
                    Ok(None) => {
                        let tail = self.decoder.finish().into_iter().collect();
                        if self.accept(tail) {
                            self.commit();
                        }
                    }
                },
            }
        }
    }

    /// Queue the text of each event. A bad event stops the turn; text
    /// decoded before it is still delivered ahead of the error.
    fn accept(&mut self, events: Vec<String>) -> bool {
        for event in events {
            match parse_stream_event(&event) {
                Ok(text) if text.is_empty() => {}
                Ok(text) => {
                    self.reply.push_str(&text);
                    self.ready.push_back(text);
                }
                Err(e) => {
                    tracing::error!("chat stream sent a bad event: {e}");
                    self.failed = Some(e);
                    return false;
                }
            }
        }
        true
    }

    fn stalled(&self) -> AiError {
        tracing::error!("chat stream idle for {:?}, giving up", self.idle);
        AiError::Service(format!("No data from chat stream for {}s", self.idle.as_secs()))
    }

    /// Record the finished exchange so the next turn carries it as context
    fn commit(&mut self) {
        tracing::debug!("chat turn complete, {} chars", self.reply.chars().count());
        self.history.push(self.user.clone());
        self.history.push(Content::model(std::mem::take(&mut self.reply)));
    }
}

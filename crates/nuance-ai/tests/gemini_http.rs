//! Drives `GeminiClient` against a local listener serving canned responses.

use std::time::Duration;

use futures_util::StreamExt;
use nuance_ai::{AiError, ChatService, GeminiClient, WordCatalog};
use nuance_config::gemini::GeminiConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;

struct Captured {
    head: String,
    body: String,
}

/// Canned reply, written in several pieces to exercise incremental reads
struct Reply {
    parts: Vec<Vec<u8>>,
    /// Keep the socket open after the last part until the client hangs up
    hang: bool,
}

impl Reply {
    fn json(status: &str, body: &str) -> Self {
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        Self {
            parts: vec![head.into_bytes(), body.as_bytes().to_vec()],
            hang: false,
        }
    }

    fn sse(pieces: &[&[u8]]) -> Self {
        let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n";
        let mut parts = vec![head.as_bytes().to_vec()];
        parts.extend(pieces.iter().map(|p| p.to_vec()));
        Self { parts, hang: false }
    }

    fn then_hang(mut self) -> Self {
        self.hang = true;
        self
    }
}

async fn start(replies: Vec<Reply>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for reply in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            captured.push(read_request(&mut socket).await);
            for part in reply.parts {
                socket.write_all(&part).await.unwrap();
                socket.flush().await.unwrap();
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            if reply.hang {
                let mut sink = [0u8; 1024];
                let closed = async { while matches!(socket.read(&mut sink).await, Ok(n) if n > 0) {} };
                let _ = timeout(Duration::from_secs(10), closed).await;
            }
            let _ = socket.shutdown().await;
        }
        captured
    });

    (format!("http://{addr}/v1beta"), handle)
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + 4 + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end + 4..header_end + 4 + content_length]).to_string();
    Captured { head, body }
}

fn client(api_url: &str, api_key: &str) -> GeminiClient {
    client_with_timeout(api_url, api_key, 5)
}

fn client_with_timeout(api_url: &str, api_key: &str, timeout_seconds: u64) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: api_key.to_string(),
        api_url: api_url.to_string(),
        timeout_seconds,
        ..GeminiConfig::default()
    })
}

fn candidate(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[tokio::test]
async fn catalog_fetch_sends_schema_and_parses_entries() {
    let entries = r#"[{"arabic":"صَبْر","transliteration":"সবর","meaning":"ধৈর্য","nuance":"অবিচল থাকা","reference":"সূরা আল-বাকারা ২:১৫৩"}]"#;
    let (url, server) = start(vec![Reply::json("200 OK", &candidate(entries))]).await;

    let words = client(&url, "secret").fetch_by_topic("Patience").await.unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].arabic(), "صَبْر");
    assert_eq!(words[0].category(), None);

    let captured = server.await.unwrap();
    let request = &captured[0];
    assert!(request.head.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
    assert!(request.head.to_ascii_lowercase().contains("x-goog-api-key: secret"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    assert!(
        body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Topic: \"Patience\"")
    );
}

#[tokio::test]
async fn catalog_fetch_with_empty_text_yields_no_entries() {
    let (url, server) = start(vec![Reply::json("200 OK", &candidate(""))]).await;

    let words = client(&url, "secret").fetch_by_topic("Time").await.unwrap();
    assert!(words.is_empty());
    server.await.unwrap();
}

#[tokio::test]
async fn catalog_fetch_rejects_off_schema_text() {
    let (url, server) = start(vec![Reply::json("200 OK", &candidate("[{\"arabic\":1}]"))]).await;

    let err = client(&url, "secret").fetch_by_topic("Time").await.unwrap_err();
    assert!(matches!(err, AiError::ResponseFormat(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn catalog_fetch_surfaces_http_errors() {
    let envelope = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
    let (url, server) = start(vec![Reply::json("403 Forbidden", envelope)]).await;

    let err = client(&url, "bad").fetch_by_topic("Time").await.unwrap_err();
    match err {
        AiError::Service(message) => {
            assert!(message.contains("403"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn missing_key_fails_before_any_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v1beta", listener.local_addr().unwrap());
    let gemini = client(&url, "");

    let err = gemini.fetch_by_topic("Heart").await.unwrap_err();
    assert_eq!(err, AiError::Configuration);
    assert!(matches!(gemini.open_session(), Err(AiError::Configuration)));

    let accepted = timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(accepted.is_err(), "a connection was made without a key");
}

#[tokio::test]
async fn chat_turns_stream_chunks_and_carry_history() {
    let first = format!(
        "data: {}\r\n\r\ndata: {}\r\n\r\ndata: {}\r\n\r\n",
        candidate("আসসা"),
        candidate("লামু "),
        candidate("আলাইকুম")
    );
    let (head, tail) = first.as_bytes().split_at(first.len() / 2);
    let second = format!("data: {}\n\n", candidate("হ্যাঁ"));

    let (url, server) = start(vec![
        Reply::sse(&[head, tail]),
        Reply::sse(&[second.as_bytes()]),
    ])
    .await;

    let gemini = client(&url, "secret");
    let mut session = gemini.open_session().unwrap();

    let mut reply = String::new();
    {
        let mut chunks = session.send("সালাম");
        while let Some(chunk) = chunks.next().await {
            reply.push_str(&chunk.unwrap());
        }
    }
    assert_eq!(reply, "আসসালামু আলাইকুম");

    let chunks: Vec<_> = session.send("আবার?").collect().await;
    assert_eq!(chunks, vec![Ok("হ্যাঁ".to_string())]);

    let captured = server.await.unwrap();
    assert!(captured[0].head.contains(":streamGenerateContent?alt=sse"));

    let body: serde_json::Value = serde_json::from_str(&captured[1].body).unwrap();
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["text"], "আসসালামু আলাইকুম");
    assert_eq!(contents[2]["parts"][0]["text"], "আবার?");
    assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
}

#[tokio::test]
async fn failed_chat_turn_is_not_remembered() {
    let envelope = r#"{"error":{"code":500,"message":"internal","status":"INTERNAL"}}"#;
    let retry = format!("data: {}\n\n", candidate("ঠিক আছে"));
    let (url, server) = start(vec![
        Reply::json("500 Internal Server Error", envelope),
        Reply::sse(&[retry.as_bytes()]),
    ])
    .await;

    let gemini = client(&url, "secret");
    let mut session = gemini.open_session().unwrap();

    let first: Vec<_> = session.send("প্রথম").collect().await;
    assert_eq!(first.len(), 1);
    assert!(matches!(first[0], Err(AiError::Service(_))));

    let second: Vec<_> = session.send("দ্বিতীয়").collect().await;
    assert_eq!(second, vec![Ok("ঠিক আছে".to_string())]);

    let captured = server.await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&captured[1].body).unwrap();
    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn stalled_chat_stream_fails_and_frees_the_session() {
    let started = format!("data: {}\n\n", candidate("শুরু"));
    let retry = format!("data: {}\n\n", candidate("আবার"));
    let (url, server) = start(vec![
        Reply::sse(&[started.as_bytes()]).then_hang(),
        Reply::sse(&[retry.as_bytes()]),
    ])
    .await;

    let gemini = client_with_timeout(&url, "secret", 1);
    let mut session = gemini.open_session().unwrap();

    let first: Vec<_> = timeout(Duration::from_secs(3), session.send("প্রশ্ন").collect())
        .await
        .expect("stalled stream never ended");
    assert_eq!(first.len(), 2);
    assert_eq!(first[0], Ok("শুরু".to_string()));
    assert!(matches!(first[1], Err(AiError::Service(_))));

    let second: Vec<_> = timeout(Duration::from_secs(8), session.send("আবার?").collect())
        .await
        .expect("second turn never ended");
    assert_eq!(second, vec![Ok("আবার".to_string())]);

    // the stalled turn left nothing in the history
    let captured = server.await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&captured[1].body).unwrap();
    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn text_before_a_bad_event_arrives_ahead_of_the_error() {
    let mixed = format!("data: {}\n\ndata: not json\n\ndata: {}\n\n", candidate("আগে"), candidate("পরে"));
    let (url, server) = start(vec![Reply::sse(&[mixed.as_bytes()])]).await;

    let gemini = client(&url, "secret");
    let mut session = gemini.open_session().unwrap();

    let chunks: Vec<_> = session.send("প্রশ্ন").collect().await;
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], Ok("আগে".to_string()));
    assert!(matches!(chunks[1], Err(AiError::ResponseFormat(_))));
    server.await.unwrap();
}

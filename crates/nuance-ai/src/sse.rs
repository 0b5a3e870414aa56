/// Incremental decoder for a `text/event-stream` body.
///
/// Bytes are buffered until a blank line closes an event, so an event (or a
/// multi-byte character inside it) may be split across any number of reads.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the `data` payload of every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some((end, separator)) = find_boundary(&self.buffer) {
            let raw: Vec<u8> = self.buffer.drain(..end + separator).collect();
            if let Some(data) = event_data(&raw[..end]) {
                events.push(data);
            }
        }
        events
    }

    /// Flush a trailing event the server did not terminate with a blank line
    pub fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buffer);
        event_data(&raw)
    }
}

/// Position of the first event terminator and its length
fn find_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    for (i, &byte) in buffer.iter().enumerate() {
        if byte != b'\n' {
            continue;
        }
        let rest = &buffer[i + 1..];
        if rest.starts_with(b"\n") {
            return Some((i, 2));
        }
        if rest.starts_with(b"\r\n") {
            return Some((i, 3));
        }
    }
    None
}

fn event_data(block: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(block);

    let mut data: Option<String> = None;
    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        let Some(value) = line.strip_prefix("data:") else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match data.as_mut() {
            Some(existing) => {
                existing.push('\n');
                existing.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }
    data
}

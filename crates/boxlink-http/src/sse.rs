//! Incremental `text/event-stream` decoder.
//!
//! Bytes arrive in arbitrary chunks; the decoder buffers incomplete lines and
//! yields every event completed by a chunk. Line endings may be `\n`, `\r\n`
//! or a lone `\r`, including a `\r\n` pair split across two chunks.

use std::time::Duration;

use boxlink_core::ServerSentEvent;
use boxlink_core::ports::event_source::DEFAULT_EVENT_TYPE;
use bytes::{Buf, BytesMut};
use tracing::warn;

const BOM: char = '\u{feff}';

/// Longest line kept by default; longer lines are dropped.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Event-stream parser state for one logical stream (across reconnects).
#[derive(Debug)]
pub struct SseDecoder {
    /// Bytes of the current, unterminated line.
    buf: BytesMut,
    /// Prefix of `buf` already searched for a line ending.
    scanned: usize,
    /// The current line exceeded the limit; skip it up to its line ending.
    discarding: bool,
    max_line_len: usize,
    /// The previous line ended in `\r`; a leading `\n` belongs to it.
    pending_cr: bool,
    /// The first line of the current connection has been seen.
    started: bool,
    event_type: String,
    data: String,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self {
            buf: BytesMut::new(),
            scanned: 0,
            discarding: false,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            pending_cr: false,
            started: false,
            event_type: String::new(),
            data: String::new(),
            last_event_id: None,
            retry: None,
        }
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the longest accepted line, in bytes.
    ///
    /// A longer line is dropped together with the event it belonged to.
    #[must_use]
    pub const fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Feed one chunk and return the events it completed, in order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ServerSentEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();

        loop {
            if self.pending_cr {
                match self.buf.first() {
                    None => break,
                    Some(b'\n') => self.buf.advance(1),
                    Some(_) => {}
                }
                self.pending_cr = false;
            }

            let found = self.buf[self.scanned..]
                .iter()
                .position(|b| matches!(b, b'\n' | b'\r'));
            let Some(end) = found.map(|i| self.scanned + i) else {
                self.scanned = self.buf.len();
                if self.buf.len() > self.max_line_len {
                    self.drop_line();
                    self.buf.clear();
                    self.scanned = 0;
                }
                break;
            };
            let line = self.buf.split_to(end);
            self.scanned = 0;
            self.pending_cr = self.buf[0] == b'\r';
            self.buf.advance(1);

            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if line.len() > self.max_line_len {
                self.drop_line();
                self.discarding = false;
                continue;
            }

            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    /// Drop any partially received line or event.
    ///
    /// Called when the connection is lost. The last event ID and the
    /// reconnection delay survive.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.scanned = 0;
        self.discarding = false;
        self.pending_cr = false;
        self.started = false;
        self.event_type.clear();
        self.data.clear();
    }

    /// ID to send as `Last-Event-ID` when reconnecting.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay requested by the server, if any.
    pub const fn retry(&self) -> Option<Duration> {
        self.retry
    }

    fn process_line(&mut self, line: &str) -> Option<ServerSentEvent> {
        let line = if self.started {
            line
        } else {
            self.started = true;
            line.strip_prefix(BOM).unwrap_or(line)
        };

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => value.clone_into(&mut self.event_type),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" if !value.contains('\0') => {
                self.last_event_id = (!value.is_empty()).then(|| value.to_string());
            }
            "retry" if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                if let Ok(ms) = value.parse() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    fn drop_line(&mut self) {
        if !self.discarding {
            warn!(limit = self.max_line_len, "Event stream line too long, dropping event");
        }
        self.discarding = true;
        self.event_type.clear();
        self.data.clear();
    }

    fn dispatch(&mut self) -> Option<ServerSentEvent> {
        let event_type = std::mem::take(&mut self.event_type);
        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        data.pop();
        Some(ServerSentEvent {
            event: if event_type.is_empty() {
                DEFAULT_EVENT_TYPE.to_string()
            } else {
                event_type
            },
            data,
            id: self.last_event_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<ServerSentEvent> {
        let mut decoder = SseDecoder::new();
        chunks.iter().flat_map(|c| decoder.feed(c)).collect()
    }

    #[test]
    fn test_named_event() {
        let events = decode_all(&[b"event: status\ndata: {\"heap\":1}\n\n"]);
        assert_eq!(events, vec![ServerSentEvent::new("status", "{\"heap\":1}")]);
    }

    #[test]
    fn test_default_event_type_is_message() {
        let events = decode_all(&[b"data: hello\n\n"]);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_line_endings() {
        for input in [
            &b"event: a\r\ndata: x\r\n\r\n"[..],
            &b"event: a\rdata: x\r\r"[..],
            &b"event: a\ndata: x\n\n"[..],
        ] {
            assert_eq!(decode_all(&[input]), vec![ServerSentEvent::new("a", "x")]);
        }
    }

    #[test]
    fn test_chunk_boundaries() {
        let events = decode_all(&[b"ev", b"ent: status\r", b"\ndata: {\"a\"", b":1}\r", b"\n\r", b"\n"]);
        assert_eq!(events, vec![ServerSentEvent::new("status", "{\"a\":1}")]);
    }

    #[test]
    fn test_split_crlf_is_one_line_ending() {
        // "\r" then "\n" in the next chunk must not produce a blank line.
        let events = decode_all(&[b"data: one\r", b"\ndata: two\n\n"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "one\ntwo");
    }

    #[test]
    fn test_multiline_data() {
        let events = decode_all(&[b"data: first\ndata:second\ndata\n\n"]);
        assert_eq!(events[0].data, "first\nsecond\n");
    }

    #[test]
    fn test_only_one_space_is_stripped() {
        let events = decode_all(&[b"data:  indented\n\n"]);
        assert_eq!(events[0].data, " indented");
    }

    #[test]
    fn test_comments_and_unknown_fields_are_ignored() {
        let events = decode_all(&[b": keepalive\nfoo: bar\ndata: x\n\n:another\n\n"]);
        assert_eq!(events, vec![ServerSentEvent::new("message", "x")]);
    }

    #[test]
    fn test_blank_lines_without_data_dispatch_nothing() {
        let events = decode_all(&[b"event: status\n\n\n\ndata: x\n\n"]);
        // The event type of the empty block does not leak into the next one.
        assert_eq!(events, vec![ServerSentEvent::new("message", "x")]);
    }

    #[test]
    fn test_incomplete_event_is_not_dispatched() {
        let events = decode_all(&[b"event: status\ndata: x\n"]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_leading_bom_is_stripped() {
        let events = decode_all(&["\u{feff}event: status\ndata: x\n\n".as_bytes()]);
        assert_eq!(events, vec![ServerSentEvent::new("status", "x")]);
    }

    #[test]
    fn test_event_id_tracking() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"id: 7\ndata: a\n\ndata: b\n\n");
        assert_eq!(events[0].id.as_deref(), Some("7"));
        assert_eq!(events[1].id.as_deref(), Some("7"));
        assert_eq!(decoder.last_event_id(), Some("7"));

        // IDs containing NUL are ignored.
        decoder.feed(b"id: 8\0\ndata: c\n\n");
        assert_eq!(decoder.last_event_id(), Some("7"));

        // An empty ID clears it.
        decoder.feed(b"id\ndata: d\n\n");
        assert_eq!(decoder.last_event_id(), None);
    }

    #[test]
    fn test_retry_field() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"retry: 1500\n");
        assert_eq!(decoder.retry(), Some(Duration::from_millis(1500)));

        decoder.feed(b"retry: soon\nretry: -5\nretry:\n");
        assert_eq!(decoder.retry(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_reset_discards_partial_event() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"id: 3\nretry: 100\nevent: status\ndata: half");
        decoder.reset();

        let events = decoder.feed(b"data: fresh\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "fresh");
        assert_eq!(decoder.last_event_id(), Some("3"));
        assert_eq!(decoder.retry(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_overlong_line_drops_its_event() {
        let mut decoder = SseDecoder::new().with_max_line_len(16);
        let events = decoder.feed(b"event: status\ndata: 0123456789abcdef\n\ndata: ok\n\n");
        assert_eq!(events, vec![ServerSentEvent::new("message", "ok")]);
    }

    #[test]
    fn test_unterminated_overlong_line_is_not_buffered() {
        let mut decoder = SseDecoder::new().with_max_line_len(16);
        decoder.feed(b"data: ");
        for _ in 0..100 {
            assert!(decoder.feed(b"xxxxxxxxxx").is_empty());
            assert!(decoder.buf.len() <= 16);
        }

        // The tail of the dropped line ends it; the next event is intact.
        let events = decoder.feed(b"xxx\n\ndata: after\n\n");
        assert_eq!(events, vec![ServerSentEvent::new("message", "after")]);
    }

    #[test]
    fn test_scan_resumes_after_searched_prefix() {
        let mut decoder = SseDecoder::new();
        decoder.feed(b"data: ab");
        decoder.feed(b"cd");
        assert_eq!(decoder.scanned, 10);

        let events = decoder.feed(b"ef\n\n");
        assert_eq!(events, vec![ServerSentEvent::new("message", "abcdef")]);
        assert_eq!(decoder.scanned, 0);
    }

    #[test]
    fn test_reset_clears_discarding() {
        let mut decoder = SseDecoder::new().with_max_line_len(8);
        decoder.feed(b"data: too long");
        decoder.reset();

        let events = decoder.feed(b"data: ok\n\n");
        assert_eq!(events, vec![ServerSentEvent::new("message", "ok")]);
    }
}

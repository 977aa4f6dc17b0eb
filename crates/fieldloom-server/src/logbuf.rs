//! Bounded in-memory log buffer.
//!
//! Formatted tracing output is teed to stdout and into this buffer so the
//! `/error-log` endpoint can serve recent lines without touching the host's
//! journal. Detached pipeline runs are observable only through these lines.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone)]
struct LogLine {
    at: DateTime<Utc>,
    line: String,
}

/// Shared ring of recent log lines.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn push(&self, line: String) {
        if line.trim().is_empty() {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.len() == self.capacity {
            inner.pop_front();
        }
        inner.push_back(LogLine {
            at: Utc::now(),
            line,
        });
    }

    /// Recent lines: the last `lines` of them, or everything since
    /// `minutes` ago, or the last 20 when neither filter is given.
    pub fn tail(&self, lines: Option<usize>, minutes: Option<i64>) -> Vec<String> {
        let inner = self.inner.lock();
        let mut selected: Vec<String> = match minutes {
            Some(m) => {
                let cutoff = Utc::now() - Duration::minutes(m.max(0));
                inner
                    .iter()
                    .filter(|entry| entry.at >= cutoff)
                    .map(|entry| entry.line.clone())
                    .collect()
            }
            None => inner.iter().map(|entry| entry.line.clone()).collect(),
        };

        let keep = match (lines, minutes) {
            (Some(n), _) => Some(n),
            (None, None) => Some(20),
            (None, Some(_)) => None,
        };
        if let Some(n) = keep {
            let len = selected.len();
            selected = selected.split_off(len.saturating_sub(n));
        }
        selected
    }
}

/// Per-event writer: tees bytes to stdout and buffers complete lines.
pub struct TeeWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

impl Drop for TeeWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines() {
            self.buffer.push(line.to_string());
        }
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        TeeWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(lines: &[&str]) -> LogBuffer {
        let buffer = LogBuffer::new(100);
        for line in lines {
            buffer.push(line.to_string());
        }
        buffer
    }

    #[test]
    fn tail_defaults_to_last_twenty() {
        let lines: Vec<String> = (0..30).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let buffer = filled(&refs);
        let tail = buffer.tail(None, None);
        assert_eq!(tail.len(), 20);
        assert_eq!(tail[0], "line 10");
        assert_eq!(tail[19], "line 29");
    }

    #[test]
    fn tail_respects_line_count() {
        let buffer = filled(&["a", "b", "c"]);
        assert_eq!(buffer.tail(Some(2), None), vec!["b", "c"]);
        assert_eq!(buffer.tail(Some(10), None).len(), 3);
    }

    #[test]
    fn minutes_filter_keeps_recent_entries() {
        let buffer = filled(&["recent"]);
        assert_eq!(buffer.tail(None, Some(5)), vec!["recent"]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        buffer.push("one".into());
        buffer.push("two".into());
        buffer.push("three".into());
        assert_eq!(buffer.tail(Some(10), None), vec!["two", "three"]);
    }

    #[test]
    fn writer_splits_multiline_output() {
        let buffer = LogBuffer::new(10);
        {
            let mut writer = buffer.make_writer();
            writer.write_all(b"first line\nsecond line\n").unwrap();
        }
        assert_eq!(buffer.tail(Some(10), None), vec!["first line", "second line"]);
    }
}

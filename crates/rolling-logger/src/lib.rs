//! Rolling in-memory logger
//!
//! Formats `tracing` events into a fixed-size circular buffer so the UI can
//! show the most recent lines. On wasm32 every line is also forwarded to the
//! browser console.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

pub const DEFAULT_CAPACITY: usize = 500;

static BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// Circular buffer of formatted log lines; the oldest line is evicted first
#[derive(Debug)]
pub struct LogBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { lines: Mutex::new(VecDeque::with_capacity(capacity)), capacity }
    }

    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Collects one formatted event and commits it, line by line, when dropped
pub struct LineWriter<'a> {
    buffer: &'a LogBuffer,
    pending: Vec<u8>,
}

impl<'a> LineWriter<'a> {
    pub fn new(buffer: &'a LogBuffer) -> Self {
        Self { buffer, pending: Vec::new() }
    }

    fn commit(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();

        let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let line = format!("[{}] {}", stamp, line);
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&line));
            self.buffer.push(line);
        }
    }
}

impl Write for LineWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit();
        Ok(())
    }
}

impl Drop for LineWriter<'_> {
    fn drop(&mut self) {
        self.commit();
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logger(app_name: &str, capacity: usize) -> Result<(), TryInitError> {
    let buffer: &'static LogBuffer = BUFFER.get_or_init(|| LogBuffer::new(capacity));

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_target(true)
        .with_writer(move || LineWriter::new(buffer))
        .finish()
        .try_init()?;

    tracing::info!(app = app_name, capacity = buffer.capacity, "logger initialized");
    Ok(())
}

/// Most recent lines, oldest first; empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    BUFFER.get().map(LogBuffer::lines).unwrap_or_default()
}

pub fn clear() {
    if let Some(buffer) = BUFFER.get() {
        buffer.clear();
    }
}

pub fn info(message: &str) {
    tracing::info!(target: "app", "{}", message);
}

pub fn error(message: &str) {
    tracing::error!(target: "app", "{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        buffer.push("one".into());
        buffer.push("two".into());
        buffer.push("three".into());
        assert_eq!(buffer.lines(), vec!["two", "three"]);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let buffer = LogBuffer::new(0);
        buffer.push("a".into());
        buffer.push("b".into());
        assert_eq!(buffer.lines(), vec!["b"]);
    }

    #[test]
    fn test_writer_commits_lines_on_drop() {
        let buffer = LogBuffer::new(10);
        {
            let mut writer = LineWriter::new(&buffer);
            write!(writer, " INFO app: first\n").unwrap();
            write!(writer, " WARN app: second\n\n").unwrap();
            assert!(buffer.is_empty());
        }
        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("INFO app: first"));
        assert!(lines[1].ends_with("WARN app: second"));
    }

    #[test]
    fn test_global_logger_captures_events() {
        assert!(init_logger("prompt-console", 50).is_ok());
        assert!(init_logger("prompt-console", 50).is_err());

        info("hello from the app");
        error("something broke");
        let lines = recent_lines();
        assert!(lines.iter().any(|l| l.contains("logger initialized")));
        assert!(lines.iter().any(|l| l.contains("INFO") && l.ends_with("hello from the app")));
        assert!(lines.iter().any(|l| l.contains("ERROR") && l.ends_with("something broke")));

        clear();
        assert!(recent_lines().is_empty());
    }
}

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

pub struct LogStore {
    lines: VecDeque<String>,
    max_lines: usize,
}

pub type SharedLogStore = Arc<Mutex<LogStore>>;

impl LogStore {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    pub fn shared(max_lines: usize) -> SharedLogStore {
        Arc::new(Mutex::new(Self::new(max_lines)))
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.is_empty() {
            return;
        }
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // oldest first, ending `scroll` lines before the newest
    pub fn window(&self, height: usize, scroll: usize) -> Vec<String> {
        let end = self.lines.len().saturating_sub(scroll);
        let start = end.saturating_sub(height);
        self.lines.range(start..end).cloned().collect()
    }
}

#[derive(Clone)]
pub struct LogMakeWriter {
    store: SharedLogStore,
}

impl LogMakeWriter {
    pub fn new(store: SharedLogStore) -> Self {
        Self { store }
    }
}

impl<'a> MakeWriter<'a> for LogMakeWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            store: self.store.clone(),
            partial: String::new(),
        }
    }
}

pub struct LogWriter {
    store: SharedLogStore,
    partial: String,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(idx) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=idx).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if !line.is_empty() {
                self.store.lock().push_line(line);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let line = self.partial.trim();
        if !line.is_empty() {
            self.store.lock().push_line(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogMakeWriter, LogStore};
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn store_keeps_only_newest_lines() {
        let mut store = LogStore::new(3);
        for i in 0..5 {
            store.push_line(format!("line {i}"));
        }
        store.push_line("");
        assert_eq!(store.len(), 3);
        assert_eq!(store.window(10, 0), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn window_scrolls_back_from_newest() {
        let mut store = LogStore::new(10);
        for i in 0..6 {
            store.push_line(format!("{i}"));
        }
        assert_eq!(store.window(2, 0), vec!["4", "5"]);
        assert_eq!(store.window(2, 3), vec!["1", "2"]);
        assert!(store.window(2, 100).is_empty());
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial_on_drop() {
        let store = LogStore::shared(10);
        let make = LogMakeWriter::new(store.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"first\r\nsec").expect("write");
            writer.write_all(b"ond\nthird").expect("write");
        }
        assert_eq!(store.lock().window(10, 0), vec!["first", "second", "third"]);
    }
}

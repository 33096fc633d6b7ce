//! Output sinks for ordered results.

use std::io::{self, Stdout, Write};

/// Receives the ordered results of a batch in a single delivery.
pub trait OutputSink: Send {
    fn deliver(&mut self, results: &[String]) -> io::Result<()>;
}

impl OutputSink for Vec<String> {
    fn deliver(&mut self, results: &[String]) -> io::Result<()> {
        self.extend_from_slice(results);
        Ok(())
    }
}

/// Line-based writer: one result per line, written with a single `write_all`.
#[derive(Debug)]
pub struct LineSink<W> {
    writer: W,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineSink<Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> OutputSink for LineSink<W> {
    fn deliver(&mut self, results: &[String]) -> io::Result<()> {
        if results.is_empty() {
            return Ok(());
        }
        let mut buf = String::with_capacity(results.iter().map(|r| r.len() + 1).sum());
        for line in results {
            buf.push_str(line);
            buf.push('\n');
        }
        self.writer.write_all(buf.as_bytes())?;
        self.writer.flush()
    }
}

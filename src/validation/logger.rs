//! Line buffer for validation transcripts

use tracing::debug;

/// Collects report lines for one validation run
///
/// Every line is also emitted as a `debug` tracing event. Reading the
/// transcript with [`ValidationLogger::take`] empties the buffer.
#[derive(Debug, Default)]
pub struct ValidationLogger {
    lines: Vec<String>,
}

impl ValidationLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "csv_schema_validator::report", "{}", line);
        self.lines.push(line);
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            self.log(line);
        }
    }

    /// Move the transcript out, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.lines).join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

//! Failure/warning reporting, replacing the original's `Observable`/
//! `Observer` inheritance pair (`examples/original_source/pds_crawler/
//! utils.py`) with a plain trait passed by value to each subsystem, per
//! Design Notes §9 ("avoid inheritance; pass the sink by value").

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// One `{resource, explanation}` message, matching the original's
/// `MessageModel` shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// What the message is about (a file, URL, or collection identity).
    pub resource: String,
    /// A human-readable explanation of what went wrong.
    pub explanation: String,
}

impl Report {
    /// Builds a new report message.
    pub fn new(resource: impl ToString, explanation: impl ToString) -> Report {
        Report {
            resource: resource.to_string(),
            explanation: explanation.to_string(),
        }
    }
}

/// Implemented by every failure/warning sink. Passed by value (or as
/// `&mut dyn Sink`) to each subsystem that may need to report a
/// non-fatal problem.
pub trait Sink {
    /// Records one report.
    fn report(&mut self, report: Report);
}

/// A sink that accumulates reports and, on drop or explicit `flush`, writes
/// a two-column markdown report to `<base>/<run-name>`.
pub struct MarkdownSink {
    reports: Vec<Report>,
}

impl MarkdownSink {
    /// Creates an empty markdown sink.
    pub fn new() -> MarkdownSink {
        MarkdownSink { reports: Vec::new() }
    }

    /// Writes the accumulated reports as a two-column markdown table with
    /// a fixed header, at `path`.
    pub fn flush(&self, path: &Path) -> io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "| resource | explanation |")?;
        writeln!(file, "|---|---|")?;
        for report in &self.reports {
            writeln!(file, "| {} | {} |", report.resource, report.explanation)?;
        }
        Ok(())
    }

    /// Returns the accumulated reports.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }
}

impl Default for MarkdownSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MarkdownSink {
    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }
}

/// A sink that logs every report as a `tracing::warn!` event instead of
/// accumulating them on disk.
#[derive(Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn report(&mut self, report: Report) {
        tracing::warn!(resource = %report.resource, explanation = %report.explanation, "reported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn markdown_sink_accumulates_and_flushes() {
        let mut sink = MarkdownSink::new();
        sink.report(Report::new("a.cat", "parse error"));
        assert_eq!(sink.reports().len(), 1);

        let dir = tempdir().unwrap();
        let path = dir.path().join("report.md");
        sink.flush(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("a.cat"));
        assert!(content.contains("parse error"));
    }

    #[test]
    fn tracing_sink_does_not_panic() {
        let mut sink = TracingSink;
        sink.report(Report::new("x", "y"));
    }
}

//! Progress and warning side channel
//!
//! The pipeline never writes to the console itself. It hands [`Event`]s to
//! an injected [`Reporter`], synchronously and in the order they happen.

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;

/// Something worth telling the caller about while a batch runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A subdirectory pass is about to start
    Subdirectory(String),
    /// A file is about to be parsed
    ReadingFile(PathBuf),
    /// A file parsed to a table with no rows
    EmptyFile(PathBuf),
    /// A source column was replaced by a provenance column
    ColumnOverwritten { file: PathBuf, column: String },
    /// The whole run produced no rows
    EmptyResult(PathBuf),
}

impl Event {
    /// Warnings are always reported; everything else is verbose progress
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::EmptyFile(_) | Event::ColumnOverwritten { .. } | Event::EmptyResult(_)
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Subdirectory(name) => write!(f, "Reading subdirectory {}", name),
            Event::ReadingFile(path) => write!(f, "Reading {}", path.display()),
            Event::EmptyFile(path) => write!(
                f,
                "File {} contains no rows; it will not add data to the result",
                path.display()
            ),
            Event::ColumnOverwritten { file, column } => write!(
                f,
                "Column '{}' in {} was overwritten with provenance data",
                column,
                file.display()
            ),
            Event::EmptyResult(dir) => write!(
                f,
                "Merged table is empty; check that '{}' is the right directory",
                dir.display()
            ),
        }
    }
}

/// Receiver of pipeline events
pub trait Reporter {
    fn report(&self, event: &Event);
}

/// Forwards events to `tracing`: progress at INFO, warnings at WARN
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &Event) {
        if event.is_warning() {
            tracing::warn!("{}", event);
        } else {
            tracing::info!("{}", event);
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &Event) {}
}

/// Keeps every event in arrival order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: RefCell<Vec<Event>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Only the warning events
    pub fn warnings(&self) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &Event) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_classification() {
        assert!(Event::EmptyFile(PathBuf::from("a.csv")).is_warning());
        assert!(Event::EmptyResult(PathBuf::from(".")).is_warning());
        assert!(!Event::Subdirectory("s1".to_string()).is_warning());
        assert!(!Event::ReadingFile(PathBuf::from("a.csv")).is_warning());
    }

    #[test]
    fn test_recording_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.report(&Event::Subdirectory("s1".to_string()));
        reporter.report(&Event::EmptyFile(PathBuf::from("s1/a.csv")));

        assert_eq!(
            reporter.events(),
            vec![
                Event::Subdirectory("s1".to_string()),
                Event::EmptyFile(PathBuf::from("s1/a.csv")),
            ]
        );
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn test_display_names_the_file() {
        let text = Event::EmptyFile(PathBuf::from("s1/a.csv")).to_string();
        assert!(text.contains("s1/a.csv"));
    }
}

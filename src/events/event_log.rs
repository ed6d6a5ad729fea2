//! Event log sink and writers
//!
//! The factory reports four things: an operation started, completed, or was
//! queued at a work center, and a router completed. Whatever receives those
//! reports implements [`EventSink`]; [`EventLog`] is the in-memory sink that
//! the binary writes out as JSON lines or CSV.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::planning::{Operation, Router};
use crate::simulation::SimulationResult;
use crate::types::{EventKind, OperationId, OutputFormat, RouterId, WorkCenterId};

/// CSV header row of [`EventLog::write_csv`]
pub const CSV_HEADER: &str = "timestamp,event,subject,id,router,work_center,sequence";

/// What an event is about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "subject", rename_all = "snake_case")]
pub enum EventSubject {
    /// An operation, with the handles needed to read the log on its own
    Operation {
        /// The operation
        operation: OperationId,
        /// Its router
        router: RouterId,
        /// Its work center
        work_center: WorkCenterId,
        /// Its position on the router
        sequence_number: u32,
    },
    /// A router
    Router {
        /// The router
        router: RouterId,
        /// Its order number
        order_number: u64,
    },
}

impl EventSubject {
    /// Subject describing an operation
    pub fn operation(operation: &Operation) -> Self {
        EventSubject::Operation {
            operation: operation.id,
            router: operation.router,
            work_center: operation.work_center,
            sequence_number: operation.sequence_number,
        }
    }

    /// Subject describing a router
    pub fn router(router: &Router) -> Self {
        EventSubject::Router { router: router.id, order_number: router.order_number }
    }

    /// Router the subject belongs to
    pub fn router_id(&self) -> RouterId {
        match self {
            EventSubject::Operation { router, .. } | EventSubject::Router { router, .. } => *router,
        }
    }

    /// Operation, when the subject is one
    pub fn operation_id(&self) -> Option<OperationId> {
        match self {
            EventSubject::Operation { operation, .. } => Some(*operation),
            EventSubject::Router { .. } => None,
        }
    }

    /// Work center, when the subject is an operation
    pub fn work_center_id(&self) -> Option<WorkCenterId> {
        match self {
            EventSubject::Operation { work_center, .. } => Some(*work_center),
            EventSubject::Router { .. } => None,
        }
    }
}

/// One reported event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Elapsed wall-clock hours at which the event happened
    pub timestamp: f64,
    /// What happened
    pub event: EventKind,
    /// What it happened to
    #[serde(flatten)]
    pub subject: EventSubject,
}

impl LogEntry {
    /// Format the entry as a CSV row matching [`CSV_HEADER`]
    pub fn to_csv_row(&self) -> String {
        match self.subject {
            EventSubject::Operation { operation, router, work_center, sequence_number } => format!(
                "{},{},operation,{},{},{},{}",
                self.timestamp, self.event, operation, router, work_center, sequence_number
            ),
            EventSubject::Router { router, .. } => {
                format!("{},{},router,{},{},,", self.timestamp, self.event, router, router)
            }
        }
    }
}

/// Receiver of the factory's event reports
///
/// Calls arrive in simulation order. A sink only appends; it never feeds back
/// into the run.
pub trait EventSink {
    /// Record one event
    fn log_event(&mut self, timestamp: f64, kind: EventKind, subject: EventSubject);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn log_event(&mut self, timestamp: f64, kind: EventKind, subject: EventSubject) {
        (**self).log_event(timestamp, kind, subject)
    }
}

/// In-memory, append-only event log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventSink for EventLog {
    fn log_event(&mut self, timestamp: f64, kind: EventKind, subject: EventSubject) {
        self.entries.push(LogEntry { timestamp, event: kind, subject });
    }
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in the order they were logged
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries of one kind
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| entry.event == kind)
    }

    /// Number of entries of one kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Entries about one operation
    pub fn for_operation(&self, operation: OperationId) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.subject.operation_id() == Some(operation))
    }

    /// Entries about one router or any of its operations
    pub fn for_router(&self, router: RouterId) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| entry.subject.router_id() == router)
    }

    /// Timestamp of the last entry
    pub fn last_timestamp(&self) -> Option<f64> {
        self.entries.last().map(|entry| entry.timestamp)
    }

    /// Write one JSON object per line
    pub fn write_jsonl<W: Write + ?Sized>(&self, writer: &mut W) -> SimulationResult<()> {
        for entry in &self.entries {
            let line = serde_json::to_string(entry)?;
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write a header row and one CSV row per entry
    pub fn write_csv<W: Write + ?Sized>(&self, writer: &mut W) -> SimulationResult<()> {
        writeln!(writer, "{}", CSV_HEADER)?;
        for entry in &self.entries {
            writeln!(writer, "{}", entry.to_csv_row())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write in the given format
    pub fn write<W: Write + ?Sized>(&self, format: OutputFormat, writer: &mut W) -> SimulationResult<()> {
        match format {
            OutputFormat::Json => self.write_jsonl(writer),
            OutputFormat::Csv => self.write_csv(writer),
        }
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

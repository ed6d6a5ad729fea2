//! Event log
//!
//! This module handles the record of what happened during a run: the sink
//! contract the factory reports through and the in-memory log with its
//! JSON-lines and CSV writers.
//!
//! # Overview
//!
//! - **EventSink**: receiver of start, completion, queue and router-completion reports
//! - **EventLog**: append-only in-memory sink
//! - **LogEntry**: one timestamped report
//! - **EventSubject**: the operation or router a report is about
//!
//! # Usage Example
//!
//! ```rust
//! use shop_forecasting::events::*;
//! use shop_forecasting::types::*;
//!
//! let mut log = EventLog::new();
//! log.log_event(
//!     1.5,
//!     EventKind::RouterCompleted,
//!     EventSubject::Router { router: RouterId(0), order_number: 1000 },
//! );
//!
//! let mut csv = Vec::new();
//! log.write_csv(&mut csv).unwrap();
//! assert!(String::from_utf8(csv).unwrap().starts_with(CSV_HEADER));
//! ```

pub mod event_log;

// Re-export all public types for convenience
pub use event_log::*;

//! Enumeration types for the shop simulator
//!
//! This module contains the event kinds written to the event log, the
//! queue-ordering policies a work center can be configured with, and the
//! output formats for the event log.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of events the factory writes to the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// An operation took a slot at its work center
    OperationStarted,
    /// An operation finished and released its slot
    OperationCompleted,
    /// An operation was handed to its work center by its router
    OperationQueued,
    /// A router has no further operations
    RouterCompleted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::OperationStarted => write!(f, "OPERATION_STARTED"),
            EventKind::OperationCompleted => write!(f, "OPERATION_COMPLETED"),
            EventKind::OperationQueued => write!(f, "OPERATION_QUEUED"),
            EventKind::RouterCompleted => write!(f, "ROUTER_COMPLETED"),
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "operation_started" | "start" | "operation_start" => Ok(EventKind::OperationStarted),
            "operation_completed" | "complete" | "operation_complete" => {
                Ok(EventKind::OperationCompleted)
            }
            "operation_queued" | "queued" | "queued_at_workcenter" => {
                Ok(EventKind::OperationQueued)
            }
            "router_completed" | "router_complete" => Ok(EventKind::RouterCompleted),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

/// Queue-ordering policy of a work center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrioritizerKind {
    /// First in, first out
    #[default]
    Fifo,
    /// Shortest local processing time first
    ShortestProcessingTime,
    /// Earliest order due date first
    EarliestDueDate,
}

impl fmt::Display for PrioritizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrioritizerKind::Fifo => write!(f, "FIFO"),
            PrioritizerKind::ShortestProcessingTime => write!(f, "Shortest Processing Time"),
            PrioritizerKind::EarliestDueDate => write!(f, "Earliest Due Date"),
        }
    }
}

impl FromStr for PrioritizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fifo" => Ok(PrioritizerKind::Fifo),
            "spt" | "shortest_processing_time" | "shortest processing time" => {
                Ok(PrioritizerKind::ShortestProcessingTime)
            }
            "edd" | "earliest_due_date" | "earliest due date" => {
                Ok(PrioritizerKind::EarliestDueDate)
            }
            _ => Err(format!("Unknown prioritizer: {}", s)),
        }
    }
}

/// Output format options for the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JSON lines, one entry per line
    Json,
    /// CSV format for tabular data
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_display() {
        assert_eq!(format!("{}", EventKind::OperationStarted), "OPERATION_STARTED");
        assert_eq!(format!("{}", EventKind::RouterCompleted), "ROUTER_COMPLETED");
    }

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("operation_queued".parse::<EventKind>().unwrap(), EventKind::OperationQueued);
        assert_eq!("OPERATION_COMPLETED".parse::<EventKind>().unwrap(), EventKind::OperationCompleted);
        assert_eq!("router-complete".parse::<EventKind>().unwrap(), EventKind::RouterCompleted);
        assert!("teleported".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_prioritizer_kind_from_str() {
        assert_eq!("fifo".parse::<PrioritizerKind>().unwrap(), PrioritizerKind::Fifo);
        assert_eq!("SPT".parse::<PrioritizerKind>().unwrap(), PrioritizerKind::ShortestProcessingTime);
        assert_eq!(
            "earliest_due_date".parse::<PrioritizerKind>().unwrap(),
            PrioritizerKind::EarliestDueDate
        );
        assert!("random".parse::<PrioritizerKind>().is_err());
        assert_eq!(PrioritizerKind::default(), PrioritizerKind::Fifo);
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Json), "JSON");
        assert_eq!(format!("{}", OutputFormat::Csv), "CSV");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        // Test error case
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_enum_serialization() {
        let kind = EventKind::OperationQueued;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"OPERATION_QUEUED\"");
        let deserialized: EventKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, deserialized);

        let prioritizer = PrioritizerKind::EarliestDueDate;
        let json = serde_json::to_string(&prioritizer).unwrap();
        assert_eq!(json, "\"earliest_due_date\"");
        let deserialized: PrioritizerKind = serde_json::from_str(&json).unwrap();
        assert_eq!(prioritizer, deserialized);

        let output_format = OutputFormat::Csv;
        let json = serde_json::to_string(&output_format).unwrap();
        let deserialized: OutputFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(output_format, deserialized);
    }
}

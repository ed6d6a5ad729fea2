//! Router operations
//!
//! An operation is one step of a router: a stretch of processing time at one
//! work center. Operations are created with their router and never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OperationId, RouterId, WorkCenterId};

/// One step of a manufacturing router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Handle of this operation
    pub id: OperationId,
    /// Router the operation belongs to
    pub router: RouterId,
    /// Work center that performs it
    pub work_center: WorkCenterId,
    /// Position on the router; unique within the router
    pub sequence_number: u32,
    /// Processing time in the work center's local hours
    pub hours: f64,
    /// Due date of the owning order, when it has one
    pub due_date: Option<DateTime<Utc>>,
}

impl Operation {
    /// Wall-clock hours this operation occupies a slot at a work center with
    /// the given time ratio
    pub fn wall_clock_hours(&self, time_ratio: f64) -> f64 {
        self.hours / time_ratio
    }
}

/// Caller-side description of an operation, before it is placed in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    /// Position on the router
    pub sequence_number: u32,
    /// Work center that performs the step
    pub work_center: WorkCenterId,
    /// Processing time in local hours
    pub hours: f64,
}

impl OperationSpec {
    /// Describe a route step
    pub fn new(sequence_number: u32, work_center: WorkCenterId, hours: f64) -> Self {
        Self { sequence_number, work_center, hours }
    }
}

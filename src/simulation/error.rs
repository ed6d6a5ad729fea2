//! Error types and handling
//!
//! This module contains error types and error handling for the simulation.
//! Structural errors (a malformed router, a capacity overflow) abort the run;
//! an empty queue or a busy work center is ordinary control flow and never
//! shows up here.

use crate::types::{ConfigValidationError, OperationId, RouterId, WorkCenterId};
use thiserror::Error;
use tracing::{error, warn};

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A router's position is not one of its steps, or its steps are inconsistent
    #[error("Malformed router {router} (order {order_number}): {detail}")]
    MalformedRouter {
        /// Offending router
        router: RouterId,
        /// Order the router belongs to
        order_number: u64,
        /// What is wrong with it
        detail: String,
    },

    /// Earliest-due-date ordering was asked to rank an operation without a due date
    #[error("Operation {operation} of router {router} has no due date to prioritize by")]
    MissingDueDate {
        /// Operation being prioritized
        operation: OperationId,
        /// Router the operation belongs to
        router: RouterId,
    },

    /// A slot was freed at a work center whose slots were all free already
    #[error("Work center {work_center} would exceed its capacity of {capacity} slots")]
    CapacityOverflow {
        /// Offending work center
        work_center: WorkCenterId,
        /// Its total slot count
        capacity: usize,
    },

    /// An operation was started at a work center with every slot taken
    #[error("Work center {work_center} has no free slot for operation {operation}")]
    NoFreeSlot {
        /// Busy work center
        work_center: WorkCenterId,
        /// Operation that could not start
        operation: OperationId,
    },

    /// An operation was started while already waiting or in progress
    #[error("Operation {0} is already waiting or in progress")]
    AlreadyScheduled(OperationId),

    /// A handle that does not belong to this factory
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a malformed router error
    pub fn malformed_router(router: RouterId, order_number: u64, detail: impl Into<String>) -> Self {
        Self::MalformedRouter { router, order_number, detail: detail.into() }
    }

    /// Create an unknown entity error
    pub fn unknown_entity(what: impl std::fmt::Display) -> Self {
        Self::UnknownEntity(what.to_string())
    }

    /// Check if this is a recoverable error
    ///
    /// Nothing is retried inside a run; this tells a driver whether the same
    /// setup could succeed after fixing its surroundings (files, output paths).
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::MalformedRouter { .. } => false,
            SimulationError::MissingDueDate { .. } => false,
            SimulationError::CapacityOverflow { .. } => false,
            SimulationError::NoFreeSlot { .. } => false,
            SimulationError::AlreadyScheduled(_) => false,
            SimulationError::UnknownEntity(_) => false,
            SimulationError::ConfigurationError(_) => false,
            SimulationError::InvalidConfig(_) => false,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::MalformedRouter { .. } => "Router",
            SimulationError::MissingDueDate { .. } => "Prioritizer",
            SimulationError::CapacityOverflow { .. } => "Work Center",
            SimulationError::NoFreeSlot { .. } => "Work Center",
            SimulationError::AlreadyScheduled(_) => "Scheduling",
            SimulationError::UnknownEntity(_) => "Lookup",
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::InvalidConfig(_) => "Configuration",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }

    /// Log the error at a level matching its severity
    pub fn report(&self) {
        if self.is_recoverable() {
            warn!(category = self.category(), "Recoverable error: {}", self);
        } else {
            error!(category = self.category(), "Simulation aborted: {}", self);
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_identify_offender() {
        let err = SimulationError::malformed_router(RouterId(2), 1000, "sequence 15 is not a step");
        let message = err.to_string();
        assert!(message.contains("RTR_2"));
        assert!(message.contains("1000"));
        assert!(message.contains("sequence 15"));

        let err = SimulationError::CapacityOverflow { work_center: WorkCenterId(1), capacity: 3 };
        assert_eq!(err.to_string(), "Work center WC_1 would exceed its capacity of 3 slots");

        let err = SimulationError::NoFreeSlot { work_center: WorkCenterId(2), operation: OperationId(9) };
        assert_eq!(err.to_string(), "Work center WC_2 has no free slot for operation OP_9");
        assert!(!err.is_recoverable());

        let err = SimulationError::MissingDueDate { operation: OperationId(5), router: RouterId(7) };
        assert!(err.to_string().contains("OP_5"));
        assert!(err.to_string().contains("RTR_7"));
    }

    #[test]
    fn test_structural_errors_are_not_recoverable() {
        let structural = [
            SimulationError::malformed_router(RouterId(0), 1, "x"),
            SimulationError::CapacityOverflow { work_center: WorkCenterId(0), capacity: 1 },
            SimulationError::MissingDueDate { operation: OperationId(0), router: RouterId(1) },
            SimulationError::configuration_error("bad"),
        ];
        for err in &structural {
            assert!(!err.is_recoverable(), "{} should abort", err);
        }

        let io = SimulationError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.is_recoverable());
        assert_eq!(io.category(), "IO");
    }

    #[test]
    fn test_config_validation_error_conversion() {
        let err: SimulationError = ConfigValidationError::NoWorkCenters.into();
        assert_eq!(err.category(), "Configuration");
        assert!(err.to_string().contains("At least one work center"));
    }
}

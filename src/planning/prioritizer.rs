//! Queue-ordering policies
//!
//! A [`Prioritizer`] assigns the priority a waiting operation is queued with at
//! its work center. The policy set is closed; each variant carries its own state.

use serde::{Deserialize, Serialize};

use crate::planning::{Operation, PrioritizedItem};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{OperationId, PrioritizerKind};

/// Queue-ordering policy of one work center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prioritizer {
    /// First in, first out; priority is an incrementing arrival counter
    Fifo {
        /// Priority handed to the next arrival
        queue_count: u64,
    },
    /// Shortest local processing time first
    ShortestProcessingTime,
    /// Earliest due date first
    EarliestDueDate,
}

impl Prioritizer {
    /// A FIFO prioritizer with its counter at zero
    pub fn fifo() -> Self {
        Prioritizer::Fifo { queue_count: 0 }
    }

    /// Fresh policy state for a configured kind
    pub fn from_kind(kind: PrioritizerKind) -> Self {
        match kind {
            PrioritizerKind::Fifo => Self::fifo(),
            PrioritizerKind::ShortestProcessingTime => Prioritizer::ShortestProcessingTime,
            PrioritizerKind::EarliestDueDate => Prioritizer::EarliestDueDate,
        }
    }

    /// Which policy this is
    pub fn kind(&self) -> PrioritizerKind {
        match self {
            Prioritizer::Fifo { .. } => PrioritizerKind::Fifo,
            Prioritizer::ShortestProcessingTime => PrioritizerKind::ShortestProcessingTime,
            Prioritizer::EarliestDueDate => PrioritizerKind::EarliestDueDate,
        }
    }

    /// Set `entry.priority` for the operation it carries
    ///
    /// Only the entry's priority and the policy's own counter change. Earliest
    /// due date fails when the operation has no due date.
    pub fn prioritize(
        &mut self,
        entry: &mut PrioritizedItem<OperationId>,
        operation: &Operation,
    ) -> SimulationResult<()> {
        entry.priority = match self {
            Prioritizer::Fifo { queue_count } => {
                let priority = *queue_count as f64;
                *queue_count += 1;
                priority
            }
            Prioritizer::ShortestProcessingTime => operation.hours,
            Prioritizer::EarliestDueDate => {
                let due_date = operation.due_date.ok_or(SimulationError::MissingDueDate {
                    operation: operation.id,
                    router: operation.router,
                })?;
                due_date.timestamp() as f64
            }
        };
        Ok(())
    }
}

impl Default for Prioritizer {
    fn default() -> Self {
        Self::fifo()
    }
}

//! Router state machine
//!
//! A router is one order's path through the shop: a finite, strictly
//! increasing list of steps and a cursor on the current one. The only
//! transition is [`Router::advance`], which moves the cursor to the next
//! step or to the terminal position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{OperationId, RouterId};

/// Where a router's cursor is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouterPosition {
    /// At the step with this sequence number
    At(u32),
    /// Past the last step
    Done,
}

impl RouterPosition {
    /// Whether this is the terminal position
    pub fn is_done(self) -> bool {
        matches!(self, RouterPosition::Done)
    }
}

impl fmt::Display for RouterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterPosition::At(sequence) => write!(f, "{}", sequence),
            RouterPosition::Done => write!(f, "done"),
        }
    }
}

/// One entry of a router's route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterStep {
    /// Sequence number of the step
    pub sequence_number: u32,
    /// Operation performed at this step
    pub operation: OperationId,
}

/// What the owner of a router must do after [`Router::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterTransition {
    /// The router moved to this operation; it goes to its work center next
    Enqueue(OperationId),
    /// The router just reached its terminal position
    Completed,
    /// The router was already terminal and its completion already reported
    Unchanged,
}

/// Order information attached to a router
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterSpec {
    /// Order number
    pub order_number: u64,
    /// Item being produced
    pub item_number: u64,
    /// Starting position; the first step when absent
    pub start: Option<RouterPosition>,
    /// Due date copied onto every operation of the router
    pub due_date: Option<DateTime<Utc>>,
}

impl RouterSpec {
    /// Order information with only an order number
    pub fn new(order_number: u64) -> Self {
        Self { order_number, ..Default::default() }
    }

    /// Set the item number
    pub fn with_item_number(mut self, item_number: u64) -> Self {
        self.item_number = item_number;
        self
    }

    /// Set the starting position
    pub fn starting_at(mut self, start: RouterPosition) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A collection of manufacturing steps for one order
///
/// Only [`Router::new`] builds one, so a router's steps are always sorted
/// and its position is always one of them or [`RouterPosition::Done`].
#[derive(Debug, Clone, Serialize)]
pub struct Router {
    /// Handle of this router
    pub id: RouterId,
    /// Order number
    pub order_number: u64,
    /// Item being produced
    pub item_number: u64,
    /// Order due date
    pub due_date: Option<DateTime<Utc>>,
    steps: Vec<RouterStep>,
    current: RouterPosition,
    completion_reported: bool,
}

impl Router {
    /// Build a router from its steps
    ///
    /// Steps may come in any order; they are sorted by sequence number.
    /// Duplicate sequence numbers, or a start position that is not one of the
    /// steps, make the router malformed.
    pub fn new(id: RouterId, spec: &RouterSpec, mut steps: Vec<RouterStep>) -> SimulationResult<Self> {
        steps.sort_by_key(|step| step.sequence_number);

        if let Some(pair) = steps.windows(2).find(|pair| pair[0].sequence_number == pair[1].sequence_number) {
            return Err(SimulationError::malformed_router(
                id,
                spec.order_number,
                format!("sequence number {} appears more than once", pair[0].sequence_number),
            ));
        }

        let current = match spec.start {
            Some(RouterPosition::At(sequence)) => {
                if steps.binary_search_by_key(&sequence, |step| step.sequence_number).is_err() {
                    return Err(SimulationError::malformed_router(
                        id,
                        spec.order_number,
                        format!("start sequence {} is not a step", sequence),
                    ));
                }
                RouterPosition::At(sequence)
            }
            Some(RouterPosition::Done) => RouterPosition::Done,
            None => steps
                .first()
                .map(|step| RouterPosition::At(step.sequence_number))
                .unwrap_or(RouterPosition::Done),
        };

        Ok(Self {
            id,
            order_number: spec.order_number,
            item_number: spec.item_number,
            due_date: spec.due_date,
            steps,
            current,
            completion_reported: false,
        })
    }

    /// Current cursor position
    pub fn current_sequence(&self) -> RouterPosition {
        self.current
    }

    /// Smallest sequence number after the current one, or `Done`
    pub fn next_sequence(&self) -> RouterPosition {
        match self.current {
            RouterPosition::Done => RouterPosition::Done,
            RouterPosition::At(current) => {
                let next = self.steps.partition_point(|step| step.sequence_number <= current);
                self.steps
                    .get(next)
                    .map(|step| RouterPosition::At(step.sequence_number))
                    .unwrap_or(RouterPosition::Done)
            }
        }
    }

    /// Operation at the current position; `None` once terminal
    ///
    /// A non-terminal position that is not one of the steps is a
    /// data-integrity failure and is reported as a malformed router.
    pub fn current_operation(&self) -> SimulationResult<Option<OperationId>> {
        match self.current {
            RouterPosition::Done => Ok(None),
            RouterPosition::At(sequence) => self
                .steps
                .binary_search_by_key(&sequence, |step| step.sequence_number)
                .map(|index| Some(self.steps[index].operation))
                .map_err(|_| {
                    SimulationError::malformed_router(
                        self.id,
                        self.order_number,
                        format!("current sequence {} is not a step", sequence),
                    )
                }),
        }
    }

    /// Move to the next step
    ///
    /// Reaching the terminal position yields [`RouterTransition::Completed`]
    /// exactly once; later calls yield [`RouterTransition::Unchanged`].
    pub fn advance(&mut self) -> SimulationResult<RouterTransition> {
        self.current = self.next_sequence();

        match self.current_operation()? {
            Some(operation) => Ok(RouterTransition::Enqueue(operation)),
            None if self.take_completion() => Ok(RouterTransition::Completed),
            None => Ok(RouterTransition::Unchanged),
        }
    }

    /// Claim the one-time completion report of a terminal router
    ///
    /// Returns `true` the first time it is called on a terminal router.
    pub fn take_completion(&mut self) -> bool {
        if self.current.is_done() && !self.completion_reported {
            self.completion_reported = true;
            true
        } else {
            false
        }
    }

    /// Whether the router is past its last step
    pub fn is_complete(&self) -> bool {
        self.current.is_done()
    }

    /// Whether the router's completion has been reported
    pub fn completion_reported(&self) -> bool {
        self.completion_reported
    }

    /// Steps sorted by sequence number
    pub fn steps(&self) -> &[RouterStep] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the router has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

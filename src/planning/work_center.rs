//! Work center admission control
//!
//! A work center is a pool of identical slots. Operations wait in a priority
//! queue ordered by the center's [`Prioritizer`] and are admitted one per free
//! slot. The work center never touches the clock: it hands back the operation
//! to start and its owner schedules the completion.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::planning::{Operation, PrioritizedItem, Prioritizer, PriorityQueue};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{OperationId, WorkCenterConfig, WorkCenterId};

/// Running totals for one work center
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkCenterCounters {
    /// Operations admitted to a slot
    pub operations_started: usize,
    /// Operations that released their slot
    pub operations_completed: usize,
    /// Wall-clock hours of slot occupancy, summed over slots
    pub busy_hours: f64,
    /// Longest the waiting queue has been
    pub peak_queue_length: usize,
}

/// A capacity-bounded resource pool
#[derive(Debug, Clone)]
pub struct WorkCenter {
    /// Handle of this work center
    pub id: WorkCenterId,
    /// Unique name
    pub name: String,
    /// Local processing hours worked per wall-clock hour
    pub time_ratio: f64,
    prioritizer: Prioritizer,
    num_slots: usize,
    available_slots: usize,
    queue: PriorityQueue<OperationId>,
    counters: WorkCenterCounters,
}

impl WorkCenter {
    /// Create an idle work center with every slot free
    pub fn new(
        id: WorkCenterId,
        name: impl Into<String>,
        num_slots: usize,
        time_ratio: f64,
        prioritizer: Prioritizer,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            time_ratio,
            prioritizer,
            num_slots,
            available_slots: num_slots,
            queue: PriorityQueue::new(),
            counters: WorkCenterCounters::default(),
        }
    }

    /// Create a work center from its configuration
    pub fn from_config(id: WorkCenterId, config: &WorkCenterConfig) -> Self {
        Self::new(
            id,
            config.name.clone(),
            config.capacity,
            config.time_ratio,
            Prioritizer::from_kind(config.prioritizer),
        )
    }

    /// Queue an operation, then try to admit the best waiting one
    ///
    /// Returns the operation that took a slot, if any. It is not necessarily
    /// the one just queued.
    pub fn enqueue(&mut self, operation: &Operation) -> SimulationResult<Option<OperationId>> {
        let mut entry = PrioritizedItem::new(0.0, operation.id);
        self.prioritizer.prioritize(&mut entry, operation)?;

        trace!(
            work_center = %self.id,
            operation = %operation.id,
            priority = entry.priority,
            "Operation waiting for a slot"
        );

        self.queue.push(entry);
        let admitted = self.work_next();
        self.counters.peak_queue_length = self.counters.peak_queue_length.max(self.queue.len());

        Ok(admitted)
    }

    /// Admit the best waiting operation if a slot is free
    ///
    /// Returns `None` without side effects when no slot is free or nothing is
    /// waiting.
    pub fn work_next(&mut self) -> Option<OperationId> {
        if self.available_slots == 0 {
            return None;
        }
        let operation = self.dequeue()?;
        self.available_slots -= 1;
        Some(operation)
    }

    /// Claim a free slot for an operation started from outside the queue
    pub fn take_slot(&mut self, operation: OperationId) -> SimulationResult<()> {
        if self.available_slots == 0 {
            return Err(SimulationError::NoFreeSlot { work_center: self.id, operation });
        }
        self.available_slots -= 1;
        Ok(())
    }

    /// Release a slot, then try to admit the best waiting operation
    pub fn free_slot(&mut self) -> SimulationResult<Option<OperationId>> {
        if self.available_slots >= self.num_slots {
            return Err(SimulationError::CapacityOverflow {
                work_center: self.id,
                capacity: self.num_slots,
            });
        }
        self.available_slots += 1;
        self.counters.operations_completed += 1;
        Ok(self.work_next())
    }

    /// Remove the best waiting operation without taking a slot
    pub fn dequeue(&mut self) -> Option<OperationId> {
        self.queue.pop().map(|entry| entry.item)
    }

    /// Account for an admitted operation occupying a slot for `wall_clock_hours`
    pub fn record_start(&mut self, wall_clock_hours: f64) {
        self.counters.operations_started += 1;
        self.counters.busy_hours += wall_clock_hours;
    }

    /// Whether an operation is waiting here
    pub fn is_queued(&self, operation: OperationId) -> bool {
        self.queue.contains(&operation)
    }

    /// Number of waiting operations
    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    /// Total slot count
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Free slot count
    pub fn available_slots(&self) -> usize {
        self.available_slots
    }

    /// Slots currently working an operation
    pub fn busy_slots(&self) -> usize {
        self.num_slots - self.available_slots
    }

    /// Queue-ordering policy and its state
    pub fn prioritizer(&self) -> &Prioritizer {
        &self.prioritizer
    }

    /// Running totals
    pub fn counters(&self) -> &WorkCenterCounters {
        &self.counters
    }

    /// Whether nothing is waiting and every slot is free
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.available_slots == self.num_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrioritizerKind, RouterId};

    fn operation(id: u32, hours: f64) -> Operation {
        Operation {
            id: OperationId(id),
            router: RouterId(id),
            work_center: WorkCenterId(0),
            sequence_number: 10,
            hours,
            due_date: None,
        }
    }

    fn work_center(slots: usize, prioritizer: Prioritizer) -> WorkCenter {
        WorkCenter::new(WorkCenterId(0), "machining", slots, 1.0, prioritizer)
    }

    #[test]
    fn test_enqueue_admits_when_slot_free() {
        let mut wc = work_center(1, Prioritizer::fifo());
        assert_eq!(wc.enqueue(&operation(0, 5.0)).unwrap(), Some(OperationId(0)));
        assert_eq!(wc.available_slots(), 0);
        assert_eq!(wc.queue_length(), 0);

        // No slot left: the second one waits
        assert_eq!(wc.enqueue(&operation(1, 3.0)).unwrap(), None);
        assert!(wc.is_queued(OperationId(1)));
        assert_eq!(wc.available_slots(), 0);
    }

    #[test]
    fn test_free_slot_admits_next_waiting() {
        let mut wc = work_center(1, Prioritizer::fifo());
        wc.enqueue(&operation(0, 5.0)).unwrap();
        wc.enqueue(&operation(1, 3.0)).unwrap();

        assert_eq!(wc.free_slot().unwrap(), Some(OperationId(1)));
        assert_eq!(wc.available_slots(), 0);
        assert!(!wc.is_queued(OperationId(1)));

        assert_eq!(wc.free_slot().unwrap(), None);
        assert_eq!(wc.available_slots(), 1);
        assert!(wc.is_idle());
    }

    #[test]
    fn test_free_slot_beyond_capacity_overflows() {
        let mut wc = work_center(2, Prioritizer::fifo());
        let err = wc.free_slot().unwrap_err();
        assert!(matches!(err, SimulationError::CapacityOverflow { capacity: 2, .. }));
        assert_eq!(wc.available_slots(), 2);
    }

    #[test]
    fn test_work_next_on_empty_queue_is_noop() {
        let mut wc = work_center(3, Prioritizer::fifo());
        assert_eq!(wc.work_next(), None);
        assert_eq!(wc.available_slots(), 3);
        assert_eq!(wc.dequeue(), None);
    }

    #[test]
    fn test_fifo_tie_order() {
        let mut wc = work_center(1, Prioritizer::fifo());
        wc.enqueue(&operation(9, 1.0)).unwrap();
        wc.enqueue(&operation(1, 1.0)).unwrap();
        wc.enqueue(&operation(2, 1.0)).unwrap();

        assert_eq!(wc.free_slot().unwrap(), Some(OperationId(1)));
        assert_eq!(wc.free_slot().unwrap(), Some(OperationId(2)));
    }

    #[test]
    fn test_shortest_processing_time_reorders_queue() {
        let mut wc = work_center(1, Prioritizer::ShortestProcessingTime);
        wc.enqueue(&operation(0, 1.0)).unwrap();
        wc.enqueue(&operation(1, 6.0)).unwrap();
        wc.enqueue(&operation(2, 2.0)).unwrap();

        assert_eq!(wc.free_slot().unwrap(), Some(OperationId(2)));
        assert_eq!(wc.free_slot().unwrap(), Some(OperationId(1)));
    }

    #[test]
    fn test_edd_without_due_date_is_rejected_and_not_queued() {
        let mut wc = work_center(1, Prioritizer::EarliestDueDate);
        assert!(wc.enqueue(&operation(0, 1.0)).is_err());
        assert_eq!(wc.queue_length(), 0);
        assert_eq!(wc.available_slots(), 1);
    }

    #[test]
    fn test_counters() {
        let mut wc = work_center(1, Prioritizer::fifo());
        wc.enqueue(&operation(0, 2.0)).unwrap();
        wc.record_start(2.0);
        wc.enqueue(&operation(1, 1.0)).unwrap();
        wc.enqueue(&operation(2, 1.0)).unwrap();
        wc.free_slot().unwrap();

        let counters = wc.counters();
        assert_eq!(counters.operations_started, 1);
        assert_eq!(counters.operations_completed, 1);
        assert_eq!(counters.busy_hours, 2.0);
        assert_eq!(counters.peak_queue_length, 2);
    }

    #[test]
    fn test_take_slot() {
        let mut wc = work_center(2, Prioritizer::fifo());
        wc.take_slot(OperationId(0)).unwrap();
        wc.take_slot(OperationId(1)).unwrap();
        assert_eq!(wc.available_slots(), 0);

        let err = wc.take_slot(OperationId(2)).unwrap_err();
        assert!(matches!(err, SimulationError::NoFreeSlot { operation: OperationId(2), .. }));
        assert_eq!(wc.available_slots(), 0);

        // A taken slot is released like any other
        assert_eq!(wc.free_slot().unwrap(), None);
        assert_eq!(wc.available_slots(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = WorkCenterConfig::new("turning")
            .with_capacity(4)
            .with_time_ratio(2.0)
            .with_prioritizer(PrioritizerKind::ShortestProcessingTime);
        let wc = WorkCenter::from_config(WorkCenterId(7), &config);
        assert_eq!(wc.name, "turning");
        assert_eq!(wc.num_slots(), 4);
        assert_eq!(wc.available_slots(), 4);
        assert_eq!(wc.busy_slots(), 0);
        assert_eq!(wc.time_ratio, 2.0);
        assert_eq!(wc.prioritizer().kind(), PrioritizerKind::ShortestProcessingTime);
    }
}

//! Global scheduler
//!
//! The [`Factory`] owns every operation, router and work center of a shop in
//! flat arenas and keeps the simulation clock. Its event queue holds the
//! operations currently occupying a slot, keyed by absolute completion time;
//! popping the earliest one is the only way time moves forward.
//!
//! All work for one instant happens inside a single [`Factory::complete_next`]
//! call: the completed operation's router advances (possibly queueing its next
//! operation somewhere), then the freed slot admits the next waiting operation
//! at the same elapsed time.

use crate::events::{EventLog, EventSink, EventSubject};
use crate::planning::{
    Operation, OperationSpec, PrioritizedItem, Prioritizer, PriorityQueue, Router, RouterSpec,
    RouterStep, RouterTransition, WorkCenter,
};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{EventKind, OperationId, RouterId, WorkCenterConfig, WorkCenterId};
use crate::sim_event;

/// When a router entered and left the shop, in elapsed hours
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouterTimes {
    /// First release
    pub released_at: Option<f64>,
    /// Completion report
    pub completed_at: Option<f64>,
}

impl RouterTimes {
    /// Hours between release and completion, once both happened
    pub fn flow_time(&self) -> Option<f64> {
        Some(self.completed_at? - self.released_at?)
    }
}

/// A shop floor and its clock
#[derive(Debug)]
pub struct Factory<S: EventSink = EventLog> {
    operations: Vec<Operation>,
    routers: Vec<Router>,
    router_times: Vec<RouterTimes>,
    work_centers: Vec<WorkCenter>,
    event_queue: PriorityQueue<OperationId>,
    elapsed_hours: f64,
    operations_completed: usize,
    sink: S,
}

impl Factory<EventLog> {
    /// Create an empty factory logging into an in-memory [`EventLog`]
    pub fn new() -> Self {
        Self::with_sink(EventLog::new())
    }
}

impl Default for Factory<EventLog> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> Factory<S> {
    /// Create an empty factory reporting to `sink`
    pub fn with_sink(sink: S) -> Self {
        Self {
            operations: Vec::new(),
            routers: Vec::new(),
            router_times: Vec::new(),
            work_centers: Vec::new(),
            event_queue: PriorityQueue::new(),
            elapsed_hours: 0.0,
            operations_completed: 0,
            sink,
        }
    }

    /// Add a work center with every slot free
    pub fn add_work_center(
        &mut self,
        name: impl Into<String>,
        num_slots: usize,
        time_ratio: f64,
        prioritizer: Prioritizer,
    ) -> SimulationResult<WorkCenterId> {
        let id = WorkCenterId::from_index(self.work_centers.len());
        self.push_work_center(WorkCenter::new(id, name, num_slots, time_ratio, prioritizer))
    }

    /// Add a work center from its configuration
    pub fn add_work_center_from_config(&mut self, config: &WorkCenterConfig) -> SimulationResult<WorkCenterId> {
        let id = WorkCenterId::from_index(self.work_centers.len());
        self.push_work_center(WorkCenter::from_config(id, config))
    }

    fn push_work_center(&mut self, work_center: WorkCenter) -> SimulationResult<WorkCenterId> {
        let (id, name) = (work_center.id, &work_center.name);
        if work_center.num_slots() == 0 {
            return Err(SimulationError::configuration_error(format!(
                "work center {} needs at least one slot",
                name
            )));
        }
        if !work_center.time_ratio.is_finite() || work_center.time_ratio <= 0.0 {
            return Err(SimulationError::configuration_error(format!(
                "work center {} has invalid time ratio {}",
                name, work_center.time_ratio
            )));
        }
        if self.work_center_by_name(name).is_some() {
            return Err(SimulationError::configuration_error(format!(
                "work center {} already exists",
                name
            )));
        }

        sim_event!(
            debug,
            "Work center added",
            work_center = %id,
            name = %name,
            slots = work_center.num_slots(),
            time_ratio = work_center.time_ratio,
            prioritizer = %work_center.prioritizer().kind()
        );
        self.work_centers.push(work_center);
        Ok(id)
    }

    /// Add a router and its operations
    ///
    /// Every operation inherits the router's due date. Nothing is added when
    /// the router is malformed or refers to an unknown work center.
    pub fn add_router(&mut self, spec: RouterSpec, operations: Vec<OperationSpec>) -> SimulationResult<RouterId> {
        let router_id = RouterId::from_index(self.routers.len());
        let first_operation = self.operations.len();

        for op in &operations {
            if op.work_center.index() >= self.work_centers.len() {
                return Err(SimulationError::unknown_entity(op.work_center));
            }
            if !op.hours.is_finite() || op.hours < 0.0 {
                return Err(SimulationError::malformed_router(
                    router_id,
                    spec.order_number,
                    format!("sequence {} has invalid hours {}", op.sequence_number, op.hours),
                ));
            }
        }

        let steps = operations
            .iter()
            .enumerate()
            .map(|(i, op)| RouterStep {
                sequence_number: op.sequence_number,
                operation: OperationId::from_index(first_operation + i),
            })
            .collect();
        let router = Router::new(router_id, &spec, steps)?;

        self.operations.extend(operations.into_iter().enumerate().map(|(i, op)| Operation {
            id: OperationId::from_index(first_operation + i),
            router: router_id,
            work_center: op.work_center,
            sequence_number: op.sequence_number,
            hours: op.hours,
            due_date: spec.due_date,
        }));

        sim_event!(
            debug,
            "Router added",
            router = %router_id,
            order_number = spec.order_number,
            steps = router.len(),
            start = %router.current_sequence()
        );
        self.routers.push(router);
        self.router_times.push(RouterTimes::default());
        Ok(router_id)
    }

    /// Put a router's current operation into its work center
    ///
    /// The operation goes straight into the work center's queue without a
    /// queued event. A router that is already terminal reports its
    /// completion instead. Releasing a router a second time does nothing.
    pub fn release_router(&mut self, router_id: RouterId) -> SimulationResult<()> {
        let router = self
            .routers
            .get_mut(router_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(router_id))?;

        let times = &mut self.router_times[router_id.index()];
        if times.released_at.is_some() {
            sim_event!(trace, "Router already released", router = %router_id);
            return Ok(());
        }
        times.released_at = Some(self.elapsed_hours);

        match router.current_operation()? {
            Some(operation) => {
                sim_event!(trace, "Router released", router = %router_id, operation = %operation);
                self.admit(operation)
            }
            None => {
                if router.take_completion() {
                    self.notify_router_complete(router_id);
                }
                Ok(())
            }
        }
    }

    /// Release every router in the order they were added
    pub fn release_all(&mut self) -> SimulationResult<()> {
        for index in 0..self.routers.len() {
            self.release_router(RouterId::from_index(index))?;
        }
        Ok(())
    }

    /// Start an operation now, bypassing its work center's queue
    ///
    /// The operation claims a slot at its work center and its completion is
    /// scheduled at `elapsed + wall-clock duration`. Its router counts as
    /// released from this point. Fails without touching any state when the
    /// operation is already waiting or in progress, or when no slot is free.
    pub fn add_work_in_progress(&mut self, operation_id: OperationId) -> SimulationResult<()> {
        if self.is_in_progress(operation_id) || self.is_waiting(operation_id) {
            return Err(SimulationError::AlreadyScheduled(operation_id));
        }
        let operation = self
            .operations
            .get(operation_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation_id))?;
        let router = operation.router;
        let current = self
            .routers
            .get(router.index())
            .ok_or_else(|| SimulationError::unknown_entity(router))?
            .current_operation()?;
        if current != Some(operation_id) {
            return Err(SimulationError::configuration_error(format!(
                "operation {} is not the current step of router {}",
                operation_id, router
            )));
        }
        self.work_centers
            .get_mut(operation.work_center.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation.work_center))?
            .take_slot(operation_id)?;

        if let Some(times) = self.router_times.get_mut(router.index()) {
            if times.released_at.is_none() {
                times.released_at = Some(self.elapsed_hours);
            }
        }
        self.start_work(operation_id)
    }

    /// Schedule the completion of an operation that already holds a slot
    ///
    /// The queue key is the absolute completion time, so nothing already
    /// scheduled needs re-pricing when time moves on.
    fn start_work(&mut self, operation_id: OperationId) -> SimulationResult<()> {
        let operation = self
            .operations
            .get(operation_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation_id))?;
        let work_center = self
            .work_centers
            .get_mut(operation.work_center.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation.work_center))?;

        let duration = operation.wall_clock_hours(work_center.time_ratio);
        work_center.record_start(duration);

        let completes_at = self.elapsed_hours + duration;
        self.event_queue.push(PrioritizedItem::new(completes_at, operation_id));

        sim_event!(
            debug,
            "Operation started",
            operation = %operation_id,
            work_center = %operation.work_center,
            elapsed = self.elapsed_hours,
            completes_at = completes_at
        );
        self.sink.log_event(
            self.elapsed_hours,
            EventKind::OperationStarted,
            EventSubject::operation(operation),
        );
        Ok(())
    }

    /// Complete the earliest scheduled operation
    ///
    /// Returns `Ok(false)` when nothing is in progress, which ends the run.
    /// Operations sharing a completion time are all popped before time moves
    /// again; their relative order is not part of the contract.
    pub fn complete_next(&mut self) -> SimulationResult<bool> {
        let entry = match self.event_queue.pop() {
            Some(entry) => entry,
            None => return Ok(false),
        };
        let operation_id = entry.item;
        self.elapsed_hours = self.elapsed_hours.max(entry.priority);
        self.operations_completed += 1;

        let operation = self
            .operations
            .get(operation_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation_id))?;
        let (router_id, work_center_id) = (operation.router, operation.work_center);

        sim_event!(debug, "Operation completed", operation = %operation_id, elapsed = self.elapsed_hours);
        self.sink.log_event(
            self.elapsed_hours,
            EventKind::OperationCompleted,
            EventSubject::operation(operation),
        );

        let router = self
            .routers
            .get_mut(router_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(router_id))?;
        match router.advance()? {
            RouterTransition::Enqueue(next) => self.enqueue_at_workcenter(next)?,
            RouterTransition::Completed => self.notify_router_complete(router_id),
            RouterTransition::Unchanged => {}
        }

        let admitted = self
            .work_centers
            .get_mut(work_center_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(work_center_id))?
            .free_slot()?;
        if let Some(next) = admitted {
            self.start_work(next)?;
        }

        Ok(true)
    }

    /// Log that an operation joined its work center's queue, then queue it
    pub fn enqueue_at_workcenter(&mut self, operation_id: OperationId) -> SimulationResult<()> {
        let operation = self
            .operations
            .get(operation_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation_id))?;

        sim_event!(debug, "Operation queued", operation = %operation_id, work_center = %operation.work_center);
        self.sink.log_event(
            self.elapsed_hours,
            EventKind::OperationQueued,
            EventSubject::operation(operation),
        );
        self.admit(operation_id)
    }

    /// Log that a router finished its last step
    pub fn notify_router_complete(&mut self, router_id: RouterId) {
        let Some(router) = self.routers.get(router_id.index()) else {
            return;
        };
        if let Some(times) = self.router_times.get_mut(router_id.index()) {
            times.completed_at = Some(self.elapsed_hours);
        }

        sim_event!(debug, "Router completed", router = %router_id, order_number = router.order_number, elapsed = self.elapsed_hours);
        self.sink.log_event(
            self.elapsed_hours,
            EventKind::RouterCompleted,
            EventSubject::router(router),
        );
    }

    /// Call [`Factory::complete_next`] until nothing is in progress
    ///
    /// Returns the number of completions processed.
    pub fn run_to_completion(&mut self) -> SimulationResult<usize> {
        let mut completions = 0;
        while self.complete_next()? {
            completions += 1;
        }
        Ok(completions)
    }

    /// Queue an operation at its work center and start whatever gets admitted
    fn admit(&mut self, operation_id: OperationId) -> SimulationResult<()> {
        let operation = self
            .operations
            .get(operation_id.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation_id))?;
        let admitted = self
            .work_centers
            .get_mut(operation.work_center.index())
            .ok_or_else(|| SimulationError::unknown_entity(operation.work_center))?
            .enqueue(operation)?;

        if let Some(next) = admitted {
            self.start_work(next)?;
        }
        Ok(())
    }

    /// Current simulation time in wall-clock hours
    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_hours
    }

    /// Completion time of the next scheduled operation
    pub fn next_completion(&self) -> Option<f64> {
        self.event_queue.peek_priority()
    }

    /// Number of operations occupying a slot
    pub fn work_in_progress(&self) -> usize {
        self.event_queue.len()
    }

    /// Whether an operation occupies a slot
    pub fn is_in_progress(&self, operation: OperationId) -> bool {
        self.event_queue.contains(&operation)
    }

    /// Whether an operation is waiting in its work center's queue
    pub fn is_waiting(&self, operation: OperationId) -> bool {
        self.operations
            .get(operation.index())
            .and_then(|op| self.work_centers.get(op.work_center.index()))
            .map_or(false, |wc| wc.is_queued(operation))
    }

    /// Total completions so far
    pub fn operations_completed(&self) -> usize {
        self.operations_completed
    }

    /// Look up an operation
    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        self.operations.get(id.index())
    }

    /// Look up a router
    pub fn router(&self, id: RouterId) -> Option<&Router> {
        self.routers.get(id.index())
    }

    /// Release and completion times of a router
    pub fn router_times(&self, id: RouterId) -> Option<RouterTimes> {
        self.router_times.get(id.index()).copied()
    }

    /// Look up a work center
    pub fn work_center(&self, id: WorkCenterId) -> Option<&WorkCenter> {
        self.work_centers.get(id.index())
    }

    /// Look up a work center by name
    pub fn work_center_by_name(&self, name: &str) -> Option<&WorkCenter> {
        self.work_centers.iter().find(|wc| wc.name == name)
    }

    /// All operations
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// All routers
    pub fn routers(&self) -> &[Router] {
        &self.routers
    }

    /// All work centers
    pub fn work_centers(&self) -> &[WorkCenter] {
        &self.work_centers
    }

    /// The event sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the factory and hand back its event sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

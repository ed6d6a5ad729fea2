//! Statistics collection and reporting
//!
//! Run statistics are computed once from a finished factory. Times are
//! elapsed wall-clock hours; due dates are compared against the plan start
//! plus those hours.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::events::EventSink;
use crate::simulation::Factory;

/// Per-work-center totals of one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkCenterStatistics {
    /// Work center name
    pub name: String,
    /// Slot count
    pub capacity: usize,
    /// Operations admitted to a slot
    pub operations_started: usize,
    /// Operations that released their slot
    pub operations_completed: usize,
    /// Slot-hours spent working
    pub busy_hours: f64,
    /// Busy slot-hours over available slot-hours across the makespan
    pub utilization: f64,
    /// Longest waiting queue
    pub peak_queue_length: usize,
}

/// Summary of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Elapsed hours at the last completion
    pub makespan_hours: f64,
    /// Number of routers in the shop
    pub total_routers: usize,
    /// Routers that reported completion
    pub routers_completed: usize,
    /// Number of operations in the shop
    pub total_operations: usize,
    /// Operations that completed
    pub operations_completed: usize,
    /// Mean hours from release to completion over completed routers
    pub average_flow_time_hours: f64,
    /// Order numbers that completed after their due date
    pub late_orders: Vec<u64>,
    /// Completed routers that carried a due date
    pub orders_with_due_date: usize,
    /// Per-work-center totals, in the order the work centers were added
    pub work_centers: Vec<WorkCenterStatistics>,
    /// Host time spent running
    pub simulation_duration: Duration,
}

impl SimulationStatistics {
    /// Compute statistics from a factory, anchoring elapsed hour zero at `plan_start`
    pub fn from_factory<S: EventSink>(factory: &Factory<S>, plan_start: DateTime<Utc>) -> Self {
        let makespan_hours = factory.elapsed_hours();

        let mut routers_completed = 0;
        let mut flow_time_total = 0.0;
        let mut late_orders = Vec::new();
        let mut orders_with_due_date = 0;

        for router in factory.routers() {
            let Some(times) = factory.router_times(router.id) else {
                continue;
            };
            let Some(completed_at) = times.completed_at else {
                continue;
            };
            routers_completed += 1;
            flow_time_total += times.flow_time().unwrap_or(0.0);

            if let Some(due_date) = router.due_date {
                orders_with_due_date += 1;
                if instant_at(plan_start, completed_at) > due_date {
                    late_orders.push(router.order_number);
                }
            }
        }

        let average_flow_time_hours = if routers_completed == 0 {
            0.0
        } else {
            flow_time_total / routers_completed as f64
        };

        let work_centers = factory
            .work_centers()
            .iter()
            .map(|wc| {
                let counters = wc.counters();
                let available = wc.num_slots() as f64 * makespan_hours;
                WorkCenterStatistics {
                    name: wc.name.clone(),
                    capacity: wc.num_slots(),
                    operations_started: counters.operations_started,
                    operations_completed: counters.operations_completed,
                    busy_hours: counters.busy_hours,
                    utilization: if available > 0.0 { counters.busy_hours / available } else { 0.0 },
                    peak_queue_length: counters.peak_queue_length,
                }
            })
            .collect();

        Self {
            makespan_hours,
            total_routers: factory.routers().len(),
            routers_completed,
            total_operations: factory.operations().len(),
            operations_completed: factory.operations_completed(),
            average_flow_time_hours,
            late_orders,
            orders_with_due_date,
            work_centers,
            simulation_duration: Duration::from_secs(0),
        }
    }

    /// Set the host time spent running
    pub fn set_simulation_duration(&mut self, duration: Duration) {
        self.simulation_duration = duration;
    }

    /// Share of routers that completed, as a percentage
    pub fn completion_percentage(&self) -> f64 {
        if self.total_routers == 0 {
            0.0
        } else {
            (self.routers_completed as f64 / self.total_routers as f64) * 100.0
        }
    }

    /// Share of due-dated orders that were late, as a percentage
    pub fn late_percentage(&self) -> f64 {
        if self.orders_with_due_date == 0 {
            0.0
        } else {
            (self.late_orders.len() as f64 / self.orders_with_due_date as f64) * 100.0
        }
    }

    /// The work center with the highest utilization
    pub fn bottleneck(&self) -> Option<&WorkCenterStatistics> {
        self.work_centers
            .iter()
            .max_by(|a, b| a.utilization.total_cmp(&b.utilization))
    }

    /// Look up one work center's statistics by name
    pub fn work_center(&self, name: &str) -> Option<&WorkCenterStatistics> {
        self.work_centers.iter().find(|wc| wc.name == name)
    }

    /// A compact one-line summary suitable for logging
    pub fn compact_summary(&self) -> String {
        format!(
            "Simulation: makespan {:.2}h, {}/{} routers completed, {} operations, {} late",
            self.makespan_hours,
            self.routers_completed,
            self.total_routers,
            self.operations_completed,
            self.late_orders.len()
        )
    }

    /// Multi-line report for the terminal
    pub fn generate_summary_report(&self) -> String {
        let mut report = String::new();

        report.push_str("Shop Simulation Complete\n");
        report.push_str("========================\n\n");

        report.push_str(&format!("Makespan: {:.2} hours\n", self.makespan_hours));
        report.push_str(&format!(
            "Routers Completed: {} of {} ({:.1}%)\n",
            self.routers_completed,
            self.total_routers,
            self.completion_percentage()
        ));
        report.push_str(&format!(
            "Operations Completed: {} of {}\n",
            self.operations_completed, self.total_operations
        ));
        report.push_str(&format!("Average Flow Time: {:.2} hours\n", self.average_flow_time_hours));
        if self.orders_with_due_date > 0 {
            report.push_str(&format!(
                "Late Orders: {} of {} ({:.1}%)\n",
                self.late_orders.len(),
                self.orders_with_due_date,
                self.late_percentage()
            ));
        }
        if self.simulation_duration > Duration::ZERO {
            report.push_str(&format!("Runtime: {:.3} seconds\n", self.simulation_duration.as_secs_f64()));
        }

        report.push_str("\nWork Centers:\n");
        for wc in &self.work_centers {
            report.push_str(&format!(
                "  {:<20} slots {:>7}  ops {:>4}  busy {:>8.2}h  util {:>5.1}%  peak queue {}\n",
                wc.name,
                wc.capacity,
                wc.operations_completed,
                wc.busy_hours,
                wc.utilization * 100.0,
                wc.peak_queue_length
            ));
        }

        if let Some(bottleneck) = self.bottleneck().filter(|wc| wc.utilization > 0.0) {
            report.push_str(&format!("\nBottleneck: {}\n", bottleneck.name));
        }

        report
    }
}

impl fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generate_summary_report())
    }
}

/// Calendar instant `hours` after `start`, to the millisecond
fn instant_at(start: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    start + ChronoDuration::milliseconds((hours * 3_600_000.0).round() as i64)
}

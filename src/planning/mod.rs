//! Planning objects of the shop
//!
//! This module contains the entities a shop is made of and the policies that
//! order work at each work center.
//!
//! # Overview
//!
//! - **Operation**: one step of a router, bound to a work center and a duration
//! - **Router**: an order's route, with a cursor on its current step
//! - **WorkCenter**: a pool of slots with a waiting queue
//! - **Prioritizer**: the queue-ordering policy of a work center
//! - **PriorityQueue**: min-priority queue shared by work centers and the factory clock
//! - **ShopGenerator**: random orders for load testing a shop
//!
//! # Usage Example
//!
//! ```rust
//! use shop_forecasting::planning::*;
//! use shop_forecasting::types::*;
//!
//! let mut work_center = WorkCenter::new(WorkCenterId(0), "saw", 1, 1.0, Prioritizer::fifo());
//! let operation = Operation {
//!     id: OperationId(0),
//!     router: RouterId(0),
//!     work_center: WorkCenterId(0),
//!     sequence_number: 10,
//!     hours: 2.0,
//!     due_date: None,
//! };
//!
//! // A free slot admits the operation straight away
//! assert_eq!(work_center.enqueue(&operation).unwrap(), Some(OperationId(0)));
//! assert_eq!(work_center.available_slots(), 0);
//! ```

pub mod generator;
pub mod operation;
pub mod prioritizer;
pub mod priority_queue;
pub mod router;
pub mod work_center;

// Re-export all public types for convenience
pub use generator::*;
pub use operation::*;
pub use prioritizer::*;
pub use priority_queue::*;
pub use router::*;
pub use work_center::*;

//! Simulation orchestration and control
//!
//! This module contains the global scheduler, the orchestrator that builds
//! and drives it, statistics collection, error handling and logging setup.
//!
//! # Overview
//!
//! - **Factory**: owns the shop's arenas and the clock; `complete_next` is the only time step
//! - **SimulationOrchestrator**: builds a factory from configuration and runs it to completion
//! - **SimulationStatistics**: makespan, flow time, lateness and utilization of a finished run
//! - **SimulationError**: structural failures that abort a run
//! - **LoggingConfig**: tracing subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use shop_forecasting::planning::*;
//! use shop_forecasting::simulation::*;
//!
//! let mut factory = Factory::new();
//! let saw = factory.add_work_center("saw", 1, 1.0, Prioritizer::fifo()).unwrap();
//! let router = factory
//!     .add_router(RouterSpec::new(1000), vec![OperationSpec::new(10, saw, 2.5)])
//!     .unwrap();
//!
//! factory.release_router(router).unwrap();
//! while factory.complete_next().unwrap() {}
//!
//! assert_eq!(factory.elapsed_hours(), 2.5);
//! assert_eq!(factory.sink().len(), 3);
//! ```

pub mod error;
pub mod factory;
pub mod logging;
pub mod orchestrator;
pub mod statistics;

// Re-export all public types for convenience
pub use error::*;
pub use factory::*;
pub use logging::*;
pub use orchestrator::*;
pub use statistics::*;

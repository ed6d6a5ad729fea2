//! Shop Forecasting
//!
//! A discrete-event simulation of orders flowing through a job shop, used to
//! forecast when work will finish.
//!
//! # Overview
//!
//! Each order is a router: an ordered list of operations, each performed at
//! one work center for a number of hours. Work centers have a fixed number of
//! slots and a queue ordered by a prioritizer. The simulation jumps from one
//! operation completion to the next; nothing happens between completions.
//!
//! ## Key Features
//!
//! - **Arena-owned shop**: operations, routers and work centers live in the
//!   factory and refer to each other by copyable handles
//! - **Queue policies**: first-in-first-out, shortest processing time and
//!   earliest due date
//! - **Time ratios**: a work center can work more (or fewer) local hours than
//!   wall-clock hours
//! - **Event log**: every start, completion, queue entry and router completion,
//!   written as JSON lines or CSV
//! - **Statistics**: makespan, flow time, lateness and utilization
//!
//! ## Quick Start
//!
//! ```rust
//! use shop_forecasting::*;
//!
//! // The default configuration is a small demo shop
//! let mut orchestrator = SimulationOrchestrator::new(ShopConfig::default())?;
//! let stats = orchestrator.run()?;
//!
//! assert_eq!(stats.routers_completed, 3);
//! println!("All orders done after {:.1} hours", stats.makespan_hours);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`planning`]: Operations, routers, work centers and queue policies
//! - [`events`]: Event sink contract and the in-memory event log
//! - [`simulation`]: Factory, orchestration, statistics, errors and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │  Planning   │    │   Events    │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Router      │◄───┤ EventSink   │
//! │ Enums       │    │ WorkCenter  │    │ EventLog    │
//! │ Config      │    │ Prioritizer │    │ Writers     │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   ▲
//!        │                   │                   │
//!        └───────────┬───────┴───────────────────┘
//!                    │
//!             ┌─────────────┐
//!             │ Simulation  │
//!             │             │
//!             │ Factory     │
//!             │ Orchestrator│
//!             │ Statistics  │
//!             └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod events;
pub mod planning;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    ConfigValidationError,
    EventKind,
    OperationId,
    OutputFormat,
    PrioritizerKind,
    RouterId,
    RunId,
    // Configuration
    ShopConfig,
    WorkCenterId,
};

// Planning objects
pub use planning::{
    Operation, OperationSpec, Prioritizer, PriorityQueue, Router, RouterPosition, RouterSpec,
    ShopGenerator, WorkCenter,
};

// Event log
pub use events::{EventLog, EventSink, EventSubject, LogEntry};

// Simulation types and functionality
pub use simulation::{
    Factory, LoggingConfig, SimulationError, SimulationOrchestrator, SimulationResult,
    SimulationStatistics,
};

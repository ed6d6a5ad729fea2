//! Core types and identifiers for the shop simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: arena handles for operations, routers and work centers, plus a run ID
//! - **Enums**: event kinds, prioritizer kinds and output formats
//! - **Configuration**: shop setup input with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use shop_forecasting::types::*;
//!
//! let config = ShopConfig::with_work_centers(vec![
//!     WorkCenterConfig::new("saw").with_capacity(2),
//!     WorkCenterConfig::new("weld").with_prioritizer(PrioritizerKind::ShortestProcessingTime),
//! ]);
//! assert!(config.validate().is_ok());
//!
//! assert_eq!(OperationId(4).to_string(), "OP_4");
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;

//! Configuration structures for the shop simulator
//!
//! This module contains the setup input (work centers and orders), the run
//! options, the command line arguments and the validation logic that turns a
//! loosely-typed configuration file into something the factory can be built from.

use super::{OutputFormat, PrioritizerKind};
use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Name of the default work centers in the demo shop
pub mod demo_shop {
    /// Raw material staging
    pub const INVENTORY: &str = "inventory";
    /// Milling
    pub const MACHINING: &str = "machining";
    /// Lathe work
    pub const TURNING: &str = "turning";
    /// Subcontracted processing; effectively unlimited capacity
    pub const OUTSIDE_PROCESSING: &str = "outside_processing";
    /// Packing and shipping
    pub const SHIPPING: &str = "shipping";
    /// Slot count of the outside processing work center
    pub const OUTSIDE_PROCESSING_SLOTS: usize = 1_000_000;
}

/// One resource pool in the shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkCenterConfig {
    /// Unique work center name; operations refer to it
    pub name: String,
    /// Number of operations that can be worked concurrently
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Local processing hours worked per wall-clock hour
    #[serde(default = "default_time_ratio")]
    pub time_ratio: f64,
    /// Queue-ordering policy
    #[serde(default)]
    pub prioritizer: PrioritizerKind,
}

impl WorkCenterConfig {
    /// Create a work center configuration with a single slot, ratio 1 and FIFO ordering
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: default_capacity(),
            time_ratio: default_time_ratio(),
            prioritizer: PrioritizerKind::default(),
        }
    }

    /// Set the slot count
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the time ratio
    pub fn with_time_ratio(mut self, time_ratio: f64) -> Self {
        self.time_ratio = time_ratio;
        self
    }

    /// Set the queue-ordering policy
    pub fn with_prioritizer(mut self, prioritizer: PrioritizerKind) -> Self {
        self.prioritizer = prioritizer;
        self
    }
}

fn default_capacity() -> usize {
    1
}

fn default_time_ratio() -> f64 {
    1.0
}

/// One step of an order's route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationConfig {
    /// Sequence number, unique within the order
    pub sequence: u32,
    /// Name of the work center that performs this step
    pub work_center: String,
    /// Processing time in the work center's local hours
    pub hours: f64,
}

impl OperationConfig {
    /// Create an operation configuration
    pub fn new(sequence: u32, work_center: impl Into<String>, hours: f64) -> Self {
        Self { sequence, work_center: work_center.into(), hours }
    }
}

/// One order and its route through the shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfig {
    /// Order number, unique within the shop
    pub order_number: u64,
    /// Item being produced
    #[serde(default)]
    pub item_number: u64,
    /// Sequence to start at; the first step when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_sequence: Option<u32>,
    /// Due date used by earliest-due-date work centers and lateness statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Route steps, in any order
    pub operations: Vec<OperationConfig>,
}

impl OrderConfig {
    /// Create an order with no steps
    pub fn new(order_number: u64) -> Self {
        Self {
            order_number,
            item_number: 0,
            start_sequence: None,
            due_date: None,
            operations: Vec::new(),
        }
    }

    /// Append a route step
    pub fn with_operation(mut self, sequence: u32, work_center: impl Into<String>, hours: f64) -> Self {
        self.operations.push(OperationConfig::new(sequence, work_center, hours));
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the starting sequence
    pub fn starting_at(mut self, sequence: u32) -> Self {
        self.start_sequence = Some(sequence);
        self
    }
}

/// Parameters for randomly generated orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// Number of orders to generate
    pub order_count: usize,
    /// Minimum route length
    pub min_operations: usize,
    /// Maximum route length
    pub max_operations: usize,
    /// Minimum local hours per step
    pub min_hours: f64,
    /// Maximum local hours per step
    pub max_hours: f64,
    /// Due dates fall within this many days after the plan start
    pub due_within_days: u32,
}

impl GeneratorConfig {
    /// Check that every sampled range is non-empty and finite
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_operations == 0 || self.min_operations > self.max_operations {
            return Err(ConfigValidationError::InvalidGenerator(format!(
                "operation range {}..={} is empty or starts at zero",
                self.min_operations, self.max_operations
            )));
        }
        if !self.min_hours.is_finite()
            || !self.max_hours.is_finite()
            || self.min_hours < 0.0
            || self.min_hours > self.max_hours
        {
            return Err(ConfigValidationError::InvalidGenerator(format!(
                "hour range {}..={} is invalid",
                self.min_hours, self.max_hours
            )));
        }
        if self.due_within_days == 0 {
            return Err(ConfigValidationError::InvalidGenerator(
                "due_within_days must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            order_count: 10,
            min_operations: 1,
            max_operations: 4,
            min_hours: 0.25,
            max_hours: 8.0,
            due_within_days: 14,
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shop-forecasting",
    version = "0.1.0",
    about = "Shop Forecasting - Simulates order flow through capacity-bounded work centers",
    long_about = "Runs a discrete-event simulation of orders moving through the operations of their routers. Each operation waits in its work center's queue for a free slot, time jumps from one completion to the next, and every start, completion and queue event is written to an event log.

EXAMPLES:
    # Run the built-in demo shop
    shop-forecasting

    # Use a configuration file
    shop-forecasting --config shop.json

    # Add 50 random orders with a fixed seed
    shop-forecasting --config shop.json --generate-orders 50 --seed 7

    # Write the event log as CSV
    shop-forecasting --output-format csv --event-log-output events.csv

    # Generate configuration template
    shop-forecasting --print-config > my-shop.json

    # Validate configuration without running
    shop-forecasting --config my-shop.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Output format for the event log
    #[arg(
        long,
        help = "Event log format (json or csv)",
        long_help = "Output format for the event log. Supported formats: json (one entry per line), csv. Default: json"
    )]
    pub output_format: Option<String>,

    /// Event log destination
    #[arg(long, help = "Event log output path (stdout when omitted)")]
    pub event_log_output: Option<String>,

    /// Random seed for reproducible generated orders
    #[arg(long, help = "Random seed for reproducible generated orders")]
    pub seed: Option<u64>,

    /// Number of random orders to add to the shop
    #[arg(
        long,
        help = "Number of random orders to generate",
        long_help = "Generate this many random orders over the configured work centers, in addition to the configured orders."
    )]
    pub generate_orders: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Work centers in the shop
    pub work_centers: Option<Vec<WorkCenterConfig>>,

    /// Orders to simulate
    pub orders: Option<Vec<OrderConfig>>,

    /// Random order generation
    pub generator: Option<GeneratorConfig>,

    /// Output format for the event log
    pub output_format: Option<String>,

    /// Event log destination
    pub event_log_output: Option<String>,

    /// Random seed for reproducible generated orders
    pub seed: Option<u64>,

    /// Instant that elapsed hour zero corresponds to
    pub plan_start: Option<DateTime<Utc>>,
}

/// Configuration for one shop simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Work centers in the shop
    pub work_centers: Vec<WorkCenterConfig>,

    /// Orders to simulate
    pub orders: Vec<OrderConfig>,

    /// Random order generation
    pub generator: Option<GeneratorConfig>,

    /// Output format for the event log
    pub output_format: String,

    /// Event log destination (stdout when absent)
    pub event_log_output: Option<String>,

    /// Random seed for reproducible generated orders
    pub seed: Option<u64>,

    /// Instant that elapsed hour zero corresponds to
    pub plan_start: DateTime<Utc>,
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for shop configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// The shop has no work centers
    #[error("At least one work center is required")]
    NoWorkCenters,

    /// Two work centers share a name
    #[error("Duplicate work center name: {0}")]
    DuplicateWorkCenter(String),

    /// Capacity must be at least one slot
    #[error("Work center {name} must have at least one slot, got {capacity}")]
    InvalidCapacity {
        /// Work center name
        name: String,
        /// The invalid capacity
        capacity: usize,
    },

    /// Time ratio must be positive and finite
    #[error("Work center {name} has invalid time ratio {value} (must be > 0)")]
    InvalidTimeRatio {
        /// Work center name
        name: String,
        /// The invalid ratio
        value: f64,
    },

    /// Two orders share an order number
    #[error("Duplicate order number: {0}")]
    DuplicateOrder(u64),

    /// An operation refers to a work center that does not exist
    #[error("Order {order_number} refers to unknown work center {work_center}")]
    UnknownWorkCenter {
        /// Order with the bad reference
        order_number: u64,
        /// The unknown name
        work_center: String,
    },

    /// Sequence numbers must be unique within an order
    #[error("Order {order_number} has duplicate sequence number {sequence}")]
    DuplicateSequence {
        /// Offending order
        order_number: u64,
        /// Repeated sequence number
        sequence: u32,
    },

    /// The configured start sequence is not one of the order's steps
    #[error("Order {order_number} starts at sequence {sequence}, which is not on its route")]
    UnknownStartSequence {
        /// Offending order
        order_number: u64,
        /// The missing sequence number
        sequence: u32,
    },

    /// Hours must be non-negative and finite
    #[error("Order {order_number} sequence {sequence} has invalid hours {hours}")]
    InvalidHours {
        /// Offending order
        order_number: u64,
        /// Offending step
        sequence: u32,
        /// The invalid duration
        hours: f64,
    },

    /// An earliest-due-date work center would receive an order without a due date
    #[error("Order {order_number} has no due date but is routed through earliest-due-date work center {work_center}")]
    MissingDueDate {
        /// Offending order
        order_number: u64,
        /// The earliest-due-date work center
        work_center: String,
    },

    /// Generator parameters are inconsistent
    #[error("Invalid generator settings: {0}")]
    InvalidGenerator(String),

    /// Output format is not recognised
    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),
}

impl Default for ShopConfig {
    fn default() -> Self {
        use demo_shop::*;

        let work_centers = vec![
            WorkCenterConfig::new(INVENTORY).with_capacity(3),
            WorkCenterConfig::new(MACHINING),
            WorkCenterConfig::new(TURNING),
            WorkCenterConfig::new(OUTSIDE_PROCESSING).with_capacity(OUTSIDE_PROCESSING_SLOTS),
            WorkCenterConfig::new(SHIPPING),
        ];

        let orders = vec![
            OrderConfig::new(1000)
                .with_operation(10, INVENTORY, 0.5)
                .with_operation(20, MACHINING, 5.0)
                .with_operation(30, OUTSIDE_PROCESSING, 24.0)
                .with_operation(40, SHIPPING, 1.0),
            OrderConfig::new(2000)
                .with_operation(10, INVENTORY, 0.5)
                .with_operation(20, TURNING, 3.0)
                .with_operation(30, MACHINING, 1.0)
                .with_operation(40, OUTSIDE_PROCESSING, 12.0)
                .with_operation(50, SHIPPING, 1.0),
            OrderConfig::new(3000)
                .with_operation(10, INVENTORY, 0.5)
                .with_operation(20, SHIPPING, 0.5),
        ];

        Self {
            work_centers,
            orders,
            generator: None,
            output_format: "json".to_string(),
            event_log_output: None,
            seed: None,
            plan_start: default_plan_start(),
        }
    }
}

/// 2024-01-01T00:00:00Z
fn default_plan_start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or_default()
}

impl ShopConfig {
    /// Create a configuration with the given work centers and no orders
    pub fn with_work_centers(work_centers: Vec<WorkCenterConfig>) -> Self {
        Self { work_centers, orders: Vec::new(), ..Self::default() }
    }

    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    ///
    /// A file that brings its own work centers but no orders starts with an
    /// empty order list; the demo orders only make sense on the demo shop.
    pub fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        let orders = match (config_file.orders, config_file.work_centers.is_some()) {
            (Some(orders), _) => orders,
            (None, true) => Vec::new(),
            (None, false) => defaults.orders,
        };

        Self {
            work_centers: config_file.work_centers.unwrap_or(defaults.work_centers),
            orders,
            generator: config_file.generator.or(defaults.generator),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            event_log_output: config_file.event_log_output.or(defaults.event_log_output),
            seed: config_file.seed.or(defaults.seed),
            plan_start: config_file.plan_start.unwrap_or(defaults.plan_start),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.event_log_output {
            config.event_log_output = Some(value);
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(count) = args.generate_orders {
            let generator = config.generator.get_or_insert_with(GeneratorConfig::default);
            generator.order_count = count;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the shop layout, the orders and the run options
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.work_centers.is_empty() {
            return Err(ConfigValidationError::NoWorkCenters);
        }

        let mut names = HashSet::new();
        for work_center in &self.work_centers {
            if !names.insert(work_center.name.as_str()) {
                return Err(ConfigValidationError::DuplicateWorkCenter(work_center.name.clone()));
            }
            if work_center.capacity == 0 {
                return Err(ConfigValidationError::InvalidCapacity {
                    name: work_center.name.clone(),
                    capacity: work_center.capacity,
                });
            }
            if !work_center.time_ratio.is_finite() || work_center.time_ratio <= 0.0 {
                return Err(ConfigValidationError::InvalidTimeRatio {
                    name: work_center.name.clone(),
                    value: work_center.time_ratio,
                });
            }
        }

        let mut order_numbers = HashSet::new();
        for order in &self.orders {
            if !order_numbers.insert(order.order_number) {
                return Err(ConfigValidationError::DuplicateOrder(order.order_number));
            }
            self.validate_order(order)?;
        }

        if let Some(generator) = &self.generator {
            generator.validate()?;
        }

        self.get_output_format().map_err(|_| {
            ConfigValidationError::UnknownOutputFormat(self.output_format.clone())
        })?;

        Ok(())
    }

    fn validate_order(&self, order: &OrderConfig) -> Result<(), ConfigValidationError> {
        let mut sequences = HashSet::new();
        for operation in &order.operations {
            let work_center = self.work_center(&operation.work_center).ok_or_else(|| {
                ConfigValidationError::UnknownWorkCenter {
                    order_number: order.order_number,
                    work_center: operation.work_center.clone(),
                }
            })?;

            if !sequences.insert(operation.sequence) {
                return Err(ConfigValidationError::DuplicateSequence {
                    order_number: order.order_number,
                    sequence: operation.sequence,
                });
            }

            if !operation.hours.is_finite() || operation.hours < 0.0 {
                return Err(ConfigValidationError::InvalidHours {
                    order_number: order.order_number,
                    sequence: operation.sequence,
                    hours: operation.hours,
                });
            }

            if order.due_date.is_none() && work_center.prioritizer == PrioritizerKind::EarliestDueDate {
                return Err(ConfigValidationError::MissingDueDate {
                    order_number: order.order_number,
                    work_center: work_center.name.clone(),
                });
            }
        }

        if let Some(start) = order.start_sequence {
            if !sequences.contains(&start) {
                return Err(ConfigValidationError::UnknownStartSequence {
                    order_number: order.order_number,
                    sequence: start,
                });
            }
        }

        Ok(())
    }

    /// Look up a work center configuration by name
    pub fn work_center(&self, name: &str) -> Option<&WorkCenterConfig> {
        self.work_centers.iter().find(|wc| wc.name == name)
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }

    /// Total number of configured route steps
    pub fn total_operations(&self) -> usize {
        self.orders.iter().map(|o| o.operations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_config_default() {
        let config = ShopConfig::default();

        assert_eq!(config.work_centers.len(), 5);
        assert_eq!(config.orders.len(), 3);
        assert_eq!(config.total_operations(), 11);
        assert_eq!(config.output_format, "json");
        assert!(config.generator.is_none());
        assert!(config.seed.is_none());
        assert_eq!(config.plan_start.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let inventory = config.work_center(demo_shop::INVENTORY).unwrap();
        assert_eq!(inventory.capacity, 3);
        assert_eq!(inventory.prioritizer, PrioritizerKind::Fifo);

        config.validate().unwrap();
    }

    #[test]
    fn test_work_center_config_defaults_from_json() {
        let wc: WorkCenterConfig = serde_json::from_str(r#"{"name": "paint"}"#).unwrap();
        assert_eq!(wc.capacity, 1);
        assert_eq!(wc.time_ratio, 1.0);
        assert_eq!(wc.prioritizer, PrioritizerKind::Fifo);

        let wc: WorkCenterConfig = serde_json::from_str(
            r#"{"name": "paint", "capacity": 2, "time_ratio": 2.0, "prioritizer": "shortest_processing_time"}"#,
        )
        .unwrap();
        assert_eq!(wc, WorkCenterConfig::new("paint")
            .with_capacity(2)
            .with_time_ratio(2.0)
            .with_prioritizer(PrioritizerKind::ShortestProcessingTime));
    }

    #[test]
    fn test_validation_rejects_duplicate_work_center() {
        let mut config = ShopConfig::default();
        config.work_centers.push(WorkCenterConfig::new(demo_shop::SHIPPING));
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::DuplicateWorkCenter(name)) if name == "shipping"
        ));
    }

    #[test]
    fn test_validation_rejects_zero_capacity_and_bad_ratio() {
        let config = ShopConfig::with_work_centers(vec![WorkCenterConfig::new("a").with_capacity(0)]);
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidCapacity { .. })));

        let config = ShopConfig::with_work_centers(vec![WorkCenterConfig::new("a").with_time_ratio(0.0)]);
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidTimeRatio { .. })));

        let config =
            ShopConfig::with_work_centers(vec![WorkCenterConfig::new("a").with_time_ratio(f64::NAN)]);
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidTimeRatio { .. })));
    }

    #[test]
    fn test_validation_rejects_empty_shop() {
        let config = ShopConfig::with_work_centers(Vec::new());
        assert!(matches!(config.validate(), Err(ConfigValidationError::NoWorkCenters)));
    }

    #[test]
    fn test_validation_rejects_bad_orders() {
        let base = ShopConfig::with_work_centers(vec![WorkCenterConfig::new("a")]);

        let mut config = base.clone();
        config.orders.push(OrderConfig::new(1).with_operation(10, "missing", 1.0));
        assert!(matches!(config.validate(), Err(ConfigValidationError::UnknownWorkCenter { .. })));

        let mut config = base.clone();
        config.orders.push(OrderConfig::new(1).with_operation(10, "a", 1.0).with_operation(10, "a", 2.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::DuplicateSequence { order_number: 1, sequence: 10 })
        ));

        let mut config = base.clone();
        config.orders.push(OrderConfig::new(1).with_operation(10, "a", -1.0));
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidHours { .. })));

        let mut config = base.clone();
        config.orders.push(OrderConfig::new(1).with_operation(10, "a", 1.0).starting_at(15));
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownStartSequence { order_number: 1, sequence: 15 })
        ));

        let mut config = base;
        config.orders.push(OrderConfig::new(1));
        config.orders.push(OrderConfig::new(1));
        assert!(matches!(config.validate(), Err(ConfigValidationError::DuplicateOrder(1))));
    }

    #[test]
    fn test_validation_requires_due_date_for_edd_work_center() {
        let mut config = ShopConfig::with_work_centers(vec![
            WorkCenterConfig::new("a").with_prioritizer(PrioritizerKind::EarliestDueDate),
        ]);
        config.orders.push(OrderConfig::new(7).with_operation(10, "a", 1.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingDueDate { order_number: 7, .. })
        ));

        config.orders[0].due_date = Some(config.plan_start);
        config.validate().unwrap();
    }

    #[test]
    fn test_validation_of_generator_and_output_format() {
        let mut config = ShopConfig::default();
        config.generator = Some(GeneratorConfig { min_operations: 3, max_operations: 2, ..Default::default() });
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidGenerator(_))));

        config.generator = Some(GeneratorConfig { min_hours: 5.0, max_hours: 1.0, ..Default::default() });
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidGenerator(_))));

        config.generator = Some(GeneratorConfig::default());
        config.validate().unwrap();

        config.output_format = "xml".to_string();
        assert!(matches!(config.validate(), Err(ConfigValidationError::UnknownOutputFormat(_))));
    }

    #[test]
    fn test_config_file_merging() {
        // No work centers in the file: demo shop and demo orders
        let config = ShopConfig::from_config_file(ConfigFile {
            seed: Some(3),
            ..Default::default()
        });
        assert_eq!(config.orders.len(), 3);
        assert_eq!(config.seed, Some(3));

        // Own work centers without orders: empty order list
        let config = ShopConfig::from_config_file(ConfigFile {
            work_centers: Some(vec![WorkCenterConfig::new("solo")]),
            ..Default::default()
        });
        assert_eq!(config.work_centers.len(), 1);
        assert!(config.orders.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::try_parse_from([
            "test",
            "--output-format",
            "csv",
            "--seed",
            "99",
            "--generate-orders",
            "25",
            "--event-log-output",
            "events.csv",
        ])
        .unwrap();

        let config = ShopConfig::from_cli_args(args).unwrap();
        assert_eq!(config.output_format, "csv");
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.event_log_output.as_deref(), Some("events.csv"));
        let generator = config.generator.unwrap();
        assert_eq!(generator.order_count, 25);
        assert_eq!(generator.max_operations, GeneratorConfig::default().max_operations);
    }

    #[test]
    fn test_output_format_parsing() {
        let mut config = ShopConfig::default();
        assert_eq!(config.get_output_format().unwrap(), OutputFormat::Json);
        config.output_format = "CSV".to_string();
        assert_eq!(config.get_output_format().unwrap(), OutputFormat::Csv);
    }

    #[test]
    fn test_shop_config_serialization() {
        let config = ShopConfig::default();
        let json = config.print_json().unwrap();
        let deserialized: ShopConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.work_centers, config.work_centers);
        assert_eq!(deserialized.orders, config.orders);
        assert_eq!(deserialized.plan_start, config.plan_start);
    }
}

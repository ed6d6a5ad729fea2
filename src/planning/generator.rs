//! Random workload generation
//!
//! Produces order configurations over an existing set of work centers so a
//! shop can be loaded with more work than is practical to write by hand.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::fmt;

use crate::types::{GeneratorConfig, OperationConfig, OrderConfig, WorkCenterConfig};

/// Sequence number spacing of generated route steps
pub const SEQUENCE_STEP: u32 = 10;

/// Generator for random orders
pub struct ShopGenerator {
    rng: Box<dyn rand::RngCore>,
}

impl fmt::Debug for ShopGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopGenerator").finish()
    }
}

impl ShopGenerator {
    /// Create a generator seeded from entropy
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self { rng: Box::new(rand::rngs::StdRng::from_entropy()) }
    }

    /// Create a generator with a specific seed for reproducible results
    pub fn with_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self { rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)) }
    }

    /// Create a generator from an optional seed
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// Generate `config.order_count` orders numbered from `first_order_number`
    ///
    /// Every order gets a due date within `config.due_within_days` of
    /// `plan_start`, so generated orders are valid at earliest-due-date work
    /// centers too. Empty or non-finite ranges are rejected before any
    /// sampling.
    pub fn generate_orders(
        &mut self,
        config: &GeneratorConfig,
        work_centers: &[WorkCenterConfig],
        first_order_number: u64,
        plan_start: DateTime<Utc>,
    ) -> Result<Vec<OrderConfig>, String> {
        if config.order_count == 0 {
            return Ok(Vec::new());
        }

        if work_centers.is_empty() {
            return Err("Cannot generate orders without any work centers".to_string());
        }

        config.validate().map_err(|e| e.to_string())?;

        let mut orders = Vec::with_capacity(config.order_count);
        for i in 0..config.order_count {
            let order_number = first_order_number + i as u64;
            orders.push(self.generate_order(order_number, config, work_centers, plan_start));
        }

        Ok(orders)
    }

    fn generate_order(
        &mut self,
        order_number: u64,
        config: &GeneratorConfig,
        work_centers: &[WorkCenterConfig],
        plan_start: DateTime<Utc>,
    ) -> OrderConfig {
        let step_count = self.rng.gen_range(config.min_operations..=config.max_operations);

        let operations = (1..=step_count as u32)
            .map(|step| {
                let work_center = &work_centers[self.rng.gen_range(0..work_centers.len())];
                OperationConfig::new(step * SEQUENCE_STEP, work_center.name.clone(), self.generate_hours(config))
            })
            .collect();

        let due_in_minutes = self.rng.gen_range(1..=i64::from(config.due_within_days) * 24 * 60);

        OrderConfig {
            order_number,
            item_number: self.rng.gen_range(100_000..1_000_000),
            start_sequence: None,
            due_date: Some(plan_start + Duration::minutes(due_in_minutes)),
            operations,
        }
    }

    /// Hours rounded to the quarter hour, clamped to the configured range
    fn generate_hours(&mut self, config: &GeneratorConfig) -> f64 {
        let raw = self.rng.gen_range(config.min_hours..=config.max_hours);
        ((raw * 4.0).round() / 4.0).clamp(config.min_hours, config.max_hours)
    }
}

impl Default for ShopGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn work_centers() -> Vec<WorkCenterConfig> {
        vec![WorkCenterConfig::new("saw"), WorkCenterConfig::new("mill").with_capacity(2)]
    }

    fn plan_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_generated_orders_are_well_formed() {
        let config = GeneratorConfig::default();
        let mut generator = ShopGenerator::with_seed(42);
        let orders = generator.generate_orders(&config, &work_centers(), 5000, plan_start()).unwrap();

        assert_eq!(orders.len(), config.order_count);
        for (i, order) in orders.iter().enumerate() {
            assert_eq!(order.order_number, 5000 + i as u64);
            assert!(order.operations.len() >= config.min_operations);
            assert!(order.operations.len() <= config.max_operations);

            let sequences: Vec<_> = order.operations.iter().map(|op| op.sequence).collect();
            assert!(sequences.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(sequences[0], SEQUENCE_STEP);

            for op in &order.operations {
                assert!(op.hours >= config.min_hours && op.hours <= config.max_hours);
                assert!(op.work_center == "saw" || op.work_center == "mill");
            }

            let due = order.due_date.unwrap();
            assert!(due > plan_start());
            assert!(due <= plan_start() + Duration::days(i64::from(config.due_within_days)));
        }
    }

    #[test]
    fn test_same_seed_same_orders() {
        let config = GeneratorConfig::default();
        let a = ShopGenerator::with_seed(7).generate_orders(&config, &work_centers(), 1, plan_start()).unwrap();
        let b = ShopGenerator::with_seed(7).generate_orders(&config, &work_centers(), 1, plan_start()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_orders() {
        let config = GeneratorConfig { order_count: 0, ..GeneratorConfig::default() };
        let orders = ShopGenerator::with_seed(1).generate_orders(&config, &[], 1, plan_start()).unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn test_no_work_centers_is_an_error() {
        let result = ShopGenerator::with_seed(1).generate_orders(&GeneratorConfig::default(), &[], 1, plan_start());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_ranges_are_errors() {
        let invalid = [
            GeneratorConfig { min_operations: 0, ..GeneratorConfig::default() },
            GeneratorConfig { min_operations: 5, max_operations: 2, ..GeneratorConfig::default() },
            GeneratorConfig { min_hours: 3.0, max_hours: 1.0, ..GeneratorConfig::default() },
            GeneratorConfig { min_hours: -1.0, ..GeneratorConfig::default() },
            GeneratorConfig { max_hours: f64::INFINITY, ..GeneratorConfig::default() },
            GeneratorConfig { min_hours: f64::NAN, ..GeneratorConfig::default() },
            GeneratorConfig { due_within_days: 0, ..GeneratorConfig::default() },
        ];
        for config in &invalid {
            let config = GeneratorConfig { order_count: 1, ..config.clone() };
            let result = ShopGenerator::with_seed(1).generate_orders(&config, &work_centers(), 1, plan_start());
            assert!(result.is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_fixed_hours() {
        let config = GeneratorConfig { min_hours: 1.5, max_hours: 1.5, ..GeneratorConfig::default() };
        let orders = ShopGenerator::with_seed(3).generate_orders(&config, &work_centers(), 1, plan_start()).unwrap();
        assert!(orders.iter().flat_map(|o| &o.operations).all(|op| op.hours == 1.5));
    }
}

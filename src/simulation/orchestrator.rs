//! Main simulation orchestrator
//!
//! Builds a [`Factory`] from a [`ShopConfig`], drives it until nothing is in
//! progress and hands back the statistics and event log.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::events::EventLog;
use crate::planning::{OperationSpec, RouterPosition, RouterSpec, ShopGenerator};
use crate::simulation::{Factory, SimulationError, SimulationResult, SimulationStatistics};
use crate::types::{OrderConfig, RunId, ShopConfig, WorkCenterId};
use crate::perf_span;

/// Coordinates one simulation run
#[derive(Debug)]
pub struct SimulationOrchestrator {
    /// Identifier stamped on this run's logs
    run_id: RunId,
    /// Configuration the shop was built from, including generated orders
    config: ShopConfig,
    /// The shop floor
    factory: Factory,
    /// Statistics of the finished run
    statistics: Option<SimulationStatistics>,
}

impl SimulationOrchestrator {
    /// Validate the configuration and build the shop
    ///
    /// Generated orders are appended to the configured ones before the shop
    /// is built, numbered after the highest configured order number.
    #[instrument(skip(config), fields(work_centers = config.work_centers.len(), orders = config.orders.len()))]
    pub fn new(mut config: ShopConfig) -> SimulationResult<Self> {
        let run_id = RunId::new();
        info!(run_id = %run_id, "Initializing simulation orchestrator");

        config.validate()?;

        if let Some(generator_config) = config.generator.clone() {
            if let Some(seed) = config.seed {
                info!("Using deterministic seed: {}", seed);
            } else {
                debug!("Using entropy-based random seed");
            }
            let first_order_number = config.orders.iter().map(|o| o.order_number).max().map_or(1, |n| n + 1);
            let generated = ShopGenerator::from_seed(config.seed)
                .generate_orders(&generator_config, &config.work_centers, first_order_number, config.plan_start)
                .map_err(SimulationError::configuration_error)?;
            info!("Generated {} random orders", generated.len());
            config.orders.extend(generated);
            config.validate()?;
        }

        let factory = Self::build_factory(&config)?;

        info!(
            "Shop built with {} work centers, {} routers and {} operations",
            factory.work_centers().len(),
            factory.routers().len(),
            factory.operations().len()
        );

        Ok(Self { run_id, config, factory, statistics: None })
    }

    fn build_factory(config: &ShopConfig) -> SimulationResult<Factory> {
        let mut factory = Factory::new();

        let mut work_centers: HashMap<&str, WorkCenterId> = HashMap::new();
        for wc in &config.work_centers {
            let id = factory.add_work_center_from_config(wc)?;
            work_centers.insert(wc.name.as_str(), id);
        }

        for order in &config.orders {
            let (spec, operations) = Self::router_from_order(order, &work_centers)?;
            factory.add_router(spec, operations)?;
        }

        Ok(factory)
    }

    fn router_from_order(
        order: &OrderConfig,
        work_centers: &HashMap<&str, WorkCenterId>,
    ) -> SimulationResult<(RouterSpec, Vec<OperationSpec>)> {
        let operations = order
            .operations
            .iter()
            .map(|op| {
                work_centers
                    .get(op.work_center.as_str())
                    .map(|&wc| OperationSpec::new(op.sequence, wc, op.hours))
                    .ok_or_else(|| SimulationError::unknown_entity(format!("work center {}", op.work_center)))
            })
            .collect::<SimulationResult<Vec<_>>>()?;

        let spec = RouterSpec {
            order_number: order.order_number,
            item_number: order.item_number,
            start: order.start_sequence.map(RouterPosition::At),
            due_date: order.due_date,
        };
        Ok((spec, operations))
    }

    /// Release every router and run until nothing is in progress
    pub fn run(&mut self) -> SimulationResult<SimulationStatistics> {
        let span = perf_span!("simulation_run", run_id = %self.run_id);
        let _enter = span.enter();

        let started = Instant::now();
        self.factory.release_all()?;
        let completions = self.factory.run_to_completion()?;

        let mut statistics = SimulationStatistics::from_factory(&self.factory, self.config.plan_start);
        statistics.set_simulation_duration(started.elapsed());

        info!(
            completions = completions,
            events = self.factory.sink().len(),
            "{}",
            statistics.compact_summary()
        );

        self.statistics = Some(statistics.clone());
        Ok(statistics)
    }

    /// Write the event log to the configured destination in the configured format
    pub fn write_event_log(&self) -> SimulationResult<()> {
        let format = self
            .config
            .get_output_format()
            .map_err(SimulationError::configuration_error)?;

        match &self.config.event_log_output {
            Some(path) => {
                info!("Writing {} event log to {}", format, path);
                let mut writer = BufWriter::new(File::create(path)?);
                self.event_log().write(format, &mut writer)
            }
            None => {
                let stdout = io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                self.event_log().write(format, &mut writer)
            }
        }
    }

    /// Identifier of this run
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Configuration the shop was built from
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// The shop floor
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Events logged so far
    pub fn event_log(&self) -> &EventLog {
        self.factory.sink()
    }

    /// Statistics of the finished run, once [`SimulationOrchestrator::run`] succeeded
    pub fn get_statistics(&self) -> Option<&SimulationStatistics> {
        self.statistics.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeneratorConfig, OrderConfig, WorkCenterConfig};

    #[test]
    fn test_orchestrator_creation() {
        let orchestrator = SimulationOrchestrator::new(ShopConfig::default()).unwrap();
        assert_eq!(orchestrator.factory().work_centers().len(), 5);
        assert_eq!(orchestrator.factory().routers().len(), 3);
        assert!(orchestrator.event_log().is_empty());
        assert!(orchestrator.get_statistics().is_none());
        assert!(orchestrator.run_id().to_string().starts_with("RUN_"));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let config = ShopConfig::with_work_centers(Vec::new());
        let err = SimulationOrchestrator::new(config).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
    }

    #[test]
    fn test_start_sequence_is_honored() {
        let mut config = ShopConfig::with_work_centers(vec![WorkCenterConfig::new("saw")]);
        config.orders.push(
            OrderConfig::new(7)
                .with_operation(10, "saw", 1.0)
                .with_operation(20, "saw", 2.0)
                .starting_at(20),
        );

        let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
        let stats = orchestrator.run().unwrap();
        assert_eq!(stats.operations_completed, 1);
        assert_eq!(stats.makespan_hours, 2.0);
    }

    #[test]
    fn test_generated_orders_are_appended() {
        let mut config = ShopConfig::default();
        config.seed = Some(11);
        config.generator = Some(GeneratorConfig { order_count: 4, ..GeneratorConfig::default() });

        let orchestrator = SimulationOrchestrator::new(config).unwrap();
        let orders: Vec<_> = orchestrator.config().orders.iter().map(|o| o.order_number).collect();
        assert_eq!(orders, vec![1000, 2000, 3000, 3001, 3002, 3003, 3004]);
        assert_eq!(orchestrator.factory().routers().len(), 7);
    }

    #[test]
    fn test_run_stores_statistics() {
        let mut orchestrator = SimulationOrchestrator::new(ShopConfig::default()).unwrap();
        let stats = orchestrator.run().unwrap();
        assert_eq!(stats.routers_completed, 3);
        assert_eq!(orchestrator.get_statistics().unwrap().makespan_hours, stats.makespan_hours);
    }
}

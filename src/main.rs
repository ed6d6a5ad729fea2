// Shop Forecasting - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/shop-forecasting
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/shop-forecasting --config shop.json --output-format csv --event-log-output events.csv --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use shop_forecasting::simulation::{LoggingConfig, SimulationOrchestrator, SimulationStatistics};
use shop_forecasting::types::config::CliArgs;
use shop_forecasting::types::ShopConfig;
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match ShopConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    let _logging_guard = match logging_result {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Shop Forecasting");

    let dry_run = args.dry_run;
    if let Err(e) = run(args, dry_run) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Shop Forecasting completed successfully");
}

fn run(args: CliArgs, dry_run: bool) -> Result<()> {
    // Load configuration from CLI arguments and optional config file
    let config = ShopConfig::from_cli_args(args).context("Failed to load configuration")?;

    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    // Handle dry run mode
    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_startup_banner(&config);

    let mut orchestrator = SimulationOrchestrator::new(config).context("Failed to build the shop")?;

    info!("Starting simulation");
    let statistics = orchestrator.run().map_err(|e| {
        e.report();
        e
    })?;

    orchestrator.write_event_log().context("Failed to write the event log")?;
    if let Some(path) = &orchestrator.config().event_log_output {
        eprintln!("Event log written to: {}", path);
    }

    print_final_statistics(&statistics);
    Ok(())
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &ShopConfig) {
    eprintln!("Shop Forecasting");
    eprintln!("================");
    eprintln!("Discrete-event simulation of orders through capacity-bounded work centers");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &ShopConfig) {
    eprintln!("Configuration:");
    eprintln!("  Work Centers: {}", config.work_centers.len());
    for wc in &config.work_centers {
        eprintln!(
            "    {} ({} slots, ratio {}, {:?})",
            wc.name, wc.capacity, wc.time_ratio, wc.prioritizer
        );
    }
    eprintln!("  Orders: {} ({} operations)", config.orders.len(), config.total_operations());
    if let Some(generator) = &config.generator {
        eprintln!(
            "  Generated Orders: {} ({}-{} operations each)",
            generator.order_count, generator.min_operations, generator.max_operations
        );
    }
    eprintln!("  Plan Start: {}", config.plan_start.to_rfc3339());
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

/// Print final statistics
fn print_final_statistics(statistics: &SimulationStatistics) {
    eprintln!("{}", statistics.generate_summary_report());
}

//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are parsed and that they
//! override the configuration they are applied to.

use clap::Parser;
use shop_forecasting::types::config::{CliArgs, GeneratorConfig, ShopConfig};
use shop_forecasting::types::OutputFormat;

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["shop-forecasting"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).unwrap()
}

#[test]
fn test_defaults() {
    let cli_args = args(&[]);
    assert!(cli_args.config.is_none());
    assert!(cli_args.output_format.is_none());
    assert!(cli_args.event_log_output.is_none());
    assert!(cli_args.seed.is_none());
    assert!(cli_args.generate_orders.is_none());
    assert!(!cli_args.verbose);
    assert!(!cli_args.debug);
    assert!(!cli_args.dry_run);
    assert!(!cli_args.print_config);
}

#[test]
fn test_all_options_parse() {
    let cli_args = args(&[
        "--config",
        "shop.json",
        "--output-format",
        "csv",
        "--event-log-output",
        "events.csv",
        "--seed",
        "42",
        "--generate-orders",
        "50",
        "--verbose",
        "--dry-run",
    ]);

    assert_eq!(cli_args.config.as_deref(), Some("shop.json"));
    assert_eq!(cli_args.output_format.as_deref(), Some("csv"));
    assert_eq!(cli_args.event_log_output.as_deref(), Some("events.csv"));
    assert_eq!(cli_args.seed, Some(42));
    assert_eq!(cli_args.generate_orders, Some(50));
    assert!(cli_args.verbose);
    assert!(cli_args.dry_run);
}

#[test]
fn test_short_flags() {
    let cli_args = args(&["-c", "shop.json", "-v", "-d"]);
    assert_eq!(cli_args.config.as_deref(), Some("shop.json"));
    assert!(cli_args.verbose);
    assert!(cli_args.debug);
}

#[test]
fn test_invalid_numbers_are_rejected() {
    assert!(CliArgs::try_parse_from(["shop-forecasting", "--seed", "abc"]).is_err());
    assert!(CliArgs::try_parse_from(["shop-forecasting", "--generate-orders", "-3"]).is_err());
    assert!(CliArgs::try_parse_from(["shop-forecasting", "--no-such-flag"]).is_err());
}

#[test]
fn test_no_arguments_gives_demo_shop() {
    let config = ShopConfig::from_cli_args(args(&[])).unwrap();
    let demo = ShopConfig::default();

    assert_eq!(config.work_centers, demo.work_centers);
    assert_eq!(config.orders, demo.orders);
    assert!(config.generator.is_none());
    assert_eq!(config.get_output_format().unwrap(), OutputFormat::Json);
}

#[test]
fn test_cli_overrides() {
    let config = ShopConfig::from_cli_args(args(&[
        "--output-format",
        "csv",
        "--event-log-output",
        "out.csv",
        "--seed",
        "7",
    ]))
    .unwrap();

    assert_eq!(config.get_output_format().unwrap(), OutputFormat::Csv);
    assert_eq!(config.event_log_output.as_deref(), Some("out.csv"));
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_generate_orders_creates_generator() {
    let config = ShopConfig::from_cli_args(args(&["--generate-orders", "12"])).unwrap();

    let generator = config.generator.unwrap();
    assert_eq!(generator.order_count, 12);
    assert_eq!(generator.max_operations, GeneratorConfig::default().max_operations);
}

#[test]
fn test_unknown_output_format_fails_validation() {
    let config = ShopConfig::from_cli_args(args(&["--output-format", "xml"])).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = ShopConfig::from_cli_args(args(&["--config", "/nonexistent/shop.json"]));
    assert!(result.is_err());
}

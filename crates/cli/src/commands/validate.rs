//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    scan_topic: String,
    pose_topic: String,
    output_topic: String,
    passthrough_count: usize,
    has_sensor_link: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    scan_topic: config.scan_topic.clone(),
                    pose_topic: config.pose_topic.clone(),
                    output_topic: config.output_topic.clone(),
                    passthrough_count: config.passthrough_topics.len(),
                    has_sensor_link: config.sensor_link.is_some(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &contracts::ConverterConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.passthrough_topics.is_empty() {
        warnings.push(
            "No passthrough topics configured - output will contain only clouds and poses"
                .to_string(),
        );
    }

    if config.sensor_link.is_none() {
        warnings.push(
            "No static sensor link configured - pose samples are used as the sensor pose directly"
                .to_string(),
        );
    }

    if config.sensor_time_offset.abs() > 1.0 {
        warnings.push(format!(
            "Sensor time offset of {} s is unusually large",
            config.sensor_time_offset
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Scan topic: {}", summary.scan_topic);
            println!("  Pose topic: {}", summary.pose_topic);
            println!("  Output topic: {}", summary.output_topic);
            println!("  Passthrough topics: {}", summary.passthrough_count);
            println!("  Static sensor link: {}", summary.has_sensor_link);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

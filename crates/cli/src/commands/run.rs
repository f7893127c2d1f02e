//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{ConversionJob, JobConfig};

/// Execute the `run` command
pub async fn run_convert(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref topic) = args.scan_topic {
        info!(topic = %topic, "Overriding scan topic from CLI");
        config.scan_topic = topic.clone();
    }
    if let Some(offset) = args.sensor_time_offset {
        info!(offset, "Overriding sensor time offset from CLI");
        config.sensor_time_offset = offset;
    }

    info!(
        scan_topic = %config.scan_topic,
        pose_topic = %config.pose_topic,
        output_topic = %config.output_topic,
        passthrough = config.passthrough_topics.len(),
        "Configuration loaded"
    );

    if !args.input.exists() {
        anyhow::bail!("Input bag not found: {}", args.input.display());
    }

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    // Build job configuration
    let job_config = JobConfig {
        config,
        input: args.input.clone(),
        output: args.output.clone(),
        max_messages: if args.max_messages == 0 {
            None
        } else {
            Some(args.max_messages)
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let job = ConversionJob::new(job_config);

    info!("Starting conversion...");

    let stats = job.run().await.context("Conversion failed")?;

    info!(
        clouds_emitted = stats.clouds_emitted,
        scans_dropped = stats.scans_dropped_no_anchor,
        duration_secs = stats.duration.as_secs_f64(),
        "Conversion completed successfully"
    );

    // Print detailed statistics
    stats.print_summary();

    info!("Bag Deskew finished");
    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &contracts::ConverterConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Topics:");
    println!("  Scan: {}", config.scan_topic);
    println!("  Pose: {}", config.pose_topic);
    println!("  Output: {}", config.output_topic);
    if !config.passthrough_topics.is_empty() {
        println!("  Preserved:");
        for topic in &config.passthrough_topics {
            println!("    - {}", topic);
        }
    }

    println!("\nFrames:");
    println!("  Sensor frame: {}", config.output_frame_id);
    println!("  Pose frame: {}", config.pose_frame_id);
    println!("  Fixed frame: {}", config.fixed_frame_id);

    println!("\nTiming:");
    println!("  Sensor time offset: {} s", config.sensor_time_offset);
    println!("  Pose horizon: {} s", config.pose_horizon_s);

    println!("\nRange gate:");
    println!(
        "  {} m .. {} m",
        config.range.min_range, config.range.max_range
    );

    if config.sensor_link.is_some() {
        println!("\nStatic sensor link: configured");
    }

    println!();
}

//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    topics: TopicInfo,
    frames: FrameInfo,
    timing: TimingInfo,
    range: RangeInfo,
    has_sensor_link: bool,
}

#[derive(Serialize)]
struct TopicInfo {
    scan: String,
    pose: String,
    output: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    passthrough: Vec<String>,
}

#[derive(Serialize)]
struct FrameInfo {
    sensor: String,
    pose: String,
    fixed: String,
}

#[derive(Serialize)]
struct TimingInfo {
    sensor_time_offset_s: f64,
    pose_horizon_s: f64,
}

#[derive(Serialize)]
struct RangeInfo {
    min_range_m: f64,
    max_range_m: f64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&config);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &contracts::ConverterConfig) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", config.version),
        topics: TopicInfo {
            scan: config.scan_topic.clone(),
            pose: config.pose_topic.clone(),
            output: config.output_topic.clone(),
            passthrough: config.passthrough_topics.clone(),
        },
        frames: FrameInfo {
            sensor: config.output_frame_id.clone(),
            pose: config.pose_frame_id.clone(),
            fixed: config.fixed_frame_id.clone(),
        },
        timing: TimingInfo {
            sensor_time_offset_s: config.sensor_time_offset,
            pose_horizon_s: config.pose_horizon_s,
        },
        range: RangeInfo {
            min_range_m: config.range.min_range,
            max_range_m: config.range.max_range,
        },
        has_sensor_link: config.sensor_link.is_some(),
    }
}

fn print_config_info(config: &contracts::ConverterConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                Bag Deskew Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Topics");
    println!("   ├─ Scan: {}", config.scan_topic);
    println!("   ├─ Pose: {}", config.pose_topic);
    println!("   ├─ Output: {}", config.output_topic);
    if config.passthrough_topics.is_empty() {
        println!("   └─ Preserved: (none)");
    } else {
        println!("   └─ Preserved ({}):", config.passthrough_topics.len());
        for (i, topic) in config.passthrough_topics.iter().enumerate() {
            let prefix = if i == config.passthrough_topics.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("      {} {}", prefix, topic);
        }
    }

    println!("\nFrames");
    println!("   ├─ Sensor: {}", config.output_frame_id);
    println!("   ├─ Pose: {}", config.pose_frame_id);
    println!("   └─ Fixed: {}", config.fixed_frame_id);

    println!("\nTiming");
    println!("   ├─ Sensor time offset: {} s", config.sensor_time_offset);
    println!("   └─ Pose horizon: {} s", config.pose_horizon_s);

    println!("\nRange gate");
    println!("   ├─ Min: {} m", config.range.min_range);
    println!("   └─ Max: {} m", config.range.max_range);

    match &config.sensor_link {
        Some(link) => {
            println!("\nStatic sensor link");
            println!(
                "   ├─ Translation: ({}, {}, {})",
                link.translation.x, link.translation.y, link.translation.z
            );
            println!(
                "   └─ Rotation (rpy): ({}, {}, {})",
                link.rotation.roll, link.rotation.pitch, link.rotation.yaw
            );
        }
        None => {
            println!("\nStatic sensor link: (none)");
        }
    }

    println!();
}

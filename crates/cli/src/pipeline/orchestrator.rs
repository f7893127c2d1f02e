//! Conversion job orchestrator - coordinates the two-pass run.
//!
//! Pass 1 replays only the pose topic and fills the pose history.
//! Pass 2 replays the scan topic plus every preserved topic and drives
//! the converter message by message.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use bagio::{BagReader, BagWriter};
use contracts::{ConverterConfig, LogSource, MessagePayload};
use converter::{Converter, ConverterStats};
use pose_history::PoseHistory;
use scan_decoder::{DecoderCalibration, SphericalDecoder};
use tracing::{info, warn};

/// Conversion job configuration
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// The converter configuration
    pub config: ConverterConfig,

    /// Input bag path
    pub input: PathBuf,

    /// Output bag path
    pub output: PathBuf,

    /// Maximum number of input messages to process (None = unlimited)
    pub max_messages: Option<u64>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// One end-to-end conversion of a recorded bag
pub struct ConversionJob {
    config: JobConfig,
}

impl ConversionJob {
    /// Create a new job with the given configuration
    pub fn new(config: JobConfig) -> Self {
        Self { config }
    }

    /// Run the job to completion
    pub async fn run(self) -> Result<ConverterStats> {
        let start_time = Instant::now();
        let cfg = &self.config.config;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Pass 1: pose preload
        info!(
            input = %self.config.input.display(),
            pose_topic = %cfg.pose_topic,
            "Preloading pose stream..."
        );
        let history = preload_poses(cfg, &self.config.input)
            .await
            .context("Pose preload pass failed")?;

        if history.sample_count() == 0 {
            warn!(
                pose_topic = %cfg.pose_topic,
                "No pose samples found - every scan will be dropped"
            );
        }
        history.log_coverage();

        // Pass 2: conversion
        let mut topics: Vec<&str> = vec![cfg.scan_topic.as_str(), cfg.pose_topic.as_str()];
        topics.extend(cfg.passthrough_topics.iter().map(String::as_str));

        let reader = BagReader::open(&self.config.input, &topics)
            .with_context(|| format!("Failed to open input bag {}", self.config.input.display()))?;
        let writer = BagWriter::create(&self.config.output).with_context(|| {
            format!("Failed to create output bag {}", self.config.output.display())
        })?;

        let decoder = SphericalDecoder::new(DecoderCalibration {
            min_range: cfg.range.min_range,
            max_range: cfg.range.max_range,
        });

        let mut converter = Converter::new(cfg, reader, writer, Arc::new(history), decoder);

        info!(
            scan_topic = %cfg.scan_topic,
            output_topic = %cfg.output_topic,
            preserved = topics.len() - 1,
            "Converting..."
        );

        let mut processed: u64 = 0;
        while converter.process_next().await? {
            processed += 1;
            if let Some(max) = self.config.max_messages {
                if processed >= max {
                    info!(max, "Message limit reached, stopping");
                    break;
                }
            }
        }

        converter.close().await.context("Failed to finalize output bag")?;

        let mut stats = converter.stats();
        stats.duration = start_time.elapsed();
        Ok(stats)
    }
}

/// Replay only the pose topic and build the full pose history up front.
///
/// The input is read twice because sources replay strictly forward;
/// scans near the start of the log still need poses recorded around
/// them, not only before them.
async fn preload_poses(config: &ConverterConfig, input: &Path) -> Result<PoseHistory> {
    let mut reader = BagReader::open(input, &[config.pose_topic.as_str()])
        .with_context(|| format!("Failed to open input bag {}", input.display()))?;

    let link = config.sensor_link.as_ref().map(|l| l.to_pose());
    let mut history = PoseHistory::new(config.pose_horizon_s).with_sensor_link(link);

    while let Some(message) = reader.next_message().await? {
        match &message.payload {
            MessagePayload::Pose(update) => history.ingest(message.timestamp, update),
            _ => warn!(
                topic = %message.topic,
                timestamp = message.timestamp,
                "message on pose topic is not a pose sample, ignoring"
            ),
        }
    }

    info!(
        samples = history.sample_count(),
        frames = history.frame_ids().count(),
        "Pose history loaded"
    );

    Ok(history)
}

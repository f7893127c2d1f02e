//! Synthetic Session Demo
//!
//! Generates a small recorded session (pose track, raw lidar scans,
//! diagnostics), runs the full conversion over it, and prints the run
//! summary. No real sensor data required.
//!
//! Run with: cargo run --bin synthetic_session

use std::path::Path;
use std::sync::Arc;

use bagio::{BagReader, BagWriter};
use bytes::Bytes;
use config_loader::{ConfigFormat, ConfigLoader};
use contracts::{
    ConverterConfig, LidarScan, LogSink, LogSource, Message, MessagePayload, PoseUpdate,
    ScanPacket, SensorPose,
};
use converter::Converter;
use nalgebra::{UnitQuaternion, Vector3};
use pose_history::PoseHistory;
use scan_decoder::{returns_to_bytes, DecoderCalibration, RawReturn, SphericalDecoder};

const CONFIG: &str = r#"
scan_topic = "/velodyne_packets"
pose_frame_id = "/odom"
passthrough_topics = ["/diagnostics"]
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Synthetic Session Demo");

    let dir = std::env::temp_dir().join("deskew_demo");
    std::fs::create_dir_all(&dir)?;
    let input = dir.join("session.bag");
    let output = dir.join("deskewed.bag");

    let config = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml)?;

    // ==== Stage 1: Record a synthetic session ====
    tracing::info!(path = %input.display(), "Writing synthetic session");
    write_session(&input, &config).await?;

    // ==== Stage 2: Preload the pose stream ====
    let mut pose_reader = BagReader::open(&input, &[config.pose_topic.as_str()])?;
    let mut history = PoseHistory::new(config.pose_horizon_s);
    while let Some(message) = pose_reader.next_message().await? {
        if let MessagePayload::Pose(update) = &message.payload {
            history.ingest(message.timestamp, update);
        }
    }
    tracing::info!(samples = history.sample_count(), "Pose history loaded");

    // ==== Stage 3: Convert ====
    let mut topics: Vec<&str> = vec![config.scan_topic.as_str(), config.pose_topic.as_str()];
    topics.extend(config.passthrough_topics.iter().map(String::as_str));

    let reader = BagReader::open(&input, &topics)?;
    let writer = BagWriter::create(&output)?;
    let decoder = SphericalDecoder::new(DecoderCalibration {
        min_range: config.range.min_range,
        max_range: config.range.max_range,
    });

    let mut conv = Converter::new(&config, reader, writer, Arc::new(history), decoder);
    while conv.process_next().await? {}
    conv.close().await?;

    conv.stats().print_summary();
    tracing::info!(output = %output.display(), "Demo finished");
    Ok(())
}

/// A platform driving 1 m/s along +x for 10 seconds, scanning at 1 Hz.
async fn write_session(
    path: &Path,
    config: &ConverterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BagWriter::create(path)?;

    for i in 0..=100 {
        let stamp = i as f64 * 0.1;
        let pose = SensorPose::from_parts(
            Vector3::new(stamp, 0.0, 0.0),
            UnitQuaternion::identity(),
        );
        let message = Message {
            topic: config.pose_topic.as_str().into(),
            timestamp: stamp,
            payload: MessagePayload::Pose(PoseUpdate {
                frame_id: config.pose_frame_id.clone(),
                pose,
            }),
        };
        writer.write(&message).await?;

        if i % 10 == 5 {
            // One scan with four packets spread across 80 ms
            let packets = (0..4)
                .map(|k| ScanPacket {
                    stamp: stamp + k as f64 * 0.02,
                    data: returns_to_bytes(&[
                        RawReturn::new(10.0 + k as f32, 0.0, 0.0, 1.0),
                        RawReturn::new(20.0, 1.0, 0.1, 1.0),
                    ]),
                })
                .collect();
            let message = Message {
                topic: config.scan_topic.as_str().into(),
                timestamp: stamp,
                payload: MessagePayload::Scan(LidarScan {
                    header_stamp: stamp,
                    packets,
                }),
            };
            writer.write(&message).await?;
        }

        if i % 25 == 0 {
            writer
                .write(&Message::raw(
                    "/diagnostics",
                    stamp,
                    Bytes::from_static(b"status: ok"),
                ))
                .await?;
        }
    }

    writer.close().await?;
    Ok(())
}

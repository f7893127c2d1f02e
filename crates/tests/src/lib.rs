//! # Integration Tests
//!
//! End-to-end tests over real bag files in a temp directory:
//! write a recorded session, convert it, reopen the output.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
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

    const CONFIG_TOML: &str = r#"
scan_topic = "/velodyne_packets"
pose_frame_id = "/odom"

passthrough_topics = ["/diagnostics"]
"#;

    fn test_config() -> ConverterConfig {
        ConfigLoader::load_from_str(CONFIG_TOML, ConfigFormat::Toml).unwrap()
    }

    /// Pose sample: constant 1 m/s motion along +x, no rotation.
    fn pose_message(stamp: f64) -> Message {
        let pose = SensorPose::from_parts(
            Vector3::new(stamp, 0.0, 0.0),
            UnitQuaternion::identity(),
        );
        Message {
            topic: "/tf".into(),
            timestamp: stamp,
            payload: MessagePayload::Pose(PoseUpdate {
                frame_id: "/odom".to_string(),
                pose,
            }),
        }
    }

    /// Scan with one packet 50 ms after the header, one return at 10 m
    /// straight ahead.
    fn scan_message(stamp: f64) -> Message {
        Message {
            topic: "/velodyne_packets".into(),
            timestamp: stamp,
            payload: MessagePayload::Scan(LidarScan {
                header_stamp: stamp,
                packets: vec![ScanPacket {
                    stamp: stamp + 0.05,
                    data: returns_to_bytes(&[RawReturn::new(10.0, 0.0, 0.0, 1.0)]),
                }],
            }),
        }
    }

    fn diagnostics_message(stamp: f64) -> Message {
        Message::raw("/diagnostics", stamp, Bytes::from_static(b"status: ok"))
    }

    /// Write a session: poses covering t in [0, 10], scans at whole
    /// seconds 1..=9, one scan far outside pose coverage, diagnostics
    /// sprinkled in, plus a topic the conversion never selects.
    async fn write_session(path: &Path) {
        let mut writer = BagWriter::create(path).unwrap();

        let mut messages: Vec<Message> = Vec::new();
        for i in 0..=20 {
            messages.push(pose_message(i as f64 * 0.5));
        }
        for i in 1..=9 {
            messages.push(scan_message(i as f64));
        }
        messages.push(scan_message(100.0));
        messages.push(diagnostics_message(0.25));
        messages.push(diagnostics_message(5.25));
        messages.push(Message::raw(
            "/camera/image_raw",
            3.0,
            Bytes::from_static(&[0u8; 16]),
        ));

        messages.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        for message in &messages {
            writer.write(message).await.unwrap();
        }
        writer.close().await.unwrap();
    }

    /// Two-pass conversion, the same shape the CLI orchestrator runs.
    async fn convert(input: &Path, output: &Path, config: &ConverterConfig) {
        let mut pose_reader = BagReader::open(input, &[config.pose_topic.as_str()]).unwrap();
        let link = config.sensor_link.as_ref().map(|l| l.to_pose());
        let mut history = PoseHistory::new(config.pose_horizon_s).with_sensor_link(link);
        while let Some(message) = pose_reader.next_message().await.unwrap() {
            if let MessagePayload::Pose(update) = &message.payload {
                history.ingest(message.timestamp, update);
            }
        }

        let mut topics: Vec<&str> = vec![config.scan_topic.as_str(), config.pose_topic.as_str()];
        topics.extend(config.passthrough_topics.iter().map(String::as_str));

        let reader = BagReader::open(input, &topics).unwrap();
        let writer = BagWriter::create(output).unwrap();
        let decoder = SphericalDecoder::new(DecoderCalibration {
            min_range: config.range.min_range,
            max_range: config.range.max_range,
        });

        let mut conv = Converter::new(config, reader, writer, Arc::new(history), decoder);
        while conv.process_next().await.unwrap() {}
        conv.close().await.unwrap();
    }

    async fn read_all(path: &Path, topics: &[&str]) -> Vec<Message> {
        let mut reader = BagReader::open(path, topics).unwrap();
        let mut out = Vec::new();
        while let Some(message) = reader.next_message().await.unwrap() {
            out.push(message);
        }
        out
    }

    #[tokio::test]
    async fn test_e2e_scans_replaced_one_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("session.bag");
        let output = dir.path().join("deskewed.bag");

        write_session(&input).await;
        let config = test_config();
        convert(&input, &output, &config).await;

        let all_topics = [
            "/sensor_lidar",
            "/velodyne_packets",
            "/tf",
            "/diagnostics",
            "/camera/image_raw",
        ];
        let messages = read_all(&output, &all_topics).await;

        let clouds: Vec<&Message> = messages
            .iter()
            .filter(|m| m.topic == "/sensor_lidar")
            .collect();
        let raw_scans = messages
            .iter()
            .filter(|m| m.topic == "/velodyne_packets")
            .count();

        // 9 covered scans become clouds, the uncovered one vanishes,
        // no raw scan survives.
        assert_eq!(clouds.len(), 9);
        assert_eq!(raw_scans, 0);

        for (i, cloud) in clouds.iter().enumerate() {
            let expected_stamp = (i + 1) as f64;
            assert!((cloud.timestamp - expected_stamp).abs() < 1e-9);
            let MessagePayload::Cloud(ref data) = cloud.payload else {
                panic!("cloud topic carries non-cloud payload");
            };
            assert_eq!(data.frame_id, "velodyne");

            // 1 m/s along +x with the packet 50 ms after the anchor
            // shifts the 10 m return to 10.05 m in anchor coordinates.
            let points = data.points();
            assert_eq!(points.len(), 1);
            assert!((points[0].x - 10.05).abs() < 1e-4);
            assert!(points[0].y.abs() < 1e-4);
        }
    }

    #[tokio::test]
    async fn test_e2e_passthrough_and_order_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("session.bag");
        let output = dir.path().join("deskewed.bag");

        write_session(&input).await;
        let config = test_config();
        convert(&input, &output, &config).await;

        let messages = read_all(
            &output,
            &["/sensor_lidar", "/tf", "/diagnostics", "/camera/image_raw"],
        )
        .await;

        // 21 poses + 9 clouds + 2 diagnostics, nothing else. The
        // camera topic is not selected, so it never reaches the output.
        assert_eq!(messages.len(), 32);
        assert_eq!(messages.iter().filter(|m| m.topic == "/tf").count(), 21);
        assert_eq!(
            messages
                .iter()
                .filter(|m| m.topic == "/camera/image_raw")
                .count(),
            0
        );

        // Diagnostics survive byte for byte at their own stamps.
        let diags: Vec<&Message> = messages
            .iter()
            .filter(|m| m.topic == "/diagnostics")
            .collect();
        assert_eq!(diags.len(), 2);
        assert!((diags[0].timestamp - 0.25).abs() < 1e-9);
        assert!((diags[1].timestamp - 5.25).abs() < 1e-9);
        for diag in diags {
            let MessagePayload::Raw(ref bytes) = diag.payload else {
                panic!("diagnostics payload was reinterpreted");
            };
            assert_eq!(bytes.as_ref(), b"status: ok");
        }

        // Output order mirrors input order: stamps never decrease,
        // except the cloud for a scan stays exactly where the scan was.
        let input_messages = read_all(
            &input,
            &["/velodyne_packets", "/tf", "/diagnostics"],
        )
        .await;
        let expected_topics: Vec<String> = input_messages
            .iter()
            .filter(|m| !(m.topic == "/velodyne_packets" && m.timestamp > 10.0))
            .map(|m| {
                if m.topic == "/velodyne_packets" {
                    "/sensor_lidar".to_string()
                } else {
                    m.topic.to_string()
                }
            })
            .collect();
        let actual_topics: Vec<String> =
            messages.iter().map(|m| m.topic.to_string()).collect();
        assert_eq!(actual_topics, expected_topics);
    }

    #[tokio::test]
    async fn test_e2e_no_poses_drops_every_scan() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("session.bag");
        let output = dir.path().join("deskewed.bag");

        // Session without any pose message.
        let mut writer = BagWriter::create(&input).unwrap();
        for i in 1..=3 {
            writer.write(&scan_message(i as f64)).await.unwrap();
        }
        writer.write(&diagnostics_message(2.5)).await.unwrap();
        writer.close().await.unwrap();

        let config = test_config();
        convert(&input, &output, &config).await;

        let messages = read_all(&output, &["/sensor_lidar", "/diagnostics"]).await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, "/diagnostics");
    }

    #[tokio::test]
    async fn test_e2e_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("session.bag");
        let first = dir.path().join("first.bag");
        let second = dir.path().join("second.bag");

        write_session(&input).await;
        let config = test_config();
        convert(&input, &first, &config).await;
        convert(&input, &second, &config).await;

        let a = std::fs::read(&first).unwrap();
        let b = std::fs::read(&second).unwrap();
        assert_eq!(a, b);
    }
}

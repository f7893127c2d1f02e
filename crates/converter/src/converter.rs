//! Replay/output orchestrator.

use std::sync::Arc;

use contracts::{
    ConvertError, ConverterConfig, LogSink, LogSource, Message, MessagePayload, PacketDecoder,
    PointCloudData, PoseProvider, SensorPose, TopicName,
};
use observability::{record_cloud_emitted, record_message_read, record_passthrough, record_scan_dropped};
use tracing::{debug, instrument, warn};

use crate::assembler::ScanAssembler;
use crate::state::ConverterState;
use crate::stats::ConverterStats;

/// Drives the merged input stream: scan messages go through the
/// assembler, everything else passes through verbatim, and every result
/// is written to the sink in arrival order.
///
/// Strictly sequential: `process_next` fully handles one message,
/// including the sink write, before returning. Abort between messages by
/// simply not calling it again; the only cleanup owed is `close`.
pub struct Converter<S, K, P, D> {
    source: S,
    sink: K,
    provider: Arc<P>,
    assembler: ScanAssembler<P, D>,
    state: ConverterState,
    stats: ConverterStats,
    scan_topic: TopicName,
    output_topic: TopicName,
}

impl<S, K, P, D> Converter<S, K, P, D>
where
    S: LogSource,
    K: LogSink,
    P: PoseProvider,
    D: PacketDecoder,
{
    pub fn new(config: &ConverterConfig, source: S, sink: K, provider: Arc<P>, decoder: D) -> Self {
        let assembler = ScanAssembler::new(
            Arc::clone(&provider),
            decoder,
            config.pose_frame_id.clone(),
            config.output_frame_id.clone(),
        );

        Self {
            source,
            sink,
            provider,
            assembler,
            state: ConverterState::new(config.sensor_time_offset),
            stats: ConverterStats::default(),
            scan_topic: TopicName::from(&config.scan_topic),
            output_topic: TopicName::from(&config.output_topic),
        }
    }

    /// Process exactly one input message.
    ///
    /// Returns `Ok(false)` when the source is exhausted; the caller must
    /// then finalize the sink via [`Converter::close`].
    ///
    /// # Errors
    /// Only source and sink I/O failures propagate. Pose gaps and
    /// undecodable packets are absorbed into the shape of the output.
    #[instrument(name = "converter_process_next", level = "trace", skip(self))]
    pub async fn process_next(&mut self) -> Result<bool, ConvertError> {
        let Some(message) = self.source.next_message().await? else {
            debug!("input log exhausted");
            return Ok(false);
        };
        self.stats.messages_read += 1;
        record_message_read();

        if message.topic == self.scan_topic {
            self.process_scan(message).await?;
        } else {
            // Opaque unit: no parsing, no validation, no reordering.
            self.sink.write(&message).await?;
            self.stats.messages_passed_through += 1;
            record_passthrough(message.topic.as_str());
        }

        Ok(true)
    }

    async fn process_scan(&mut self, message: Message) -> Result<(), ConvertError> {
        let MessagePayload::Scan(scan) = message.payload else {
            warn!(
                topic = %message.topic,
                timestamp = message.timestamp,
                "message on scan topic is not a scan payload, skipping"
            );
            return Ok(());
        };

        self.stats.scans_processed += 1;

        match self.assembler.assemble(&scan, &mut self.state) {
            Some(cloud) => {
                debug!(
                    frame = self.state.frame_counter,
                    size = cloud.len(),
                    stamp = cloud.stamp,
                    "assembled cloud"
                );
                record_cloud_emitted(self.state.frame_counter, cloud.len());
                self.stats.clouds_emitted += 1;
                self.stats.points_written += cloud.len() as u64;
                self.stats.cloud_sizes.push(cloud.len() as f64);

                let out = Message {
                    topic: self.output_topic.clone(),
                    timestamp: cloud.stamp,
                    payload: MessagePayload::Cloud(PointCloudData::from(&cloud)),
                };
                self.sink.write(&out).await?;
            }
            None => {
                // Whole-scan drop: zero output messages for this input,
                // never a filler message.
                self.stats.scans_dropped_no_anchor += 1;
                record_scan_dropped();
            }
        }

        Ok(())
    }

    /// Offset-corrected timestamp of the most recently attempted scan.
    pub fn latest_sensor_stamp(&self) -> Option<f64> {
        self.state.last_sensor_stamp
    }

    /// Pose of `frame_id` at the latest sensor timestamp.
    ///
    /// This is the hook auxiliary log-derived streams use to obtain a
    /// synchronized pose without re-deriving scan timing themselves.
    pub fn pose_for_frame(&self, frame_id: &str) -> Option<SensorPose> {
        let stamp = self.state.last_sensor_stamp?;
        self.provider.pose_at(stamp, frame_id)
    }

    /// Finalize the output sink.
    pub async fn close(&mut self) -> Result<(), ConvertError> {
        self.sink.close().await
    }

    /// Run counters, including assembler-level packet counts.
    pub fn stats(&self) -> ConverterStats {
        let mut stats = self.stats.clone();
        stats.packets_skipped = self.assembler.packets_skipped();
        stats.packets_assembled = self.assembler.packets_assembled();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CannedPoseProvider, CountingDecoder, MemorySink, MemorySource};
    use bytes::Bytes;
    use contracts::{LidarScan, ScanPacket};

    fn config() -> ConverterConfig {
        serde_json::from_str(
            r#"{
                "scan_topic": "/velodyne_packets",
                "pose_frame_id": "/odom",
                "passthrough_topics": ["/diagnostics"]
            }"#,
        )
        .unwrap()
    }

    fn scan_message(header_stamp: f64, packet_stamps: &[(f64, usize)]) -> Message {
        Message {
            topic: "/velodyne_packets".into(),
            timestamp: header_stamp,
            payload: MessagePayload::Scan(LidarScan {
                header_stamp,
                packets: packet_stamps
                    .iter()
                    .map(|&(stamp, n)| ScanPacket {
                        stamp,
                        data: Bytes::from(vec![0u8; n]),
                    })
                    .collect(),
            }),
        }
    }

    fn raw_message(topic: &str, timestamp: f64, data: &'static [u8]) -> Message {
        Message::raw(topic, timestamp, Bytes::from_static(data))
    }

    fn converter(
        provider: CannedPoseProvider,
        messages: Vec<Message>,
    ) -> Converter<MemorySource, MemorySink, CannedPoseProvider, CountingDecoder> {
        Converter::new(
            &config(),
            MemorySource::new(messages),
            MemorySink::new(),
            Arc::new(provider),
            CountingDecoder,
        )
    }

    async fn run_to_end<S, K, P, D>(conv: &mut Converter<S, K, P, D>)
    where
        S: LogSource,
        K: LogSink,
        P: PoseProvider,
        D: PacketDecoder,
    {
        while conv.process_next().await.unwrap() {}
        conv.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_replaced_one_to_one() {
        let provider = CannedPoseProvider::new(vec![100.0], vec![100.0, 101.0]);
        let mut conv = converter(
            provider,
            vec![scan_message(100.0, &[(100.0, 1), (101.0, 1), (102.0, 1)])],
        );
        run_to_end(&mut conv).await;

        let written = &conv.sink.written;
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].topic, "/sensor_lidar");
        assert_eq!(written[0].timestamp, 100.0);
        match &written[0].payload {
            MessagePayload::Cloud(cloud) => assert_eq!(cloud.num_points, 2),
            other => panic!("expected cloud, got {other:?}"),
        }

        let stats = conv.stats();
        assert_eq!(stats.clouds_emitted, 1);
        assert_eq!(stats.packets_skipped, 1);
    }

    #[tokio::test]
    async fn test_dropped_scan_writes_nothing() {
        let provider = CannedPoseProvider::new(vec![], vec![]);
        let mut conv = converter(provider, vec![scan_message(100.0, &[(100.0, 1)])]);
        run_to_end(&mut conv).await;

        assert!(conv.sink.written.is_empty());
        let stats = conv.stats();
        assert_eq!(stats.scans_processed, 1);
        assert_eq!(stats.scans_dropped_no_anchor, 1);
        // Attempted timestamp still exposed for auxiliary consumers
        assert_eq!(conv.latest_sensor_stamp(), Some(100.0));
    }

    #[tokio::test]
    async fn test_passthrough_preserves_topic_timestamp_payload() {
        let provider = CannedPoseProvider::default();
        let mut conv = converter(
            provider,
            vec![raw_message("/diagnostics", 50.0, b"diag blob")],
        );
        run_to_end(&mut conv).await;

        let written = &conv.sink.written;
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].topic, "/diagnostics");
        assert_eq!(written[0].timestamp, 50.0);
        match &written[0].payload {
            MessagePayload::Raw(data) => assert_eq!(data.as_ref(), b"diag blob"),
            other => panic!("expected raw passthrough, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_output_order_mirrors_input_order() {
        let provider = CannedPoseProvider::new(vec![5.0], vec![5.0]);
        let mut conv = converter(
            provider,
            vec![
                raw_message("/diagnostics", 1.0, b"a"),
                scan_message(5.0, &[(5.0, 2)]),
                raw_message("/diagnostics", 9.0, b"b"),
            ],
        );
        run_to_end(&mut conv).await;

        let topics: Vec<_> = conv.sink.written.iter().map(|m| m.topic.to_string()).collect();
        assert_eq!(topics, vec!["/diagnostics", "/sensor_lidar", "/diagnostics"]);
        let stamps: Vec<_> = conv.sink.written.iter().map(|m| m.timestamp).collect();
        assert_eq!(stamps, vec![1.0, 5.0, 9.0]);
    }

    #[tokio::test]
    async fn test_source_exhaustion_is_normal_termination() {
        let mut conv = converter(CannedPoseProvider::default(), vec![]);
        assert!(!conv.process_next().await.unwrap());
        conv.close().await.unwrap();
        assert!(conv.sink.closed);
    }

    #[tokio::test]
    async fn test_non_scan_payload_on_scan_topic_is_skipped() {
        let provider = CannedPoseProvider::new(vec![1.0], vec![1.0]);
        let mut conv = converter(
            provider,
            vec![Message::raw("/velodyne_packets", 1.0, Bytes::from_static(b"junk"))],
        );
        run_to_end(&mut conv).await;

        assert!(conv.sink.written.is_empty());
        assert_eq!(conv.stats().scans_processed, 0);
    }

    #[tokio::test]
    async fn test_pose_for_frame_uses_latest_attempt() {
        let provider = CannedPoseProvider::new(vec![100.0], vec![100.0]);
        let mut conv = converter(provider, vec![scan_message(100.0, &[(100.0, 1)])]);

        assert!(conv.pose_for_frame("/odom").is_none());
        run_to_end(&mut conv).await;
        assert!(conv.pose_for_frame("/odom").is_some());
    }

    #[tokio::test]
    async fn test_empty_cloud_still_emitted() {
        // Anchor present, every packet transform missing
        let provider = CannedPoseProvider::new(vec![100.0], vec![]);
        let mut conv = converter(provider, vec![scan_message(100.0, &[(100.5, 3)])]);
        run_to_end(&mut conv).await;

        assert_eq!(conv.sink.written.len(), 1);
        match &conv.sink.written[0].payload {
            MessagePayload::Cloud(cloud) => assert_eq!(cloud.num_points, 0),
            other => panic!("expected cloud, got {other:?}"),
        }
    }
}

//! Message - Log Source output
//!
//! One timestamped, topic-tagged record from a recorded session.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{PointCloudData, PoseUpdate, TopicName};

/// One log message.
///
/// Immutable once read; for non-scan topics ownership passes from the
/// source to the sink unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Topic the message was recorded under
    pub topic: TopicName,

    /// Recording timestamp (seconds, f64) - primary clock
    pub timestamp: f64,

    /// Data payload
    pub payload: MessagePayload,
}

impl Message {
    /// Build a passthrough message with an opaque payload.
    pub fn raw(topic: impl Into<TopicName>, timestamp: f64, data: Bytes) -> Self {
        Self {
            topic: topic.into(),
            timestamp,
            payload: MessagePayload::Raw(data),
        }
    }
}

/// Message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessagePayload {
    /// One rotating-lidar acquisition cycle (raw packets)
    Scan(LidarScan),

    /// One sample of the pose stream (tf-equivalent)
    Pose(PoseUpdate),

    /// Motion-compensated point cloud (converter output)
    Cloud(PointCloudData),

    /// Opaque bytes (diagnostics, odometry, anything passed through)
    Raw(Bytes),
}

/// One raw lidar scan: an ordered sequence of hardware packets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LidarScan {
    /// Scan header timestamp (start of the acquisition cycle)
    pub header_stamp: f64,

    /// Hardware packets in acquisition order
    pub packets: Vec<ScanPacket>,
}

/// One hardware-level chunk of a scan.
///
/// Invariant (capture hardware, not validated here): `stamp` is >= the
/// owning scan's `header_stamp` and non-decreasing across the sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanPacket {
    /// Packet acquisition timestamp
    pub stamp: f64,

    /// Raw sensor bytes, decoded by the packet decoder
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serde_roundtrip() {
        let msg = Message {
            topic: "/velodyne_packets".into(),
            timestamp: 12.5,
            payload: MessagePayload::Scan(LidarScan {
                header_stamp: 12.4,
                packets: vec![ScanPacket {
                    stamp: 12.41,
                    data: Bytes::from_static(&[1, 2, 3, 4]),
                }],
            }),
        };

        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.topic, "/velodyne_packets");
        match back.payload {
            MessagePayload::Scan(scan) => {
                assert_eq!(scan.packets.len(), 1);
                assert_eq!(scan.packets[0].data.as_ref(), &[1, 2, 3, 4]);
            }
            other => panic!("expected scan payload, got {other:?}"),
        }
    }
}

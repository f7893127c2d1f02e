//! Test doubles for the converter's collaborators.
//!
//! Public so the integration crate can drive the orchestrator without a
//! real pose store, decoder, or bag on disk.

use std::collections::VecDeque;

use contracts::{
    ContractResult, LogSink, LogSource, Message, PacketDecoder, Point, PoseProvider,
    RelativeTransform, SensorPose,
};
use nalgebra::{Translation3, UnitQuaternion};

const TIME_EPS: f64 = 1e-9;

/// Pose provider with canned availability.
///
/// `pose_at` answers only for the listed anchor times; `relative_transform`
/// answers only when the queried stamp is listed. With a drift rate set,
/// the returned transform translates points by `drift * (stamp - anchor)`
/// along x so tests can observe that the transform was actually applied.
#[derive(Debug, Clone, Default)]
pub struct CannedPoseProvider {
    anchor_times: Vec<f64>,
    transform_times: Vec<f64>,
    drift: f64,
}

impl CannedPoseProvider {
    pub fn new(anchor_times: Vec<f64>, transform_times: Vec<f64>) -> Self {
        Self {
            anchor_times,
            transform_times,
            drift: 0.0,
        }
    }

    /// Translate transformed points by `drift` meters per second of
    /// anchor-to-stamp delta.
    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }
}

fn contains(times: &[f64], stamp: f64) -> bool {
    times.iter().any(|t| (t - stamp).abs() < TIME_EPS)
}

impl PoseProvider for CannedPoseProvider {
    fn pose_at(&self, stamp: f64, _frame_id: &str) -> Option<SensorPose> {
        contains(&self.anchor_times, stamp).then(SensorPose::identity)
    }

    fn relative_transform(
        &self,
        anchor: f64,
        stamp: f64,
        _frame_id: &str,
    ) -> Option<RelativeTransform> {
        if !contains(&self.transform_times, stamp) {
            return None;
        }
        let shift = self.drift * (stamp - anchor);
        Some(RelativeTransform(nalgebra::Isometry3::from_parts(
            Translation3::new(shift, 0.0, 0.0),
            UnitQuaternion::identity(),
        )))
    }
}

/// Decoder producing one unit point per payload byte.
///
/// Lets tests encode "this packet decodes to N points" as an N-byte
/// payload without a real wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingDecoder;

impl PacketDecoder for CountingDecoder {
    fn decode(&self, data: &[u8]) -> Vec<Point> {
        vec![Point::new(0.0, 0.0, 0.0); data.len()]
    }
}

/// In-memory log source over a fixed message sequence.
#[derive(Debug, Default)]
pub struct MemorySource {
    messages: VecDeque<Message>,
}

impl MemorySource {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages: messages.into(),
        }
    }
}

impl LogSource for MemorySource {
    async fn next_message(&mut self) -> ContractResult<Option<Message>> {
        Ok(self.messages.pop_front())
    }
}

/// In-memory log sink recording every write in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub written: Vec<Message>,
    pub closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(&mut self, message: &Message) -> ContractResult<()> {
        if self.closed {
            return Err(contracts::ConvertError::BagClosed);
        }
        self.written.push(message.clone());
        Ok(())
    }

    async fn close(&mut self) -> ContractResult<()> {
        self.closed = true;
        Ok(())
    }
}

//! Motion-compensated scan assembler.
//!
//! For each scan, resolves the platform's pose history to correct for
//! motion during the acquisition window and assembles per-packet point
//! sets into one cloud anchored at the scan's reference time.

use std::sync::Arc;

use contracts::{AssembledCloud, LidarScan, PacketDecoder, PoseProvider};
use metrics::counter;
use tracing::{debug, trace};

use crate::state::ConverterState;

/// Assembles one scan into at most one motion-compensated cloud.
///
/// Failure policy is two-tier and deliberate:
/// - no anchor pose at the scan's reference time drops the whole scan,
/// - a missing per-packet transform skips only that packet's points.
/// The two must not be unified; downstream consumers reason about
/// completeness from exactly this distinction.
pub struct ScanAssembler<P, D> {
    provider: Arc<P>,
    decoder: D,
    pose_frame_id: String,
    output_frame_id: String,
    packets_skipped: u64,
    packets_assembled: u64,
}

impl<P: PoseProvider, D: PacketDecoder> ScanAssembler<P, D> {
    pub fn new(
        provider: Arc<P>,
        decoder: D,
        pose_frame_id: impl Into<String>,
        output_frame_id: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            decoder,
            pose_frame_id: pose_frame_id.into(),
            output_frame_id: output_frame_id.into(),
            packets_skipped: 0,
            packets_assembled: 0,
        }
    }

    /// Packets whose transform lookup failed, across the whole run.
    pub fn packets_skipped(&self) -> u64 {
        self.packets_skipped
    }

    /// Packets whose points made it into a cloud, across the whole run.
    pub fn packets_assembled(&self) -> u64 {
        self.packets_assembled
    }

    /// Assemble one scan.
    ///
    /// Returns `None` only when no anchor pose covers the scan's
    /// reference time; every other degradation (empty scan, skipped
    /// packets, decoder rejects) still yields a cloud, possibly with zero
    /// points. Callers that want to suppress empty clouds do so at the
    /// orchestrator boundary, not here.
    pub fn assemble(
        &mut self,
        scan: &LidarScan,
        state: &mut ConverterState,
    ) -> Option<AssembledCloud> {
        let t0 = scan.header_stamp + state.time_offset;

        // Recorded before the anchor check: auxiliary-frame consumers need
        // the most recent *attempted* timestamp either way.
        state.last_sensor_stamp = Some(t0);

        if self.provider.pose_at(t0, &self.pose_frame_id).is_none() {
            debug!(t0, frame_id = %self.pose_frame_id, "no anchor pose, dropping scan");
            return None;
        }

        let mut points = Vec::new();
        for packet in &scan.packets {
            // One packet's decoded points live at a time; the buffer is
            // dropped at the end of each iteration.
            let decoded = self.decoder.decode(&packet.data);
            let t1 = packet.stamp + state.time_offset;

            match self.provider.relative_transform(t0, t1, &self.pose_frame_id) {
                Some(rel) => {
                    rel.apply_all(&decoded, &mut points);
                    self.packets_assembled += 1;
                }
                None => {
                    trace!(t0, t1, "no per-packet transform, skipping packet");
                    counter!("deskew_packets_skipped_total").increment(1);
                    self.packets_skipped += 1;
                }
            }
        }

        state.frame_counter += 1;
        Some(AssembledCloud {
            stamp: t0,
            frame_id: self.output_frame_id.clone(),
            points,
        })
    }
}

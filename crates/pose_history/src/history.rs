//! Multi-frame pose store implementing the `PoseProvider` contract.

use std::collections::HashMap;

use contracts::{PoseProvider, PoseUpdate, RelativeTransform, SensorPose};
use tracing::{debug, trace};

use crate::track::PoseTrack;

/// Pose history provider: one `PoseTrack` per named frame, bounded by a
/// retention horizon, with an optional static sensor link composed onto
/// every interpolated pose.
///
/// The link covers logs whose pose stream describes the vehicle body or
/// odometry origin rather than the sensor itself: every query result is
/// `track_pose * link`, so callers always reason in sensor coordinates.
pub struct PoseHistory {
    tracks: HashMap<String, PoseTrack>,
    horizon_s: f64,
    sensor_link: Option<SensorPose>,
    ingested: u64,
}

impl PoseHistory {
    /// Create an empty store retaining `horizon_s` seconds per track.
    pub fn new(horizon_s: f64) -> Self {
        Self {
            tracks: HashMap::new(),
            horizon_s,
            sensor_link: None,
            ingested: 0,
        }
    }

    /// Compose `link` onto every interpolated pose before returning it.
    pub fn with_sensor_link(mut self, link: Option<SensorPose>) -> Self {
        self.sensor_link = link;
        self
    }

    /// Ingest one sample from the pose stream.
    pub fn ingest(&mut self, stamp: f64, update: &PoseUpdate) {
        let track = self.tracks.entry(update.frame_id.clone()).or_default();
        track.insert(stamp, update.pose);
        track.prune(self.horizon_s);
        self.ingested += 1;
        trace!(frame_id = %update.frame_id, stamp, "pose sample ingested");
    }

    /// Total samples ingested (before pruning).
    pub fn sample_count(&self) -> u64 {
        self.ingested
    }

    /// Frames with at least one retained sample.
    pub fn frame_ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Covered interval of one frame's track.
    pub fn span(&self, frame_id: &str) -> Option<(f64, f64)> {
        self.tracks.get(frame_id).and_then(PoseTrack::span)
    }

    /// Log per-track coverage at debug level. Called once after the
    /// preliminary ingest pass.
    pub fn log_coverage(&self) {
        for (frame_id, track) in &self.tracks {
            if let Some((first, last)) = track.span() {
                debug!(
                    frame_id = %frame_id,
                    samples = track.len(),
                    first,
                    last,
                    out_of_order = track.out_of_order_count(),
                    pruned = track.pruned_count(),
                    "pose track coverage"
                );
            }
        }
    }

    fn linked_pose_at(&self, stamp: f64, frame_id: &str) -> Option<SensorPose> {
        let pose = self.tracks.get(frame_id)?.pose_at(stamp)?;
        Some(match &self.sensor_link {
            Some(link) => pose.compose(link),
            None => pose,
        })
    }
}

impl PoseProvider for PoseHistory {
    fn pose_at(&self, stamp: f64, frame_id: &str) -> Option<SensorPose> {
        self.linked_pose_at(stamp, frame_id)
    }

    fn relative_transform(
        &self,
        anchor: f64,
        stamp: f64,
        frame_id: &str,
    ) -> Option<RelativeTransform> {
        let at_anchor = self.linked_pose_at(anchor, frame_id)?;
        let at_stamp = self.linked_pose_at(stamp, frame_id)?;
        Some(RelativeTransform::between(&at_anchor, &at_stamp))
    }
}

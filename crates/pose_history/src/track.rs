//! Per-frame pose track with timestamp-ordered storage and interpolation.

use contracts::SensorPose;
use nalgebra::Isometry3;

/// One timestamped pose sample.
#[derive(Debug, Clone, Copy)]
struct PoseSample {
    stamp: f64,
    pose: Isometry3<f64>,
}

/// Timestamp-ordered pose samples for a single named frame.
///
/// Samples normally arrive in recording order; a late sample is inserted
/// at its sorted position and counted, mirroring how out-of-order packets
/// are tracked elsewhere in the pipeline.
#[derive(Debug, Default)]
pub struct PoseTrack {
    samples: Vec<PoseSample>,
    out_of_order_count: u64,
    pruned_count: u64,
}

impl PoseTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples that arrived behind an already-stored timestamp.
    pub fn out_of_order_count(&self) -> u64 {
        self.out_of_order_count
    }

    /// Samples discarded by horizon pruning.
    pub fn pruned_count(&self) -> u64 {
        self.pruned_count
    }

    /// Covered time interval, if any samples are present.
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.stamp, last.stamp)),
            _ => None,
        }
    }

    /// Insert one sample, keeping the track sorted by timestamp.
    pub fn insert(&mut self, stamp: f64, pose: SensorPose) {
        let sample = PoseSample { stamp, pose: pose.0 };

        match self.samples.last() {
            Some(last) if last.stamp > stamp => {
                self.out_of_order_count += 1;
                let idx = self.samples.partition_point(|s| s.stamp <= stamp);
                self.samples.insert(idx, sample);
            }
            _ => self.samples.push(sample),
        }
    }

    /// Drop samples older than `newest - horizon_s`.
    pub fn prune(&mut self, horizon_s: f64) {
        let Some(last) = self.samples.last() else {
            return;
        };
        let cutoff = last.stamp - horizon_s;
        let keep_from = self.samples.partition_point(|s| s.stamp < cutoff);
        if keep_from > 0 {
            self.pruned_count += keep_from as u64;
            self.samples.drain(..keep_from);
        }
    }

    /// Interpolated pose at `stamp`, or `None` when `stamp` falls outside
    /// the covered interval (no extrapolation).
    pub fn pose_at(&self, stamp: f64) -> Option<SensorPose> {
        let (first, last) = self.span()?;
        if stamp < first || stamp > last {
            return None;
        }

        // Index of the first sample with stamp >= query
        let idx = self.samples.partition_point(|s| s.stamp < stamp);
        let upper = self.samples[idx];
        if upper.stamp == stamp || idx == 0 {
            return Some(SensorPose(upper.pose));
        }

        let lower = self.samples[idx - 1];
        let dt = upper.stamp - lower.stamp;
        if dt <= 0.0 {
            // Duplicate timestamps; either sample is as good as the other
            return Some(SensorPose(upper.pose));
        }

        let alpha = (stamp - lower.stamp) / dt;
        Some(SensorPose(lower.pose.lerp_slerp(&upper.pose, alpha)))
    }
}

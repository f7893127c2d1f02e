//! External collaborator interfaces: pose history and packet decoding.
//!
//! Both are pure query interfaces so the scan assembler carries no
//! dependency on interpolation or decode internals, and tests can
//! substitute doubles with canned poses and fixed point sets.

use crate::{Point, RelativeTransform, SensorPose};

/// Time-indexed pose store answering point-in-time and interval queries.
///
/// `None` means the store has no data covering the requested time (before
/// the first or after the last sample of that frame's track). This is an
/// expected steady-state condition near the start and end of a session,
/// not an error.
pub trait PoseProvider: Send + Sync {
    /// Interpolated pose of `frame_id` at `stamp`, in the fixed frame.
    fn pose_at(&self, stamp: f64, frame_id: &str) -> Option<SensorPose>;

    /// Transform taking a point measured at `stamp` into the frame the
    /// sensor occupied at `anchor`.
    fn relative_transform(
        &self,
        anchor: f64,
        stamp: f64,
        frame_id: &str,
    ) -> Option<RelativeTransform>;
}

/// Decodes one hardware packet into sensor-local points.
///
/// Calibration is captured at construction. A decoder may reject a
/// malformed packet by producing zero points; that is not an error for
/// any caller.
pub trait PacketDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Vec<Point>;
}

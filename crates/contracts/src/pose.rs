//! Pose and transform value objects.
//!
//! Thin newtypes over `nalgebra::Isometry3<f64>` so business crates agree
//! on one pose representation without re-exporting nalgebra everywhere.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::Point;

/// Pose of the sensor in the fixed world frame.
///
/// Read-only value object as returned by the pose history provider; the
/// core never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorPose(pub Isometry3<f64>);

impl SensorPose {
    /// Identity pose (at the origin, no rotation).
    pub fn identity() -> Self {
        Self(Isometry3::identity())
    }

    /// Build a pose from a translation and a unit quaternion.
    pub fn from_parts(translation: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self(Isometry3::from_parts(Translation3::from(translation), rotation))
    }

    /// Position component.
    pub fn position(&self) -> Vector3<f64> {
        self.0.translation.vector
    }

    /// Orientation component.
    pub fn orientation(&self) -> UnitQuaternion<f64> {
        self.0.rotation
    }

    /// Compose another pose onto this one (`self * other`).
    pub fn compose(&self, other: &SensorPose) -> SensorPose {
        Self(self.0 * other.0)
    }
}

impl Default for SensorPose {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Isometry3<f64>> for SensorPose {
    fn from(iso: Isometry3<f64>) -> Self {
        Self(iso)
    }
}

/// Rigid transform taking a point measured at time `t1` into the frame
/// anchored at time `t0` ("where was the sensor at t1, relative to where
/// it was at t0").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeTransform(pub Isometry3<f64>);

impl RelativeTransform {
    pub fn identity() -> Self {
        Self(Isometry3::identity())
    }

    /// Relative transform between two sensor poses: points in the `at`
    /// frame re-expressed in the `anchor` frame.
    pub fn between(anchor: &SensorPose, at: &SensorPose) -> Self {
        Self(anchor.0.inv_mul(&at.0))
    }

    /// Apply the transform to a single sensor-local point.
    pub fn apply(&self, p: Point) -> Point {
        let q = self.0.transform_point(&Point3::new(p.x as f64, p.y as f64, p.z as f64));
        Point::new(q.x as f32, q.y as f32, q.z as f32)
    }

    /// Apply the transform to a point buffer, appending results to `out`.
    pub fn apply_all(&self, points: &[Point], out: &mut Vec<Point>) {
        out.reserve(points.len());
        out.extend(points.iter().map(|&p| self.apply(p)));
    }
}

impl From<Isometry3<f64>> for RelativeTransform {
    fn from(iso: Isometry3<f64>) -> Self {
        Self(iso)
    }
}

/// One sample on the pose topic (tf-equivalent stream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseUpdate {
    /// Named frame this sample belongs to (e.g. "/odom")
    pub frame_id: String,

    /// Pose of that frame in the fixed world frame
    pub pose: SensorPose,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_relative_transform_identity_for_equal_poses() {
        let pose = SensorPose::from_parts(
            Vector3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let rel = RelativeTransform::between(&pose, &pose);
        let p = Point::new(1.0, -1.0, 0.5);
        let q = rel.apply(p);
        assert!((q.x - p.x).abs() < 1e-6);
        assert!((q.y - p.y).abs() < 1e-6);
        assert!((q.z - p.z).abs() < 1e-6);
    }

    #[test]
    fn test_relative_transform_pure_translation() {
        // Sensor moved +1m in x between t0 and t1: a point seen at t1 lands
        // one meter further along x when expressed in the t0 frame.
        let at_t0 = SensorPose::identity();
        let at_t1 =
            SensorPose::from_parts(Vector3::new(1.0, 0.0, 0.0), UnitQuaternion::identity());
        let rel = RelativeTransform::between(&at_t0, &at_t1);
        let q = rel.apply(Point::new(0.0, 0.0, 0.0));
        assert!((q.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_relative_transform_rotation() {
        let at_t0 = SensorPose::identity();
        let at_t1 = SensorPose::from_parts(
            Vector3::zeros(),
            UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
        );
        let rel = RelativeTransform::between(&at_t0, &at_t1);
        // x axis of the t1 sensor points along world y after a +90 deg yaw
        let q = rel.apply(Point::new(1.0, 0.0, 0.0));
        assert!(q.x.abs() < 1e-6);
        assert!((q.y - 1.0).abs() < 1e-6);
    }
}

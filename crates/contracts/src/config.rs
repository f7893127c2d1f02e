//! ConverterConfig - Config Loader output
//!
//! Describes one conversion run: which topics to read, which frame to
//! motion-correct against, and how the replaced scan topic is labelled on
//! the way out.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::SensorPose;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete converter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConverterConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Topic carrying raw lidar scans
    #[validate(length(min = 1))]
    pub scan_topic: String,

    /// Topic carrying the pose stream (tf-equivalent)
    #[serde(default = "default_pose_topic")]
    #[validate(length(min = 1))]
    pub pose_topic: String,

    /// Topic the motion-compensated clouds are written under
    #[serde(default = "default_output_topic")]
    #[validate(length(min = 1))]
    pub output_topic: String,

    /// Frame label stamped onto every output cloud
    #[serde(default = "default_output_frame")]
    #[validate(length(min = 1))]
    pub output_frame_id: String,

    /// Named frame whose pose history motion-corrects the points
    #[validate(length(min = 1))]
    pub pose_frame_id: String,

    /// Fixed world frame the pose stream is expressed in
    #[serde(default = "default_fixed_frame")]
    pub fixed_frame_id: String,

    /// Offset (seconds) added to every sensor stamp before pose queries
    #[serde(default)]
    pub sensor_time_offset: f64,

    /// Duration (seconds) the pose history must retain
    #[serde(default = "default_pose_horizon")]
    #[validate(range(min = 1.0))]
    pub pose_horizon_s: f64,

    /// Additional topics forwarded verbatim to the output log
    #[serde(default)]
    pub passthrough_topics: Vec<String>,

    /// Optional static link taking the pose frame (e.g. /odom) to the
    /// sensor frame, composed onto every interpolated pose
    #[serde(default)]
    pub sensor_link: Option<StaticLinkConfig>,

    /// Decoder range gate
    #[serde(default)]
    #[validate(nested)]
    pub range: RangeConfig,
}

fn default_pose_topic() -> String {
    "/tf".to_string()
}

fn default_output_topic() -> String {
    "/sensor_lidar".to_string()
}

fn default_output_frame() -> String {
    "velodyne".to_string()
}

fn default_fixed_frame() -> String {
    "world".to_string()
}

fn default_pose_horizon() -> f64 {
    3600.0
}

/// Static transform between two frames, configured as translation plus
/// roll/pitch/yaw in radians.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StaticLinkConfig {
    pub translation: LinkTranslation,
    #[serde(default)]
    pub rotation: LinkRotation,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinkTranslation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinkRotation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl StaticLinkConfig {
    /// Materialize the configured link as a pose.
    pub fn to_pose(&self) -> SensorPose {
        SensorPose::from_parts(
            Vector3::new(self.translation.x, self.translation.y, self.translation.z),
            UnitQuaternion::from_euler_angles(
                self.rotation.roll,
                self.rotation.pitch,
                self.rotation.yaw,
            ),
        )
    }
}

/// Decoder range gate: points outside [min_range, max_range] meters are
/// discarded at decode time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct RangeConfig {
    #[validate(range(min = 0.0))]
    pub min_range: f64,
    #[validate(range(min = 0.0))]
    pub max_range: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            min_range: 2.0,
            max_range: 130.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ConverterConfig {
        serde_json::from_str(
            r#"{
                "scan_topic": "/velodyne_packets",
                "pose_frame_id": "/odom"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = minimal();
        assert_eq!(config.pose_topic, "/tf");
        assert_eq!(config.output_topic, "/sensor_lidar");
        assert_eq!(config.output_frame_id, "velodyne");
        assert_eq!(config.sensor_time_offset, 0.0);
        assert_eq!(config.pose_horizon_s, 3600.0);
        assert!(config.sensor_link.is_none());
        assert_eq!(config.range.max_range, 130.0);
    }

    #[test]
    fn test_derive_validation_rejects_empty_topic() {
        let mut config = minimal();
        config.scan_topic.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_static_link_pose() {
        let link = StaticLinkConfig {
            translation: LinkTranslation {
                x: 0.5,
                y: 0.0,
                z: 1.2,
            },
            rotation: LinkRotation::default(),
        };
        let pose = link.to_pose();
        assert_eq!(pose.position().x, 0.5);
        assert_eq!(pose.position().z, 1.2);
    }
}

//! AssembledCloud - Scan Assembler output
//!
//! The single motion-compensated output unit produced per processed scan.

use serde::{Deserialize, Serialize};

/// One 3-D point in the output reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Motion-compensated point cloud assembled from exactly one scan.
///
/// Carries points from at most the packets of one scan; never partially
/// flushed, never mixed across scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledCloud {
    /// Reference timestamp: the offset-corrected scan header time (t0)
    pub stamp: f64,

    /// Fixed output frame label
    pub frame_id: String,

    /// Points re-expressed in the frame anchored at `stamp`
    pub points: Vec<Point>,
}

impl AssembledCloud {
    /// Number of points in the cloud.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no packet contributed any points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Serialized cloud payload as written into the output log.
///
/// Flat little-endian x/y/z triplets, 12 bytes per point, so receivers can
/// reinterpret the buffer without a per-point decode step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloudData {
    /// Frame the points are expressed in
    pub frame_id: String,

    /// Point count
    pub num_points: u32,

    /// Bytes per point (12: x, y, z as f32)
    pub point_stride: u32,

    /// Packed point data
    pub data: bytes::Bytes,
}

/// Bytes per serialized point (x, y, z as f32 LE).
pub const CLOUD_POINT_STRIDE: u32 = 12;

impl From<&AssembledCloud> for PointCloudData {
    fn from(cloud: &AssembledCloud) -> Self {
        let mut data = Vec::with_capacity(cloud.points.len() * CLOUD_POINT_STRIDE as usize);
        for p in &cloud.points {
            data.extend_from_slice(&p.x.to_le_bytes());
            data.extend_from_slice(&p.y.to_le_bytes());
            data.extend_from_slice(&p.z.to_le_bytes());
        }
        Self {
            frame_id: cloud.frame_id.clone(),
            num_points: cloud.points.len() as u32,
            point_stride: CLOUD_POINT_STRIDE,
            data: data.into(),
        }
    }
}

impl PointCloudData {
    /// Decode the packed buffer back into points.
    ///
    /// Trailing bytes that do not form a whole point are ignored.
    pub fn points(&self) -> Vec<Point> {
        self.data
            .chunks_exact(self.point_stride as usize)
            .map(|chunk| Point {
                x: f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                y: f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
                z: f32::from_le_bytes([chunk[8], chunk[9], chunk[10], chunk[11]]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_payload_roundtrip() {
        let cloud = AssembledCloud {
            stamp: 100.0,
            frame_id: "velodyne".to_string(),
            points: vec![Point::new(1.0, -2.0, 0.5), Point::new(0.0, 0.0, 3.25)],
        };

        let payload = PointCloudData::from(&cloud);
        assert_eq!(payload.num_points, 2);
        assert_eq!(payload.data.len(), 24);
        assert_eq!(payload.points(), cloud.points);
    }

    #[test]
    fn test_empty_cloud_payload() {
        let cloud = AssembledCloud {
            stamp: 1.0,
            frame_id: "velodyne".to_string(),
            points: vec![],
        };
        let payload = PointCloudData::from(&cloud);
        assert_eq!(payload.num_points, 0);
        assert!(payload.points().is_empty());
    }
}

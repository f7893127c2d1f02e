//! Spherical-to-cartesian packet decoder with range gating.

use contracts::{PacketDecoder, Point};
use metrics::counter;
use tracing::warn;

use crate::packet::{RawReturn, RETURN_STRIDE};

/// Decoder calibration: the range gate applied to every return.
#[derive(Debug, Clone, Copy)]
pub struct DecoderCalibration {
    /// Returns closer than this (m) are discarded (self-hits, dust)
    pub min_range: f64,
    /// Returns farther than this (m) are discarded
    pub max_range: f64,
}

impl Default for DecoderCalibration {
    fn default() -> Self {
        Self {
            min_range: 2.0,
            max_range: 130.0,
        }
    }
}

/// Raw scan decoder over the fixed-stride spherical wire format.
#[derive(Debug, Clone)]
pub struct SphericalDecoder {
    calibration: DecoderCalibration,
}

impl SphericalDecoder {
    pub fn new(calibration: DecoderCalibration) -> Self {
        Self { calibration }
    }

    fn in_range(&self, range: f32) -> bool {
        let r = range as f64;
        r.is_finite() && r >= self.calibration.min_range && r <= self.calibration.max_range
    }
}

impl PacketDecoder for SphericalDecoder {
    fn decode(&self, data: &[u8]) -> Vec<Point> {
        if data.len() % RETURN_STRIDE != 0 {
            warn!(
                len = data.len(),
                stride = RETURN_STRIDE,
                "malformed packet, not a whole number of returns"
            );
            counter!("deskew_packets_malformed_total").increment(1);
            return Vec::new();
        }

        let mut points = Vec::with_capacity(data.len() / RETURN_STRIDE);
        for chunk in data.chunks_exact(RETURN_STRIDE) {
            let ret: RawReturn = bytemuck::pod_read_unaligned(chunk);
            if !self.in_range(ret.range) {
                continue;
            }
            let (range, az, el) = (ret.range, ret.azimuth, ret.elevation);
            points.push(Point::new(
                range * el.cos() * az.cos(),
                range * el.cos() * az.sin(),
                range * el.sin(),
            ));
        }
        points
    }
}

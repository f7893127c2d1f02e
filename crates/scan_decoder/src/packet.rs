//! Raw packet wire format.

use bytemuck::{Pod, Zeroable};
use bytes::Bytes;

/// Bytes per raw return (4 x f32).
pub const RETURN_STRIDE: usize = 16;

/// One spherical return as emitted by the sensor hardware.
///
/// 16 bytes: range (m), azimuth (rad), elevation (rad), intensity.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RawReturn {
    pub range: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub intensity: f32,
}

impl RawReturn {
    pub fn new(range: f32, azimuth: f32, elevation: f32, intensity: f32) -> Self {
        Self {
            range,
            azimuth,
            elevation,
            intensity,
        }
    }
}

/// Pack returns into a packet payload (test fixtures and log synthesis).
pub fn returns_to_bytes(returns: &[RawReturn]) -> Bytes {
    Bytes::copy_from_slice(bytemuck::cast_slice(returns))
}

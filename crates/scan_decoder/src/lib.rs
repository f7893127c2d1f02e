//! # Scan Decoder
//!
//! Decodes raw lidar hardware packets into sensor-local points.
//!
//! A packet is a sequence of fixed-stride spherical returns
//! (range/azimuth/elevation/intensity). The decoder converts each return
//! to cartesian coordinates and gates it against the calibrated min/max
//! range. Malformed packets decode to zero points; that is the contract,
//! never an error.

mod decoder;
mod packet;

pub use decoder::{DecoderCalibration, SphericalDecoder};
pub use packet::{returns_to_bytes, RawReturn, RETURN_STRIDE};

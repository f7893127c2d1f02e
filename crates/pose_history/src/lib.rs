//! # Pose History
//!
//! Time-indexed interval store for platform poses.
//!
//! Holds per-frame tracks of timestamped poses ingested from the log's
//! pose stream, answers point-in-time queries by interpolating between the
//! bracketing samples, and answers interval queries as the relative
//! transform between two interpolated poses. Extrapolation is refused:
//! a query outside a track's covered interval returns `None`, which the
//! scan assembler treats as a pose gap, not an error.
//!
//! Retention is bounded by a configurable horizon so a multi-hour session
//! does not grow the store without limit.

mod history;
mod track;

pub use history::PoseHistory;
pub use track::PoseTrack;

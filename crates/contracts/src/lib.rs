//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses the recorded session timestamp (seconds, f64) as primary clock
//! - Sensor stamps are corrected by a fixed configurable offset before any
//!   pose-history query

mod cloud;
mod config;
mod error;
mod message;
mod pose;
mod provider;
mod sink;
mod source;
mod topic;

pub use cloud::*;
pub use config::*;
pub use error::*;
pub use message::*;
pub use pose::*;
pub use provider::{PacketDecoder, PoseProvider};
pub use sink::*;
pub use source::*;
pub use topic::TopicName;

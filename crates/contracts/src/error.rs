//! Layered error definitions
//!
//! Categorized by source: config / bag / decode / sink.
//!
//! Pose-lookup misses and malformed packets are deliberately NOT errors:
//! they are absorbed inside the scan assembler and show up in the shape of
//! the result (fewer points, or no cloud). Only container and sink I/O
//! failures propagate.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ConvertError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Log Container Errors =====
    /// Failed to open a bag file
    #[error("bag open error for '{path}': {message}")]
    BagOpen { path: String, message: String },

    /// Corrupt or truncated record while reading
    #[error("bag read error: {message}")]
    BagRead { message: String },

    /// Failed to append a record to the output bag
    #[error("bag write error on topic '{topic}': {message}")]
    BagWrite { topic: String, message: String },

    /// Operation on an already-finalized bag
    #[error("bag is closed")]
    BagClosed,

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ConvertError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create bag open error
    pub fn bag_open(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BagOpen {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create bag read error
    pub fn bag_read(message: impl Into<String>) -> Self {
        Self::BagRead {
            message: message.into(),
        }
    }

    /// Create bag write error
    pub fn bag_write(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BagWrite {
            topic: topic.into(),
            message: message.into(),
        }
    }
}

//! LogSink trait - converter output interface
//!
//! Defines the abstract interface for the output log.

use crate::{ContractResult, Message};

/// Log output sink
///
/// Append-only; must preserve write order on the underlying medium.
/// Write failures are fatal to a converter run and propagate to the
/// caller.
#[trait_variant::make(LogSink: Send)]
pub trait LocalLogSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Append one message under its topic and timestamp
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, message: &Message) -> ContractResult<()>;

    /// Finalize the log and make it durable
    async fn close(&mut self) -> ContractResult<()>;
}

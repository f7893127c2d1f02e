//! LogSource trait - replay input interface
//!
//! Defines the abstract interface for reading a recorded session.

use crate::{ConvertError, Message};

/// Convenience alias for fallible contract operations.
pub type ContractResult<T> = Result<T, ConvertError>;

/// Log replay source
///
/// Supplies messages in global chronological order, already filtered to
/// the topic set given at construction. Lazy, finite, non-restartable:
/// once `next_message` returns `Ok(None)` the source is exhausted for
/// good.
#[trait_variant::make(LogSource: Send)]
pub trait LocalLogSource {
    /// Pull the next message.
    ///
    /// `Ok(None)` signals normal end of the session, not an error.
    ///
    /// # Errors
    /// Returns a read error on a corrupt or truncated container.
    async fn next_message(&mut self) -> ContractResult<Option<Message>>;
}

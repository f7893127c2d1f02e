//! # Converter
//!
//! The core of the deskew pipeline: the motion-compensated scan assembler
//! and the thin replay/output orchestrator around it.
//!
//! The orchestrator pulls messages from a `LogSource` one at a time. Scan
//! messages go through the assembler and come out as motion-compensated
//! clouds (or nothing, when no anchor pose exists); every other message is
//! forwarded to the `LogSink` untouched. Processing is strictly
//! sequential: one message is fully handled, including its sink write,
//! before the next is read, so output order mirrors input order.

mod assembler;
mod converter;
mod state;
mod stats;
pub mod testing;

pub use assembler::ScanAssembler;
pub use converter::Converter;
pub use state::ConverterState;
pub use stats::ConverterStats;

//! Container framing.
//!
//! Layout: an 8-byte magic header, then zero or more records. Each record
//! is a u32 little-endian length followed by that many bytes of bincode
//! `Message`.

/// File magic identifying a bag.
pub const BAG_MAGIC: &[u8; 8] = b"DESKBAG1";

/// Upper bound on a single record, guards against reading a corrupt
/// length prefix as a multi-gigabyte allocation.
pub const MAX_RECORD_LEN: u32 = 256 * 1024 * 1024;

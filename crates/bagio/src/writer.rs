//! BagWriter - append-only output log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use contracts::{ContractResult, ConvertError, LogSink, Message};
use tracing::{debug, instrument};

use crate::format::BAG_MAGIC;

/// Writes one bag in append order; `close` flushes and finalizes.
///
/// There is exactly one writer per output bag and writes land on disk in
/// call order, so the output mirrors the converter's processing order.
pub struct BagWriter {
    inner: Option<BufWriter<File>>,
    name: String,
    records_written: u64,
}

impl BagWriter {
    /// Create (truncate) the bag at `path` and write the magic header.
    #[instrument(name = "bag_writer_create", skip_all, fields(path = %path.as_ref().display()))]
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| ConvertError::bag_open(path.display().to_string(), e.to_string()))?;
        let mut inner = BufWriter::new(file);
        inner
            .write_all(BAG_MAGIC)
            .map_err(|e| ConvertError::bag_open(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            inner: Some(inner),
            name: path.display().to_string(),
            records_written: 0,
        })
    }

    /// Records appended so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    fn append(&mut self, message: &Message) -> ContractResult<()> {
        let inner = self.inner.as_mut().ok_or(ConvertError::BagClosed)?;

        let encoded = bincode::serialize(message)
            .map_err(|e| ConvertError::bag_write(message.topic.as_str(), e.to_string()))?;
        let len = u32::try_from(encoded.len())
            .map_err(|_| ConvertError::bag_write(message.topic.as_str(), "record too large"))?;

        inner
            .write_all(&len.to_le_bytes())
            .and_then(|_| inner.write_all(&encoded))
            .map_err(|e| ConvertError::bag_write(message.topic.as_str(), e.to_string()))?;

        self.records_written += 1;
        Ok(())
    }
}

impl LogSink for BagWriter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, message: &Message) -> ContractResult<()> {
        self.append(message)
    }

    async fn close(&mut self) -> ContractResult<()> {
        if let Some(mut inner) = self.inner.take() {
            inner.flush()?;
            inner.get_ref().sync_all()?;
            debug!(sink = %self.name, records = self.records_written, "bag finalized");
        }
        Ok(())
    }
}

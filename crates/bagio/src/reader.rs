//! BagReader - sequential, topic-filtered session replay.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use contracts::{ContractResult, ConvertError, LogSource, Message};
use tracing::{debug, instrument};

use crate::format::{BAG_MAGIC, MAX_RECORD_LEN};

/// Reads one bag front to back, yielding only the topics named at open.
///
/// Non-restartable: once exhausted, open a new reader for another pass.
pub struct BagReader {
    inner: BufReader<File>,
    topics: HashSet<String>,
    records_read: u64,
    records_skipped: u64,
}

impl BagReader {
    /// Open a bag and verify its magic header.
    #[instrument(name = "bag_reader_open", skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, topics: &[&str]) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ConvertError::bag_open(path.display().to_string(), e.to_string()))?;
        let mut inner = BufReader::new(file);

        let mut magic = [0u8; BAG_MAGIC.len()];
        inner
            .read_exact(&mut magic)
            .map_err(|e| ConvertError::bag_open(path.display().to_string(), e.to_string()))?;
        if &magic != BAG_MAGIC {
            return Err(ConvertError::bag_open(
                path.display().to_string(),
                "not a bag file (bad magic)",
            ));
        }

        debug!(topics = topics.len(), "bag opened");
        Ok(Self {
            inner,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            records_read: 0,
            records_skipped: 0,
        })
    }

    /// Records returned so far (after filtering).
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Records skipped by the topic filter.
    pub fn records_skipped(&self) -> u64 {
        self.records_skipped
    }

    /// Read one framed record, `None` at a clean end of file.
    fn read_record(&mut self) -> ContractResult<Option<Message>> {
        let mut len_buf = [0u8; 4];
        match self.inner.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(ConvertError::bag_read(e.to_string())),
        }

        let len = u32::from_le_bytes(len_buf);
        if len > MAX_RECORD_LEN {
            return Err(ConvertError::bag_read(format!(
                "record length {len} exceeds limit {MAX_RECORD_LEN}"
            )));
        }

        let mut buf = vec![0u8; len as usize];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| ConvertError::bag_read(format!("truncated record: {e}")))?;

        let message: Message = bincode::deserialize(&buf)
            .map_err(|e| ConvertError::bag_read(format!("corrupt record: {e}")))?;
        Ok(Some(message))
    }
}

impl LogSource for BagReader {
    async fn next_message(&mut self) -> ContractResult<Option<Message>> {
        loop {
            match self.read_record()? {
                None => return Ok(None),
                Some(message) if self.topics.contains(message.topic.as_str()) => {
                    self.records_read += 1;
                    return Ok(Some(message));
                }
                Some(_) => self.records_skipped += 1,
            }
        }
    }
}

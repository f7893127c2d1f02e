//! # Bag I/O
//!
//! On-disk container for recorded sessions.
//!
//! A bag is a magic header followed by length-prefixed bincode records,
//! one per message, in recording order. `BagReader` implements the
//! `LogSource` contract (ordered, finite, topic-filtered, non-restartable)
//! and `BagWriter` implements `LogSink` (append-only, order-preserving,
//! finalized by `close`).

mod format;
mod reader;
mod writer;

pub use format::{BAG_MAGIC, MAX_RECORD_LEN};
pub use reader::BagReader;
pub use writer::BagWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{LogSink, LogSource, Message, MessagePayload};
    use tempfile::tempdir;

    fn raw(topic: &str, timestamp: f64, data: &'static [u8]) -> Message {
        Message::raw(topic, timestamp, Bytes::from_static(data))
    }

    #[tokio::test]
    async fn test_write_read_roundtrip_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.bag");

        let mut writer = BagWriter::create(&path).unwrap();
        writer.write(&raw("/a", 1.0, b"one")).await.unwrap();
        writer.write(&raw("/b", 2.0, b"two")).await.unwrap();
        writer.write(&raw("/a", 3.0, b"three")).await.unwrap();
        writer.close().await.unwrap();

        let mut reader = BagReader::open(&path, &["/a", "/b"]).unwrap();
        let mut seen = Vec::new();
        while let Some(msg) = reader.next_message().await.unwrap() {
            seen.push((msg.topic.to_string(), msg.timestamp));
        }
        assert_eq!(
            seen,
            vec![
                ("/a".to_string(), 1.0),
                ("/b".to_string(), 2.0),
                ("/a".to_string(), 3.0)
            ]
        );
    }

    #[tokio::test]
    async fn test_topic_filter_skips_unlisted_topics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.bag");

        let mut writer = BagWriter::create(&path).unwrap();
        writer.write(&raw("/keep", 1.0, b"k1")).await.unwrap();
        writer.write(&raw("/drop", 2.0, b"d1")).await.unwrap();
        writer.write(&raw("/keep", 3.0, b"k2")).await.unwrap();
        writer.close().await.unwrap();

        let mut reader = BagReader::open(&path, &["/keep"]).unwrap();
        let mut count = 0;
        while let Some(msg) = reader.next_message().await.unwrap() {
            assert_eq!(msg.topic, "/keep");
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_payload_bytes_survive_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.bag");

        let payload: &[u8] = b"\x00\x01\xff diagnostics blob";
        let mut writer = BagWriter::create(&path).unwrap();
        writer.write(&raw("/diagnostics", 50.0, payload)).await.unwrap();
        writer.close().await.unwrap();

        let mut reader = BagReader::open(&path, &["/diagnostics"]).unwrap();
        let msg = reader.next_message().await.unwrap().unwrap();
        assert_eq!(msg.timestamp, 50.0);
        match msg.payload {
            MessagePayload::Raw(data) => assert_eq!(data.as_ref(), payload),
            other => panic!("expected raw payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_after_close_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.bag");

        let mut writer = BagWriter::create(&path).unwrap();
        writer.close().await.unwrap();
        let err = writer.write(&raw("/a", 1.0, b"late")).await.unwrap_err();
        assert!(matches!(err, contracts::ConvertError::BagClosed));
    }

    #[tokio::test]
    async fn test_open_rejects_bad_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not_a_bag");
        std::fs::write(&path, b"plain text, definitely no bag magic").unwrap();

        assert!(BagReader::open(&path, &["/a"]).is_err());
    }

    #[tokio::test]
    async fn test_truncated_record_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.bag");

        let mut writer = BagWriter::create(&path).unwrap();
        writer.write(&raw("/a", 1.0, b"payload")).await.unwrap();
        writer.close().await.unwrap();

        // Chop the tail off the last record
        let data = std::fs::read(&path).unwrap();
        std::fs::write(&path, &data[..data.len() - 3]).unwrap();

        let mut reader = BagReader::open(&path, &["/a"]).unwrap();
        assert!(reader.next_message().await.is_err());
    }
}

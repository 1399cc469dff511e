//! Asynchronous CSV reader with batch interface
//!
//! Reads scripted events in batches using csv-async, so the async replay
//! strategy can hand each batch to the `BatchProcessor`.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of ScriptedEvents
//!                  ↓
//!           csv_format module
//!           (CsvEvent, convert_csv_event)
//! ```

use crate::io::csv_format::{convert_csv_event, CsvEvent};
use crate::types::ScriptedEvent;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
            skipped: 0,
        }
    }

    /// Read up to `batch_size` events
    ///
    /// Malformed rows are logged and skipped. Returns an empty vector at
    /// end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ScriptedEvent> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<CsvEvent>();

        while batch.len() < batch_size {
            let Some(row) = rows.next().await else {
                break;
            };
            self.line_num += 1;
            let line = self.line_num + 1;

            match row {
                Ok(csv_event) => match convert_csv_event(csv_event) {
                    Ok(event) => batch.push(event),
                    Err(e) => {
                        self.skipped += 1;
                        log::warn!("Skipping line {}: {}", line, e);
                    }
                },
                Err(e) => {
                    self.skipped += 1;
                    log::warn!("Skipping line {}: CSV parse error: {}", line, e);
                }
            }
        }

        batch
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DashboardEvent;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_reads_in_batches() {
        let csv_content = "type,user,amount,detail\n\
            start,1,,\n\
            complete,1,1.00,\n\
            start,2,,\n\
            complete,2,0.50,simulated\n\
            withdraw,1,,\n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch1 = reader.read_batch(2).await;
        assert_eq!(batch1.len(), 2);
        assert_eq!(batch1[0].event, DashboardEvent::StartTask);

        let batch2 = reader.read_batch(2).await;
        assert_eq!(batch2.len(), 2);
        assert_eq!(batch2[0].user, 2);

        let batch3 = reader.read_batch(2).await;
        assert_eq!(batch3.len(), 1);
        assert!(matches!(batch3[0].event, DashboardEvent::Withdraw(_)));

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_script() {
        let mut reader = AsyncReader::new(Cursor::new("type,user,amount,detail\n".as_bytes()));
        assert!(reader.read_batch(10).await.is_empty());
        assert_eq!(reader.skipped(), 0);
    }

    #[tokio::test]
    async fn test_async_reader_skips_malformed_rows() {
        let csv_content = "type,user,amount,detail\n\
            teleport,1,,\n\
            complete,1,oops,\n\
            start,nobody,,\n\
            start,1,,\n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].event, DashboardEvent::StartTask);
        assert_eq!(reader.skipped(), 3);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let csv_content = "type,user,amount,detail\n  Reset_Account  ,  7  ,  ,  \n";
        let mut reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user, 7);
        assert_eq!(batch[0].event, DashboardEvent::ResetAccount);
    }
}

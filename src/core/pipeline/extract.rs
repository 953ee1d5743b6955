//! Row extractor
//!
//! Opens one ordered, read-only cursor over the source table and hands the
//! loader one decoded record at a time. Rows that fail to decode are logged
//! and skipped; a failure of the cursor itself ends the run.

use crate::adapters::database::{SourceRows, SourceStore};
use crate::domain::{
    PipelineError, RowDecodeError, SalesRecord, TableName, IDENTITY_COLUMN, SOURCE_COLUMNS,
};
use futures::StreamExt;

/// Builds the extraction query
///
/// Columns are selected in [`SOURCE_COLUMNS`] order and rows are ordered by
/// identity, so two runs over the same data visit rows in the same order.
pub fn select_sql(table: &TableName) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        SOURCE_COLUMNS.join(", "),
        table,
        IDENTITY_COLUMN
    )
}

/// Lazy reader over the source cursor
///
/// Not restartable: once a row has been returned it will not be seen again.
pub struct Extractor<'a> {
    rows: SourceRows<'a>,
    rows_read: u64,
    rows_skipped: u64,
}

impl<'a> Extractor<'a> {
    /// Issues the extraction query and opens the cursor
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Extraction`] if the query cannot be issued.
    pub async fn open(
        source: &'a mut dyn SourceStore,
        table: &TableName,
    ) -> Result<Extractor<'a>, PipelineError> {
        let query = select_sql(table);
        tracing::debug!(table = %table, query = %query, "Opening source cursor");

        let rows = source
            .open_cursor(&query)
            .await
            .map_err(|e| PipelineError::Extraction {
                table: table.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            rows,
            rows_read: 0,
            rows_skipped: 0,
        })
    }

    /// Returns the next decodable record, or `None` when the cursor is
    /// exhausted
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Cursor`] if the cursor fails mid-stream.
    pub async fn next_record(&mut self) -> Result<Option<SalesRecord>, PipelineError> {
        while let Some(item) = self.rows.next().await {
            let position = self.rows_read + self.rows_skipped + 1;

            match item {
                Ok(Ok(record)) => {
                    self.rows_read += 1;
                    return Ok(Some(record));
                }
                Ok(Err(source)) => {
                    let err = RowDecodeError { position, source };
                    tracing::warn!(
                        position = err.position,
                        column = err.source.column,
                        error = %err,
                        "Skipping source row"
                    );
                    self.rows_skipped += 1;
                }
                Err(e) => {
                    return Err(PipelineError::Cursor {
                        rows_processed: self.rows_read,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(None)
    }

    /// Records returned so far
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Rows skipped because they could not be decoded
    pub fn rows_skipped(&self) -> u64 {
        self.rows_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::MemorySource;
    use crate::domain::ColumnDecodeError;

    fn sales() -> TableName {
        TableName::new("Sales").unwrap()
    }

    #[test]
    fn test_select_sql() {
        assert_eq!(
            select_sql(&sales()),
            "SELECT fsno, salestype, attachmentno, customer, region, date, code, name, \
             measurementunit, unitprice, soldquantity, netpay FROM Sales ORDER BY fsno"
        );
    }

    #[tokio::test]
    async fn test_extractor_reads_in_identity_order() {
        let mut source = MemorySource::from_records([
            SalesRecord::with_fsno("B"),
            SalesRecord::with_fsno("C"),
            SalesRecord::with_fsno("A"),
        ]);

        let mut extractor = Extractor::open(&mut source, &sales()).await.unwrap();
        let mut seen = Vec::new();
        while let Some(record) = extractor.next_record().await.unwrap() {
            seen.push(record.identity().to_string());
        }

        assert_eq!(seen, vec!["A", "B", "C"]);
        assert_eq!(extractor.rows_read(), 3);
        assert_eq!(extractor.rows_skipped(), 0);
        assert!(extractor.next_record().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_extractor_skips_malformed_rows() {
        let mut source = MemorySource::from_records([
            SalesRecord::with_fsno("A"),
            SalesRecord::with_fsno("C"),
        ]);
        source.push_malformed("B", ColumnDecodeError::new("unitprice", "cannot convert"));

        let mut extractor = Extractor::open(&mut source, &sales()).await.unwrap();
        let first = extractor.next_record().await.unwrap().unwrap();
        let second = extractor.next_record().await.unwrap().unwrap();

        assert_eq!(first.identity(), "A");
        assert_eq!(second.identity(), "C");
        assert!(extractor.next_record().await.unwrap().is_none());
        assert_eq!(extractor.rows_read(), 2);
        assert_eq!(extractor.rows_skipped(), 1);
    }

    #[tokio::test]
    async fn test_extractor_query_failure() {
        let mut source = MemorySource::new().fail_query("Invalid object name 'Sales'.");

        let err = Extractor::open(&mut source, &sales()).await.err().unwrap();
        assert!(matches!(err, PipelineError::Extraction { .. }));
        assert!(err.to_string().contains("Invalid object name"));
    }

    #[tokio::test]
    async fn test_extractor_cursor_failure_is_fatal() {
        let mut source = MemorySource::from_records([
            SalesRecord::with_fsno("A"),
            SalesRecord::with_fsno("B"),
            SalesRecord::with_fsno("C"),
        ])
        .fail_cursor_after(2, "connection reset by peer");

        let mut extractor = Extractor::open(&mut source, &sales()).await.unwrap();
        extractor.next_record().await.unwrap();
        extractor.next_record().await.unwrap();

        let err = extractor.next_record().await.unwrap_err();
        assert_eq!(err.rows_processed(), Some(2));
    }
}

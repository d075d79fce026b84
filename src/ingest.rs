use std::io::Cursor;

use bytes::Bytes;
use polars::prelude::{CsvReadOptions, DataFrame, IntoLazy, PolarsError, SerReader, col};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::SinkConfig,
    error::{DataError, IoError, SignalflowResult, SystemError},
    frame_ext::DataFrameExt,
    normalize::{ProfitSource, normalize},
    schema::{RawCol, raw_schema_overrides},
    sink::SignalSink,
};

/// Identity of the file that triggered an ingestion run. Logging only; the
/// driver never branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMeta {
    pub name: String,
    pub length: u64,
}

/// What one ingestion run did, including the managed-variant row count the
/// reference pipeline computes but never persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Rows decoded from the CSV payload.
    pub rows_read: usize,
    /// Rows surviving the non-null `Symbol` filter.
    pub rows_with_symbol: usize,
    /// Rows in the deduplicated raw-profit table handed to the sink.
    pub rows_ingested: usize,
    /// Rows in the managed-profit variant (computed, not persisted).
    pub managed_rows: usize,
    /// Whether the sink write actually happened.
    pub sink_written: bool,
}

/// Runs the full per-file pipeline: decode, filter, normalize both profit
/// variants, deduplicate, and append to the sink.
///
/// One instance per destination table; each `ingest` call is independent and
/// holds no state across invocations.
#[derive(Debug)]
pub struct IngestDriver<S> {
    config: SinkConfig,
    sink: S,
}

impl<S: SignalSink> IngestDriver<S> {
    pub fn new(config: SinkConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Processes one arriving daily export.
    ///
    /// Sink failures propagate to the caller; retry policy belongs to the
    /// triggering host, not to this driver.
    #[tracing::instrument(skip_all, fields(blob = %blob.name))]
    pub async fn ingest(&self, payload: Bytes, blob: &BlobMeta) -> SignalflowResult<IngestReport> {
        info!(bytes = blob.length, "processing daily export");

        // Polars work is CPU-bound; keep it off the async runtime.
        let (deduped, mut report) = tokio::task::spawn_blocking(move || transform(payload))
            .await
            .map_err(|e| SystemError::BlockingTask(e.to_string()))??;

        debug!(
            rows_read = report.rows_read,
            rows_with_symbol = report.rows_with_symbol,
            managed_rows = report.managed_rows,
            rows_ingested = report.rows_ingested,
            "normalized daily export"
        );
        if !deduped.is_not_empty() {
            warn!("daily export produced no ingestible rows");
        }

        if self.config.sink_enabled {
            self.sink.append(&deduped).await?;
            report.sink_written = true;
            info!(
                rows = report.rows_ingested,
                table = %self.config.db_table,
                "appended normalized signals"
            );
        } else {
            debug!(rows = report.rows_ingested, "sink disabled, skipping write");
        }

        Ok(report)
    }
}

/// The synchronous body of one ingestion run, pure up to the report it
/// returns alongside the deduplicated raw-profit table.
fn transform(payload: Bytes) -> SignalflowResult<(DataFrame, IngestReport)> {
    // The export contract is UTF-8 text; reject anything else up front
    // instead of letting the CSV reader mangle it.
    std::str::from_utf8(&payload).map_err(IoError::Utf8)?;

    let raw = read_raw_csv(payload)?;
    let rows_read = raw.height();

    let filtered = raw
        .lazy()
        .filter(col(RawCol::Symbol).is_not_null())
        .collect()
        .map_err(|e| DataError::DataFrame(e.to_string()))?;
    let rows_with_symbol = filtered.height();

    // The managed variant is computed but never persisted, mirroring the
    // upstream export job; see DESIGN.md before wiring it anywhere.
    let managed = normalize(&filtered, ProfitSource::Managed)?;
    let raw_profit = normalize(&filtered, ProfitSource::Raw)?;
    let deduped = raw_profit.dedup_rows()?;

    let report = IngestReport {
        rows_read,
        rows_with_symbol,
        rows_ingested: deduped.height(),
        managed_rows: managed.height(),
        sink_written: false,
    };
    Ok((deduped, report))
}

fn read_raw_csv(payload: Bytes) -> SignalflowResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(raw_schema_overrides()))
        .into_reader_with_file_handle(Cursor::new(payload))
        .finish()
        .map_err(|e| match e {
            PolarsError::ColumnNotFound(name) => DataError::MissingColumn(name.to_string()).into(),
            e => IoError::CsvRead(e.to_string()).into(),
        })
}

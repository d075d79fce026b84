use std::{
    fs::OpenOptions,
    future::Future,
    path::{Path, PathBuf},
};

use chrono::Utc;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{IoError, SignalflowResult, SinkError, SystemError};

/// Persistence seam for normalized signal tables.
///
/// Implementations append, never overwrite: each ingestion event adds rows
/// to whatever the destination already holds.
pub trait SignalSink {
    fn append(&self, df: &DataFrame) -> impl Future<Output = SignalflowResult<()>> + Send;
}

/// Appends normalized frames to a dated CSV file under a local directory.
///
/// Stands in for the relational table when running outside the database
/// environment; one file per table per calendar day, header written only
/// when the file is created.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    table: String,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            table: table.into(),
        }
    }

    fn target_file(&self) -> PathBuf {
        let day = Utc::now().format("%Y-%m-%d");
        self.dir.join(format!("{}-{day}.csv", self.table))
    }
}

impl SignalSink for CsvSink {
    async fn append(&self, df: &DataFrame) -> SignalflowResult<()> {
        let dir = self.dir.clone();
        let path = self.target_file();
        let rows = df.height();

        // File I/O and CSV serialization are blocking; keep them off the
        // async runtime.
        let mut df = df.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_frame(&dir, &target, &mut df))
            .await
            .map_err(|e| SystemError::BlockingTask(e.to_string()))??;

        info!(path = %path.display(), rows, "appended to csv sink");
        Ok(())
    }
}

fn write_frame(dir: &Path, path: &Path, df: &mut DataFrame) -> SignalflowResult<()> {
    std::fs::create_dir_all(dir).map_err(IoError::Io)?;

    let write_header = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(IoError::Io)?;

    CsvWriter::new(file)
        .include_header(write_header)
        .finish(df)
        .map_err(|e| SinkError::Append(e.to_string()))?;
    Ok(())
}

/// In-memory sink used by the test suites.
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Mutex<Vec<DataFrame>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every frame appended so far, in append order.
    pub async fn frames(&self) -> Vec<DataFrame> {
        self.frames.lock().await.clone()
    }

    pub async fn total_rows(&self) -> usize {
        self.frames.lock().await.iter().map(DataFrame::height).sum()
    }
}

impl SignalSink for MemorySink {
    async fn append(&self, df: &DataFrame) -> SignalflowResult<()> {
        self.frames.lock().await.push(df.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::df;

    use super::*;

    fn frame() -> DataFrame {
        df![
            "symbol" => &["SPY"],
            "profit" => &[1.1],
        ]
        .expect("Failed to create DataFrame")
    }

    #[tokio::test]
    async fn memory_sink_accumulates_appends() {
        let sink = MemorySink::new();
        sink.append(&frame()).await.expect("append failed");
        sink.append(&frame()).await.expect("append failed");

        assert_eq!(sink.frames().await.len(), 2);
        assert_eq!(sink.total_rows().await, 2);
    }

    #[tokio::test]
    async fn csv_sink_appends_without_duplicating_the_header() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sink = CsvSink::new(dir.path(), "daily_signals");

        sink.append(&frame()).await.expect("append failed");
        sink.append(&frame()).await.expect("append failed");

        let path = sink.target_file();
        let content = std::fs::read_to_string(&path).expect("Failed to read sink file");
        let lines = content.lines().collect::<Vec<_>>();

        // One header plus two appended rows.
        assert_eq!(lines.len(), 3, "unexpected sink content: {content}");
        assert_eq!(lines[0], "symbol,profit");
    }

    #[tokio::test]
    async fn csv_sink_appends_from_a_spawned_task() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let sink = CsvSink::new(dir.path(), "daily_signals");

        // The append future must be Send so callers can drive it from
        // spawned tasks; the write itself runs on the blocking pool.
        let handle = tokio::spawn(async move {
            sink.append(&frame()).await.expect("append failed");
            sink
        });
        let sink = handle.await.expect("task panicked");

        let content =
            std::fs::read_to_string(sink.target_file()).expect("Failed to read sink file");
        assert_eq!(content.lines().count(), 2, "header plus one row");
    }
}

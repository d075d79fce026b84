//! Daily trading-signal ingestion: decodes a CSV export, normalizes it into
//! the canonical 16-column signal table, deduplicates it, and appends the
//! result to a configurable sink.
//!
//! The core lives in [`normalize`]: a declarative Polars projection from the
//! raw export schema (`Symbol`, `Day`, `Hour`, ...) to the sink schema
//! (`datetime`, `weekdaynumber`, ..., `profit`). [`ingest::IngestDriver`]
//! wraps it with decoding, filtering, deduplication and the sink hand-off.

pub mod config;
mod error;
pub mod frame_ext;
pub mod ingest;
pub mod normalize;
pub mod schema;
pub mod sink;

pub use config::SinkConfig;
pub use error::{
    ConfigError, DataError, IoError, SignalflowError, SignalflowResult, SinkError, SystemError,
};
pub use ingest::{BlobMeta, IngestDriver, IngestReport};
pub use normalize::{ProfitSource, normalize};

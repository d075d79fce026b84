use bytes::Bytes;
use signalflow::{BlobMeta, SinkConfig};
use tracing_subscriber::EnvFilter;

/// Installs a subscriber once so `RUST_LOG=debug cargo test` shows the
/// driver's structured logs. Later calls are no-ops.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

pub const DAILY_EXPORT: &str = "\
Symbol,Day,Hour,Name,Price,Premium,Predicted,Closed,Trade,Risk,Reward,Managed,Raw
SPY,01-15-2024,09,IronCondor,450.2,1.5,Y,N,T1,2.0,3.0,1.2,1.1
SPY,01-15-2024,09,IronCondor,450.2,1.5,Y,N,T1,2.0,3.0,1.2,1.1
QQQ,01-16-2024,10,PutSpread,390.0,2.0,N,Y,T2,1.0,2.0,0.5,-0.2
,01-17-2024,11,Orphan,100.0,1.0,N,N,T3,1.0,1.0,0.1,0.1
";

pub fn payload(csv: &str) -> (Bytes, BlobMeta) {
    let bytes = Bytes::from(csv.as_bytes().to_vec());
    let blob = BlobMeta {
        name: "dailydataingestor/daily.csv".to_string(),
        length: bytes.len() as u64,
    };
    (bytes, blob)
}

pub fn config(sink_enabled: bool) -> SinkConfig {
    SinkConfig {
        db_user: "ingest".to_string(),
        db_password: "secret".to_string(),
        db_host: "localhost".to_string(),
        db_port: 5432,
        db_table: "daily_signals".to_string(),
        db_name: "trading".to_string(),
        sink_enabled,
    }
}

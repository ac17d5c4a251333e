use thiserror::Error;

/// Per-symbol retrieval failure. Never aborts a batch: the fan-out fetcher
/// collects one of these per failed symbol and scoring only sees successes.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Persistence failure. Fatal to the run, surfaced to the caller unmodified.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("worksheet I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("worksheet error: {0}")]
    Worksheet(String),
}

/// Notification failure. Logged and swallowed, since delivery problems must not
/// roll back an already-persisted run.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("attachment render error: {0}")]
    Render(String),
}

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a transcription or analysis provider.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out after {0}s waiting for the provider")]
    Timeout(u64),
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Audio source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read audio source {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(#[source] GatewayError),

    #[error("Failed to write report {}: {source}", path.display())]
    PersistenceFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Problems that degrade a report without aborting the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    #[error("Ghost ship simulation failed: {0}")]
    CounterfactualFailed(String),

    #[error("Journal store unavailable: {0}")]
    StoreUnavailable(String),
}

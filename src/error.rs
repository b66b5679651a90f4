use thiserror::Error;

/// Message shown for every failed analysis request, whatever the cause
pub const ANALYZE_FAILED: &str =
    "Failed to analyze file. Please ensure the backend is running and supports this file type.";

/// Message shown when the generated report could not be fetched
pub const DOWNLOAD_FAILED: &str = "Failed to download report";

#[derive(Error, Debug)]
pub enum InsightError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Rejected locally, before anything is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file type. Please upload: {accepted}")]
    UnsupportedType { accepted: String },
    #[error("File size exceeds 50MB limit")]
    TooLarge { size: u64 },
    #[error("Please select a file first")]
    NoFile,
}

/// Any network, status or decoding failure talking to the analysis service.
///
/// Displays only the user-facing message; the underlying cause is kept for
/// logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RequestError {
    pub message: &'static str,
    pub cause: String,
}

impl RequestError {
    pub fn analyze(cause: impl ToString) -> Self {
        Self { message: ANALYZE_FAILED, cause: cause.to_string() }
    }

    pub fn download(cause: impl ToString) -> Self {
        Self { message: DOWNLOAD_FAILED, cause: cause.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;

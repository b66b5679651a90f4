//! File selection and submission
//!
//! A file is checked locally (extension and size) before anything touches
//! the network. [`UploadFlow`] keeps the selection, the last user-facing error
//! and whether a request is in flight.

use crate::analysis::AnalysisResult;
use crate::client::AnalysisClient;
use crate::error::{InsightError, ValidationError};
use std::path::{Path, PathBuf};

/// Accepted extensions, in the order they are listed to the user
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["csv", "xls", "xlsx", "pdf", "doc", "docx"];

/// 50 MiB
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// A file picked for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl UploadFile {
    pub fn new(name: &str, size: u64, path: impl Into<PathBuf>) -> Self {
        Self { name: name.to_string(), size, path: path.into() }
    }

    /// Describe a file on disk from its metadata
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, size: metadata.len(), path: path.to_path_buf() })
    }

    /// Lowercased text after the last dot, or the whole name when there is none
    pub fn extension(&self) -> String {
        self.name.rsplit('.').next().unwrap_or_default().to_lowercase()
    }
}

/// ".csv, .xls, .xlsx, .pdf, .doc, .docx"
pub fn accepted_extensions_list() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate(file: &UploadFile) -> Result<(), ValidationError> {
    let extension = file.extension();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedType {
            accepted: accepted_extensions_list(),
        });
    }

    if file.size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size: file.size });
    }

    Ok(())
}

/// Human readable size: "0 Bytes", "512 Bytes", "1.5 KB", "2.25 MB"
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut exponent = 0;
    while exponent + 1 < UNITS.len() && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let scaled = bytes as f64 / 1024u64.pow(exponent as u32) as f64;
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}

pub fn file_icon(name: &str) -> &'static str {
    let extension = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "csv" => "📊",
        "xls" | "xlsx" => "📗",
        "pdf" => "📄",
        "doc" | "docx" => "📝",
        _ => "📎",
    }
}

/// Selection and submission state for one upload form
#[derive(Debug, Default)]
pub struct UploadFlow {
    file: Option<UploadFile>,
    error: Option<String>,
    loading: bool,
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a file. An invalid file is not kept and its error is shown.
    pub fn select(&mut self, file: UploadFile) -> bool {
        match validate(&file) {
            Ok(()) => {
                tracing::debug!(file = %file.name, size = file.size, "file selected");
                self.file = Some(file);
                self.error = None;
                true
            }
            Err(e) => {
                tracing::info!(file = %file.name, "file rejected: {}", e);
                self.file = None;
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Drop the selection and any error
    pub fn clear(&mut self) {
        self.file = None;
        self.error = None;
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submit is only offered with a file selected and nothing in flight
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.loading
    }

    /// Send the selected file for analysis. One attempt, no retry.
    pub async fn submit(&mut self, client: &AnalysisClient) -> Result<AnalysisResult, InsightError> {
        let Some(file) = self.file.clone() else {
            let err = ValidationError::NoFile;
            self.error = Some(err.to_string());
            return Err(err.into());
        };

        self.loading = true;
        self.error = None;

        let outcome = client.upload(&file).await;
        self.loading = false;

        match outcome {
            Ok(result) => Ok(result),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

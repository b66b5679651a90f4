use crate::analysis::AnalysisResult;
use crate::config::Config;
use crate::error::{InsightError, RequestError};
use crate::upload::{validate, UploadFile};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// HTTP client for the analysis service
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    endpoint: String,
    http: Client,
}

impl AnalysisClient {
    fn build_http_client(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("insightboard/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    pub fn new(endpoint: &str, timeout_seconds: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: Self::build_http_client(timeout_seconds)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.endpoint, config.timeout_seconds)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.endpoint)
    }

    pub fn report_url(&self) -> String {
        format!("{}/download_report", self.endpoint)
    }

    /// Validate the file locally, then send it as a single multipart request.
    ///
    /// Every failure after validation collapses into one generic
    /// [`RequestError`]; the cause is logged.
    pub async fn upload(&self, file: &UploadFile) -> Result<AnalysisResult, InsightError> {
        validate(file)?;

        let url = self.upload_url();
        let result = self.send_file(&url, file).await.map_err(|cause| {
            error!(url = %url, file = %file.name, "analysis request failed: {}", cause);
            RequestError::analyze(cause)
        })?;

        info!(
            file = %file.name,
            charts = result.recommended_charts.len(),
            rows = result.data.len(),
            "analysis received"
        );
        Ok(result)
    }

    async fn send_file(&self, url: &str, file: &UploadFile) -> Result<AnalysisResult, String> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| format!("reading {}: {}", file.path.display(), e))?;

        let part = Part::bytes(bytes).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let result: AnalysisResult = response.json().await.map_err(|e| e.to_string())?;

        // The service reports processing failures in-band with a 200
        if let Some(message) = &result.error {
            return Err(format!("service error: {}", message));
        }

        Ok(result)
    }

    /// Fetch the generated report. One attempt; the body is opaque.
    pub async fn fetch_report(&self) -> Result<Vec<u8>, InsightError> {
        let url = self.report_url();
        let fetched = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await?
                .error_for_status()?;
            response.bytes().await
        }
        .await;

        match fetched {
            Ok(bytes) => {
                info!(url = %url, bytes = bytes.len(), "report downloaded");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                error!(url = %url, "report download failed: {}", e);
                Err(RequestError::download(e).into())
            }
        }
    }

    /// Download the report and write it to `dest`, returning the byte count
    pub async fn download_report(&self, dest: &Path) -> Result<usize, InsightError> {
        let bytes = self.fetch_report().await?;
        tokio::fs::write(dest, &bytes).await.map_err(|e| {
            error!(path = %dest.display(), "writing report failed: {}", e);
            RequestError::download(e)
        })?;
        Ok(bytes.len())
    }
}

use crate::config::ClientConfig;
use crate::error::Error;
use crate::upload::types::{CompareRequest, FileKind, UploadFile};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde_json::Value;

/// HTTP side of the report page: uploads source tables and opens generated
/// files for download.
#[derive(Clone)]
pub struct PageClient {
    base_url: Url,
    http: reqwest::Client,
}

impl PageClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self::with_base_url(config.base_url()?))
    }

    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked by ClientConfig::base_url, so the URL always has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Posts `file` as multipart form data and returns the decoded JSON body.
    ///
    /// The HTTP status is not checked: the service reports failures in the
    /// body (`success: false`), so any JSON response is handed back as-is.
    pub async fn upload_file(&self, file: UploadFile, kind: FileKind) -> Result<Value, Error> {
        let url = self.endpoint(&["upload"]);
        let file_name = file.file_name.clone();
        tracing::debug!(%url, file = %file_name, kind = kind.as_str(), size = file.bytes.len(), "uploading file");

        let form = Form::new()
            .part("file", Part::bytes(file.bytes).file_name(file.file_name))
            .text("type", kind.as_str());

        let result = async {
            let response = self.http.post(url).multipart(form).send().await?;
            let status = response.status();
            let body = response.json::<Value>().await?;
            Ok::<_, Error>((status, body))
        }
        .await;

        match result {
            Ok((status, body)) => {
                tracing::info!(file = %file_name, status = status.as_u16(), "upload finished");
                Ok(body)
            }
            Err(e) => {
                tracing::error!(file = %file_name, error = %e, "upload failed");
                Err(e)
            }
        }
    }

    /// Asks the service to compare previously uploaded tables. The response
    /// carries `statistics`, `tree_structure` and `output_file` when the
    /// comparison produces them. As with uploads the status is not checked.
    pub async fn compare(&self, request: &CompareRequest) -> Result<Value, Error> {
        let url = self.endpoint(&request.path());
        tracing::debug!(%url, compare = request.label(), "requesting comparison");

        let result = async {
            let response = self.http.post(url).json(&request.body()).send().await?;
            let status = response.status();
            let body = response.json::<Value>().await?;
            Ok::<_, Error>((status, body))
        }
        .await;

        match result {
            Ok((status, body)) => {
                tracing::info!(compare = request.label(), status = status.as_u16(), "comparison finished");
                Ok(body)
            }
            Err(e) => {
                tracing::error!(compare = request.label(), error = %e, "comparison failed");
                Err(e)
            }
        }
    }

    /// `{base}/download/{filename}`, with `filename` as a single path segment.
    pub fn download_url(&self, filename: &str) -> Url {
        self.endpoint(&["download", filename])
    }

    /// Opens the download in the system browser. Launch failures are only logged.
    pub fn download_file(&self, filename: &str) {
        let url = self.download_url(filename);
        tracing::info!(%url, "opening download");
        if let Err(e) = open::that(url.as_str()) {
            tracing::warn!(%url, error = %e, "failed to open browser for download");
        }
    }
}

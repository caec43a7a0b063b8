//! Asset host client for unsigned uploads.
//!
//! Property photos and deal documents arrive at this app as multipart form
//! uploads and are forwarded here as unsigned uploads (Cloudinary-style
//! `file` + `upload_preset` fields). The returned public URL is what gets
//! stored on the backend.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::config::AssetHostConfig;

/// Errors that can occur when uploading to the asset host.
#[derive(Debug, Error)]
pub enum AssetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upload endpoint returned an error response.
    #[error("Upload error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the upload response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the configured asset host.
#[derive(Clone)]
pub struct AssetClient {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl AssetClient {
    /// Create a new asset host client.
    #[must_use]
    pub fn new(config: &AssetHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    /// Upload a file and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails or the response carries no URL.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AssetError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssetError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AssetError::Parse(e.to_string()))?;

        Ok(upload.secure_url)
    }
}

/// Unsigned upload response (Cloudinary shape).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

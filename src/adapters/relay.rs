use crate::domain::media::{SEGMENT_MIME_TYPE, VIDEO_FIELD};
use crate::domain::report::RelayResponse;
use crate::error::RelayError;
use crate::ports::SegmentRelay;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;

/// Posts segments to a fixed downstream URL as `multipart/form-data`.
#[derive(Clone, Debug)]
pub struct HttpRelay {
    client: Client,
    url: String,
}

impl HttpRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SegmentRelay for HttpRelay {
    async fn relay(&self, path: &Path, file_name: &str) -> Result<RelayResponse, RelayError> {
        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(SEGMENT_MIME_TYPE)?;
        let form = Form::new().part(VIDEO_FIELD, part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status_code = response.status().as_u16();
        let content = response.bytes().await?;

        let body = if content.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&content)?)
        };

        Ok(RelayResponse { status_code, body })
    }
}

//! HTTP delivery to the webhook endpoint

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Identity;
use crate::error::{NotifyError, Result};
use crate::payload::Payload;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Anything that can deliver payloads and files to a chat channel.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&self, payload: &Payload) -> Result<()>;

    async fn send_file(&self, path: &Path, identity: &Identity) -> Result<()>;
}

/// Webhook client bound to one resolved URL. One attempt per request.
pub struct DeliveryClient {
    http: Client,
    url: Url,
}

impl DeliveryClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    // Never log the full URL, the token is part of the path.
    fn host(&self) -> &str {
        self.url.host_str().unwrap_or("<unknown host>")
    }
}

#[async_trait]
impl Transport for DeliveryClient {
    async fn send_message(&self, payload: &Payload) -> Result<()> {
        debug!(
            "Posting message to {} ({} embeds, {} content bytes)",
            self.host(),
            payload.embeds.len(),
            payload.content.len()
        );

        let response = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(payload)
            .send()
            .await?;

        check_response(response, |status| {
            status == StatusCode::OK || status == StatusCode::NO_CONTENT
        })
        .await?;

        info!("Message delivered to {}", self.host());
        Ok(())
    }

    async fn send_file(&self, path: &Path, identity: &Identity) -> Result<()> {
        let form = upload_form(path, identity).await?;
        debug!("Uploading '{}' to {}", path.display(), self.host());

        let response = self
            .http
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await?;

        check_response(response, |status| status.as_u16() < 400).await?;

        info!("File '{}' delivered to {}", path.display(), self.host());
        Ok(())
    }
}

/// Builds the multipart body. The file is fully read, so its handle is
/// closed before any network I/O starts.
async fn upload_form(path: &Path, identity: &Identity) -> Result<Form> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| NotifyError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let part = Part::bytes(content)
        .file_name(file_name)
        .mime_str(mime.as_ref())?;

    let mut form = Form::new().part("file", part);
    if !identity.username.is_empty() {
        form = form.text("username", identity.username.clone());
    }
    if !identity.avatar_url.is_empty() {
        form = form.text("avatar_url", identity.avatar_url.clone());
    }
    if identity.tts {
        form = form.text("tts", "true");
    }

    Ok(form)
}

async fn check_response(response: Response, is_success: impl Fn(StatusCode) -> bool) -> Result<()> {
    let status = response.status();
    if is_success(status) {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    let err = classify_failure(status, body);
    warn!("Webhook rejected request: {}", err);
    Err(err)
}

/// Discord reports failures as `{"message": ..., "code": ...}`. Anything else
/// is passed through verbatim.
fn classify_failure(status: StatusCode, body: String) -> NotifyError {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(obj)) => NotifyError::RemoteApi {
            status: status.as_u16(),
            message: obj
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            code: obj.get("code").and_then(Value::as_i64).unwrap_or_default(),
        },
        _ => NotifyError::UnexpectedResponse {
            status: status.as_u16(),
            body,
        },
    }
}

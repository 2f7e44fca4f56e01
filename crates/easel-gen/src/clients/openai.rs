//! OpenAI-compatible generation client
//!
//! Images come from `/images/generations` (or `/images/edits` when a job
//! carries a reference image), translations from `/chat/completions`.
//! Payloads are fully decoded before returning: `b64_json` is base64-decoded
//! and `url` responses are downloaded.

use std::path::Path;
use std::time::Duration;

use base64::Engine;

use crate::client::{AssetClient, GenPayload, GenRequest, InvokeError, RequestKind};

const REQUEST_TIMEOUT_SECS: u64 = 120;
const MULTIPART_BOUNDARY: &str = "easel-reference-image";
const VENDOR_BODY_LIMIT: usize = 400;

/// Client for an OpenAI-compatible generation endpoint
pub struct OpenAiClient {
    api_key: String,
    api_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            model,
        }
    }

    fn generate_image(
        &self,
        prompt: &str,
        size: &str,
        quality: &str,
    ) -> Result<GenPayload, InvokeError> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "n": 1,
            "size": size,
            "quality": quality,
        });

        let response = self.post_json("/images/generations", &payload)?;
        self.decode_image_item(&response)
    }

    fn edit_image(
        &self,
        prompt: &str,
        size: &str,
        quality: &str,
        reference: &Path,
    ) -> Result<GenPayload, InvokeError> {
        let image_bytes = std::fs::read(reference).map_err(|e| {
            InvokeError::fatal(
                None,
                format!("cannot read reference image {}: {}", reference.display(), e),
            )
        })?;

        let file_name = reference
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reference.png");

        let fields = [
            ("model", self.model.as_str()),
            ("prompt", prompt),
            ("n", "1"),
            ("size", size),
            ("quality", quality),
        ];
        let body = multipart_body(MULTIPART_BOUNDARY, &fields, "image", file_name, &image_bytes);

        let agent = build_agent();
        let url = format!("{}/images/edits", self.api_url);
        let mut response = agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .send(&body[..])
            .map_err(normalize_transport)?;

        let value = read_json_response(&mut response)?;
        self.decode_image_item(&value)
    }

    fn translate(&self, prompt: &str) -> Result<GenPayload, InvokeError> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
        });

        let response = self.post_json("/chat/completions", &payload)?;
        let content = response
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .unwrap_or("");

        if content.is_empty() {
            return Err(InvokeError::no_data());
        }

        Ok(GenPayload {
            bytes: content.as_bytes().to_vec(),
            model: self.model.clone(),
        })
    }

    fn decode_image_item(&self, response: &serde_json::Value) -> Result<GenPayload, InvokeError> {
        let bytes = match parse_image_item(response) {
            Some(ImageItem::Base64(b64)) => base64::engine::general_purpose::STANDARD
                .decode(b64)
                .map_err(|e| InvokeError::fatal(None, format!("invalid base64 payload: {}", e)))?,
            Some(ImageItem::Url(url)) => self.download_bytes(&url)?,
            None => return Err(InvokeError::no_data()),
        };

        if bytes.is_empty() {
            return Err(InvokeError::no_data());
        }

        Ok(GenPayload {
            bytes,
            model: self.model.clone(),
        })
    }

    fn post_json(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, InvokeError> {
        let agent = build_agent();
        let url = format!("{}{}", self.api_url, path);
        let mut response = agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send_json(payload)
            .map_err(normalize_transport)?;

        read_json_response(&mut response)
    }

    fn download_bytes(&self, url: &str) -> Result<Vec<u8>, InvokeError> {
        let agent = build_agent();
        let mut response = agent.get(url).call().map_err(normalize_transport)?;

        // The agent reports non-2xx as plain responses; an expired signed
        // URL serves an error page, not image bytes
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(classify_status(status, vendor_message(&body)));
        }

        let mut reader = response.into_body().into_reader();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut reader, &mut bytes)
            .map_err(|e| InvokeError::recoverable(None, format!("failed to read payload: {}", e)))?;
        Ok(bytes)
    }
}

impl AssetClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn invoke(&self, request: &GenRequest) -> Result<GenPayload, InvokeError> {
        match &request.kind {
            RequestKind::Image {
                size,
                quality,
                reference,
            } => match reference {
                Some(path) => self.edit_image(&request.prompt, size, quality, path),
                None => self.generate_image(&request.prompt, size, quality),
            },
            RequestKind::Text => self.translate(&request.prompt),
        }
    }
}

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .http_status_as_error(false)
        .build();
    config.into()
}

fn read_json_response(
    response: &mut ureq::http::Response<ureq::Body>,
) -> Result<serde_json::Value, InvokeError> {
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let body = response.body_mut().read_to_string().unwrap_or_default();
        return Err(classify_status(status, vendor_message(&body)));
    }

    response
        .body_mut()
        .read_json()
        .map_err(|e| InvokeError::fatal(None, format!("invalid JSON response: {}", e)))
}

/// Map an HTTP status to the fallback taxonomy: 404-class availability
/// failures and transient server-side errors are recoverable, everything
/// else (bad request, bad credentials) is fatal.
fn classify_status(status: u16, message: String) -> InvokeError {
    match status {
        404 | 408 | 409 | 429 | 500 | 502 | 503 | 504 => {
            InvokeError::recoverable(Some(status), message)
        }
        _ => InvokeError::fatal(Some(status), message),
    }
}

fn normalize_transport(err: ureq::Error) -> InvokeError {
    match err {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => {
            InvokeError::recoverable(None, format!("transport error: {}", err))
        }
        ureq::Error::StatusCode(code) => classify_status(code, format!("HTTP {}", code)),
        other => InvokeError::fatal(None, format!("request failed: {}", other)),
    }
}

/// Pull the vendor error message out of an error body, falling back to the
/// (truncated) raw body when the shape is unfamiliar.
fn vendor_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error body".to_string()
    } else {
        trimmed.chars().take(VENDOR_BODY_LIMIT).collect()
    }
}

enum ImageItem {
    Base64(String),
    Url(String),
}

fn parse_image_item(response: &serde_json::Value) -> Option<ImageItem> {
    let item = response
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|arr| arr.first())?;

    if let Some(b64) = item.get("b64_json").and_then(|b| b.as_str()) {
        if !b64.is_empty() {
            return Some(ImageItem::Base64(b64.to_string()));
        }
    }

    item.get("url")
        .and_then(|u| u.as_str())
        .map(|u| ImageItem::Url(u.to_string()))
}

fn multipart_body(
    boundary: &str,
    fields: &[(&str, &str)],
    file_field: &str,
    file_name: &str,
    file_bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            file_field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    body
}

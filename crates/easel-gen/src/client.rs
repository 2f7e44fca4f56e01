//! Generation client trait and request/result types
//!
//! Every call to a generative endpoint goes through `AssetClient`, which
//! normalizes all failures into a single `InvokeError` shape so the runner
//! never has to sniff vendor-specific error fields.

use std::fmt;
use std::path::PathBuf;

use crate::manifest::Method;

/// What kind of payload a job expects back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Binary image payload (PNG)
    Image {
        /// e.g. "1024x1024"
        size: String,
        /// e.g. "high"
        quality: String,
        /// Optional local reference image sent alongside the prompt
        reference: Option<PathBuf>,
    },
    /// Structured JSON text payload (translations)
    Text,
}

/// A single generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenRequest {
    pub prompt: String,
    pub kind: RequestKind,
}

/// A fully-decoded successful response
#[derive(Debug, Clone)]
pub struct GenPayload {
    pub bytes: Vec<u8>,
    /// Model that actually produced the payload
    pub model: String,
}

/// Whether a failure is worth a fallback attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transient or availability failure (timeouts, 404 model-not-found,
    /// 429, 5xx). A configured fallback model may be tried once.
    Recoverable,
    /// Bad request, bad credentials, or an empty payload. Never retried.
    Fatal,
}

/// Normalized client failure
#[derive(Debug, Clone)]
pub struct InvokeError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl InvokeError {
    pub fn recoverable(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Recoverable,
            status,
            message: message.into(),
        }
    }

    pub fn fatal(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Fatal,
            status,
            message: message.into(),
        }
    }

    /// The canonical "successful response with nothing in it" failure
    pub fn no_data() -> Self {
        Self::fatal(None, "no data returned")
    }
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "HTTP {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for InvokeError {}

/// Trait implemented by each generation client (OpenAI-compatible, mock)
pub trait AssetClient: Send {
    /// Model identifier this client generates with
    fn model(&self) -> &str;

    /// Perform one generation call, fully decoding the payload
    fn invoke(&self, request: &GenRequest) -> Result<GenPayload, InvokeError>;
}

/// Wraps a primary client with an optional fallback model.
///
/// The fallback is consulted at most once per job, and only when the
/// primary failure is `Recoverable`. A fatal primary error or a fallback
/// failure of any kind is terminal for the job.
pub struct FallbackClient {
    primary: Box<dyn AssetClient>,
    fallback: Option<Box<dyn AssetClient>>,
}

impl FallbackClient {
    pub fn new(primary: Box<dyn AssetClient>, fallback: Option<Box<dyn AssetClient>>) -> Self {
        Self { primary, fallback }
    }

    /// Primary model identifier, for operator-facing output
    pub fn primary_model(&self) -> &str {
        self.primary.model()
    }

    /// Invoke the primary client, falling back once on a recoverable error
    pub fn invoke(&self, request: &GenRequest) -> Result<(GenPayload, Method), InvokeError> {
        match self.primary.invoke(request) {
            Ok(payload) => Ok((payload, Method::GeneratedPrimary)),
            Err(err) if err.kind == ErrorKind::Recoverable => match &self.fallback {
                Some(fallback) => fallback
                    .invoke(request)
                    .map(|payload| (payload, Method::GeneratedFallback)),
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}

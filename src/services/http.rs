// ============================================================================
// HTTP PORT - what the gateway needs from a transport
// ============================================================================
// The browser build plugs in gloo-net; tests plug in a scripted fake.
// ============================================================================

use futures::future::LocalBoxFuture;

use crate::models::Upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// One multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, upload: Upload },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// Fully described request; `path` is relative to the backend URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            bearer: None,
            body,
        }
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    /// Value of a text field in a multipart body
    pub fn form_text(&self, name: &str) -> Option<&str> {
        match &self.body {
            RequestBody::Multipart(parts) => parts.iter().find_map(|part| match part {
                FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn has_form_file(&self, name: &str) -> bool {
        match &self.body {
            RequestBody::Multipart(parts) => parts
                .iter()
                .any(|part| matches!(part, FormPart::File { name: n, .. } if n == name)),
            _ => false,
        }
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `Err` means the request never completed (offline, CORS, server down).
pub type TransportResult = Result<ApiResponse, String>;

pub trait HttpTransport {
    /// Single attempt, no retries.
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, TransportResult>;
}

// ============================================================================
// GLOO TRANSPORT - browser fetch via gloo-net
// ============================================================================

use futures::future::LocalBoxFuture;
use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

use crate::services::http::{ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody, TransportResult};

/// Stateless fetch transport rooted at the backend URL
#[derive(Clone)]
pub struct GlooTransport {
    base_url: String,
}

impl GlooTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn execute(&self, request: ApiRequest) -> TransportResult {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let response = build(builder, request.body)?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let status = response.status();
        // Error bodies are optional; an unreadable one is treated as empty
        let body = response.text().await.unwrap_or_default();
        Ok(ApiResponse::new(status, body))
    }
}

fn build(builder: RequestBuilder, body: RequestBody) -> Result<Request, String> {
    match body {
        RequestBody::Empty => builder
            .build()
            .map_err(|e| format!("Request build error: {}", e)),
        RequestBody::Json(value) => builder
            .json(&value)
            .map_err(|e| format!("Serialization error: {}", e)),
        RequestBody::Multipart(parts) => {
            let form = to_form_data(parts).map_err(|e| format!("Form data error: {:?}", e))?;
            builder
                .body(form)
                .map_err(|e| format!("Request build error: {}", e))
        }
    }
}

fn to_form_data(parts: Vec<FormPart>) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form.append_with_str(&name, &value)?,
            FormPart::File { name, upload } => {
                let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
                let blob = Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&bytes))?;
                form.append_with_blob_and_filename(&name, &blob, &upload.name)?;
            }
        }
    }
    Ok(form)
}

impl HttpTransport for GlooTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, TransportResult> {
        Box::pin(self.execute(request))
    }
}

// ============================================================================
// API CLIENT - DATA GATEWAY (HTTP only, stateless apart from the token)
// ============================================================================
// One call per operation, one attempt per call. Failures come back as
// `ApiError` values; nothing here touches navigation or caches.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Assignment, AssignmentId, NewAssignment, Submission, SubmissionDraft, SubmissionId};
use crate::services::http::{ApiRequest, ApiResponse, FormPart, HttpTransport, RequestBody};
use crate::state::session_store::SessionStore;
use crate::utils::constants::MSG_EMPTY_SUBMISSION;

/// Failure of a gateway call. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected before any request was made
    #[error("{0}")]
    Validation(String),
    /// Server answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },
    /// Request could not complete
    #[error("{0}")]
    Network(String),
    /// 2xx body did not match the contract
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// User-facing texts for one operation
pub(crate) struct Operation {
    pub(crate) name: &'static str,
    pub(crate) failed: &'static str,
    pub(crate) network: &'static str,
}

const FETCH_ASSIGNMENTS: Operation = Operation {
    name: "fetch assignments",
    failed: "Failed to fetch assignments.",
    network: "Network error fetching assignments.",
};

const FETCH_ASSIGNMENT: Operation = Operation {
    name: "fetch assignment",
    failed: "Failed to fetch assignment.",
    network: "Network error fetching assignment.",
};

const CREATE_ASSIGNMENT: Operation = Operation {
    name: "create assignment",
    failed: "Failed to create assignment.",
    network: "Network error. Failed to create assignment.",
};

const FETCH_SUBMISSIONS: Operation = Operation {
    name: "fetch submissions",
    failed: "Failed to fetch submissions.",
    network: "Network error fetching submissions.",
};

const FETCH_SUBMISSION_DETAIL: Operation = Operation {
    name: "fetch submission details",
    failed: "Failed to fetch submission details.",
    network: "Network error fetching submission details.",
};

const SUBMIT_ASSIGNMENT: Operation = Operation {
    name: "submit assignment",
    failed: "Failed to submit assignment.",
    network: "Network error. Failed to submit assignment.",
};

/// Data gateway for the classroom REST API
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn HttpTransport>, session: SessionStore) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    /// List all assignments
    pub async fn fetch_assignments(&self) -> ApiResult<Vec<Assignment>> {
        log::info!("📋 Fetching assignments");
        let response = self
            .execute(self.authorized(ApiRequest::get("/assignments")), &FETCH_ASSIGNMENTS)
            .await?;
        let assignments: Vec<Assignment> = decode(&response, &FETCH_ASSIGNMENTS)?;
        log::info!("✅ {} assignments", assignments.len());
        Ok(assignments)
    }

    /// One assignment by id
    pub async fn fetch_assignment(&self, assignment_id: AssignmentId) -> ApiResult<Assignment> {
        let path = format!("/assignments/{}", assignment_id);
        let response = self
            .execute(self.authorized(ApiRequest::get(path)), &FETCH_ASSIGNMENT)
            .await?;
        decode(&response, &FETCH_ASSIGNMENT)
    }

    pub async fn create_assignment(&self, draft: &NewAssignment) -> ApiResult<Assignment> {
        log::info!("📝 Creating assignment '{}'", draft.title);
        let body = serde_json::to_value(draft.to_request())
            .map_err(|e| ApiError::Validation(format!("Serialization error: {}", e)))?;
        let request = ApiRequest::post("/assignments", RequestBody::Json(body));
        let response = self
            .execute(self.authorized(request), &CREATE_ASSIGNMENT)
            .await?;
        let created: Assignment = decode(&response, &CREATE_ASSIGNMENT)?;
        log::info!("✅ Assignment created: {}", created.id);
        Ok(created)
    }

    pub async fn fetch_submissions(&self, assignment_id: AssignmentId) -> ApiResult<Vec<Submission>> {
        log::info!("📋 Fetching submissions for assignment {}", assignment_id);
        let path = format!("/assignments/{}/submissions", assignment_id);
        let response = self
            .execute(self.authorized(ApiRequest::get(path)), &FETCH_SUBMISSIONS)
            .await?;
        let submissions: Vec<Submission> = decode(&response, &FETCH_SUBMISSIONS)?;
        log::info!("✅ {} submissions for assignment {}", submissions.len(), assignment_id);
        Ok(submissions)
    }

    pub async fn fetch_submission_detail(&self, submission_id: SubmissionId) -> ApiResult<Submission> {
        log::info!("🔍 Fetching submission {}", submission_id);
        let path = format!("/submissions/{}", submission_id);
        let response = self
            .execute(self.authorized(ApiRequest::get(path)), &FETCH_SUBMISSION_DETAIL)
            .await?;
        decode(&response, &FETCH_SUBMISSION_DETAIL)
    }

    /// Multipart submit. An empty draft fails locally without a request.
    pub async fn submit_assignment(
        &self,
        assignment_id: AssignmentId,
        draft: &SubmissionDraft,
    ) -> ApiResult<()> {
        if draft.is_empty() {
            log::warn!("⚠️ Empty submission for assignment {} rejected", assignment_id);
            return Err(ApiError::Validation(MSG_EMPTY_SUBMISSION.to_string()));
        }

        let mut parts = Vec::new();
        if let Some(text) = draft.effective_text() {
            parts.push(FormPart::Text {
                name: "submission_text".to_string(),
                value: text.to_string(),
            });
        }
        if let Some(upload) = &draft.file {
            parts.push(FormPart::File {
                name: "file".to_string(),
                upload: upload.clone(),
            });
        }

        log::info!("📤 Submitting assignment {} ({} fields)", assignment_id, parts.len());
        let path = format!("/assignments/{}/submit", assignment_id);
        let request = ApiRequest::post(path, RequestBody::Multipart(parts));
        self.execute(self.authorized(request), &SUBMIT_ASSIGNMENT)
            .await?;
        log::info!("✅ Assignment {} submitted", assignment_id);
        Ok(())
    }

    /// Absolute URL of an uploaded file, for opening in a new tab
    pub fn file_url(&self, file_path: &str) -> String {
        let file_path = file_path.replace('\\', "/");
        format!("{}/{}", self.base_url, file_path.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn authorized(&self, request: ApiRequest) -> ApiRequest {
        request.with_bearer(self.session.token())
    }

    /// Send once and sort the outcome into success / HTTP / network.
    pub(crate) async fn execute(&self, request: ApiRequest, operation: &Operation) -> ApiResult<ApiResponse> {
        let response = self.transport.send(request).await.map_err(|e| {
            log::error!("❌ {} failed: {}", operation.name, e);
            ApiError::Network(operation.network.to_string())
        })?;

        if response.ok() {
            return Ok(response);
        }

        let message = server_detail(&response.body).unwrap_or_else(|| operation.failed.to_string());
        log::error!("❌ {}: HTTP {} ({})", operation.name, response.status, message);
        Err(ApiError::Http {
            status: response.status,
            message,
        })
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: &ApiResponse, operation: &Operation) -> ApiResult<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        log::error!("❌ {}: parse error: {}", operation.name, e);
        ApiError::Decode(operation.failed.to_string())
    })
}

/// `{"detail": "..."}` from an error body. Validation errors carry a list
/// of `{msg}` objects instead; the first message is used.
fn server_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg")?.as_str().map(str::to_string)),
        _ => None,
    }
}

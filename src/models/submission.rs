use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::assignment::AssignmentId;
use crate::models::timestamp;

pub type SubmissionId = i64;

/// Submission as returned by the server; never mutated client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    #[serde(default)]
    pub assignment_id: Option<AssignmentId>,
    pub student_id: i64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub submitted_at: NaiveDateTime,
    #[serde(default)]
    pub submission_text: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// File picked in the submission form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What a student hands in: text, a file, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub text: Option<String>,
    pub file: Option<Upload>,
}

impl SubmissionDraft {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    pub fn file(upload: Upload) -> Self {
        Self {
            text: None,
            file: Some(upload),
        }
    }

    /// Text that will actually be sent; an empty string counts as absent.
    pub fn effective_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.effective_text().is_none() && self.file.is_none()
    }
}

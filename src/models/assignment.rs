use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

pub type AssignmentId = i64;

/// Assignment as returned by the server. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub due_date: NaiveDateTime,
    #[serde(default)]
    pub teacher_id: Option<i64>,
}

impl Assignment {
    pub fn is_past_due(&self, now: NaiveDateTime) -> bool {
        self.due_date < now
    }
}

/// Create-assignment form payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDateTime,
}

impl NewAssignment {
    /// Build from raw form values. `due_date` is the `datetime-local` value
    /// in the browser's time zone, or full ISO-8601.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
    ) -> Result<Self, chrono::ParseError> {
        Self::in_zone(title, description, due_date, &chrono::Local)
    }

    /// Like [`NewAssignment::new`] with the wall-clock zone given explicitly.
    pub fn in_zone<Tz: chrono::TimeZone>(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
        zone: &Tz,
    ) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            title: title.into(),
            description: description.into(),
            due_date: timestamp::parse_in_zone(due_date, zone)?,
        })
    }

    pub fn to_request(&self) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: timestamp::to_iso_utc(&self.due_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_assignment_decodes_naive_due_date() {
        let body = r#"{"id":3,"title":"HW1","description":"...","due_date":"2025-01-01T10:00:00","teacher_id":1}"#;
        let assignment: Assignment = serde_json::from_str(body).unwrap();
        assert_eq!(assignment.id, 3);
        assert_eq!(assignment.teacher_id, Some(1));
        assert_eq!(
            assignment.due_date,
            timestamp::parse_timestamp("2025-01-01T10:00").unwrap()
        );
    }

    #[test]
    fn form_due_date_is_sent_as_iso_utc() {
        let draft = NewAssignment::in_zone("HW1", "...", "2025-01-01T10:00", &chrono::Utc).unwrap();
        let request = serde_json::to_value(draft.to_request()).unwrap();
        assert_eq!(request["due_date"], "2025-01-01T10:00:00.000Z");
        assert_eq!(request["title"], "HW1");
    }

    #[test]
    fn form_due_date_is_local_wall_clock_time() {
        let berlin_winter = chrono::FixedOffset::east_opt(3_600).unwrap();
        let draft = NewAssignment::in_zone("HW1", "...", "2025-01-01T10:00", &berlin_winter).unwrap();
        assert_eq!(draft.to_request().due_date, "2025-01-01T09:00:00.000Z");
    }

    #[test]
    fn unparseable_due_date_is_rejected() {
        assert!(NewAssignment::new("HW1", "...", "tomorrow").is_err());
    }
}

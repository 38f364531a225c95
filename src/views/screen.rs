// ============================================================================
// RENDER SNAPSHOTS - what the active nested state shows
// ============================================================================
// Plain serialisable data. The external markup renders from the JSON form;
// building a snapshot never triggers a fetch.
// ============================================================================

use serde::Serialize;

use crate::models::{Assignment, AssignmentId, Notification, Submission};
use crate::state::navigation::TeacherTab;

/// Whole-app snapshot pushed to the render callback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppView {
    pub notification: Option<Notification>,
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Screen {
    Login,
    Teacher(TeacherScreen),
    Student(StudentScreen),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherScreen {
    pub username: String,
    pub tab: TeacherTab,
    pub selected_assignment_id: Option<AssignmentId>,
    pub assignments: Vec<Assignment>,
    pub submissions: Vec<Submission>,
    /// Set only while a submission detail is open and loaded
    pub detail: Option<Submission>,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentScreen {
    pub username: String,
    pub assignments: Vec<Assignment>,
    /// Assignment whose submission form is open
    pub selected: Option<Assignment>,
}

impl Screen {
    pub fn teacher(&self) -> Option<&TeacherScreen> {
        match self {
            Screen::Teacher(screen) => Some(screen),
            _ => None,
        }
    }

    pub fn student(&self) -> Option<&StudentScreen> {
        match self {
            Screen::Student(screen) => Some(screen),
            _ => None,
        }
    }
}

impl AppView {
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Serialization error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;

    #[test]
    fn snapshot_json_is_tagged_by_view() {
        let view = AppView {
            notification: Some(Notification::new("Login successful!", NotificationKind::Success)),
            screen: Screen::Teacher(TeacherScreen {
                username: "t1".into(),
                tab: TeacherTab::ViewSubmissions,
                selected_assignment_id: Some(3),
                assignments: Vec::new(),
                submissions: Vec::new(),
                detail: None,
                download_url: None,
            }),
        };

        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["screen"]["view"], "teacher");
        assert_eq!(json["screen"]["tab"], "view_submissions");
        assert_eq!(json["screen"]["selected_assignment_id"], 3);
        assert_eq!(json["notification"]["kind"], "success");
    }

    #[test]
    fn login_screen_has_no_payload() {
        let view = AppView {
            notification: None,
            screen: Screen::Login,
        };
        assert_eq!(view.to_json().unwrap(), r#"{"notification":null,"screen":{"view":"login"}}"#);
    }
}

pub mod auth;
pub mod assignment;
pub mod submission;
pub mod notification;
pub mod timestamp;

pub use auth::{LoginRequest, LoginResponse, Role, Session, SignupRequest, UserProfile};
pub use assignment::{Assignment, AssignmentId, CreateAssignmentRequest, NewAssignment};
pub use submission::{Submission, SubmissionDraft, SubmissionId, Upload};
pub use notification::{Notification, NotificationKind};

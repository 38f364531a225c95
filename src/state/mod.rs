// ============================================================================
// STATE MODULE - Rc<RefCell> stores + change notifications
// ============================================================================

pub mod reactivity;
pub mod notification_state;
pub mod session_store;
pub mod navigation;

pub use reactivity::ChangeNotifier;
pub use notification_state::NotificationChannel;
pub use session_store::{SessionChange, SessionStore};
pub use navigation::{
    FetchScope, NavEvent, NavState, Navigator, StudentEvent, StudentNav, SubmissionPane,
    TeacherEvent, TeacherNav, TeacherTab,
};

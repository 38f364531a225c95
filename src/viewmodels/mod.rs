pub mod dashboard;
pub mod teacher_viewmodel;
pub mod student_viewmodel;

pub use dashboard::{Dashboard, RoleDashboard};
pub use teacher_viewmodel::{TeacherAction, TeacherDashboard};
pub use student_viewmodel::{StudentAction, StudentDashboard};

pub mod screen;

pub use screen::{AppView, Screen, StudentScreen, TeacherScreen};

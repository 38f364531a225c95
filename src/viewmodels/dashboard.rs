// ============================================================================
// DASHBOARD - capability set shared by the role orchestrators
// ============================================================================

use futures::future::LocalBoxFuture;

use crate::models::Role;
use crate::state::navigation::NavState;
use crate::viewmodels::{StudentDashboard, TeacherDashboard};
use crate::views::Screen;

/// Render the nested state, dispatch its events, report through the
/// notification channel.
///
/// Futures are `'static`: a dashboard is a cheap handle over shared state,
/// so it can be spawned on the browser event loop.
pub trait Dashboard {
    type Action;

    fn role(&self) -> Role;

    fn nav_state(&self) -> NavState;

    fn render(&self, username: &str) -> Screen;

    /// Load whatever the root state needs.
    fn start(&self) -> LocalBoxFuture<'static, ()>;

    fn dispatch(&self, action: Self::Action) -> LocalBoxFuture<'static, ()>;

    /// Drop every in-flight result; called when the session ends.
    fn detach(&self);
}

/// The dashboard mounted for the signed-in role
#[derive(Clone)]
pub enum RoleDashboard {
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
}

impl RoleDashboard {
    pub fn role(&self) -> Role {
        match self {
            RoleDashboard::Teacher(dashboard) => dashboard.role(),
            RoleDashboard::Student(dashboard) => dashboard.role(),
        }
    }

    pub fn nav_state(&self) -> NavState {
        match self {
            RoleDashboard::Teacher(dashboard) => dashboard.nav_state(),
            RoleDashboard::Student(dashboard) => dashboard.nav_state(),
        }
    }

    pub fn render(&self, username: &str) -> Screen {
        match self {
            RoleDashboard::Teacher(dashboard) => dashboard.render(username),
            RoleDashboard::Student(dashboard) => dashboard.render(username),
        }
    }

    pub fn start(&self) -> LocalBoxFuture<'static, ()> {
        match self {
            RoleDashboard::Teacher(dashboard) => dashboard.start(),
            RoleDashboard::Student(dashboard) => dashboard.start(),
        }
    }

    pub fn detach(&self) {
        match self {
            RoleDashboard::Teacher(dashboard) => dashboard.detach(),
            RoleDashboard::Student(dashboard) => dashboard.detach(),
        }
    }
}

// ============================================================================
// APP - composes session, notifications, gateway and the role dashboards
// ============================================================================
// The session store decides which dashboard is mounted: signing in mounts
// the dashboard for the role, signing out detaches it so nothing it still
// has in flight can land.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::{Role, Session};
use crate::services::api_client::ApiClient;
use crate::services::http::HttpTransport;
use crate::services::storage::KeyValueStore;
use crate::services::timer::Scheduler;
use crate::state::navigation::NavState;
use crate::state::{ChangeNotifier, NotificationChannel, SessionChange, SessionStore};
use crate::utils::constants::{MSG_LOGIN_SUCCESS, MSG_SIGNUP_SUCCESS};
use crate::viewmodels::{
    Dashboard, RoleDashboard, StudentAction, StudentDashboard, TeacherAction, TeacherDashboard,
};
use crate::views::{AppView, Screen};

/// Shared pieces the session listener needs; held weakly by that listener.
struct Shell {
    api: ApiClient,
    notifications: NotificationChannel,
    changes: ChangeNotifier,
    dashboard: RefCell<Option<RoleDashboard>>,
}

impl Shell {
    fn on_session(&self, change: &SessionChange) {
        let previous = match change {
            SessionChange::SignedIn(session) => {
                let dashboard = self.mount(session.role);
                self.dashboard.replace(Some(dashboard))
            }
            SessionChange::SignedOut => self.dashboard.replace(None),
        };
        if let Some(previous) = previous {
            log::info!("🧹 Detaching {} dashboard", previous.role());
            previous.detach();
        }
    }

    fn mount(&self, role: Role) -> RoleDashboard {
        log::info!("🧭 Mounting {} dashboard", role);
        let api = self.api.clone();
        let notifications = self.notifications.clone();
        let changes = self.changes.clone();
        match role {
            Role::Teacher => RoleDashboard::Teacher(TeacherDashboard::new(api, notifications, changes)),
            Role::Student => RoleDashboard::Student(StudentDashboard::new(api, notifications, changes)),
        }
    }

    fn current(&self) -> Option<RoleDashboard> {
        self.dashboard.borrow().clone()
    }
}

/// Application shell
#[derive(Clone)]
pub struct App {
    config: AppConfig,
    session: SessionStore,
    shell: Rc<Shell>,
}

impl App {
    pub fn new(
        config: AppConfig,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn KeyValueStore>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let changes = ChangeNotifier::new();
        let notifications =
            NotificationChannel::new(scheduler, config.notification_timeout_ms, changes.clone());
        let session = SessionStore::new(storage, notifications.clone(), changes.clone());
        let api = ApiClient::new(config.backend_url.clone(), transport, session.clone());

        let shell = Rc::new(Shell {
            api,
            notifications,
            changes,
            dashboard: RefCell::new(None),
        });

        let listener = Rc::downgrade(&shell);
        session.subscribe(move |change| {
            if let Some(shell) = listener.upgrade() {
                shell.on_session(change);
            }
        });

        Self {
            config,
            session,
            shell,
        }
    }

    /// Restore a persisted session and load the dashboard root.
    pub async fn start(&self) {
        log::info!("🚀 Classroom client starting ({})", self.config.backend_url);
        match self.session.restore() {
            Some(session) => {
                log::info!("💾 Session restored for {}", session.username);
                self.start_dashboard().await;
            }
            None => log::info!("🔓 No stored session, showing login"),
        }
    }

    pub async fn login(&self, username: &str, password: &str) {
        let response = match self.shell.api.login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                self.shell.notifications.error(e.to_string());
                return;
            }
        };

        let Some(role) = Role::parse(&response.role) else {
            log::error!("❌ Login returned unknown role '{}'", response.role);
            self.shell
                .notifications
                .error(format!("Unknown role: {}", response.role));
            return;
        };

        self.session.login(response.access_token, role, response.username);
        self.shell.notifications.success(MSG_LOGIN_SUCCESS);
        self.start_dashboard().await;
    }

    pub async fn signup(&self, username: &str, password: &str, role: Role) {
        match self.shell.api.signup(username, password, role).await {
            Ok(()) => self.shell.notifications.success(MSG_SIGNUP_SUCCESS),
            Err(e) => self.shell.notifications.error(e.to_string()),
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub async fn teacher_action(&self, action: TeacherAction) {
        match self.teacher() {
            Some(teacher) => teacher.dispatch(action).await,
            None => log::warn!("⚠️ Teacher action {:?} without a teacher session", action),
        }
    }

    pub async fn student_action(&self, action: StudentAction) {
        match self.student() {
            Some(student) => student.dispatch(action).await,
            None => log::warn!("⚠️ Student action {:?} without a student session", action),
        }
    }

    async fn start_dashboard(&self) {
        if let Some(dashboard) = self.shell.current() {
            dashboard.start().await;
        }
    }

    pub fn teacher(&self) -> Option<TeacherDashboard> {
        match self.shell.current()? {
            RoleDashboard::Teacher(teacher) => Some(teacher),
            RoleDashboard::Student(_) => None,
        }
    }

    pub fn student(&self) -> Option<StudentDashboard> {
        match self.shell.current()? {
            RoleDashboard::Student(student) => Some(student),
            RoleDashboard::Teacher(_) => None,
        }
    }

    pub fn nav_state(&self) -> NavState {
        self.shell
            .current()
            .map(|dashboard| dashboard.nav_state())
            .unwrap_or(NavState::Unauthenticated)
    }

    /// Snapshot of everything currently visible
    pub fn view(&self) -> AppView {
        let screen = match (self.session.current(), self.shell.current()) {
            (Some(session), Some(dashboard)) => dashboard.render(&session.username),
            _ => Screen::Login,
        };
        AppView {
            notification: self.shell.notifications.current(),
            screen,
        }
    }

    /// Download URL for the submission detail the teacher has open
    pub fn download_url(&self) -> Option<String> {
        self.teacher()?.download_url()
    }

    /// Called after every observable change (navigation, data, notification).
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.shell.changes.subscribe(callback);
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.shell.notifications
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

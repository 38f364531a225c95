// ============================================================================
// TEACHER DASHBOARD - create / assignments / submissions drill-down
// ============================================================================
// Owns the teacher navigation stack and the last fetched data for it.
// Every constructed state gets a generation; fetch results carry the
// generation they were issued for and are dropped once it is superseded.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::models::{Assignment, AssignmentId, NewAssignment, Role, Submission, SubmissionId};
use crate::services::api_client::{ApiClient, ApiResult};
use crate::state::navigation::{
    teacher_entry_fetch, teacher_transition, FetchScope, NavState, Navigator, SubmissionPane,
    TeacherEvent, TeacherNav, TeacherTab,
};
use crate::state::{ChangeNotifier, NotificationChannel};
use crate::utils::constants::MSG_ASSIGNMENT_CREATED;
use crate::viewmodels::dashboard::Dashboard;
use crate::views::{Screen, TeacherScreen};

#[derive(Debug, Clone, PartialEq)]
pub enum TeacherAction {
    /// Tab button; the id is only honoured for `ViewSubmissions`
    ShowTab(TeacherTab, Option<AssignmentId>),
    ViewSubmissions(AssignmentId),
    Back,
    ViewSubmissionDetail(SubmissionId),
    BackToSubmissionList,
    CreateAssignment(NewAssignment),
}

struct TeacherData {
    nav: Navigator<TeacherNav>,
    assignments: Vec<Assignment>,
    submissions: Vec<Submission>,
    /// Assignment whose submission list actually arrived
    submissions_for: Option<AssignmentId>,
    detail: Option<Submission>,
    detached: bool,
}

#[derive(Clone)]
pub struct TeacherDashboard {
    api: ApiClient,
    notifications: NotificationChannel,
    changes: ChangeNotifier,
    data: Rc<RefCell<TeacherData>>,
}

impl TeacherDashboard {
    pub fn new(api: ApiClient, notifications: NotificationChannel, changes: ChangeNotifier) -> Self {
        Self {
            api,
            notifications,
            changes,
            data: Rc::new(RefCell::new(TeacherData {
                nav: Navigator::new(TeacherNav::Create),
                assignments: Vec::new(),
                submissions: Vec::new(),
                submissions_for: None,
                detail: None,
                detached: false,
            })),
        }
    }

    pub fn state(&self) -> TeacherNav {
        self.data.borrow().nav.state().clone()
    }

    pub fn generation(&self) -> u64 {
        self.data.borrow().nav.generation()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.data.borrow().assignments.clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.data.borrow().submissions.clone()
    }

    pub fn detail(&self) -> Option<Submission> {
        self.data.borrow().detail.clone()
    }

    /// Download URL of the open submission's file, if it has one
    pub fn download_url(&self) -> Option<String> {
        let data = self.data.borrow();
        let path = data.detail.as_ref()?.file_path.as_deref()?;
        Some(self.api.file_url(path))
    }

    async fn handle(&self, action: TeacherAction) {
        match action {
            TeacherAction::ShowTab(tab, assignment_id) => {
                self.go(TeacherEvent::ShowTab { tab, assignment_id }).await
            }
            TeacherAction::ViewSubmissions(id) => self.go(TeacherEvent::SelectAssignment(id)).await,
            TeacherAction::Back => self.go(TeacherEvent::Back).await,
            TeacherAction::ViewSubmissionDetail(id) => {
                self.go(TeacherEvent::ViewSubmissionDetail(id)).await
            }
            TeacherAction::BackToSubmissionList => self.go(TeacherEvent::BackToSubmissionList).await,
            TeacherAction::CreateAssignment(draft) => self.create(draft).await,
        }
    }

    /// Apply an event and, if it constructed a new state, run its entry fetch.
    async fn go(&self, event: TeacherEvent) {
        if let Some((generation, Some(scope))) = self.enter(&event) {
            self.load(generation, scope).await;
        }
    }

    fn enter(&self, event: &TeacherEvent) -> Option<(u64, Option<FetchScope>)> {
        let mut data = self.data.borrow_mut();
        if data.detached {
            return None;
        }
        let previous = data.nav.state().clone();
        let Some(next) = teacher_transition(&previous, event) else {
            log::debug!("⏭️ Teacher event {:?} ignored in {:?}", event, previous);
            return None;
        };

        let scope = teacher_entry_fetch(Some(event), &next, data.submissions_for);
        if next.selected_assignment_id() != previous.selected_assignment_id() {
            data.submissions.clear();
            data.submissions_for = None;
        }
        data.detail = None;
        let generation = data.nav.enter(next);
        drop(data);

        self.changes.notify();
        Some((generation, scope))
    }

    async fn load(&self, generation: u64, scope: FetchScope) {
        match scope {
            FetchScope::Assignments => {
                let result = self.api.fetch_assignments().await;
                self.settle(generation, result, |data, list| data.assignments = list);
            }
            FetchScope::Submissions(assignment_id) => {
                let result = self.api.fetch_submissions(assignment_id).await;
                self.settle(generation, result, |data, list| {
                    data.submissions = list;
                    data.submissions_for = Some(assignment_id);
                });
            }
            FetchScope::SubmissionDetail(submission_id) => {
                let result = self.api.fetch_submission_detail(submission_id).await;
                self.settle(generation, result, |data, detail| data.detail = Some(detail));
            }
        }
    }

    fn settle<T>(&self, generation: u64, result: ApiResult<T>, apply: impl FnOnce(&mut TeacherData, T)) {
        let mut data = self.data.borrow_mut();
        if !data.nav.is_current(generation) {
            log::warn!(
                "⚠️ Discarding stale teacher response (generation {} < {})",
                generation,
                data.nav.generation()
            );
            return;
        }
        match result {
            Ok(value) => {
                apply(&mut *data, value);
                drop(data);
                self.changes.notify();
            }
            Err(e) => {
                drop(data);
                self.notifications.error(e.to_string());
            }
        }
    }

    /// Create, then move to the assignment list and refetch it, unless the
    /// user navigated elsewhere while the request was in flight.
    async fn create(&self, draft: NewAssignment) {
        let generation = {
            let data = self.data.borrow();
            if data.detached || *data.nav.state() != TeacherNav::Create {
                log::warn!("⚠️ Create requested outside the create tab");
                return;
            }
            data.nav.generation()
        };

        let result = self.api.create_assignment(&draft).await;
        let (detached, current) = {
            let data = self.data.borrow();
            (data.detached, data.nav.is_current(generation))
        };
        if detached {
            return;
        }

        match result {
            Ok(_) => {
                self.notifications.success(MSG_ASSIGNMENT_CREATED);
                if current {
                    self.go(TeacherEvent::AssignmentCreated).await;
                }
            }
            Err(e) => self.notifications.error(e.to_string()),
        }
    }
}

impl Dashboard for TeacherDashboard {
    type Action = TeacherAction;

    fn role(&self) -> Role {
        Role::Teacher
    }

    fn nav_state(&self) -> NavState {
        NavState::Teacher(self.state())
    }

    fn render(&self, username: &str) -> Screen {
        let download_url = self.download_url();
        let data = self.data.borrow();
        let nav = data.nav.state();
        let in_submissions = matches!(nav, TeacherNav::ViewSubmissions { .. });
        let in_detail = matches!(
            nav,
            TeacherNav::ViewSubmissions {
                pane: SubmissionPane::Detail { .. },
                ..
            }
        );
        Screen::Teacher(TeacherScreen {
            username: username.to_string(),
            tab: nav.tab(),
            selected_assignment_id: nav.selected_assignment_id(),
            assignments: data.assignments.clone(),
            submissions: if in_submissions {
                data.submissions.clone()
            } else {
                Vec::new()
            },
            detail: if in_detail { data.detail.clone() } else { None },
            download_url: if in_detail { download_url } else { None },
        })
    }

    fn start(&self) -> LocalBoxFuture<'static, ()> {
        let this = self.clone();
        Box::pin(async move {
            let entry = {
                let data = this.data.borrow();
                if data.detached {
                    None
                } else {
                    teacher_entry_fetch(None, data.nav.state(), data.submissions_for)
                        .map(|scope| (data.nav.generation(), scope))
                }
            };
            if let Some((generation, scope)) = entry {
                this.load(generation, scope).await;
            }
        })
    }

    fn dispatch(&self, action: TeacherAction) -> LocalBoxFuture<'static, ()> {
        let this = self.clone();
        Box::pin(async move { this.handle(action).await })
    }

    fn detach(&self) {
        let mut data = self.data.borrow_mut();
        data.detached = true;
        data.nav.invalidate();
    }
}

// ============================================================================
// STUDENT DASHBOARD - assignment list / submission form
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::models::{Assignment, AssignmentId, Role, SubmissionDraft};
use crate::services::api_client::ApiClient;
use crate::state::navigation::{
    student_entry_fetch, student_transition, FetchScope, NavState, Navigator, StudentEvent, StudentNav,
};
use crate::state::{ChangeNotifier, NotificationChannel};
use crate::utils::constants::MSG_ASSIGNMENT_SUBMITTED;
use crate::viewmodels::dashboard::Dashboard;
use crate::views::{Screen, StudentScreen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentAction {
    /// Open the submission form for an assignment from the fetched list
    SelectAssignment(AssignmentId),
    Back,
    Submit(SubmissionDraft),
}

struct StudentData {
    nav: Navigator<StudentNav>,
    assignments: Vec<Assignment>,
    detached: bool,
}

#[derive(Clone)]
pub struct StudentDashboard {
    api: ApiClient,
    notifications: NotificationChannel,
    changes: ChangeNotifier,
    data: Rc<RefCell<StudentData>>,
}

impl StudentDashboard {
    pub fn new(api: ApiClient, notifications: NotificationChannel, changes: ChangeNotifier) -> Self {
        Self {
            api,
            notifications,
            changes,
            data: Rc::new(RefCell::new(StudentData {
                nav: Navigator::new(StudentNav::List),
                assignments: Vec::new(),
                detached: false,
            })),
        }
    }

    pub fn state(&self) -> StudentNav {
        self.data.borrow().nav.state().clone()
    }

    pub fn generation(&self) -> u64 {
        self.data.borrow().nav.generation()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.data.borrow().assignments.clone()
    }

    async fn handle(&self, action: StudentAction) {
        match action {
            StudentAction::SelectAssignment(id) => {
                let assignment = self
                    .data
                    .borrow()
                    .assignments
                    .iter()
                    .find(|a| a.id == id)
                    .cloned();
                match assignment {
                    Some(assignment) => self.go(StudentEvent::SelectAssignment(assignment)).await,
                    None => log::warn!("⚠️ Assignment {} is not in the fetched list", id),
                }
            }
            StudentAction::Back => self.go(StudentEvent::Back).await,
            StudentAction::Submit(draft) => self.submit(draft).await,
        }
    }

    async fn go(&self, event: StudentEvent) {
        if let Some((generation, Some(scope))) = self.enter(&event) {
            self.load(generation, scope).await;
        }
    }

    fn enter(&self, event: &StudentEvent) -> Option<(u64, Option<FetchScope>)> {
        let mut data = self.data.borrow_mut();
        if data.detached {
            return None;
        }
        let Some(next) = student_transition(data.nav.state(), event) else {
            log::debug!("⏭️ Student event ignored in {:?}", data.nav.state());
            return None;
        };
        let scope = student_entry_fetch(&next);
        let generation = data.nav.enter(next);
        drop(data);

        self.changes.notify();
        Some((generation, scope))
    }

    async fn load(&self, generation: u64, scope: FetchScope) {
        if scope != FetchScope::Assignments {
            return;
        }
        let result = self.api.fetch_assignments().await;

        let mut data = self.data.borrow_mut();
        if !data.nav.is_current(generation) {
            log::warn!("⚠️ Discarding stale assignment list (generation {})", generation);
            return;
        }
        match result {
            Ok(list) => {
                data.assignments = list;
                drop(data);
                self.changes.notify();
            }
            Err(e) => {
                drop(data);
                self.notifications.error(e.to_string());
            }
        }
    }

    /// Submit for the open form; on success return to the list and refetch.
    async fn submit(&self, draft: SubmissionDraft) {
        let (assignment_id, generation) = {
            let data = self.data.borrow();
            match data.nav.state().selected_assignment() {
                Some(assignment) if !data.detached => (assignment.id, data.nav.generation()),
                _ => {
                    log::warn!("⚠️ Submit requested without an open submission form");
                    return;
                }
            }
        };

        let result = self.api.submit_assignment(assignment_id, &draft).await;
        let (detached, current) = {
            let data = self.data.borrow();
            (data.detached, data.nav.is_current(generation))
        };
        if detached {
            return;
        }

        match result {
            Ok(()) => {
                self.notifications.success(MSG_ASSIGNMENT_SUBMITTED);
                if current {
                    self.go(StudentEvent::SubmitSucceeded).await;
                }
            }
            Err(e) => self.notifications.error(e.to_string()),
        }
    }
}

impl Dashboard for StudentDashboard {
    type Action = StudentAction;

    fn role(&self) -> Role {
        Role::Student
    }

    fn nav_state(&self) -> NavState {
        NavState::Student(self.state())
    }

    fn render(&self, username: &str) -> Screen {
        let data = self.data.borrow();
        Screen::Student(StudentScreen {
            username: username.to_string(),
            assignments: data.assignments.clone(),
            selected: data.nav.state().selected_assignment().cloned(),
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
                    student_entry_fetch(data.nav.state()).map(|scope| (data.nav.generation(), scope))
                }
            };
            if let Some((generation, scope)) = entry {
                this.load(generation, scope).await;
            }
        })
    }

    fn dispatch(&self, action: StudentAction) -> LocalBoxFuture<'static, ()> {
        let this = self.clone();
        Box::pin(async move { this.handle(action).await })
    }

    fn detach(&self) {
        let mut data = self.data.borrow_mut();
        data.detached = true;
        data.nav.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use crate::services::http::{ApiRequest, ApiResponse, HttpTransport, TransportResult};
    use crate::services::storage::MemoryStore;
    use crate::services::timer::ManualScheduler;
    use crate::state::SessionStore;
    use crate::utils::constants::MSG_EMPTY_SUBMISSION;
    use futures::executor::block_on;
    use std::collections::VecDeque;

    const LIST: &str = r#"[{"id":3,"title":"HW1","description":"...","due_date":"2020-01-01T10:00:00","teacher_id":1}]"#;

    #[derive(Default)]
    struct Script {
        replies: RefCell<VecDeque<ApiResponse>>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl HttpTransport for Script {
        fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, TransportResult> {
            self.seen.borrow_mut().push(request);
            let reply = self.replies.borrow_mut().pop_front().ok_or_else(|| "offline".to_string());
            Box::pin(async move { reply })
        }
    }

    fn dashboard(replies: &[(u16, &str)]) -> (StudentDashboard, Rc<Script>, NotificationChannel) {
        let transport = Rc::new(Script::default());
        transport
            .replies
            .borrow_mut()
            .extend(replies.iter().map(|(status, body)| ApiResponse::new(*status, *body)));
        let changes = ChangeNotifier::new();
        let notifications =
            NotificationChannel::new(Rc::new(ManualScheduler::new()), 5_000, changes.clone());
        let session = SessionStore::new(Rc::new(MemoryStore::new()), notifications.clone(), changes.clone());
        session.login("tok", Role::Student, "s1");
        let api = ApiClient::new("http://localhost:8000", transport.clone(), session);
        (
            StudentDashboard::new(api, notifications.clone(), changes),
            transport,
            notifications,
        )
    }

    #[test]
    fn start_loads_the_list() {
        let (student, transport, _) = dashboard(&[(200, LIST)]);
        block_on(student.start());
        assert_eq!(student.assignments().len(), 1);
        assert_eq!(transport.seen.borrow()[0].path, "/assignments");
    }

    #[test]
    fn select_and_back_does_not_fetch_for_the_form() {
        let (student, transport, _) = dashboard(&[(200, LIST), (200, LIST)]);
        block_on(student.start());

        block_on(student.dispatch(StudentAction::SelectAssignment(3)));
        assert_eq!(student.state().selected_assignment().map(|a| a.id), Some(3));
        assert_eq!(transport.seen.borrow().len(), 1);

        block_on(student.dispatch(StudentAction::Back));
        assert_eq!(student.state(), StudentNav::List);
        assert_eq!(transport.seen.borrow().len(), 2);
    }

    #[test]
    fn unknown_assignment_is_ignored() {
        let (student, _, _) = dashboard(&[(200, "[]")]);
        block_on(student.start());
        block_on(student.dispatch(StudentAction::SelectAssignment(99)));
        assert_eq!(student.state(), StudentNav::List);
    }

    #[test]
    fn empty_submit_stays_on_the_form() {
        let (student, transport, notifications) = dashboard(&[(200, LIST)]);
        block_on(student.start());
        block_on(student.dispatch(StudentAction::SelectAssignment(3)));

        block_on(student.dispatch(StudentAction::Submit(SubmissionDraft::text(""))));
        assert!(matches!(student.state(), StudentNav::SubmissionForm(_)));
        assert_eq!(transport.seen.borrow().len(), 1);
        let shown = notifications.current().unwrap();
        assert_eq!(shown.text, MSG_EMPTY_SUBMISSION);
        assert_eq!(shown.kind, NotificationKind::Error);
    }

    #[test]
    fn rejected_submit_keeps_the_form_open() {
        let (student, _, notifications) = dashboard(&[
            (200, LIST),
            (400, r#"{"detail":"Assignment already submitted"}"#),
        ]);
        block_on(student.start());
        block_on(student.dispatch(StudentAction::SelectAssignment(3)));
        block_on(student.dispatch(StudentAction::Submit(SubmissionDraft::text("again"))));

        assert!(matches!(student.state(), StudentNav::SubmissionForm(_)));
        assert_eq!(
            notifications.current().map(|n| n.text).as_deref(),
            Some("Assignment already submitted")
        );
    }

    #[test]
    fn submit_without_open_form_is_ignored() {
        let (student, transport, _) = dashboard(&[]);
        block_on(student.dispatch(StudentAction::Submit(SubmissionDraft::text("done"))));
        assert!(transport.seen.borrow().is_empty());
    }
}

// ============================================================================
// NAVIGATION STATE MACHINE
// ============================================================================
// Pure `(state, event) -> state` transitions for the top-level view and the
// per-role drill-down stacks, plus the fetch each constructed state implies.
// ============================================================================

use serde::Serialize;

use crate::models::{Assignment, AssignmentId, Role, SubmissionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherTab {
    Create,
    ViewAssignments,
    ViewSubmissions,
}

impl TeacherTab {
    pub fn parse(raw: &str) -> Option<TeacherTab> {
        match raw {
            "create" => Some(TeacherTab::Create),
            "view_assignments" | "viewAssignments" => Some(TeacherTab::ViewAssignments),
            "view_submissions" | "viewSubmissions" => Some(TeacherTab::ViewSubmissions),
            _ => None,
        }
    }
}

/// Sub-state of the submissions tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "pane", rename_all = "snake_case")]
pub enum SubmissionPane {
    List,
    Detail { submission_id: SubmissionId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeacherNav {
    Create,
    ViewAssignments,
    ViewSubmissions {
        assignment_id: AssignmentId,
        pane: SubmissionPane,
    },
}

impl TeacherNav {
    pub fn tab(&self) -> TeacherTab {
        match self {
            TeacherNav::Create => TeacherTab::Create,
            TeacherNav::ViewAssignments => TeacherTab::ViewAssignments,
            TeacherNav::ViewSubmissions { .. } => TeacherTab::ViewSubmissions,
        }
    }

    pub fn selected_assignment_id(&self) -> Option<AssignmentId> {
        match self {
            TeacherNav::ViewSubmissions { assignment_id, .. } => Some(*assignment_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudentNav {
    List,
    SubmissionForm(Assignment),
}

impl StudentNav {
    pub fn selected_assignment(&self) -> Option<&Assignment> {
        match self {
            StudentNav::SubmissionForm(assignment) => Some(assignment),
            StudentNav::List => None,
        }
    }
}

/// Which view is on screen
#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    Unauthenticated,
    Teacher(TeacherNav),
    Student(StudentNav),
}

impl NavState {
    /// Dashboard root for a freshly signed-in role
    pub fn root(role: Role) -> NavState {
        match role {
            Role::Teacher => NavState::Teacher(TeacherNav::Create),
            Role::Student => NavState::Student(StudentNav::List),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            NavState::Unauthenticated => None,
            NavState::Teacher(_) => Some(Role::Teacher),
            NavState::Student(_) => Some(Role::Student),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeacherEvent {
    /// Tab button. Only `ViewSubmissions` keeps an id, and only an explicit one.
    ShowTab {
        tab: TeacherTab,
        assignment_id: Option<AssignmentId>,
    },
    AssignmentCreated,
    SelectAssignment(AssignmentId),
    Back,
    ViewSubmissionDetail(SubmissionId),
    BackToSubmissionList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudentEvent {
    SelectAssignment(Assignment),
    Back,
    SubmitSucceeded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    LoggedIn(Role),
    LoggedOut,
    Teacher(TeacherEvent),
    Student(StudentEvent),
}

/// Next teacher state, or `None` when the event means nothing here.
pub fn teacher_transition(state: &TeacherNav, event: &TeacherEvent) -> Option<TeacherNav> {
    use TeacherNav::{Create, ViewAssignments, ViewSubmissions};

    match (state, event) {
        (_, TeacherEvent::ShowTab { tab, assignment_id }) => match (tab, assignment_id) {
            (TeacherTab::Create, _) => Some(Create),
            (TeacherTab::ViewAssignments, _) => Some(ViewAssignments),
            (TeacherTab::ViewSubmissions, Some(id)) => Some(ViewSubmissions {
                assignment_id: *id,
                pane: SubmissionPane::List,
            }),
            (TeacherTab::ViewSubmissions, None) => None,
        },
        (Create, TeacherEvent::AssignmentCreated) => Some(ViewAssignments),
        (ViewAssignments, TeacherEvent::SelectAssignment(id)) => Some(ViewSubmissions {
            assignment_id: *id,
            pane: SubmissionPane::List,
        }),
        (ViewSubmissions { .. }, TeacherEvent::Back) => Some(ViewAssignments),
        (
            ViewSubmissions {
                assignment_id,
                pane: SubmissionPane::List,
            },
            TeacherEvent::ViewSubmissionDetail(submission_id),
        ) => Some(ViewSubmissions {
            assignment_id: *assignment_id,
            pane: SubmissionPane::Detail {
                submission_id: *submission_id,
            },
        }),
        (
            ViewSubmissions {
                assignment_id,
                pane: SubmissionPane::Detail { .. },
            },
            TeacherEvent::BackToSubmissionList,
        ) => Some(ViewSubmissions {
            assignment_id: *assignment_id,
            pane: SubmissionPane::List,
        }),
        _ => None,
    }
}

/// Next student state, or `None` when the event means nothing here.
pub fn student_transition(state: &StudentNav, event: &StudentEvent) -> Option<StudentNav> {
    match (state, event) {
        (StudentNav::List, StudentEvent::SelectAssignment(assignment)) => {
            Some(StudentNav::SubmissionForm(assignment.clone()))
        }
        (StudentNav::SubmissionForm(_), StudentEvent::Back)
        | (StudentNav::SubmissionForm(_), StudentEvent::SubmitSucceeded) => Some(StudentNav::List),
        _ => None,
    }
}

/// Total transition over the whole navigation state; events that do not
/// apply leave the state as it is.
pub fn transition(state: &NavState, event: &NavEvent) -> NavState {
    match (state, event) {
        (_, NavEvent::LoggedOut) => NavState::Unauthenticated,
        (NavState::Unauthenticated, NavEvent::LoggedIn(role)) => NavState::root(*role),
        (NavState::Teacher(nav), NavEvent::Teacher(event)) => {
            NavState::Teacher(teacher_transition(nav, event).unwrap_or_else(|| nav.clone()))
        }
        (NavState::Student(nav), NavEvent::Student(event)) => {
            NavState::Student(student_transition(nav, event).unwrap_or_else(|| nav.clone()))
        }
        _ => state.clone(),
    }
}

/// Server data a freshly constructed state needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchScope {
    Assignments,
    Submissions(AssignmentId),
    SubmissionDetail(SubmissionId),
}

/// Fetch to issue on entering `next` through `event` (`None` at the root).
///
/// `loaded_list` is the assignment whose submission list is already in
/// memory. Only `BackToSubmissionList` may reuse it; every other way into
/// `ViewSubmissions` fetches.
pub fn teacher_entry_fetch(
    event: Option<&TeacherEvent>,
    next: &TeacherNav,
    loaded_list: Option<AssignmentId>,
) -> Option<FetchScope> {
    match next {
        TeacherNav::Create => None,
        TeacherNav::ViewAssignments => Some(FetchScope::Assignments),
        TeacherNav::ViewSubmissions {
            assignment_id,
            pane: SubmissionPane::List,
        } => match event {
            Some(TeacherEvent::BackToSubmissionList) if loaded_list == Some(*assignment_id) => None,
            _ => Some(FetchScope::Submissions(*assignment_id)),
        },
        TeacherNav::ViewSubmissions {
            pane: SubmissionPane::Detail { submission_id },
            ..
        } => Some(FetchScope::SubmissionDetail(*submission_id)),
    }
}

pub fn student_entry_fetch(next: &StudentNav) -> Option<FetchScope> {
    match next {
        StudentNav::List => Some(FetchScope::Assignments),
        StudentNav::SubmissionForm(_) => None,
    }
}

/// One dashboard's nested state and its generation counter.
///
/// Every constructed state gets a new generation; a fetch remembers the
/// generation it was issued for and its result is only applied while that
/// generation is still current.
#[derive(Debug, Clone)]
pub struct Navigator<S> {
    state: S,
    generation: u64,
}

impl<S> Navigator<S> {
    pub fn new(root: S) -> Self {
        Self {
            state: root,
            generation: 1,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Install a newly constructed state; returns its generation.
    pub fn enter(&mut self, next: S) -> u64 {
        self.state = next;
        self.generation += 1;
        self.generation
    }

    /// Supersede every in-flight fetch without changing the state.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

// ============================================================================
// WEB BRIDGE - wasm entry point and callbacks for the page markup
// ============================================================================
// The page owns the forms; it calls these exports and re-renders from the
// JSON snapshot pushed to the callback registered with `on_render`.
// ============================================================================

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::app::App;
use crate::config::CONFIG;
use crate::models::{NewAssignment, Role, SubmissionDraft, Upload};
use crate::services::gloo_transport::GlooTransport;
use crate::services::storage::{BrowserStore, KeyValueStore, MemoryStore};
use crate::services::timer::GlooScheduler;
use crate::state::navigation::TeacherTab;
use crate::viewmodels::{StudentAction, TeacherAction};

// Global App instance for the page lifetime
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    log::info!("🚀 Classroom client - backend {}", CONFIG.backend_url());

    let storage: Rc<dyn KeyValueStore> = match BrowserStore::open() {
        Some(store) => Rc::new(store),
        None => {
            log::warn!("⚠️ localStorage unavailable, the session will not survive a reload");
            Rc::new(MemoryStore::new())
        }
    };
    let app = App::new(
        CONFIG.clone(),
        Rc::new(GlooTransport::new(CONFIG.backend_url())),
        storage,
        Rc::new(GlooScheduler),
    );

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app.clone());
    });
    spawn_local(async move { app.start().await });
    Ok(())
}

fn current_app() -> Option<App> {
    APP.with(|cell| cell.borrow().clone())
}

/// Run an app task on the browser event loop.
fn run<F, Fut>(task: F)
where
    F: FnOnce(App) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    match current_app() {
        Some(app) => spawn_local(task(app)),
        None => log::error!("❌ App is not initialised"),
    }
}

fn push_view(callback: &js_sys::Function) {
    let Some(app) = current_app() else {
        return;
    };
    match app.view().to_json() {
        Ok(json) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::error!("❌ Render callback failed: {:?}", e);
            }
        }
        Err(e) => log::error!("❌ {}", e),
    }
}

/// Register the page renderer; it receives the view JSON now and after
/// every change.
#[wasm_bindgen]
pub fn on_render(callback: js_sys::Function) {
    let Some(app) = current_app() else {
        log::error!("❌ App is not initialised");
        return;
    };
    push_view(&callback);
    app.on_change(move || push_view(&callback));
}

#[wasm_bindgen]
pub fn current_view() -> Result<String, JsValue> {
    let app = current_app().ok_or_else(|| JsValue::from_str("App is not initialised"))?;
    app.view().to_json().map_err(|e| JsValue::from_str(&e))
}

// ============================================================================
// AUTH
// ============================================================================

#[wasm_bindgen]
pub fn login(username: String, password: String) {
    run(move |app| async move { app.login(&username, &password).await });
}

#[wasm_bindgen]
pub fn signup(username: String, password: String, role: String) -> Result<(), JsValue> {
    let role = Role::parse(&role).ok_or_else(|| JsValue::from_str(&format!("Unknown role: {}", role)))?;
    run(move |app| async move { app.signup(&username, &password, role).await });
    Ok(())
}

#[wasm_bindgen]
pub fn logout() {
    if let Some(app) = current_app() {
        app.logout();
    }
}

// ============================================================================
// TEACHER
// ============================================================================

fn teacher(action: TeacherAction) {
    run(move |app| async move { app.teacher_action(action).await });
}

#[wasm_bindgen]
pub fn teacher_show_tab(tab: String, assignment_id: Option<u32>) -> Result<(), JsValue> {
    let tab = TeacherTab::parse(&tab).ok_or_else(|| JsValue::from_str(&format!("Unknown tab: {}", tab)))?;
    teacher(TeacherAction::ShowTab(tab, assignment_id.map(i64::from)));
    Ok(())
}

#[wasm_bindgen]
pub fn teacher_view_submissions(assignment_id: u32) {
    teacher(TeacherAction::ViewSubmissions(i64::from(assignment_id)));
}

#[wasm_bindgen]
pub fn teacher_back() {
    teacher(TeacherAction::Back);
}

#[wasm_bindgen]
pub fn teacher_view_submission_detail(submission_id: u32) {
    teacher(TeacherAction::ViewSubmissionDetail(i64::from(submission_id)));
}

#[wasm_bindgen]
pub fn teacher_back_to_submissions() {
    teacher(TeacherAction::BackToSubmissionList);
}

#[wasm_bindgen]
pub fn teacher_create_assignment(title: String, description: String, due_date: String) {
    match NewAssignment::new(title, description, &due_date) {
        Ok(draft) => teacher(TeacherAction::CreateAssignment(draft)),
        Err(e) => {
            log::warn!("⚠️ Invalid due date '{}': {}", due_date, e);
            if let Some(app) = current_app() {
                app.notifications().error(format!("Invalid due date: {}", due_date));
            }
        }
    }
}

/// Open the file of the submission detail in a new tab.
#[wasm_bindgen]
pub fn download_file() -> Result<(), JsValue> {
    let url = current_app()
        .and_then(|app| app.download_url())
        .ok_or_else(|| JsValue::from_str("No file to download"))?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    window.open_with_url_and_target(&url, "_blank")?;
    Ok(())
}

// ============================================================================
// STUDENT
// ============================================================================

fn student(action: StudentAction) {
    run(move |app| async move { app.student_action(action).await });
}

#[wasm_bindgen]
pub fn student_select_assignment(assignment_id: u32) {
    student(StudentAction::SelectAssignment(i64::from(assignment_id)));
}

#[wasm_bindgen]
pub fn student_back() {
    student(StudentAction::Back);
}

/// Submit the open form. Either argument may be missing.
#[wasm_bindgen]
pub fn student_submit(text: Option<String>, file: Option<web_sys::File>) {
    run(move |app| async move {
        let upload = match file {
            Some(file) => match read_upload(&file).await {
                Ok(upload) => Some(upload),
                Err(e) => {
                    log::error!("❌ Reading {} failed: {:?}", file.name(), e);
                    app.notifications().error(format!("Could not read file {}", file.name()));
                    return;
                }
            },
            None => None,
        };
        app.student_action(StudentAction::Submit(SubmissionDraft { text, file: upload }))
            .await;
    });
}

async fn read_upload(file: &web_sys::File) -> Result<Upload, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    Ok(Upload {
        name: file.name(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

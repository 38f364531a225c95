#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use classroom_pwa::services::{
    ApiRequest, ApiResponse, HttpTransport, ManualScheduler, MemoryStore, Method, TransportResult,
};
use classroom_pwa::{App, AppConfig};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

pub const BACKEND: &str = "http://127.0.0.1:8000";

/// Scripted transport. Replies are queued per (method, path); the last
/// reply of a route repeats. In deferred mode every request waits until
/// the test resolves it by index.
#[derive(Default)]
pub struct FakeTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<TransportResult>>>,
    requests: RefCell<Vec<ApiRequest>>,
    deferred: Cell<bool>,
    pending: RefCell<Vec<Option<oneshot::Sender<TransportResult>>>>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: &str) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn fail(&self, method: Method, path: &str, error: &str) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(error.to_string()));
    }

    /// Hold every following request until `resolve` is called for it.
    pub fn defer(&self) {
        self.deferred.set(true);
    }

    /// Complete the `index`-th deferred request.
    pub fn resolve(&self, index: usize, status: u16, body: &str) {
        let sender = self.pending.borrow_mut()[index]
            .take()
            .expect("deferred request already resolved");
        let _ = sender.send(Ok(ApiResponse::new(status, body)));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn next_reply(&self, request: &ApiRequest) -> TransportResult {
        let mut routes = self.routes.borrow_mut();
        match routes.get_mut(&(request.method, request.path.clone())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| Err("empty".into())),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err("empty".into())),
            None => Err(format!("no route for {:?} {}", request.method, request.path)),
        }
    }
}

impl HttpTransport for FakeTransport {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, TransportResult> {
        self.requests.borrow_mut().push(request.clone());
        if self.deferred.get() {
            let (sender, receiver) = oneshot::channel();
            self.pending.borrow_mut().push(Some(sender));
            return Box::pin(async move {
                receiver
                    .await
                    .unwrap_or_else(|_| Err("request dropped".to_string()))
            });
        }
        let reply = self.next_reply(&request);
        Box::pin(async move { reply })
    }
}

pub struct Harness {
    pub app: App,
    pub transport: Rc<FakeTransport>,
    pub storage: Rc<MemoryStore>,
    pub scheduler: Rc<ManualScheduler>,
}

pub fn harness() -> Harness {
    harness_with_storage(MemoryStore::new())
}

pub fn harness_with_storage(storage: MemoryStore) -> Harness {
    let transport = FakeTransport::new();
    let storage = Rc::new(storage);
    let scheduler = Rc::new(ManualScheduler::new());
    let config = AppConfig {
        backend_url: BACKEND.to_string(),
        ..AppConfig::default()
    };
    let app = App::new(config, transport.clone(), storage.clone(), scheduler.clone());
    Harness {
        app,
        transport,
        storage,
        scheduler,
    }
}

pub fn login_body(role: &str, username: &str) -> String {
    format!(
        r#"{{"access_token":"token-{username}","token_type":"bearer","role":"{role}","username":"{username}"}}"#
    )
}

pub fn assignment_json(id: i64, title: &str, due_date: &str) -> String {
    format!(
        r#"{{"id":{id},"title":"{title}","description":"...","due_date":"{due_date}","teacher_id":1}}"#
    )
}

pub fn submission_json(id: i64, assignment_id: i64, text: &str) -> String {
    format!(
        r#"{{"id":{id},"assignment_id":{assignment_id},"student_id":4,"submitted_at":"2025-01-02T08:30:00","submission_text":"{text}","file_path":null}}"#
    )
}

pub fn list(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}

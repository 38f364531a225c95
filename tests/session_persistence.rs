mod common;

use classroom_pwa::models::{NotificationKind, Role};
use classroom_pwa::services::{KeyValueStore, MemoryStore, Method};
use classroom_pwa::state::{NavState, StudentNav, TeacherNav};
use common::*;
use futures::executor::block_on;

/// Copy what a session left in storage into a fresh app, as a reload would.
fn reload(from: &Harness) -> Harness {
    let mut items = Vec::new();
    for key in ["token", "role", "username"] {
        if let Some(value) = from.storage.get_item(key) {
            items.push((key, value));
        }
    }
    let storage = MemoryStore::with_items(items.iter().map(|(k, v)| (*k, v.as_str())));
    harness_with_storage(storage)
}

#[test]
fn login_then_reload_restores_the_role_root() {
    for (role, username, root) in [
        ("teacher", "t1", NavState::Teacher(TeacherNav::Create)),
        ("student", "s1", NavState::Student(StudentNav::List)),
    ] {
        let h = harness();
        h.transport.reply(Method::Post, "/login", 200, &login_body(role, username));
        h.transport.reply(Method::Get, "/assignments", 200, "[]");
        block_on(h.app.login(username, "pw"));
        assert_eq!(h.app.nav_state(), root);

        let reloaded = reload(&h);
        reloaded.transport.reply(Method::Get, "/assignments", 200, "[]");
        block_on(reloaded.app.start());

        assert_eq!(reloaded.app.nav_state(), root);
        let session = reloaded.app.session().unwrap();
        assert_eq!(session.username, username);
        assert_eq!(session.role, Role::parse(role).unwrap());
        assert_eq!(session.token, format!("token-{username}"));
    }
}

#[test]
fn partial_persisted_session_starts_signed_out() {
    let h = harness_with_storage(MemoryStore::with_items([("token", "abc"), ("role", "teacher")]));
    block_on(h.app.start());

    assert_eq!(h.app.nav_state(), NavState::Unauthenticated);
    assert!(h.storage.is_empty());
    assert!(h.transport.requests().is_empty());
}

#[test]
fn unknown_persisted_role_starts_signed_out() {
    let h = harness_with_storage(MemoryStore::with_items([
        ("token", "abc"),
        ("role", "admin"),
        ("username", "root"),
    ]));
    block_on(h.app.start());

    assert_eq!(h.app.nav_state(), NavState::Unauthenticated);
    assert_eq!(h.app.session(), None);
}

#[test]
fn rejected_login_shows_server_detail() {
    let h = harness();
    h.transport.reply(
        Method::Post,
        "/login",
        401,
        r#"{"detail":"Incorrect username or password"}"#,
    );
    block_on(h.app.login("t1", "wrong"));

    assert_eq!(h.app.nav_state(), NavState::Unauthenticated);
    assert!(h.storage.is_empty());
    let shown = h.app.notifications().current().unwrap();
    assert_eq!(shown.text, "Incorrect username or password");
    assert_eq!(shown.kind, NotificationKind::Error);
}

#[test]
fn notifications_clear_after_the_timeout() {
    let h = harness();
    h.transport.reply(Method::Post, "/login", 200, &login_body("teacher", "t1"));
    block_on(h.app.login("t1", "pw"));
    assert!(h.app.notifications().current().is_some());

    h.scheduler.advance(4_999);
    assert!(h.app.notifications().current().is_some());
    h.scheduler.advance(1);
    assert!(h.app.view().notification.is_none());
}

#[test]
fn a_new_notification_restarts_the_timeout() {
    let h = harness();
    h.app.notifications().info("first");
    h.scheduler.advance(3_000);
    h.app.notifications().error("second");
    h.scheduler.advance(3_000);

    assert_eq!(
        h.app.notifications().current().map(|n| n.text).as_deref(),
        Some("second")
    );
    h.scheduler.advance(2_000);
    assert!(h.app.notifications().current().is_none());
}

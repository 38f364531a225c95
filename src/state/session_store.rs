// ============================================================================
// SESSION STORE - authenticated identity, persisted across reloads
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Role, Session};
use crate::services::storage::KeyValueStore;
use crate::state::notification_state::NotificationChannel;
use crate::state::reactivity::ChangeNotifier;
use crate::utils::constants::{MSG_LOGGED_OUT, STORAGE_KEY_ROLE, STORAGE_KEY_TOKEN, STORAGE_KEY_USERNAME};

const SESSION_KEYS: [&str; 3] = [STORAGE_KEY_TOKEN, STORAGE_KEY_ROLE, STORAGE_KEY_USERNAME];

/// What happened to the session; listeners derive the top-level view from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn(Session),
    SignedOut,
}

type Listener = Rc<dyn Fn(&SessionChange)>;

#[derive(Clone)]
pub struct SessionStore {
    session: Rc<RefCell<Option<Session>>>,
    storage: Rc<dyn KeyValueStore>,
    notifications: NotificationChannel,
    listeners: Rc<RefCell<Vec<Listener>>>,
    changes: ChangeNotifier,
}

impl SessionStore {
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        notifications: NotificationChannel,
        changes: ChangeNotifier,
    ) -> Self {
        Self {
            session: Rc::new(RefCell::new(None)),
            storage,
            notifications,
            listeners: Rc::new(RefCell::new(Vec::new())),
            changes,
        }
    }

    /// Listen for sign-in/sign-out (login, restore, logout).
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&SessionChange) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Store and persist an identity the server has already accepted.
    pub fn login(&self, token: impl Into<String>, role: Role, username: impl Into<String>) -> Session {
        let session = Session {
            token: token.into(),
            role,
            username: username.into(),
        };
        log::info!("🔐 Signed in: {} ({})", session.username, session.role);

        self.persist(&session);
        *self.session.borrow_mut() = Some(session.clone());
        self.notifications.clear();

        self.emit(&SessionChange::SignedIn(session.clone()));
        self.changes.notify();
        session
    }

    /// Forget the identity everywhere and announce it.
    pub fn logout(&self) {
        let previous = self.session.borrow_mut().take();
        log::info!(
            "👋 Logout ({})",
            previous.as_ref().map(|s| s.username.as_str()).unwrap_or("no session")
        );
        self.clear_persisted();

        self.emit(&SessionChange::SignedOut);
        self.notifications.info(MSG_LOGGED_OUT);
        self.changes.notify();
    }

    /// Read the persisted identity at start-up.
    ///
    /// A partial triple or an unrecognised role restores nothing and the
    /// remnants are removed.
    pub fn restore(&self) -> Option<Session> {
        let token = self.storage.get_item(STORAGE_KEY_TOKEN);
        let role = self.storage.get_item(STORAGE_KEY_ROLE);
        let username = self.storage.get_item(STORAGE_KEY_USERNAME);

        let session = match (token, role, username) {
            (None, None, None) => {
                log::info!("💾 No persisted session");
                return None;
            }
            (Some(token), Some(role), Some(username)) => match Role::parse(&role) {
                Some(role) => Session {
                    token,
                    role,
                    username,
                },
                None => {
                    log::warn!("⚠️ Persisted session has unknown role '{}', ignoring it", role);
                    self.clear_persisted();
                    return None;
                }
            },
            _ => {
                log::warn!("⚠️ Persisted session is incomplete, ignoring it");
                self.clear_persisted();
                return None;
            }
        };

        log::info!("💾 Session restored for {} ({})", session.username, session.role);
        *self.session.borrow_mut() = Some(session.clone());
        self.emit(&SessionChange::SignedIn(session.clone()));
        self.changes.notify();
        Some(session)
    }

    pub fn current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.session.borrow().as_ref().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    fn persist(&self, session: &Session) {
        let entries = [
            (STORAGE_KEY_TOKEN, session.token.as_str()),
            (STORAGE_KEY_ROLE, session.role.as_str()),
            (STORAGE_KEY_USERNAME, session.username.as_str()),
        ];
        for (key, value) in entries {
            if let Err(e) = self.storage.set_item(key, value) {
                log::error!("❌ Error persisting session: {}", e);
            }
        }
    }

    fn clear_persisted(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove_item(key) {
                log::warn!("⚠️ {}", e);
            }
        }
    }

    fn emit(&self, change: &SessionChange) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(change);
        }
    }
}

// ============================================================================
// AUTH SERVICE - login / signup / current user
// ============================================================================
// Login and signup go out without a bearer token; the session store is
// only touched by the caller once the server has accepted the credentials.
// ============================================================================

use crate::models::{LoginRequest, LoginResponse, Role, SignupRequest, UserProfile};
use crate::services::api_client::{decode, ApiClient, ApiError, ApiResult, Operation};
use crate::services::http::{ApiRequest, RequestBody};

const LOGIN: Operation = Operation {
    name: "login",
    failed: "An error occurred.",
    network: "Network error. Please try again.",
};

const SIGNUP: Operation = Operation {
    name: "signup",
    failed: "An error occurred.",
    network: "Network error. Please try again.",
};

const CURRENT_USER: Operation = Operation {
    name: "fetch current user",
    failed: "Failed to fetch user details.",
    network: "Network error fetching user details.",
};

impl ApiClient {
    /// Exchange credentials for a token. The returned role is left raw.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        log::info!("🔐 Login attempt for {}", username);
        let body = json_body(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let response = self
            .execute(ApiRequest::post("/login", body), &LOGIN)
            .await?;
        let login: LoginResponse = decode(&response, &LOGIN)?;
        log::info!("✅ Login accepted for {} ({})", login.username, login.role);
        Ok(login)
    }

    pub async fn signup(&self, username: &str, password: &str, role: Role) -> ApiResult<()> {
        log::info!("🆕 Signup for {} as {}", username, role);
        let body = json_body(&SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        })?;
        self.execute(ApiRequest::post("/signup", body), &SIGNUP)
            .await?;
        log::info!("✅ Signup accepted for {}", username);
        Ok(())
    }

    /// `GET /users/me` for the current token
    pub async fn fetch_current_user(&self) -> ApiResult<UserProfile> {
        let response = self
            .execute(self.authorized(ApiRequest::get("/users/me")), &CURRENT_USER)
            .await?;
        decode(&response, &CURRENT_USER)
    }
}

fn json_body<T: serde::Serialize>(payload: &T) -> ApiResult<RequestBody> {
    serde_json::to_value(payload)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Validation(format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::{ApiResponse, HttpTransport, TransportResult};
    use crate::services::storage::MemoryStore;
    use crate::services::timer::ManualScheduler;
    use crate::state::{ChangeNotifier, NotificationChannel, SessionStore};
    use futures::executor::block_on;
    use futures::future::LocalBoxFuture;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct OneShot {
        reply: RefCell<Option<TransportResult>>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    impl HttpTransport for OneShot {
        fn send(&self, request: ApiRequest) -> LocalBoxFuture<'_, TransportResult> {
            self.seen.borrow_mut().push(request);
            let reply = self
                .reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err("exhausted".into()));
            Box::pin(async move { reply })
        }
    }

    fn client_with(reply: TransportResult) -> (ApiClient, Rc<OneShot>, SessionStore) {
        let transport = Rc::new(OneShot {
            reply: RefCell::new(Some(reply)),
            seen: RefCell::new(Vec::new()),
        });
        let changes = ChangeNotifier::new();
        let notifications =
            NotificationChannel::new(Rc::new(ManualScheduler::new()), 5_000, changes.clone());
        let session = SessionStore::new(Rc::new(MemoryStore::new()), notifications, changes);
        let api = ApiClient::new("http://localhost:8000", transport.clone(), session.clone());
        (api, transport, session)
    }

    #[test]
    fn login_never_sends_a_stale_token() {
        let body = r#"{"access_token":"abc","token_type":"bearer","role":"teacher","username":"t1"}"#;
        let (api, transport, session) = client_with(Ok(ApiResponse::new(200, body)));
        session.login("old", Role::Student, "s1");

        let login = block_on(api.login("t1", "pw")).unwrap();
        assert_eq!(login.access_token, "abc");
        assert_eq!(login.role, "teacher");

        let seen = transport.seen.borrow();
        assert_eq!(seen[0].path, "/login");
        assert_eq!(seen[0].bearer, None);
    }

    #[test]
    fn rejected_login_reports_server_detail() {
        let body = r#"{"detail":"Incorrect username or password"}"#;
        let (api, _, _) = client_with(Ok(ApiResponse::new(401, body)));

        let err = block_on(api.login("t1", "bad")).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect username or password");
    }

    #[test]
    fn signup_without_detail_uses_generic_text() {
        let (api, transport, _) = client_with(Ok(ApiResponse::new(400, "{}")));

        let err = block_on(api.signup("s1", "pw", Role::Student)).unwrap_err();
        assert_eq!(err.to_string(), "An error occurred.");
        match &transport.seen.borrow()[0].body {
            RequestBody::Json(json) => assert_eq!(json["role"], "student"),
            other => panic!("expected json body, got {other:?}"),
        };
    }

    #[test]
    fn login_network_failure_asks_to_retry() {
        let (api, _, _) = client_with(Err("offline".into()));
        let err = block_on(api.login("t1", "pw")).unwrap_err();
        assert_eq!(err.to_string(), "Network error. Please try again.");
    }

    #[test]
    fn current_user_uses_the_session_token() {
        let body = r#"{"id":2,"username":"t1","role":"teacher"}"#;
        let (api, transport, session) = client_with(Ok(ApiResponse::new(200, body)));
        session.login("abc", Role::Teacher, "t1");

        let me = block_on(api.fetch_current_user()).unwrap();
        assert_eq!(me.id, 2);
        assert_eq!(transport.seen.borrow()[0].bearer.as_deref(), Some("abc"));
    }
}

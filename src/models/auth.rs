use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted by the server at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Parse the wire/persisted spelling; anything else is unrecognised.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated identity.
///
/// The three fields only ever exist together: the store holds
/// `Option<Session>`, never a partially filled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub username: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /login` success body. `role` stays a raw string so an unknown role
/// can be reported instead of failing the whole decode.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub role: String,
    pub username: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// `GET /users/me` and `POST /signup` body
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_spelling_round_trips_through_parse() {
        for role in [Role::Teacher, Role::Student] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Teacher"), None);
    }

    #[test]
    fn login_response_tolerates_missing_token_type() {
        let body = r#"{"access_token":"abc","role":"teacher","username":"t1"}"#;
        let parsed: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.access_token, "abc");
        assert_eq!(parsed.token_type, None);
    }
}

/// Default backend URL, overridable at compile time via `BACKEND_URL`
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// How long a notification stays visible before it clears itself
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u32 = 5_000;

// Persisted session keys
pub const STORAGE_KEY_TOKEN: &str = "token";
pub const STORAGE_KEY_ROLE: &str = "role";
pub const STORAGE_KEY_USERNAME: &str = "username";

pub const MSG_LOGIN_SUCCESS: &str = "Login successful!";
pub const MSG_SIGNUP_SUCCESS: &str = "Signup successful! Please log in.";
pub const MSG_LOGGED_OUT: &str = "Logged out successfully.";
pub const MSG_ASSIGNMENT_CREATED: &str = "Assignment created successfully!";
pub const MSG_ASSIGNMENT_SUBMITTED: &str = "Assignment submitted successfully!";
pub const MSG_EMPTY_SUBMISSION: &str = "Please provide either text or a file for submission.";

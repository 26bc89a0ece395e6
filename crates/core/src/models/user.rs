use serde::{Deserialize, Serialize};

/// Identity id used for the offline demo login.
pub const DEMO_USER_ID: &str = "demo-user";

/// Display name given to users who sign in without one.
pub const DEFAULT_DISPLAY_NAME: &str = "Demo User";

/// The signed-in user. Session-scoped: created at sign-in, dropped on sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// Identity used when no remote backend is configured.
    /// A blank name falls back to [`DEFAULT_DISPLAY_NAME`].
    pub fn demo(email: impl Into<String>, name: &str) -> Self {
        let name = name.trim();
        let name = if name.is_empty() { DEFAULT_DISPLAY_NAME } else { name };
        Self::new(DEMO_USER_ID, email, name)
    }
}

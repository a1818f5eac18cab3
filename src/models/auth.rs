use serde::Deserialize;

/// Login form submitted by the dashboard login page
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Path to return to after login, carried through the form
    #[serde(default)]
    pub next: Option<String>,
}

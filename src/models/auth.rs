use serde::{Deserialize, Serialize};

use super::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile returned by the login endpoint and cached in the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub faculty_id: Option<i64>,
}

impl UserProfile {
    /// Display name when set, otherwise the username
    pub fn shown_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shown_name_falls_back_to_username() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"username":"admin","display_name":"","role":"admin"}"#).unwrap();
        assert_eq!(profile.shown_name(), "admin");
        assert_eq!(profile.role, Role::Admin);
    }
}

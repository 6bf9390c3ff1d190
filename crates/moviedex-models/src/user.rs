use serde::{Deserialize, Serialize};

/// Locally fabricated identity. Nothing here has been verified by a backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Identity for a username typed into the local login form
    pub fn local(username: &str) -> Self {
        let username = username.trim();
        Self {
            id: format!("local:{}", username.to_lowercase()),
            display_name: username.to_string(),
            avatar_url: None,
            email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_user_id_is_case_insensitive() {
        assert_eq!(User::local("Alice").id, User::local("alice ").id);
        assert_eq!(User::local(" Alice ").display_name, "Alice");
    }
}

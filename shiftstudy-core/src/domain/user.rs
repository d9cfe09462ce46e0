//! User domain model

use serde::{Deserialize, Serialize};

/// A registered student
///
/// `password` holds the hex digest, never the plaintext. `id` is 0 until
/// the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
    /// Unix epoch milliseconds
    pub created_at: i64,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        password_digest: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            email: email.into(),
            password: password_digest.into(),
            name: name.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Copy of this user carrying the identifier assigned by the store
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("test@example.com", "abc123", "Test User");
        assert_eq!(user.id, 0);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test User");
        assert!(user.created_at > 0);
        assert_eq!(user.with_id(7).id, 7);
    }

    #[test]
    fn test_digest_not_serialized() {
        let user = User::new("a@b.c", "deadbeef", "A");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("deadbeef"));
    }
}

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A chat participant as serialized by the backend.
///
/// The logged-in user additionally carries the bearer `token`; users embedded
/// in chats, messages and search results never do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    /// Bearer token, only present on the logged-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    /// Create a user without credentials
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            pic: None,
            token: None,
        }
    }

    /// Attach a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attach an email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Copy of this user without the bearer token, safe to broadcast
    pub fn public_profile(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    /// Whether this user has the given id
    pub fn is(&self, id: &str) -> bool {
        self.id == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_shape() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","name":"Ada","email":"ada@example.com","pic":"https://img/ada.png","isAdmin":false}"#,
        )
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.pic.as_deref(), Some("https://img/ada.png"));
        assert!(user.token.is_none());
    }

    #[test]
    fn public_profile_strips_token() {
        let user = User::new("u1", "Ada").with_token("secret-token");
        let profile = user.public_profile();

        assert!(profile.token.is_none());
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["_id"], "u1");
    }
}

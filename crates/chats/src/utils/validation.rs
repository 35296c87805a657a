//! Validation utilities.

use crate::types::{ChatError, ChatResult};

/// Validation utilities
pub struct Validator;

impl Validator {
    /// Validate outgoing message content
    pub fn message_content(content: &str) -> ChatResult<()> {
        if content.trim().is_empty() {
            return Err(ChatError::validation("Message content cannot be empty"));
        }

        if content.len() > 100_000 {
            return Err(ChatError::validation(
                "Message content too long (max 100,000 characters)",
            ));
        }

        Ok(())
    }

    /// Validate a group chat name
    pub fn group_name(name: &str) -> ChatResult<()> {
        if name.trim().is_empty() {
            return Err(ChatError::validation("Group name cannot be empty"));
        }

        if name.len() > 255 {
            return Err(ChatError::validation("Group name too long (max 255 characters)"));
        }

        Ok(())
    }

    /// Validate a user search query
    pub fn search_query(query: &str) -> ChatResult<()> {
        if query.trim().is_empty() {
            return Err(ChatError::validation("Please Enter something in search"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_message_content() {
        assert!(Validator::message_content("hello").is_ok());
        assert!(Validator::message_content("").is_err());
        assert!(Validator::message_content(" \n\t ").is_err());
        assert!(Validator::message_content(&"a".repeat(100_001)).is_err());
    }

    #[test]
    fn test_validator_group_name() {
        assert!(Validator::group_name("Team").is_ok());
        assert!(Validator::group_name("   ").is_err());
        assert!(Validator::group_name(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_validator_search_query() {
        assert!(Validator::search_query("ada").is_ok());
        let err = Validator::search_query("  ").unwrap_err();
        assert_eq!(err.user_message(), "Please Enter something in search");
    }
}

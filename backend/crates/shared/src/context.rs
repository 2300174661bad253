//! Request Context
//!
//! The verified caller identity that auth middleware attaches to request
//! extensions. Lives in the kernel so every domain crate can read it
//! without depending on the auth crate.

/// Authenticated caller, available behind bearer-token gates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Telegram ID from the token subject
    pub telegram_id: i64,
    /// Username claim, when the token carries one
    pub username: Option<String>,
    /// Anti-forgery value bound to the token
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_user_clone() {
        let user = CurrentUser {
            telegram_id: 555,
            username: Some("ada".to_string()),
            csrf_token: "deadbeef".to_string(),
        };
        assert_eq!(user.clone(), user);
    }
}

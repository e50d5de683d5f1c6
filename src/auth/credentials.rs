//! The shared credential pair and its verification predicate.

use std::fmt;
use subtle::ConstantTimeEq;

/// Fixed username/password pair configured at startup.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check a supplied username/password pair.
    ///
    /// Both fields are compared in constant time and the results combined
    /// with a bitwise AND, so the comparison never short-circuits and the
    /// timing does not reveal which field failed.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let password_ok = self.password.as_bytes().ct_eq(password.as_bytes());

        bool::from(username_ok & password_ok)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("listener", "hunter2")
    }

    #[test]
    fn test_verify_accepts_exact_match() {
        assert!(credentials().verify("listener", "hunter2"));
    }

    #[test]
    fn test_verify_rejects_wrong_username() {
        assert!(!credentials().verify("listeners", "hunter2"));
        assert!(!credentials().verify("Listener", "hunter2"));
        assert!(!credentials().verify("", "hunter2"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        assert!(!credentials().verify("listener", "hunter3"));
        assert!(!credentials().verify("listener", "hunter"));
        assert!(!credentials().verify("listener", ""));
    }

    #[test]
    fn test_verify_rejects_both_wrong() {
        assert!(!credentials().verify("", ""));
        assert!(!credentials().verify("hunter2", "listener"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("listener"));
        assert!(!rendered.contains("hunter2"));
    }
}

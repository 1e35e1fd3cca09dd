use crate::domain::constants::{DEFAULT_SESSION_KEY, MAX_SESSION_KEY_LEN};
use std::borrow::Cow;
use std::fmt;

#[dtab_derive::dtab_error]
pub enum SessionKeyError {
    #[error("Invalid session key{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Key under which a session is stored.
///
/// 1 to 64 characters of `[A-Za-z0-9_-]`, so it can double as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// # Errors
    /// Returns [`SessionKeyError::Invalid`] when the key is empty, too long, or contains
    /// characters outside the allowed set.
    pub fn parse(raw: &str) -> Result<Self, SessionKeyError> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_KEY_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if valid {
            Ok(Self(raw.to_owned()))
        } else {
            Err(SessionKeyError::Invalid {
                message: format!("expected 1-{MAX_SESSION_KEY_LEN} characters of [A-Za-z0-9_-]")
                    .into(),
                context: None,
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionKey {
    fn default() -> Self {
        Self(DEFAULT_SESSION_KEY.to_owned())
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

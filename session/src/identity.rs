//! Signed-in identity as reported by the identity provider.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use serde::{Deserialize, Serialize};

/// The authenticated user. Replaced wholesale on every provider notification,
/// never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque provider identifier.
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Profile picture URL.
    pub photo_url: Option<String>,
}

/// `None` means "not authenticated".
pub type Session = Option<Identity>;

impl Identity {
    /// Name used when greeting the user: display name, then email, then uid.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .unwrap_or(&self.uid)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

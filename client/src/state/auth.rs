//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! A reactive mirror of the `session` manager's snapshot. The manager is the
//! source of truth; `app` subscribes to it and writes each snapshot into an
//! `RwSignal<AuthState>` so route gates and the sidebar re-render on change.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use session::Session;

/// Authentication state as rendered by the console.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Session,
}

impl From<&Session> for AuthState {
    fn from(session: &Session) -> Self {
        Self { session: session.clone() }
    }
}

impl AuthState {
    /// True until the first silent check settles.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.session.initializing
    }

    #[must_use]
    pub fn signed_in(&self) -> bool {
        !self.session.initializing && self.session.authenticated
    }

    /// Name shown in the sidebar footer, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.session.subject_name.clone().or_else(|| self.session.subject_email.clone())
    }

    /// Single-letter avatar for the sidebar.
    #[must_use]
    pub fn initial(&self) -> String {
        self.display_name()
            .and_then(|n| n.chars().next())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_owned())
    }
}

//! Per-view login gate.
//!
//! Each protected view owns one [`AccessGate`]. It renders nothing but a
//! waiting state until the session settles, then either renders the view or
//! starts the interactive login. The login trigger fires at most once per gate
//! no matter how often the view re-renders before the browser navigates away.
//! A view mounted after the session already settled still gets its own trigger.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::manager::{Session, SessionManager};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the neutral waiting indicator.
    Wait,
    /// Start the login redirect, then keep waiting.
    Login,
    /// Show the protected content.
    Render,
}

#[derive(Debug, Default)]
pub struct AccessGate {
    login_requested: AtomicBool,
}

impl AccessGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what the view shows for `session`. Returns
    /// [`GateDecision::Login`] only the first time an unauthenticated settled
    /// session is observed.
    pub fn decide(&self, session: &Session) -> GateDecision {
        if session.initializing {
            return GateDecision::Wait;
        }
        if session.authenticated {
            return GateDecision::Render;
        }
        if self.login_requested.swap(true, Ordering::AcqRel) {
            GateDecision::Wait
        } else {
            GateDecision::Login
        }
    }

    /// Apply [`Self::decide`], calling `login()` when it says so. Returns
    /// whether the protected content may render.
    pub fn guard(&self, session: &Session, manager: &SessionManager) -> bool {
        match self.decide(session) {
            GateDecision::Render => true,
            GateDecision::Login => {
                manager.login();
                false
            }
            GateDecision::Wait => false,
        }
    }

    #[must_use]
    pub fn login_requested(&self) -> bool {
        self.login_requested.load(Ordering::Acquire)
    }
}

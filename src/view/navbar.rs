//! Right-hand navbar control.

use crate::state::session::{SessionState, SessionStatus};

/// What the navbar shows where the account control lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavControl {
    /// Identity probe still running.
    Pending,
    Login,
    Avatar { initial: char, name: String },
}

#[must_use]
pub fn control(session: &SessionState) -> NavControl {
    match &session.status {
        SessionStatus::Unknown => NavControl::Pending,
        SessionStatus::Unauthenticated => NavControl::Login,
        SessionStatus::Authenticated(user) => {
            let name = user.display_name().to_owned();
            let initial = name
                .chars()
                .next()
                .map_or('?', |c| c.to_uppercase().next().unwrap_or(c));
            NavControl::Avatar { initial, name }
        }
    }
}

//! View gating: what to show for a resource given the session.
//!
//! DESIGN
//! ======
//! The rules are evaluated top-down and the first match wins:
//!
//! 1. session unknown: global spinner
//! 2. signed out on a route that needs a session: login prompt
//! 3. resource requested or not yet requested: local spinner
//! 4. resource failed: inline error carrying the server message
//! 5. resource empty: empty state, offering create only when signed in
//! 6. otherwise: the data

use crate::net::types::Course;
use crate::state::LoadState;
use crate::state::courses::CoursesState;
use crate::state::session::SessionStatus;

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;

/// Whether a route may be shown without a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Gate<'a, T: ?Sized> {
    GlobalSpinner,
    LoginPrompt,
    Loading,
    Error(&'a str),
    Empty { can_create: bool },
    Ready(&'a T),
}

/// One resource as the gate sees it.
pub struct Resource<'a, T: ?Sized> {
    pub load: LoadState,
    pub error: Option<&'a str>,
    pub data: Option<&'a T>,
    pub is_empty: bool,
}

#[must_use]
pub fn evaluate<'a, T: ?Sized>(session: &SessionStatus, access: Access, resource: Resource<'a, T>) -> Gate<'a, T> {
    let signed_in = match session {
        SessionStatus::Unknown => return Gate::GlobalSpinner,
        SessionStatus::Unauthenticated if access == Access::Authenticated => return Gate::LoginPrompt,
        SessionStatus::Unauthenticated => false,
        SessionStatus::Authenticated(_) => true,
    };

    if resource.load.is_loading() {
        return Gate::Loading;
    }
    if let Some(error) = resource.error {
        return Gate::Error(error);
    }
    match resource.data {
        None => Gate::Loading,
        Some(_) if resource.is_empty => Gate::Empty { can_create: signed_in },
        Some(data) => Gate::Ready(data),
    }
}

/// Gate for the signed-in user's course list.
#[must_use]
pub fn course_list<'a>(session: &SessionStatus, courses: &'a CoursesState) -> Gate<'a, [Course]> {
    evaluate(
        session,
        Access::Authenticated,
        Resource {
            load: courses.list,
            error: courses.error.as_deref(),
            data: Some(courses.items.as_slice()),
            is_empty: courses.items.is_empty(),
        },
    )
}

/// Gate for the selected course. A course without modules is still shown;
/// the classwork view handles that case.
#[must_use]
pub fn course_detail<'a>(session: &SessionStatus, courses: &'a CoursesState) -> Gate<'a, Course> {
    evaluate(
        session,
        Access::Authenticated,
        Resource {
            load: courses.selected_load,
            error: courses.selected_error.as_deref(),
            data: courses.selected.as_ref(),
            is_empty: false,
        },
    )
}

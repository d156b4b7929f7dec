use super::*;
use crate::net::mock::{course, course_42, user};

fn signed_in() -> SessionStatus {
    SessionStatus::Authenticated(user())
}

fn loaded(items: Vec<Course>) -> CoursesState {
    let mut state = CoursesState::default();
    state.items = items;
    state.list = LoadState::Succeeded;
    state
}

#[test]
fn unknown_session_shows_global_spinner_first() {
    let mut state = loaded(Vec::new());
    state.error = Some("boom".into());
    assert_eq!(course_list(&SessionStatus::Unknown, &state), Gate::GlobalSpinner);
    assert_eq!(course_detail(&SessionStatus::Unknown, &state), Gate::GlobalSpinner);
}

#[test]
fn signed_out_gets_login_prompt_on_protected_route() {
    let state = loaded(vec![course(1, "Algebra")]);
    assert_eq!(course_list(&SessionStatus::Unauthenticated, &state), Gate::LoginPrompt);
}

#[test]
fn not_yet_requested_counts_as_loading() {
    let state = CoursesState::default();
    assert_eq!(course_list(&signed_in(), &state), Gate::Loading);
    assert_eq!(course_detail(&signed_in(), &state), Gate::Loading);
}

#[test]
fn pending_shows_local_spinner() {
    let mut state = loaded(vec![course(1, "Algebra")]);
    state.list = LoadState::Pending;
    assert_eq!(course_list(&signed_in(), &state), Gate::Loading);
}

#[test]
fn failure_shows_raw_server_message() {
    let mut state = CoursesState::default();
    state.list = LoadState::Failed;
    state.error = Some("Course service unavailable".into());
    assert_eq!(course_list(&signed_in(), &state), Gate::Error("Course service unavailable"));
}

#[test]
fn empty_list_offers_create_when_signed_in() {
    assert_eq!(course_list(&signed_in(), &loaded(Vec::new())), Gate::Empty { can_create: true });
}

#[test]
fn public_route_signed_out_has_no_create_affordance() {
    let items: Vec<Course> = Vec::new();
    let gate = evaluate(
        &SessionStatus::Unauthenticated,
        Access::Public,
        Resource { load: LoadState::Succeeded, error: None, data: Some(items.as_slice()), is_empty: true },
    );
    assert_eq!(gate, Gate::Empty { can_create: false });
}

#[test]
fn populated_list_is_ready() {
    let state = loaded(vec![course(1, "Algebra"), course(2, "Poetry")]);
    match course_list(&signed_in(), &state) {
        Gate::Ready(items) => assert_eq!(items.len(), 2),
        other => panic!("expected ready, got {other:?}"),
    }
}

#[test]
fn detail_ready_even_without_modules() {
    let mut state = CoursesState::default();
    state.selected = Some(course(9, "Empty"));
    state.selected_load = LoadState::Succeeded;
    assert_eq!(course_detail(&signed_in(), &state), Gate::Ready(&course(9, "Empty")));
}

#[test]
fn detail_error_uses_selected_error() {
    let mut state = loaded(vec![course_42()]);
    state.selected_load = LoadState::Failed;
    state.selected_error = Some("Course not found".into());
    assert_eq!(course_detail(&signed_in(), &state), Gate::Error("Course not found"));
    // The list is unaffected.
    assert!(matches!(course_list(&signed_in(), &state), Gate::Ready(_)));
}

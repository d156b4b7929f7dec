use std::sync::Arc;

use super::*;
use crate::net::mock::{MockApi, course, course_42, unit};
use crate::state::courses::CoursesStore;
use crate::state::session::SessionStore;

async fn stores(api: MockApi) -> (SessionStore, CoursesStore) {
    let api = Arc::new(api);
    let session = SessionStore::new(api.clone());
    let courses = CoursesStore::new(api, session.clone());
    courses.attach();
    session.probe().await;
    (session, courses)
}

#[tokio::test]
async fn unauthorized_probe_shows_login_control() {
    let (session, _) = stores(MockApi::default()).await;
    let snapshot = session.snapshot();
    assert_eq!(navbar::control(&snapshot), NavControl::Login);
    assert_eq!(navbar(&snapshot), "Classroom  [ Login with Google ]");
}

#[tokio::test]
async fn signed_in_navbar_shows_avatar_initial() {
    let (session, _) = stores(MockApi::signed_in()).await;
    assert_eq!(navbar(&session.snapshot()), "Classroom  [ A ] Ada Lovelace");
}

#[test]
fn pending_navbar_before_probe() {
    assert_eq!(navbar(&SessionState::default()), "Classroom  [ ... ]");
}

#[tokio::test]
async fn empty_backend_list_offers_create_when_signed_in() {
    let (session, courses) = stores(MockApi::signed_in()).await;
    courses.list_for_user().await.unwrap();

    let text = course_list(&session.status(), &courses.snapshot());
    assert!(text.starts_with("No courses available yet."));
    assert!(text.contains("create-course"));
}

#[tokio::test]
async fn empty_backend_list_prompts_login_when_signed_out() {
    let (session, courses) = stores(MockApi::default()).await;
    courses.list_for_user().await.unwrap();

    let text = course_list(&session.status(), &courses.snapshot());
    assert_eq!(text, LOGIN_PROMPT);
}

#[tokio::test]
async fn course_list_shows_names_and_ids() {
    let mut algebra = course(1, "Algebra");
    algebra.description = Some("Groups and rings".into());
    let (session, courses) = stores(MockApi::signed_in().with_courses(vec![algebra, course(2, "Poetry")])).await;
    courses.list_for_user().await.unwrap();

    let text = course_list(&session.status(), &courses.snapshot());
    assert_eq!(text, "Algebra  [1]\n    Groups and rings\nPoetry  [2]");
}

#[tokio::test]
async fn course_detail_lists_units_in_order() {
    let (session, courses) = stores(MockApi::signed_in().with_detail(course_42())).await;
    courses.get_by_id(&course_42().id).await.unwrap();

    let text = course_detail(&session.status(), &courses.snapshot());
    let axioms = text.find("1. Axioms").unwrap();
    let cosets = text.find("2. Cosets").unwrap();
    assert!(axioms < cosets);
    assert!(text.contains("v Module 1: Groups  [1]"));
    assert!(text.contains("> Module 2: Rings  [2]"));
    assert!(text.contains("(material)"));
}

#[tokio::test]
async fn course_detail_without_modules_says_so() {
    let (session, courses) = stores(MockApi::signed_in().with_detail(course(5, "Fresh"))).await;
    courses.get_by_id(&course(5, "Fresh").id).await.unwrap();

    let text = course_detail(&session.status(), &courses.snapshot());
    assert!(text.ends_with(classwork::NO_MODULES));
}

#[tokio::test]
async fn course_detail_error_is_inline() {
    let (session, courses) = stores(MockApi::signed_in()).await;
    let _ = courses.get_by_id(&course(404, "Missing").id).await;

    let text = course_detail(&session.status(), &courses.snapshot());
    assert_eq!(text, "Error loading course: Course not found");
}

#[test]
fn flat_unit_listing_is_sorted() {
    let text = units(&[unit(1, "Later", Some(2)), unit(2, "First", Some(1))]);
    assert_eq!(text, "1. First  (material)  [2]\n2. Later  (material)  [1]");
    assert_eq!(units(&[]), classwork::NO_UNITS);
    assert_eq!(modules(&[]), classwork::NO_MODULES);
}

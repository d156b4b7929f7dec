//! Plain-text rendering of the gated views for the terminal.

use std::fmt::Write;

use super::classwork::{self, Classwork};
use super::gate::{self, Gate};
use super::navbar::{self, NavControl};
use crate::net::types::{Course, Module, Unit};
use crate::state::courses::CoursesState;
use crate::state::session::{SessionState, SessionStatus};

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

const CHECKING_SESSION: &str = "Checking your session...";
const LOGIN_PROMPT: &str = "You are not signed in. Log in with Google to continue.";

#[must_use]
pub fn navbar(session: &SessionState) -> String {
    match navbar::control(session) {
        NavControl::Pending => "Classroom  [ ... ]".to_owned(),
        NavControl::Login => "Classroom  [ Login with Google ]".to_owned(),
        NavControl::Avatar { initial, name } => format!("Classroom  [ {initial} ] {name}"),
    }
}

#[must_use]
pub fn course_list(session: &SessionStatus, courses: &CoursesState) -> String {
    match gate::course_list(session, courses) {
        Gate::GlobalSpinner => CHECKING_SESSION.to_owned(),
        Gate::LoginPrompt => LOGIN_PROMPT.to_owned(),
        Gate::Loading => "Loading courses...".to_owned(),
        Gate::Error(e) => format!("Error loading courses: {e}"),
        Gate::Empty { can_create: true } => {
            "No courses available yet.\nCreate one with `classroom create-course --name <NAME>`.".to_owned()
        }
        Gate::Empty { can_create: false } => {
            "No courses available yet.\nCheck back later or contact the administrator.".to_owned()
        }
        Gate::Ready(items) => {
            let mut out = String::new();
            for course in items {
                course_line(&mut out, course);
            }
            out.trim_end().to_owned()
        }
    }
}

fn course_line(out: &mut String, course: &Course) {
    let _ = writeln!(out, "{}  [{}]", course.name, course.id);
    if let Some(desc) = course.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "    {desc}");
    }
}

#[must_use]
pub fn course_detail(session: &SessionStatus, courses: &CoursesState) -> String {
    match gate::course_detail(session, courses) {
        Gate::GlobalSpinner => CHECKING_SESSION.to_owned(),
        Gate::LoginPrompt => LOGIN_PROMPT.to_owned(),
        Gate::Loading => "Loading course details...".to_owned(),
        Gate::Error(e) => format!("Error loading course: {e}"),
        Gate::Empty { .. } => classwork::NO_MODULES.to_owned(),
        Gate::Ready(course) => {
            let mut out = String::new();
            course_line(&mut out, course);
            out.push('\n');
            classwork_text(&mut out, course);
            out.trim_end().to_owned()
        }
    }
}

fn classwork_text(out: &mut String, course: &Course) {
    let modules = match classwork::classwork(course) {
        Classwork::NoModules => {
            out.push_str(classwork::NO_MODULES);
            return;
        }
        Classwork::Modules(modules) => modules,
    };
    for module in modules {
        let marker = if module.expanded { 'v' } else { '>' };
        let _ = writeln!(out, "{marker} {}  [{}]", module.heading(), module.module.id);
        if let Some(desc) = module.module.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "    {desc}");
        }
        if module.units.is_empty() {
            let _ = writeln!(out, "    {}", classwork::NO_UNITS);
        }
        for unit in &module.units {
            let _ = writeln!(out, "    {}  ({})", unit.heading(), unit.type_label());
            if let Some(preview) = unit.preview() {
                let _ = writeln!(out, "        {preview}");
            }
        }
        out.push('\n');
    }
}

/// Flat listing for `GET /courses/{id}/modules`.
#[must_use]
pub fn modules(modules: &[Module]) -> String {
    if modules.is_empty() {
        return classwork::NO_MODULES.to_owned();
    }
    crate::state::ordering::sorted(modules)
        .into_iter()
        .map(|(order, m)| format!("Module {order}: {}  [{}]", m.title, m.id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flat listing for `GET /modules/{id}/units`.
#[must_use]
pub fn units(units: &[Unit]) -> String {
    if units.is_empty() {
        return classwork::NO_UNITS.to_owned();
    }
    crate::state::ordering::sorted(units)
        .into_iter()
        .map(|(order, u)| format!("{order}. {}  ({})  [{}]", u.title, u.unit_type.label(), u.id))
        .collect::<Vec<_>>()
        .join("\n")
}

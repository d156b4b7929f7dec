//! Classwork accordion: a course's modules and units in display order.

use crate::net::types::{Course, Module, Unit, UnitType};
use crate::state::ordering::sorted;

#[cfg(test)]
#[path = "classwork_test.rs"]
mod tests;

pub const NO_MODULES: &str = "No modules have been added to this course yet.";
pub const NO_UNITS: &str = "No units in this module yet.";

/// Unit content longer than this is cut in the preview line.
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, PartialEq, Eq)]
pub enum Classwork<'a> {
    NoModules,
    Modules(Vec<ModuleView<'a>>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ModuleView<'a> {
    pub order: i64,
    pub module: &'a Module,
    /// Only the first module starts expanded.
    pub expanded: bool,
    pub units: Vec<UnitView<'a>>,
}

impl ModuleView<'_> {
    #[must_use]
    pub fn heading(&self) -> String {
        format!("Module {}: {}", self.order, self.module.title)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnitView<'a> {
    pub order: i64,
    pub unit: &'a Unit,
}

impl UnitView<'_> {
    #[must_use]
    pub fn heading(&self) -> String {
        format!("{}. {}", self.order, self.unit.title)
    }

    #[must_use]
    pub fn type_label(&self) -> String {
        self.unit.unit_type.label()
    }

    /// Secondary line. External links are shown in full; other content is
    /// cut to a short preview.
    #[must_use]
    pub fn preview(&self) -> Option<String> {
        let content = self.unit.content.as_deref().filter(|c| !c.is_empty())?;
        if self.unit.unit_type == UnitType::ExternalLink || content.chars().count() <= PREVIEW_CHARS {
            return Some(content.to_owned());
        }
        let cut: String = content.chars().take(PREVIEW_CHARS).collect();
        Some(format!("{cut}..."))
    }
}

#[must_use]
pub fn classwork(course: &Course) -> Classwork<'_> {
    if course.modules.is_empty() {
        return Classwork::NoModules;
    }
    let modules = sorted(&course.modules)
        .into_iter()
        .enumerate()
        .map(|(i, (order, module))| ModuleView {
            order,
            module,
            expanded: i == 0,
            units: sorted(&module.units)
                .into_iter()
                .map(|(order, unit)| UnitView { order, unit })
                .collect(),
        })
        .collect();
    Classwork::Modules(modules)
}

//! Ordering rules for modules and units.
//!
//! `order` is a sparse integer chosen by whoever created the item. When it
//! is missing the item is shown at its position in the response (1-based).
//! New items are placed after the highest existing order.

use crate::net::types::{Module, Unit};

#[cfg(test)]
#[path = "ordering_test.rs"]
mod tests;

pub trait Ordered {
    fn order(&self) -> Option<i64>;
}

impl Ordered for Module {
    fn order(&self) -> Option<i64> {
        self.order
    }
}

impl Ordered for Unit {
    fn order(&self) -> Option<i64> {
        self.order
    }
}

/// Order used for display: the explicit order, else `index + 1`.
#[must_use]
pub fn display_order(order: Option<i64>, index: usize) -> i64 {
    order.unwrap_or_else(|| i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1)))
}

/// Items paired with their display order, ascending. Ties keep response order.
#[must_use]
pub fn sorted<T: Ordered>(items: &[T]) -> Vec<(i64, &T)> {
    let mut out: Vec<(i64, &T)> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (display_order(item.order(), i), item))
        .collect();
    out.sort_by_key(|(order, _)| *order);
    out
}

/// Order for a new item appended to `items`. Missing orders count as 0.
#[must_use]
pub fn next_order<T: Ordered>(items: &[T]) -> i64 {
    items
        .iter()
        .map(|i| i.order().unwrap_or(0))
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

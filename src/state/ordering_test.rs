use super::*;
use crate::net::mock::unit;

fn titles(items: &[(i64, &Unit)]) -> Vec<String> {
    items.iter().map(|(_, u)| u.title.clone()).collect()
}

#[test]
fn sorted_ascending_by_order() {
    let units = vec![unit(1, "second", Some(2)), unit(2, "first", Some(1))];
    let out = sorted(&units);
    assert_eq!(titles(&out), ["first", "second"]);
    assert_eq!(out[0].0, 1);
    assert_eq!(out[1].0, 2);
}

#[test]
fn missing_order_falls_back_to_position() {
    let units = vec![unit(1, "a", None), unit(2, "b", None), unit(3, "c", None)];
    let out = sorted(&units);
    assert_eq!(titles(&out), ["a", "b", "c"]);
    assert_eq!(out.iter().map(|(o, _)| *o).collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn mixed_orders_interleave_with_positions() {
    // positions: x→1, y has 5, z→3
    let units = vec![unit(1, "x", None), unit(2, "y", Some(5)), unit(3, "z", None)];
    assert_eq!(titles(&sorted(&units)), ["x", "z", "y"]);
}

#[test]
fn ties_keep_response_order() {
    let units = vec![unit(1, "a", Some(1)), unit(2, "b", Some(1))];
    assert_eq!(titles(&sorted(&units)), ["a", "b"]);
}

#[test]
fn next_order_empty_is_one() {
    assert_eq!(next_order::<Unit>(&[]), 1);
}

#[test]
fn next_order_is_max_plus_one() {
    let units = vec![unit(1, "a", Some(3)), unit(2, "b", Some(7)), unit(3, "c", None)];
    assert_eq!(next_order(&units), 8);
}

#[test]
fn next_order_all_missing_is_one() {
    let units = vec![unit(1, "a", None), unit(2, "b", None)];
    assert_eq!(next_order(&units), 1);
}

use super::*;
use crate::render::recorder::RecordingBackend;
use crate::scene::node::{Group, Node};

type B = RecordingBackend;

#[test]
fn stack_sort_is_numeric_and_stable() {
    let keyed = vec![(3.0, "a"), (1.0, "b"), (2.0, "c"), (1.0, "d")];
    assert_eq!(order_by_stack(keyed), vec!["b", "d", "c", "a"]);

    // lexicographic order would put 10 before 9
    let keyed = vec![(10.0, "ten"), (9.0, "nine"), (-1.0, "neg")];
    assert_eq!(order_by_stack(keyed), vec!["neg", "nine", "ten"]);
}

#[test]
fn negative_zero_ties_with_zero_and_nan_sorts_last() {
    let keyed = vec![(f64::NAN, "nan"), (0.0, "pos"), (-0.0, "neg"), (-1.0, "low")];
    assert_eq!(order_by_stack(keyed), vec!["low", "pos", "neg", "nan"]);
}

#[test]
fn draw_list_orders_by_absolute_stack_then_descent() {
    let mut scene = Scene::<B>::new();
    let r1 = scene.insert(Node::new(Group).stacked(3.0));
    let r2 = scene.insert(Node::new(Group).stacked(1.0));
    let r3 = scene.insert(Node::new(Group).stacked(2.0));
    let r4 = scene.insert(Node::new(Group).stacked(1.0));
    // lands on 2.0 and precedes r3, since r2 is visited first
    let c = scene.insert(Node::new(Group).stacked(1.0));
    scene.add_child(r2, c).unwrap();

    let order = build_ordered_draw_list(&mut scene, &[r1, r2, r3, r4]);
    assert_eq!(order, vec![r2, r4, c, r3, r1]);
    assert!(order.iter().all(|id| !scene.get(*id).unwrap().is_frozen()));
}

#[test]
fn draw_list_skips_stale_and_repeated_roots() {
    let mut scene = Scene::<B>::new();
    let a = scene.insert(Node::new(Group));
    let b = scene.insert(Node::new(Group));
    let gone = scene.insert(Node::new(Group));
    scene.add_child(a, b).unwrap();
    scene.despawn(gone).unwrap();

    let order = build_ordered_draw_list(&mut scene, &[a, gone, a, b]);
    assert_eq!(order, vec![a, b]);
}

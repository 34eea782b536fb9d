use super::*;
use crate::render::recorder::RecordingBackend;

type B = RecordingBackend;

struct Counter(u32);

impl Drawable<B> for Counter {
    fn update(&mut self, _node: NodeMut<'_, B>) {
        self.0 += 1;
    }
}

fn close(a: Vector2, b: Vector2) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn orphan_absolute_equals_relative() {
    let mut scene = Scene::<B>::new();
    let id = scene.insert(Node::new(Group).at((5.0, 6.0)).rotated(30.0).stacked(2.5));
    let node = scene.get(id).unwrap();
    assert_eq!(node.parent(), Parent::Identity);
    assert_eq!(node.absolute_position(), Vector2::new(5.0, 6.0));
    assert_eq!(node.absolute_rotation(), 30.0);
    assert_eq!(node.absolute_stack(), 2.5);
}

#[test]
fn child_composes_with_parent_rotation() {
    let mut scene = Scene::<B>::new();
    let root = scene.spawn(Group, (100.0, 100.0));
    let child = scene.spawn(Group, (10.0, 0.0));
    scene.add_child(root, child).unwrap();
    assert!(close(
        scene.get(child).unwrap().absolute_position(),
        Vector2::new(110.0, 100.0)
    ));

    scene.get_mut(root).unwrap().rotate(90.0);
    let node = scene.get(child).unwrap();
    assert!(close(node.absolute_position(), Vector2::new(100.0, 110.0)));
    assert_eq!(node.absolute_rotation(), 90.0);
    assert_eq!(node.absolute_stack(), 2.0);
}

#[test]
fn rotate_around_point_moves_then_turns() {
    let mut scene = Scene::<B>::new();
    let id = scene.spawn(Group, (10.0, 0.0));
    scene
        .get_mut(id)
        .unwrap()
        .rotate_around_point(Vector2::ZERO, 90.0);
    let node = scene.get(id).unwrap();
    assert!(close(node.relative_position(), Vector2::new(0.0, 10.0)));
    assert_eq!(node.relative_rotation(), 90.0);
}

#[test]
fn absolute_setters_invert_the_parent() {
    let mut scene = Scene::<B>::new();
    let root = scene.insert(Node::new(Group).at((50.0, -20.0)).rotated(33.0).stacked(4.0));
    let child = scene.spawn(Group, (0.0, 0.0));
    scene.add_child(root, child).unwrap();

    scene
        .get_mut(child)
        .unwrap()
        .set_absolute_position((7.0, 8.0))
        .set_absolute_rotation(10.0)
        .set_absolute_stack(-1.0);

    let node = scene.get(child).unwrap();
    assert!(close(node.absolute_position(), Vector2::new(7.0, 8.0)));
    assert!((node.absolute_rotation() - 10.0).abs() < 1e-9);
    assert_eq!(node.absolute_stack(), -1.0);
    assert_eq!(node.relative_stack(), -5.0);
}

#[test]
fn frozen_values_ignore_later_moves() {
    let mut scene = Scene::<B>::new();
    let root = scene.spawn(Group, (1.0, 1.0));
    let child = scene.spawn(Group, (1.0, 0.0));
    scene.add_child(root, child).unwrap();

    scene.get_mut(child).unwrap().freeze();
    let before = scene.get(child).unwrap().absolute_transform();
    scene.get_mut(root).unwrap().set_relative_position((50.0, 50.0)).rotate(45.0);
    let node = scene.get(child).unwrap();
    assert!(node.is_frozen());
    assert_eq!(node.absolute_transform(), before);

    scene.get_mut(child).unwrap().unfreeze();
    let half = std::f64::consts::FRAC_1_SQRT_2;
    assert!(close(
        scene.get(child).unwrap().absolute_position(),
        Vector2::new(50.0 + half, 50.0 + half)
    ));
}

#[test]
fn frozen_node_ignores_its_own_moves_until_unfrozen() {
    let mut scene = Scene::<B>::new();
    let root = scene.insert(Node::new(Group).at((100.0, 100.0)).rotated(90.0));
    let child = scene.spawn(Group, (10.0, 0.0));
    scene.add_child(root, child).unwrap();

    scene.get_mut(child).unwrap().freeze();
    scene.get_mut(child).unwrap().set_relative_position((20.0, 0.0)).rotate(15.0);
    let node = scene.get(child).unwrap();
    assert!(close(node.absolute_position(), Vector2::new(100.0, 110.0)));
    assert_eq!(node.absolute_rotation(), 90.0);
    assert_eq!(node.relative_position(), Vector2::new(20.0, 0.0));

    scene.get_mut(child).unwrap().unfreeze();
    let node = scene.get(child).unwrap();
    assert!(!node.is_frozen());
    assert!(close(node.absolute_position(), Vector2::new(100.0, 120.0)));
    assert_eq!(node.absolute_rotation(), 105.0);
}

#[test]
fn behavior_downcasts_by_type() {
    let mut scene = Scene::<B>::new();
    let id = scene.spawn(Counter(7), (0.0, 0.0));
    let node = scene.get(id).unwrap();
    assert_eq!(node.behavior::<Counter>().map(|c| c.0), Some(7));
    assert!(node.behavior::<Group>().is_none());
}

#[test]
fn default_behavior_never_intersects() {
    let mut scene = Scene::<B>::new();
    let id = scene.spawn(Group, (0.0, 0.0));
    assert!(!scene.get(id).unwrap().intersects(Vector2::ZERO));
}

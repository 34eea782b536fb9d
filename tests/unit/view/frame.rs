use super::*;
use crate::foundation::core::Vector2;
use crate::render::recorder::{DrawCommand, Recorder, RecordingBackend};
use crate::scene::node::{Drawable, Group, Node, NodeMut, NodeRef};
use crate::scene::transform::TransformProvider;

type B = RecordingBackend;

/// Records its tag as the circle radius and its absolute rotation as the center's x.
struct Probe {
    tag: f64,
    spin: f64,
}

impl Probe {
    fn tag(tag: f64) -> Self {
        Self { tag, spin: 0.0 }
    }
}

impl Drawable<B> for Probe {
    fn draw(&self, ctx: &mut Recorder, node: NodeRef<'_, B>) {
        ctx.push(DrawCommand::StrokeCircle {
            center: Vector2::new(node.absolute_rotation(), 0.0),
            radius: self.tag,
            color: [0, 0, 0, 255],
        });
    }

    fn update(&mut self, mut node: NodeMut<'_, B>) {
        node.rotate(self.spin);
    }
}

fn tags(rec: &Recorder) -> Vec<f64> {
    rec.commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::StrokeCircle { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect()
}

fn rotations(rec: &Recorder) -> Vec<f64> {
    rec.commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::StrokeCircle { center, .. } => Some(center.x),
            _ => None,
        })
        .collect()
}

fn view(scene: &mut Scene<B>) -> View<B> {
    View::builder(Recorder::new())
        .before_draw(Recorder::clear)
        .build(scene)
}

#[test]
fn build_runs_the_first_frame() {
    let mut scene = Scene::<B>::new();
    let v = view(&mut scene);
    assert_eq!(v.frames_run(), 1);
    assert_eq!(v.context().clears(), 1);
    assert!(scene.surface(v.surface()).is_some());
    assert!(!v.opts().click_handling);
}

#[test]
fn frame_draws_in_stack_order() {
    let mut scene = Scene::<B>::new();
    let mut v = view(&mut scene);
    let ids: Vec<_> = [3.0, 1.0, 2.0, 1.0]
        .into_iter()
        .enumerate()
        .map(|(i, z)| scene.insert(Node::new(Probe::tag(i as f64)).stacked(z)))
        .collect();
    v.attach_root(&mut scene, &ids).unwrap();

    let stats = v.run_frame(&mut scene);
    assert_eq!(stats.drawn, 4);
    assert_eq!(stats.updated, 4);
    assert_eq!(stats.frame, FrameIndex(1));
    assert_eq!(tags(v.context()), vec![1.0, 3.0, 2.0, 0.0]);
}

#[test]
fn draw_sees_pre_update_state() {
    let mut scene = Scene::<B>::new();
    let mut v = view(&mut scene);
    let root = scene.spawn(Probe { tag: 0.0, spin: 10.0 }, (0.0, 0.0));
    let child = scene.spawn(Probe::tag(1.0), (5.0, 0.0));
    scene.add_child(root, child).unwrap();
    v.attach_root(&mut scene, &[root]).unwrap();

    v.run_frame(&mut scene);
    assert_eq!(rotations(v.context()), vec![0.0, 0.0]);
    v.run_frame(&mut scene);
    assert_eq!(rotations(v.context()), vec![10.0, 10.0]);
    assert!(!scene.get(child).unwrap().is_frozen());
}

#[test]
fn updates_walk_parents_before_children() {
    struct Follow;
    impl Drawable<B> for Follow {
        fn update(&mut self, mut node: NodeMut<'_, B>) {
            // pin the absolute rotation to zero; only works if the parent already moved
            node.set_absolute_rotation(0.0);
        }
    }

    let mut scene = Scene::<B>::new();
    let mut v = view(&mut scene);
    let root = scene.spawn(Probe { tag: 0.0, spin: 30.0 }, (0.0, 0.0));
    let child = scene.spawn(Follow, (0.0, 0.0));
    scene.add_child(root, child).unwrap();
    v.attach_root(&mut scene, &[root]).unwrap();

    v.run_frame(&mut scene);
    assert_eq!(scene.get(child).unwrap().absolute_rotation(), 0.0);
    assert_eq!(scene.get(child).unwrap().relative_rotation(), -30.0);
}

#[test]
fn detach_root_ignores_non_roots() {
    let mut scene = Scene::<B>::new();
    let mut v = view(&mut scene);
    let a = scene.spawn(Group, (0.0, 0.0));
    let b = scene.spawn(Group, (0.0, 0.0));
    v.attach_root(&mut scene, &[a]).unwrap();

    v.detach_root(&mut scene, &[b]).unwrap();
    assert_eq!(v.roots(), &[a]);
    v.detach_root(&mut scene, &[a]).unwrap();
    assert!(v.roots().is_empty());
    assert!(!scene.is_attached(a, v.surface()));
}

#[test]
fn despawned_roots_drop_out() {
    let mut scene = Scene::<B>::new();
    let mut v = view(&mut scene);
    let a = scene.spawn(Probe::tag(0.0), (0.0, 0.0));
    let b = scene.spawn(Probe::tag(1.0), (0.0, 0.0));
    v.attach_root(&mut scene, &[a, b]).unwrap();
    scene.despawn(a).unwrap();

    let stats = v.run_frame(&mut scene);
    assert_eq!(stats.drawn, 1);
    assert_eq!(v.roots(), &[b]);
}

#[test]
fn dispose_detaches_everything_and_returns_the_context() {
    let mut scene = Scene::<B>::new();
    let mut v = view(&mut scene);
    let root = scene.spawn(Group, (0.0, 0.0));
    let child = scene.spawn(Group, (0.0, 0.0));
    scene.add_child(root, child).unwrap();
    v.attach_root(&mut scene, &[root]).unwrap();
    v.run_frame(&mut scene);
    let surface = v.surface();

    let rec = v.dispose(&mut scene);
    assert_eq!(rec.clears(), 2);
    assert!(scene.surface(surface).is_none());
    assert!(scene.get(root).unwrap().surfaces().is_empty());
    assert!(scene.get(child).unwrap().surfaces().is_empty());
    assert_eq!(scene.len(), 2);
}

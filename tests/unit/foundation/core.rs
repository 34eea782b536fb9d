use super::*;

fn close(a: Vector2, b: Vector2) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn add_sub_neg_are_componentwise() {
    let a = Vector2::new(1.0, 2.0);
    let b = Vector2::new(-3.0, 0.5);
    assert_eq!(a.add(b), Vector2::new(-2.0, 2.5));
    assert_eq!(a.sub(b), Vector2::new(4.0, 1.5));
    assert_eq!(a.neg(), Vector2::new(-1.0, -2.0));
    assert_eq!(a + b, a.add(b));
    assert_eq!(a - b, a.sub(b));
    assert_eq!(-a, a.neg());
}

#[test]
fn rotate_around_is_clockwise_in_screen_space() {
    let p = Vector2::new(10.0, 0.0);
    assert!(close(p.rotate_around(Vector2::ZERO, 90.0), Vector2::new(0.0, 10.0)));
    assert!(close(p.rotate_around(Vector2::ZERO, 180.0), Vector2::new(-10.0, 0.0)));

    let pivot = Vector2::new(5.0, 5.0);
    let q = Vector2::new(6.0, 5.0);
    assert!(close(q.rotate_around(pivot, -90.0), Vector2::new(5.0, 4.0)));
}

#[test]
fn rotate_around_pivot_itself_stays_put() {
    let p = Vector2::new(3.0, -7.0);
    assert!(close(p.rotate_around(p, 123.0), p));
}

#[test]
fn angle_and_distance_from_pivot() {
    let p = Vector2::new(3.0, 4.0);
    assert!((p.distance(Vector2::ZERO) - 5.0).abs() < 1e-12);
    let down = Vector2::new(0.0, 2.0);
    assert!((down.angle_from(Vector2::ZERO) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn lt_gt_need_both_coordinates() {
    let a = Vector2::new(1.0, 1.0);
    assert!(a.lt(Vector2::new(2.0, 2.0)));
    assert!(!a.lt(Vector2::new(2.0, 1.0)));
    assert!(a.gt(Vector2::new(0.0, 0.0)));
    assert!(!a.gt(Vector2::new(0.0, 1.0)));
}

#[test]
fn kurbo_conversions() {
    let v = Vector2::new(1.5, -2.0);
    assert_eq!(Vector2::from(v.to_point()), v);
    assert_eq!(Vector2::from(v.to_vec2()), v);
    assert_eq!(Vector2::from((1.5, -2.0)), v);
}

#[test]
fn nan_propagates() {
    let v = Vector2::new(f64::NAN, 0.0).add(Vector2::new(1.0, 1.0));
    assert!(v.x.is_nan());
    assert_eq!(v.y, 1.0);
}

#[test]
fn fps_validates_and_reports_interval() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(50, 1).unwrap();
    assert!((fps.frame_interval().as_secs_f64() - 0.02).abs() < 1e-9);
    assert!(fps.frame_interval() > Duration::ZERO);
    assert_eq!(fps.as_f64(), 50.0);
    assert_eq!(Fps::default(), fps);
}

#[test]
fn frame_index_next_saturates() {
    assert_eq!(FrameIndex(3).next(), FrameIndex(4));
    assert_eq!(FrameIndex(u64::MAX).next(), FrameIndex(u64::MAX));
}

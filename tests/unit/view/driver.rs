use super::*;
use crate::render::recorder::{Recorder, RecordingBackend};

fn driver(policy: TickPolicy) -> FrameDriver {
    FrameDriver::new(DriverOpts {
        fps: Fps::new(10, 1).unwrap(),
        policy,
    })
    .unwrap()
}

#[test]
fn invalid_fps_is_a_config_error() {
    let err = FrameDriver::new(DriverOpts {
        fps: Fps { num: 30, den: 0 },
        policy: TickPolicy::Skip,
    })
    .unwrap_err();
    assert!(matches!(err, crate::StrataError::Config(_)));
}

#[test]
fn first_call_arms_the_schedule() {
    let mut d = driver(TickPolicy::Skip);
    let t0 = Instant::now();
    assert_eq!(d.ticks_due(t0), 0);
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(50)), 0);
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(100)), 1);
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(150)), 0);
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(200)), 1);
    assert_eq!(d.skipped(), 0);
}

#[test]
fn skip_drops_every_overdue_tick_but_one() {
    let mut d = driver(TickPolicy::Skip);
    let t0 = Instant::now();
    d.ticks_due(t0);
    // four intervals due at once
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(450)), 1);
    assert_eq!(d.skipped(), 3);
    // stays phase-locked: next tick at 500ms
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(499)), 0);
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(500)), 1);
}

#[test]
fn queue_one_allows_a_single_catch_up() {
    let mut d = driver(TickPolicy::QueueOne);
    let t0 = Instant::now();
    d.ticks_due(t0);
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(250)), 2);
    assert_eq!(d.skipped(), 0);
    // due at 300; 350ms behind means four ticks, two of them dropped
    assert_eq!(d.ticks_due(t0 + Duration::from_millis(650)), 2);
    assert_eq!(d.skipped(), 2);
}

#[test]
fn run_stops_after_max_frames() {
    let mut scene = Scene::<RecordingBackend>::new();
    let mut view = View::builder(Recorder::new()).build(&mut scene);
    let mut d = FrameDriver::new(DriverOpts {
        fps: Fps::new(1000, 1).unwrap(),
        policy: TickPolicy::QueueOne,
    })
    .unwrap();

    assert_eq!(d.run(&mut view, &mut scene, Some(3)), 3);
    assert_eq!(view.frames_run(), 4);
    // schedule re-arms on the next run
    assert_eq!(d.run(&mut view, &mut scene, Some(1)), 1);
}

#[test]
fn shutdown_before_run_returns_immediately_and_resets() {
    let mut scene = Scene::<RecordingBackend>::new();
    let mut view = View::builder(Recorder::new()).build(&mut scene);
    let mut d = driver(TickPolicy::Skip);
    let handle = d.shutdown_handle();

    handle.shutdown();
    assert!(handle.is_requested());
    assert_eq!(d.run(&mut view, &mut scene, None), 0);
    assert!(!handle.is_requested());
}

#[test]
fn shutdown_from_another_thread_stops_an_unbounded_run() {
    let mut scene = Scene::<RecordingBackend>::new();
    let mut view = View::builder(Recorder::new()).build(&mut scene);
    let mut d = FrameDriver::new(DriverOpts {
        fps: Fps::new(200, 1).unwrap(),
        policy: TickPolicy::Skip,
    })
    .unwrap();
    let handle = d.shutdown_handle();

    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        handle.shutdown();
    });
    let ran = d.run(&mut view, &mut scene, None);
    stopper.join().unwrap();
    assert!(ran >= 1);
}

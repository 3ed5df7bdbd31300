use std::cell::RefCell;
use std::rc::Rc;

use glide_tween::{Easing, EasingFunction, FrameScheduler, Transition, Tween};

#[derive(Default)]
struct Log {
    ticks: RefCell<Vec<f64>>,
    completions: RefCell<Vec<f64>>,
}

impl Log {
    fn last_tick(&self) -> Option<f64> {
        self.ticks.borrow().last().copied()
    }
}

fn engine(scheduler: &FrameScheduler, duration: f64, easing: Easing) -> (Transition<f64>, Rc<Log>) {
    let log = Rc::new(Log::default());
    let transition = Transition::new(Rc::new(scheduler.clone()));
    let ticks = Rc::clone(&log);
    let completions = Rc::clone(&log);
    transition
        .set_duration(duration)
        .set_easing(easing)
        .on_tick(move |value| ticks.ticks.borrow_mut().push(*value))
        .on_complete(move |value| completions.completions.borrow_mut().push(*value));
    (transition, log)
}

#[test]
fn linear_run_reaches_midpoint_and_target() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 1000.0, EasingFunction::Linear.into());
    transition.set_from(0.0).set_to(100.0);

    scheduler.advance(500.0);
    let mid = log.last_tick().expect("tick at 500ms");
    assert!((mid - 50.0).abs() < 1e-9, "got {mid}");
    assert!(log.completions.borrow().is_empty());

    scheduler.advance(500.0);
    assert_eq!(log.last_tick(), Some(100.0));
    assert_eq!(*log.completions.borrow(), vec![100.0]);

    // Nothing fires after arrival
    scheduler.advance(500.0);
    assert_eq!(log.ticks.borrow().len(), 2);
    assert_eq!(log.completions.borrow().len(), 1);
}

#[test]
fn retarget_midway_delivers_current_value_synchronously() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 1000.0, EasingFunction::Linear.into());
    transition.set_from(0.0).set_to(100.0);
    scheduler.advance(500.0);
    let before = log.ticks.borrow().len();

    transition.set_to(50.0);
    assert_eq!(log.ticks.borrow().len(), before + 1);
    assert!((log.last_tick().unwrap() - 50.0).abs() < 1e-9);
    assert!(log.completions.borrow().is_empty());

    scheduler.advance(250.0);
    assert!(log.completions.borrow().is_empty());
    scheduler.advance(250.0);
    assert_eq!(log.last_tick(), Some(50.0));
    assert_eq!(*log.completions.borrow(), vec![50.0]);
}

#[test]
fn retarget_is_continuous_and_keeps_end_time() {
    let scheduler = FrameScheduler::manual();
    let easing: Easing = EasingFunction::EaseOutQuart.into();
    let (transition, log) = engine(&scheduler, 1000.0, easing.clone());
    transition.set_from(0.0).set_to(100.0);
    scheduler.advance(300.0);

    transition.set_to(20.0);
    let expected = f64::tween(&0.0, &100.0, 0.3, &easing);
    assert_eq!(log.last_tick(), Some(expected));

    // Remaining time is what was left of the original second
    scheduler.advance(699.0);
    assert!(log.completions.borrow().is_empty());
    scheduler.advance(1.0);
    assert_eq!(*log.completions.borrow(), vec![20.0]);
}

#[test]
fn equal_endpoints_settle_on_next_frame() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 1000.0, EasingFunction::Linear.into());
    transition.set_from(5.0).set_to(5.0);
    assert!(log.ticks.borrow().is_empty());
    assert!(transition.is_running());

    scheduler.tick();
    assert_eq!(*log.ticks.borrow(), vec![5.0]);
    assert_eq!(*log.completions.borrow(), vec![5.0]);
    assert!(scheduler.is_idle());
}

#[test]
fn retargeting_a_settling_engine_animates() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 100.0, EasingFunction::Linear.into());
    transition.set_from(5.0).set_to(5.0);
    transition.set_to(15.0);
    assert_eq!(*log.ticks.borrow(), vec![5.0]);

    scheduler.advance(50.0);
    assert!((log.last_tick().unwrap() - 10.0).abs() < 1e-9);
    assert!(log.completions.borrow().is_empty());
    scheduler.advance(50.0);
    assert_eq!(*log.completions.borrow(), vec![15.0]);
}

#[test]
fn unchanged_inputs_are_noops() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 1000.0, EasingFunction::Linear.into());
    transition.set_from(0.0).set_to(100.0);
    scheduler.advance(400.0);
    let delivered = log.ticks.borrow().len();

    transition
        .set_from(0.0)
        .set_to(100.0)
        .set_duration(1000.0)
        .set_easing(EasingFunction::Linear.into());
    assert_eq!(log.ticks.borrow().len(), delivered);
    assert!(log.completions.borrow().is_empty());
    assert!(transition.is_running());
    assert_eq!(scheduler.pending_tasks(), 1);

    // The segment was not restarted
    scheduler.advance(600.0);
    assert_eq!(*log.completions.borrow(), vec![100.0]);
}

#[test]
fn idle_until_every_input_is_present() {
    let scheduler = FrameScheduler::manual();
    let transition: Transition<f64> = Transition::new(Rc::new(scheduler.clone()));
    transition
        .set_from(0.0)
        .set_to(1.0)
        .set_duration(10.0)
        .set_easing(Easing::custom(|t| t));
    scheduler.run_until_idle(16.0, 10);
    assert!(!transition.is_running());
    assert_eq!(scheduler.frame_count(), 0);
}

#[test]
fn destroy_mid_flight_stops_everything() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 1000.0, EasingFunction::Linear.into());
    transition.set_from(0.0).set_to(100.0);
    scheduler.advance(100.0);

    transition.destroy();
    transition.destroy();
    assert_eq!(scheduler.run_until_idle(16.0, 100), 0);
    assert_eq!(log.ticks.borrow().len(), 1);
    assert!(log.completions.borrow().is_empty());
}

#[test]
fn run_until_idle_drives_to_completion() {
    let scheduler = FrameScheduler::manual();
    let (transition, log) = engine(&scheduler, 280.0, Easing::default());
    transition.set_from(1.0).set_to(0.0);

    let frames = scheduler.run_until_idle(16.0, 600);
    assert_eq!(frames, 18);
    assert_eq!(log.last_tick(), Some(0.0));
    assert_eq!(log.completions.borrow().len(), 1);

    // Monotonic towards the target
    let ticks = log.ticks.borrow();
    assert!(ticks.windows(2).all(|pair| pair[1] <= pair[0]));
}

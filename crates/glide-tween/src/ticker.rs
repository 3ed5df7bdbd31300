//! Frame ticking for transitions.
//!
//! A [`Ticker`] is whatever invokes callbacks once per display frame. The
//! engine only needs three things from it: the current time, a repeating
//! per-frame registration and a one-shot next-frame registration, both
//! cancellable through a [`TickHandle`].
//!
//! [`FrameScheduler`] is the bundled implementation: a cooperative,
//! single-threaded task queue. The host calls [`FrameScheduler::tick`] once per
//! display refresh (or [`FrameScheduler::advance`] to move a manual clock and
//! tick in one step).
//!
//! # Usage
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use glide_tween::ticker::{FrameScheduler, Ticker};
//!
//! let scheduler = FrameScheduler::manual();
//! let frames = Rc::new(Cell::new(0));
//! let counter = frames.clone();
//! let mut handle = scheduler.on_tick(Box::new(move || counter.set(counter.get() + 1)));
//!
//! scheduler.advance(16.0);
//! scheduler.advance(16.0);
//! handle.cancel();
//! scheduler.advance(16.0);
//!
//! assert_eq!(frames.get(), 2);
//! assert_eq!(scheduler.now(), 48.0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use tracing::trace;

/// Source of per-frame callbacks and of the time they observe.
pub trait Ticker {
    /// Current time in milliseconds.
    fn now(&self) -> f64;

    /// Register `callback` to run once per frame until the handle is cancelled.
    fn on_tick(&self, callback: Box<dyn FnMut()>) -> TickHandle;

    /// Register `callback` to run once on the next frame.
    ///
    /// Cancelling the handle before that frame prevents the call.
    fn once(&self, callback: Box<dyn FnOnce()>) -> TickHandle;
}

/// Cancellation handle for a ticker registration.
///
/// Cancelling is idempotent. Dropping a handle does not cancel it.
pub struct TickHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TickHandle {
    /// Create a handle that runs `cancel` the first time it is cancelled.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Cancel the registration.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Whether [`cancel`](Self::cancel) has already run.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Time source of a [`FrameScheduler`].
#[derive(Debug)]
enum Clock {
    /// Time moves only through `advance`.
    Manual(Cell<f64>),
    /// Milliseconds since the scheduler was created.
    Monotonic(Instant),
}

impl Clock {
    fn now(&self) -> f64 {
        match self {
            Self::Manual(now) => now.get(),
            Self::Monotonic(origin) => origin.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

enum Task {
    Repeating(Rc<RefCell<Box<dyn FnMut()>>>),
    Once(Box<dyn FnOnce()>),
}

struct Shared {
    clock: Clock,
    next_id: Cell<u64>,
    frame: Cell<u64>,
    tasks: RefCell<BTreeMap<u64, Task>>,
}

/// Cooperative single-threaded frame scheduler.
///
/// Each call to [`tick`](Self::tick) runs one frame: every task registered
/// before the frame began runs exactly once, in registration order. Tasks
/// registered while a frame is running wait for the next frame, so a
/// transition started from inside a callback never evaluates in the frame that
/// started it.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct FrameScheduler {
    shared: Rc<Shared>,
}

thread_local! {
    static CURRENT: FrameScheduler = FrameScheduler::realtime();
}

impl FrameScheduler {
    fn with_clock(clock: Clock) -> Self {
        Self {
            shared: Rc::new(Shared {
                clock,
                next_id: Cell::new(1),
                frame: Cell::new(0),
                tasks: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// Scheduler whose clock starts at 0 and moves only through [`advance`](Self::advance).
    pub fn manual() -> Self {
        Self::with_clock(Clock::Manual(Cell::new(0.0)))
    }

    /// Scheduler reading a monotonic wall clock.
    pub fn realtime() -> Self {
        Self::with_clock(Clock::Monotonic(Instant::now()))
    }

    /// The thread's shared real-time scheduler.
    ///
    /// Transitions created without an explicit ticker register here; the host
    /// is expected to call `FrameScheduler::current().tick()` once per frame.
    pub fn current() -> Self {
        CURRENT.with(Clone::clone)
    }

    /// Whether this scheduler uses a manual clock.
    pub fn is_manual(&self) -> bool {
        matches!(self.shared.clock, Clock::Manual(_))
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.shared.frame.get()
    }

    /// Number of live registrations.
    pub fn pending_tasks(&self) -> usize {
        self.shared.tasks.borrow().len()
    }

    /// True when nothing is registered.
    pub fn is_idle(&self) -> bool {
        self.shared.tasks.borrow().is_empty()
    }

    /// Let `delta_ms` pass, then run one frame.
    ///
    /// A manual clock jumps forward by `delta_ms`; a monotonic clock sleeps
    /// the current thread for that long. Returns the number of tasks run.
    pub fn advance(&self, delta_ms: f64) -> usize {
        let delta_ms = delta_ms.max(0.0);
        match &self.shared.clock {
            Clock::Manual(now) => now.set(now.get() + delta_ms),
            Clock::Monotonic(_) => {
                if delta_ms > 0.0 {
                    std::thread::sleep(Duration::from_secs_f64(delta_ms / 1000.0));
                }
            }
        }
        self.tick()
    }

    /// Run one frame. Returns the number of tasks run.
    pub fn tick(&self) -> usize {
        let frame = self.shared.frame.get() + 1;
        self.shared.frame.set(frame);

        let ids: Vec<u64> = self.shared.tasks.borrow().keys().copied().collect();
        let mut ran = 0;

        for id in ids {
            // Take what to run out of the queue before calling it: callbacks
            // register and cancel tasks.
            let ready = {
                let mut tasks = self.shared.tasks.borrow_mut();
                let repeating = match tasks.get(&id) {
                    Some(Task::Repeating(callback)) => Some(Rc::clone(callback)),
                    _ => None,
                };
                match repeating {
                    Some(callback) => Some(Task::Repeating(callback)),
                    None => tasks.remove(&id),
                }
            };

            match ready {
                Some(Task::Repeating(callback)) => {
                    let mut callback = callback.borrow_mut();
                    (&mut *callback)();
                    ran += 1;
                }
                Some(Task::Once(callback)) => {
                    callback();
                    ran += 1;
                }
                // Cancelled earlier in this frame
                None => {}
            }
        }

        trace!(frame, ran, now = self.now(), "frame ticked");
        ran
    }

    /// Run frames `frame_ms` apart until no task is registered or
    /// `max_frames` frames have run. Returns the number of frames run.
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while !self.is_idle() && frames < max_frames {
            self.advance(frame_ms);
            frames += 1;
        }
        frames
    }

    fn register(&self, task: Task) -> TickHandle {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        self.shared.tasks.borrow_mut().insert(id, task);

        let shared: Weak<Shared> = Rc::downgrade(&self.shared);
        TickHandle::new(move || {
            if let Some(shared) = shared.upgrade() {
                let removed = shared.tasks.borrow_mut().remove(&id);
                drop(removed);
            }
        })
    }
}

impl Ticker for FrameScheduler {
    fn now(&self) -> f64 {
        self.shared.clock.now()
    }

    fn on_tick(&self, callback: Box<dyn FnMut()>) -> TickHandle {
        self.register(Task::Repeating(Rc::new(RefCell::new(callback))))
    }

    fn once(&self, callback: Box<dyn FnOnce()>) -> TickHandle {
        self.register(Task::Once(callback))
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("clock", &self.shared.clock)
            .field("frame", &self.shared.frame.get())
            .field("tasks", &self.pending_tasks())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn test_manual_clock_advances() {
        let scheduler = FrameScheduler::manual();
        assert!(scheduler.is_manual());
        assert_eq!(scheduler.now(), 0.0);

        scheduler.advance(16.5);
        scheduler.advance(10.0);
        assert_eq!(scheduler.now(), 26.5);
        assert_eq!(scheduler.frame_count(), 2);

        // Negative deltas never move time backwards
        scheduler.advance(-5.0);
        assert_eq!(scheduler.now(), 26.5);
    }

    #[test]
    fn test_repeating_task_runs_every_frame() {
        let scheduler = FrameScheduler::manual();
        let (count, callback) = counter();
        let mut handle = scheduler.on_tick(Box::new(callback));

        scheduler.tick();
        scheduler.tick();
        scheduler.tick();
        assert_eq!(count.get(), 3);

        handle.cancel();
        assert!(handle.is_cancelled());
        scheduler.tick();
        assert_eq!(count.get(), 3);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_once_runs_on_next_frame_only() {
        let scheduler = FrameScheduler::manual();
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let _handle = scheduler.once(Box::new(move || inner.set(inner.get() + 1)));

        assert_eq!(count.get(), 0);
        assert_eq!(scheduler.pending_tasks(), 1);
        scheduler.tick();
        assert_eq!(count.get(), 1);
        scheduler.tick();
        assert_eq!(count.get(), 1);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_cancel_once_before_frame() {
        let scheduler = FrameScheduler::manual();
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let mut handle = scheduler.once(Box::new(move || inner.set(1)));

        handle.cancel();
        handle.cancel();
        scheduler.tick();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_task_registered_during_frame_waits() {
        let scheduler = FrameScheduler::manual();
        let (count, callback) = counter();
        let registrar = scheduler.clone();
        let _outer = scheduler.once(Box::new(move || {
            // The handle is dropped without cancelling, so the task stays queued
            let _ = registrar.on_tick(Box::new(callback));
        }));

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(count.get(), 0);
        scheduler.tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_task_cancelled_by_earlier_task_in_same_frame() {
        let scheduler = FrameScheduler::manual();
        let (count, callback) = counter();
        let victim = Rc::new(RefCell::new(TickHandle::detached()));

        let killer = victim.clone();
        let _first = scheduler.on_tick(Box::new(move || killer.borrow_mut().cancel()));
        *victim.borrow_mut() = scheduler.on_tick(Box::new(callback));

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_run_until_idle() {
        let scheduler = FrameScheduler::manual();
        let _handle = scheduler.once(Box::new(|| {}));
        assert_eq!(scheduler.run_until_idle(16.0, 10), 1);
        assert_eq!(scheduler.now(), 16.0);

        let (_, callback) = counter();
        let _forever = scheduler.on_tick(Box::new(callback));
        assert_eq!(scheduler.run_until_idle(16.0, 5), 5);
    }

    #[test]
    fn test_cancel_after_scheduler_dropped() {
        let scheduler = FrameScheduler::manual();
        let mut handle = scheduler.on_tick(Box::new(|| {}));
        drop(scheduler);
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_current_is_shared() {
        let a = FrameScheduler::current();
        let b = FrameScheduler::current();
        assert!(!a.is_manual());
        let mut handle = a.once(Box::new(|| {}));
        assert_eq!(b.pending_tasks(), 1);
        handle.cancel();
    }
}

//! Live-retargeting transition engine.
//!
//! A [`Transition`] animates one value of type `T` from `from` to `to` over
//! `duration` milliseconds along an easing curve, delivering every computed
//! value to a tick callback and the final one to a completion callback.
//!
//! Its inputs can be assembled in any order and changed while the animation
//! is in flight. Changing `to` mid-flight never produces a visible jump: the
//! engine delivers the value currently on screen, then keeps animating from it
//! toward the new target within the time left in the segment.
//!
//! # Lifecycle
//!
//! ```text
//!            try_run (all inputs present)
//!   Idle ────────────────────────────────► Running(Segment)
//!    ▲                                          │
//!    └──── t ≥ 1 / complete / set_from / destroy┘
//! ```
//!
//! A segment is a snapshot of from/to/duration/easing taken when the
//! ticker registration was made; the live fields may be rewritten while the
//! segment keeps producing continuous values.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use glide_tween::easing::EasingFunction;
//! use glide_tween::ticker::FrameScheduler;
//! use glide_tween::transition::Transition;
//!
//! let scheduler = FrameScheduler::manual();
//! let transition: Transition<f64> = Transition::new(Rc::new(scheduler.clone()));
//! transition
//!     .set_duration(1000.0)
//!     .set_easing(EasingFunction::Linear.into())
//!     .set_from(0.0)
//!     .on_tick(|value| println!("value: {value}"))
//!     .set_to(100.0);
//!
//! scheduler.advance(500.0);
//! assert_eq!(transition.last_value(), Some(50.0));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::easing::Easing;
use crate::ticker::{FrameScheduler, TickHandle, Ticker};
use crate::types::TransitionId;

/// Value types a [`Transition`] can animate.
pub trait Tween: Clone + PartialEq + fmt::Debug + 'static {
    /// Value at elapsed fraction `t` of a segment from `from` to `to`.
    ///
    /// Implementations return exactly `to` when `t >= 1`.
    fn tween(from: &Self, to: &Self, t: f64, easing: &Easing) -> Self;

    /// Engine equality, used to decide whether a segment has anywhere to go.
    ///
    /// Defaults to `==`.
    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

/// Callback receiving every value a transition computes.
pub type TickCallback<T> = Rc<dyn Fn(&T)>;

/// Callback receiving the value a transition completed with.
pub type CompletionCallback<T> = Rc<dyn Fn(&T)>;

/// How a segment is registered with the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    /// Repeating registration, evaluated every frame.
    Animate,
    /// One-shot registration delivering `to` on the next frame (from == to).
    Settle,
}

/// Parameters governing the active ticker registration.
#[derive(Debug)]
pub(crate) struct Segment<T> {
    start_time: f64,
    duration: f64,
    from: T,
    to: T,
    easing: Easing,
    kind: SegmentKind,
    handle: TickHandle,
}

impl<T: Tween> Segment<T> {
    /// Elapsed fraction at `now`. Non-positive durations are already done.
    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (now - self.start_time) / self.duration
        }
    }

    /// Value at elapsed fraction `t`.
    fn value_at(&self, t: f64) -> T {
        T::tween(&self.from, &self.to, t, &self.easing)
    }
}

enum Phase<T> {
    Idle,
    Running(Segment<T>),
}

impl<T> Phase<T> {
    fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }
}

struct State<T> {
    from: Option<T>,
    to: Option<T>,
    duration: Option<f64>,
    easing: Option<Easing>,
    on_tick: Option<TickCallback<T>>,
    on_complete: Option<CompletionCallback<T>>,
    last_delivered: Option<T>,
    phase: Phase<T>,
    destroyed: bool,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            duration: None,
            easing: None,
            on_tick: None,
            on_complete: None,
            last_delivered: None,
            phase: Phase::Idle,
            destroyed: false,
        }
    }
}

impl<T> State<T> {
    /// Leave `Running`: cancel the registration and park `value` as the next
    /// segment's start.
    fn finish(&mut self, value: T) {
        if let Phase::Running(mut segment) = mem::replace(&mut self.phase, Phase::Idle) {
            segment.handle.cancel();
        }
        self.from = Some(value);
        self.to = None;
    }
}

struct Inner<T: Tween> {
    id: TransitionId,
    ticker: Rc<dyn Ticker>,
    state: RefCell<State<T>>,
}

impl<T: Tween> Drop for Inner<T> {
    fn drop(&mut self) {
        if let Phase::Running(segment) = &mut self.state.get_mut().phase {
            segment.handle.cancel();
        }
    }
}

/// Retargetable transition of a single value.
///
/// All setters return `&Self` so configuration can be chained, and all of them
/// may be called in any order: the animation starts as soon as `from`, `to`,
/// `duration`, `easing` and a tick callback are present. Setting an input to
/// the value it already has is a no-op.
///
/// The engine is single-threaded. Callbacks run with no internal borrow held,
/// so they may call back into the transition.
pub struct Transition<T: Tween> {
    inner: Rc<Inner<T>>,
}

impl<T: Tween> Default for Transition<T> {
    /// A transition driven by the thread's shared [`FrameScheduler`].
    fn default() -> Self {
        Self::new(Rc::new(FrameScheduler::current()))
    }
}

impl<T: Tween> Transition<T> {
    /// Create an idle transition driven by `ticker`.
    pub fn new(ticker: Rc<dyn Ticker>) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: TransitionId::new(),
                ticker,
                state: RefCell::new(State::default()),
            }),
        }
    }

    /// Identifier used in log records.
    pub fn id(&self) -> TransitionId {
        self.inner.id
    }

    /// Whether a segment is active.
    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().phase.is_running()
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// Live start value.
    pub fn from_value(&self) -> Option<T> {
        self.inner.state.borrow().from.clone()
    }

    /// Live target value. `None` after a completion.
    pub fn to_value(&self) -> Option<T> {
        self.inner.state.borrow().to.clone()
    }

    /// Live duration in milliseconds.
    pub fn duration(&self) -> Option<f64> {
        self.inner.state.borrow().duration
    }

    /// Live easing curve.
    pub fn easing(&self) -> Option<Easing> {
        self.inner.state.borrow().easing.clone()
    }

    /// The last value handed to the tick callback.
    pub fn last_value(&self) -> Option<T> {
        self.inner.state.borrow().last_delivered.clone()
    }

    /// The value the running segment would deliver right now, or `from`
    /// when idle.
    pub fn current_value(&self) -> Option<T> {
        let state = self.inner.state.borrow();
        match &state.phase {
            Phase::Running(segment) => {
                Some(segment.value_at(segment.progress(self.inner.ticker.now())))
            }
            Phase::Idle => state.from.clone(),
        }
    }

    /// Set the duration used by the next segment.
    ///
    /// A running segment keeps its own duration.
    pub fn set_duration(&self, duration_ms: f64) -> &Self {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.duration == Some(duration_ms) {
                return self;
            }
            state.duration = Some(duration_ms);
        }
        self.try_run();
        self
    }

    /// Set the easing used by the next segment.
    ///
    /// A running segment keeps its own easing.
    pub fn set_easing(&self, easing: Easing) -> &Self {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.easing.as_ref() == Some(&easing) {
                return self;
            }
            state.easing = Some(easing);
        }
        self.try_run();
        self
    }

    /// Set the tick callback from a closure.
    pub fn on_tick(&self, callback: impl Fn(&T) + 'static) -> &Self {
        self.set_tick_callback(Rc::new(callback))
    }

    /// Set the tick callback. Passing the callback already installed is a no-op.
    pub fn set_tick_callback(&self, callback: TickCallback<T>) -> &Self {
        {
            let mut state = self.inner.state.borrow_mut();
            if let Some(existing) = &state.on_tick {
                if Rc::ptr_eq(existing, &callback) {
                    return self;
                }
            }
            state.on_tick = Some(callback);
        }
        self.try_run();
        self
    }

    /// Set the completion callback from a closure.
    pub fn on_complete(&self, callback: impl Fn(&T) + 'static) -> &Self {
        self.set_completion_callback(Rc::new(callback))
    }

    /// Set the completion callback. It only sees completions that happen
    /// after it is installed.
    pub fn set_completion_callback(&self, callback: CompletionCallback<T>) -> &Self {
        let mut state = self.inner.state.borrow_mut();
        if let Some(existing) = &state.on_complete {
            if Rc::ptr_eq(existing, &callback) {
                return self;
            }
        }
        state.on_complete = Some(callback);
        self
    }

    /// Redefine the start value.
    ///
    /// A running segment is force-completed to `value` first (delivering it to
    /// both callbacks), then a new segment starts from `value` toward the
    /// target that was set before the call.
    pub fn set_from(&self, value: T) -> &Self {
        let (running, target) = {
            let state = self.inner.state.borrow();
            if state.from.as_ref() == Some(&value) {
                return self;
            }
            (state.phase.is_running(), state.to.clone())
        };

        if running {
            self.complete_with(value.clone());
        }

        {
            let mut state = self.inner.state.borrow_mut();
            state.from = Some(value);
            state.to = target;
        }
        self.try_run();
        self
    }

    /// Set the target value.
    ///
    /// While running, the value currently on screen is delivered to the tick
    /// callback and the segment continues from it toward `value`, finishing
    /// at the time the original segment would have.
    pub fn set_to(&self, value: T) -> &Self {
        let retarget = {
            let mut state = self.inner.state.borrow_mut();
            if state.to.as_ref() == Some(&value) {
                return self;
            }
            state.to = Some(value.clone());

            let now = self.inner.ticker.now();
            let moved = match &mut state.phase {
                Phase::Idle => None,
                Phase::Running(segment) => {
                    let t = segment.progress(now);
                    let current = segment.value_at(t);
                    if t >= 1.0 {
                        Some((current, true))
                    } else {
                        segment.start_time = now;
                        segment.duration *= 1.0 - t;
                        segment.from = current.clone();
                        segment.to = value.clone();
                        if segment.kind == SegmentKind::Settle {
                            segment.handle.cancel();
                            segment.handle = self.inner.ticker.on_tick(self.frame_callback());
                            segment.kind = SegmentKind::Animate;
                        }
                        debug!(
                            transition = %self.inner.id,
                            progress = t,
                            remaining_ms = segment.duration,
                            "segment retargeted"
                        );
                        Some((current, false))
                    }
                }
            };

            match moved {
                Some((current, true)) => {
                    // The old segment had already arrived; the frame that
                    // would have reported it has not run yet.
                    state.finish(current.clone());
                    if !current.same(&value) {
                        state.to = Some(value);
                    }
                    Some((current, true))
                }
                Some((current, false)) => {
                    state.from = Some(current.clone());
                    Some((current, false))
                }
                None => None,
            }
        };

        if let Some((current, completed)) = retarget {
            self.emit(&current, completed);
        }
        self.try_run();
        self
    }

    /// Snap a running transition to the value it shows right now and
    /// complete with it. No-op when idle.
    pub fn complete(&self) -> &Self {
        let current = {
            let mut state = self.inner.state.borrow_mut();
            let Phase::Running(segment) = &state.phase else {
                return self;
            };
            let current = segment.value_at(segment.progress(self.inner.ticker.now()));
            state.finish(current.clone());
            current
        };
        debug!(transition = %self.inner.id, "completed early");
        self.emit(&current, true);
        self
    }

    /// Complete with `value` regardless of state, delivering it to both
    /// callbacks.
    pub fn complete_with(&self, value: T) -> &Self {
        self.inner.state.borrow_mut().finish(value.clone());
        debug!(transition = %self.inner.id, ?value, "forced completion");
        self.emit(&value, true);
        self
    }

    /// Cancel any ticker registration and stop for good.
    ///
    /// No callbacks fire. Calling it again is a no-op.
    pub fn destroy(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.phase.is_running() {
            let last = state.last_delivered.clone().or_else(|| state.from.clone());
            if let Some(last) = last {
                state.finish(last);
            }
        }
        if !state.destroyed {
            state.destroyed = true;
            debug!(transition = %self.inner.id, "destroyed");
        }
    }

    /// Start a segment if idle and every input is present.
    fn try_run(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.destroyed || state.phase.is_running() || state.on_tick.is_none() {
            return;
        }
        let (Some(from), Some(to), Some(easing), Some(duration)) = (
            state.from.clone(),
            state.to.clone(),
            state.easing.clone(),
            state.duration,
        ) else {
            return;
        };

        let (kind, handle) = if from.same(&to) {
            (SegmentKind::Settle, self.inner.ticker.once(self.settle_callback()))
        } else {
            (SegmentKind::Animate, self.inner.ticker.on_tick(self.frame_callback()))
        };
        let start_time = self.inner.ticker.now();

        debug!(
            transition = %self.inner.id,
            ?kind,
            ?from,
            ?to,
            duration,
            "segment started"
        );

        state.phase = Phase::Running(Segment {
            start_time,
            duration,
            from,
            to,
            easing,
            kind,
            handle,
        });
    }

    /// Per-frame evaluation of an animating segment.
    fn on_frame(&self) {
        let (value, done) = {
            let mut state = self.inner.state.borrow_mut();
            let Phase::Running(segment) = &state.phase else {
                return;
            };
            let t = segment.progress(self.inner.ticker.now());
            let value = segment.value_at(t);
            if t >= 1.0 {
                state.finish(value.clone());
                (value, true)
            } else {
                (value, false)
            }
        };

        trace!(transition = %self.inner.id, ?value, done, "frame");
        if done {
            debug!(transition = %self.inner.id, ?value, "segment arrived");
        }
        self.emit(&value, done);
    }

    /// One-shot delivery of a segment whose ends are equal.
    fn on_settle(&self) {
        let value = {
            let mut state = self.inner.state.borrow_mut();
            let Phase::Running(segment) = &state.phase else {
                return;
            };
            let value = segment.to.clone();
            state.finish(value.clone());
            value
        };
        debug!(transition = %self.inner.id, ?value, "settled");
        self.emit(&value, true);
    }

    fn frame_callback(&self) -> Box<dyn FnMut()> {
        let weak = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Transition { inner }.on_frame();
            }
        })
    }

    fn settle_callback(&self) -> Box<dyn FnOnce()> {
        let weak = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Transition { inner }.on_settle();
            }
        })
    }

    /// Deliver `value` to the tick callback and, when `complete`, to the
    /// completion callback.
    fn emit(&self, value: &T, complete: bool) {
        let (on_tick, on_complete) = {
            let mut state = self.inner.state.borrow_mut();
            state.last_delivered = Some(value.clone());
            let on_complete = if complete {
                state.on_complete.clone()
            } else {
                None
            };
            (state.on_tick.clone(), on_complete)
        };

        if let Some(callback) = on_tick {
            callback(value);
        }
        if let Some(callback) = on_complete {
            callback(value);
        }
    }
}

impl<T: Tween> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Transition")
            .field("id", &self.inner.id)
            .field("from", &state.from)
            .field("to", &state.to)
            .field("duration", &state.duration)
            .field("easing", &state.easing)
            .field("running", &state.phase.is_running())
            .field("destroyed", &state.destroyed)
            .finish()
    }
}

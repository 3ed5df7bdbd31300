//! Per-key transitions over an attribute-bearing target.
//!
//! [`AttributeCoordinator`] keeps one [`Transition<AttrValue>`] per attribute
//! key, created the first time the key is set. Every engine shares the
//! coordinator's duration and easing, and its tick callback writes the value
//! straight back onto the target.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use glide_config::{DEFAULT_DURATION_MS, TransitionConfig};
use tracing::debug;

use crate::attributes::{AttrValue, Attributes};
use crate::easing::Easing;
use crate::error::Result;
use crate::ticker::{FrameScheduler, Ticker};
use crate::transition::Transition;

/// Something whose named attributes can be read and written.
pub trait AttributeTarget {
    /// Current value of `key`, or `None` when the target has none.
    fn attribute(&self, key: &str) -> Option<AttrValue>;

    /// Write `value` at `key`.
    fn set_attribute(&mut self, key: &str, value: AttrValue);
}

impl AttributeTarget for Attributes {
    fn attribute(&self, key: &str) -> Option<AttrValue> {
        self.get(key).cloned()
    }

    fn set_attribute(&mut self, key: &str, value: AttrValue) {
        self.insert(key, value);
    }
}

/// Shared settings for every engine a coordinator creates.
#[derive(Clone)]
pub struct CoordinatorOptions {
    /// Segment duration in milliseconds.
    pub duration: f64,
    pub easing: Easing,
    /// Ticker for new engines. `None` uses [`FrameScheduler::current`].
    pub ticker: Option<Rc<dyn Ticker>>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            ticker: None,
        }
    }
}

impl CoordinatorOptions {
    /// Options from the `[transition]` section of a config file.
    pub fn from_config(config: &TransitionConfig) -> Result<Self> {
        Ok(Self {
            duration: config.duration_ms,
            easing: Easing::named(&config.easing)?,
            ticker: None,
        })
    }

    pub fn with_ticker(mut self, ticker: Rc<dyn Ticker>) -> Self {
        self.ticker = Some(ticker);
        self
    }
}

impl fmt::Debug for CoordinatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("ticker", &self.ticker.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Animates attribute changes on a shared target, one engine per key.
pub struct AttributeCoordinator<O: AttributeTarget + 'static> {
    target: Option<Rc<RefCell<O>>>,
    duration: f64,
    easing: Easing,
    ticker: Rc<dyn Ticker>,
    transitions: BTreeMap<String, Transition<AttrValue>>,
}

impl<O: AttributeTarget + 'static> AttributeCoordinator<O> {
    pub fn new(target: Rc<RefCell<O>>, options: CoordinatorOptions) -> Self {
        let ticker = options
            .ticker
            .unwrap_or_else(|| Rc::new(FrameScheduler::current()));
        Self {
            target: Some(target),
            duration: options.duration,
            easing: options.easing,
            ticker,
            transitions: BTreeMap::new(),
        }
    }

    /// The animated target. `None` after [`destroy`](Self::destroy).
    pub fn target(&self) -> Option<&Rc<RefCell<O>>> {
        self.target.as_ref()
    }

    /// Animate every key of `attributes` toward its value.
    ///
    /// Keys not mentioned keep whatever they are doing.
    pub fn set(&mut self, attributes: &Attributes) {
        let Some(target) = self.target.clone() else {
            return;
        };

        for (key, value) in attributes.iter() {
            let transition = self
                .transitions
                .entry(key.to_string())
                .or_insert_with(|| {
                    spawn(
                        key,
                        value,
                        &target,
                        Rc::clone(&self.ticker),
                        self.duration,
                        &self.easing,
                    )
                });
            transition.set_to(value.clone());
        }
    }

    /// Force-complete every running engine at its current value.
    pub fn complete(&mut self) {
        for transition in self.transitions.values() {
            transition.complete();
        }
    }

    /// Destroy every engine and release the target.
    pub fn destroy(&mut self) {
        for transition in self.transitions.values() {
            transition.destroy();
        }
        self.transitions.clear();
        if self.target.take().is_some() {
            debug!("attribute coordinator destroyed");
        }
    }

    /// Change the duration for existing and future engines.
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration = duration_ms;
        for transition in self.transitions.values() {
            transition.set_duration(duration_ms);
        }
    }

    /// Change the easing for existing and future engines.
    pub fn set_easing(&mut self, easing: Easing) {
        for transition in self.transitions.values() {
            transition.set_easing(easing.clone());
        }
        self.easing = easing;
    }

    pub fn is_animating(&self, key: &str) -> bool {
        self.transitions
            .get(key)
            .is_some_and(|transition| transition.is_running())
    }

    /// Keys that have an engine.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn transition(&self, key: &str) -> Option<&Transition<AttrValue>> {
        self.transitions.get(key)
    }
}

fn spawn<O: AttributeTarget + 'static>(
    key: &str,
    value: &AttrValue,
    target: &Rc<RefCell<O>>,
    ticker: Rc<dyn Ticker>,
    duration: f64,
    easing: &Easing,
) -> Transition<AttrValue> {
    let transition: Transition<AttrValue> = Transition::new(ticker);
    let weak = Rc::downgrade(target);
    let attribute = key.to_string();

    let start = target
        .borrow()
        .attribute(key)
        .unwrap_or_else(|| value.clone());
    debug!(transition = %transition.id(), key, %start, "attribute engine created");

    transition
        .set_duration(duration)
        .set_easing(easing.clone())
        .on_tick(move |value| {
            if let Some(target) = weak.upgrade() {
                target.borrow_mut().set_attribute(&attribute, value.clone());
            }
        })
        .set_from(start);
    transition
}

impl<O: AttributeTarget + 'static> fmt::Debug for AttributeCoordinator<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeCoordinator")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("keys", &self.transitions.keys().collect::<Vec<_>>())
            .field("destroyed", &self.target.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;

    fn setup(initial: Attributes) -> (FrameScheduler, Rc<RefCell<Attributes>>, AttributeCoordinator<Attributes>) {
        let scheduler = FrameScheduler::manual();
        let target = Rc::new(RefCell::new(initial));
        let options = CoordinatorOptions {
            duration: 100.0,
            easing: EasingFunction::Linear.into(),
            ticker: Some(Rc::new(scheduler.clone())),
        };
        let coordinator = AttributeCoordinator::new(target.clone(), options);
        (scheduler, target, coordinator)
    }

    #[test]
    fn test_animates_from_current_target_value() {
        let (scheduler, target, mut coordinator) = setup(Attributes::new().with("x", 0.0));
        coordinator.set(&Attributes::new().with("x", 10.0));
        assert!(coordinator.is_animating("x"));

        scheduler.advance(50.0);
        assert_eq!(target.borrow().get("x"), Some(&AttrValue::Number(5.0)));
        scheduler.advance(50.0);
        assert_eq!(target.borrow().get("x"), Some(&AttrValue::Number(10.0)));
        assert!(!coordinator.is_animating("x"));
    }

    #[test]
    fn test_new_key_settles_on_next_frame() {
        let (scheduler, target, mut coordinator) = setup(Attributes::new());
        coordinator.set(&Attributes::new().with("fill", "#ff0000"));
        assert_eq!(target.borrow().get("fill"), None);

        scheduler.tick();
        assert_eq!(target.borrow().get("fill"), Some(&AttrValue::from("#ff0000")));
        assert!(!coordinator.is_animating("fill"));
    }

    #[test]
    fn test_absent_keys_keep_running() {
        let (scheduler, target, mut coordinator) =
            setup(Attributes::new().with("x", 0.0).with("y", 0.0));
        coordinator.set(&Attributes::new().with("x", 10.0).with("y", 10.0));
        scheduler.advance(50.0);

        coordinator.set(&Attributes::new().with("x", 0.0));
        assert!(coordinator.is_animating("y"));
        scheduler.advance(50.0);
        assert_eq!(target.borrow().get("y"), Some(&AttrValue::Number(10.0)));
        assert_eq!(coordinator.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_complete_and_destroy() {
        let (scheduler, target, mut coordinator) = setup(Attributes::new().with("x", 0.0));
        coordinator.set(&Attributes::new().with("x", 10.0));
        scheduler.advance(25.0);
        coordinator.complete();
        assert_eq!(target.borrow().get("x"), Some(&AttrValue::Number(2.5)));
        assert!(scheduler.is_idle());

        coordinator.set(&Attributes::new().with("x", 20.0));
        coordinator.destroy();
        assert!(coordinator.target().is_none());
        assert!(scheduler.is_idle());

        // A destroyed coordinator ignores further updates
        coordinator.set(&Attributes::new().with("x", 99.0));
        assert_eq!(coordinator.keys().count(), 0);
    }

    #[test]
    fn test_duration_propagates_to_existing_engines() {
        let (_scheduler, _target, mut coordinator) = setup(Attributes::new().with("x", 0.0));
        coordinator.set(&Attributes::new().with("x", 10.0));
        coordinator.set_duration(500.0);
        coordinator.set_easing(EasingFunction::EaseInQuad.into());

        let engine = coordinator.transition("x").unwrap();
        assert_eq!(engine.duration(), Some(500.0));
        assert_eq!(engine.easing(), Some(EasingFunction::EaseInQuad.into()));
    }

    #[test]
    fn test_options_from_config() {
        let config = TransitionConfig {
            duration_ms: 400.0,
            easing: "easeInOutCubic".to_string(),
        };
        let options = CoordinatorOptions::from_config(&config).unwrap();
        assert_eq!(options.duration, 400.0);
        assert_eq!(options.easing, EasingFunction::EaseInOutCubic.into());

        let bad = TransitionConfig {
            easing: "wobble".to_string(),
            ..config
        };
        assert!(CoordinatorOptions::from_config(&bad).is_err());
    }
}

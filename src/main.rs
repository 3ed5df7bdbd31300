use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use glide_config::GlideConfig;
use glide_tween::{
    AttributeCoordinator, Attributes, CoordinatorOptions, Easing, FrameScheduler, Ticker,
    Transition,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GlideConfig::load();
    log::info!(
        "glide demo: duration={}ms easing={} frame_rate={}",
        config.transition.duration_ms,
        config.transition.easing,
        config.ticker.frame_rate
    );

    // `--manual` steps a simulated clock instead of sleeping between frames
    let scheduler = if std::env::args().any(|a| a == "--manual") {
        FrameScheduler::manual()
    } else {
        FrameScheduler::realtime()
    };
    let ticker: Rc<dyn Ticker> = Rc::new(scheduler.clone());
    let frame_ms = config.ticker.frame_interval_ms();

    let easing = Easing::named(&config.transition.easing)
        .with_context(|| format!("invalid easing in config: {}", config.transition.easing))?;

    // Scalar transition, retargeted halfway to the midpoint of its range
    let value = Transition::new(Rc::clone(&ticker));
    value
        .set_duration(config.transition.duration_ms)
        .set_easing(easing)
        .on_tick(|v: &f64| log::debug!("value {v:.3}"))
        .on_complete(|v: &f64| log::info!("value settled at {v:.3}"))
        .set_from(config.demo.from)
        .set_to(config.demo.to);

    let half = (config.transition.duration_ms / frame_ms / 2.0).ceil() as usize;
    for _ in 0..half {
        scheduler.advance(frame_ms);
    }
    let midpoint = (config.demo.from + config.demo.to) / 2.0;
    log::info!("retargeting to {midpoint}");
    value.set_to(midpoint);

    // Attribute coordinator over a plain attribute map
    let node = Rc::new(RefCell::new(
        Attributes::new()
            .with("fill", config.demo.from_color.as_str())
            .with("opacity", 0.0),
    ));
    let options = CoordinatorOptions::from_config(&config.transition)
        .context("building coordinator options")?
        .with_ticker(Rc::clone(&ticker));
    let mut coordinator = AttributeCoordinator::new(Rc::clone(&node), options);
    coordinator.set(
        &Attributes::new()
            .with("fill", config.demo.to_color.as_str())
            .with("opacity", 1.0),
    );

    let frames = scheduler.run_until_idle(frame_ms, config.ticker.max_frames);
    log::info!(
        "finished after {} frames: value={:?} node={:?}",
        frames,
        value.last_value(),
        node.borrow()
    );
    coordinator.destroy();
    Ok(())
}

//! The touch pad on the body's head.
//!
//! A TTP223-class pad toggles chat mode without the brain's involvement.
//! Only the rising edge counts, rate-limited so a long press is one
//! toggle, and the toggle runs through the same paths as
//! `CHAT_START`/`CHAT_STOP`, status reply included.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant};
use tracing::debug;

use crate::dispatcher::Dispatcher;

/// Refractory window after an accepted touch.
pub const TOUCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Hardware seam for the pad.
#[async_trait]
pub trait TouchSensor: Send + Sync {
    /// Current pad level.
    async fn is_touched(&self) -> bool;
}

/// [`TouchSensor`] that is never touched. Used when running headless.
#[derive(Clone, Default)]
pub struct NoopTouch;

#[async_trait]
impl TouchSensor for NoopTouch {
    async fn is_touched(&self) -> bool {
        false
    }
}

/// Poll the pad and toggle chat mode on each debounced rising edge.
pub async fn touch_ticker(
    sensor: Arc<dyn TouchSensor>,
    dispatcher: Arc<Dispatcher>,
    period: Duration,
    debounce: Duration,
) {
    let mut ticker = time::interval(period);
    let mut last = false;
    let mut accepted: Option<Instant> = None;
    loop {
        ticker.tick().await;
        let touched = sensor.is_touched().await;
        let ready = accepted.map_or(true, |t| t.elapsed() >= debounce);
        if touched && !last && ready {
            accepted = Some(Instant::now());
            debug!("touch; toggling chat mode");
            dispatcher.toggle_chat().await;
        }
        last = touched;
    }
}

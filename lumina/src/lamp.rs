use async_trait::async_trait;
use state::Mood;
use tracing::debug;

/// The mood lamp.
#[async_trait]
pub trait Lamp: Send + Sync {
    async fn show(&self, mood: Mood);
}

/// [`Lamp`] that logs each update. Used when running headless.
#[derive(Clone, Default)]
pub struct LoggingLamp;

#[async_trait]
impl Lamp for LoggingLamp {
    async fn show(&self, mood: Mood) {
        debug!(color = ?mood.color, brightness = mood.brightness, "lamp");
    }
}

/// [`Lamp`] that ignores everything.
#[derive(Clone, Default)]
pub struct NoopLamp;

#[async_trait]
impl Lamp for NoopLamp {
    async fn show(&self, _mood: Mood) {}
}

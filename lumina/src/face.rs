use async_trait::async_trait;
use state::{Expression, Mood};
use tracing::debug;

/// Presentation seam. The pixel art lives on the other side of this
/// trait; the core only says what to show.
#[async_trait]
pub trait Face: Send + Sync {
    /// Redraw for the given expression and mood. `mouth_frame` selects a
    /// mouth shape while talking; everyone else passes 0.
    async fn render(&self, expression: Expression, mood: Mood, mouth_frame: u8);
    /// Advance the idle marquee by one step.
    async fn marquee(&self, offset: u16);
}

/// [`Face`] that logs each redraw. Used when running headless.
#[derive(Clone, Default)]
pub struct LoggingFace;

#[async_trait]
impl Face for LoggingFace {
    async fn render(&self, expression: Expression, mood: Mood, mouth_frame: u8) {
        debug!(?expression, color = ?mood.color, mouth_frame, "face render");
    }

    async fn marquee(&self, offset: u16) {
        debug!(offset, "face marquee");
    }
}

/// [`Face`] that ignores everything.
#[derive(Clone, Default)]
pub struct NoopFace;

#[async_trait]
impl Face for NoopFace {
    async fn render(&self, _expression: Expression, _mood: Mood, _mouth_frame: u8) {}
    async fn marquee(&self, _offset: u16) {}
}

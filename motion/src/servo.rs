//! Hardware seam for the pan/tilt servo pair.

use async_trait::async_trait;
use proto::Axis;
use tracing::debug;

/// The two head servos as one peripheral. Implementations talk to real
/// PWM hardware; tests substitute a recording fake.
#[async_trait]
pub trait ServoBank: Send + Sync {
    /// Power the outputs. Writes before `attach` are undefined.
    async fn attach(&self);
    /// Release the outputs; the head goes limp.
    async fn detach(&self);
    /// Positional write in degrees.
    async fn write_angle(&self, axis: Axis, degrees: u8);
    /// Continuous-rotation write as a pulse width in microseconds.
    async fn write_pulse(&self, axis: Axis, us: u16);
}

/// [`ServoBank`] that logs each write. Used when running headless.
#[derive(Clone, Default)]
pub struct LoggingServos;

#[async_trait]
impl ServoBank for LoggingServos {
    async fn attach(&self) {
        debug!("servos attached");
    }

    async fn detach(&self) {
        debug!("servos detached");
    }

    async fn write_angle(&self, axis: Axis, degrees: u8) {
        debug!(?axis, degrees, "servo angle");
    }

    async fn write_pulse(&self, axis: Axis, us: u16) {
        debug!(?axis, us, "servo pulse");
    }
}

/// [`ServoBank`] that ignores everything.
#[derive(Clone, Default)]
pub struct NoopServos;

#[async_trait]
impl ServoBank for NoopServos {
    async fn attach(&self) {}
    async fn detach(&self) {}
    async fn write_angle(&self, _axis: Axis, _degrees: u8) {}
    async fn write_pulse(&self, _axis: Axis, _us: u16) {}
}

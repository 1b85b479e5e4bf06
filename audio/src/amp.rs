//! Serialized control of the amplifier enable line.
//!
//! Several contexts update the gate concurrently: the dispatcher, the
//! tone task, and the playback task. Each gate update and its hardware
//! write happen under one lock here, so the driven line always matches
//! the most recent gate computation.

use std::sync::Arc;

use state::{AmpReason, BodyState};
use tokio::sync::Mutex;

use crate::peripheral::Amplifier;

pub struct AmpControl {
    state: Arc<BodyState>,
    driver: Arc<dyn Amplifier>,
    write: Mutex<()>,
}

impl AmpControl {
    pub fn new(state: Arc<BodyState>, driver: Arc<dyn Amplifier>) -> AmpControl {
        AmpControl {
            state,
            driver,
            write: Mutex::new(()),
        }
    }

    /// Add a reason and drive the line. Returns the resulting level.
    pub async fn assert(&self, reason: AmpReason) -> bool {
        let _held = self.write.lock().await;
        let enabled = self.state.amp.assert(reason);
        self.driver.set_enabled(enabled).await;
        enabled
    }

    /// Drop a reason and drive the line. Returns the resulting level.
    pub async fn retract(&self, reason: AmpReason) -> bool {
        let _held = self.write.lock().await;
        let enabled = self.state.amp.retract(reason);
        self.driver.set_enabled(enabled).await;
        enabled
    }

    /// Drop several reasons with a single hardware write.
    pub async fn retract_all(&self, reasons: &[AmpReason]) -> bool {
        let _held = self.write.lock().await;
        let mut enabled = self.state.amp.is_enabled();
        for &reason in reasons {
            enabled = self.state.amp.retract(reason);
        }
        self.driver.set_enabled(enabled).await;
        enabled
    }
}

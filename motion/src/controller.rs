//! Motion controller for the pan/tilt head.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use proto::{Axis, BurstDir};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::servo::ServoBank;

/// Accepted window for a continuous-rotation neutral pulse, microseconds.
pub const CAL_MIN_US: i32 = 1400;
pub const CAL_MAX_US: i32 = 1600;
/// Accepted window for the burst speed offset.
pub const SPEED_MIN: i32 = 10;
pub const SPEED_MAX: i32 = 200;
/// Accepted window for the burst duration, milliseconds.
pub const DURATION_MIN_MS: i32 = 50;
pub const DURATION_MAX_MS: i32 = 1000;

/// Continuous-rotation calibration. Neutral is the "stopped" pulse width,
/// distinct per axis; bursts apply `neutral ± speed` for `move_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    pub neutral_pan_us: u16,
    pub neutral_tilt_us: u16,
    pub speed_us: u16,
    pub move_ms: u64,
}

impl Default for Tuning {
    fn default() -> Tuning {
        Tuning {
            neutral_pan_us: 1500,
            neutral_tilt_us: 1500,
            speed_us: 50,
            move_ms: 300,
        }
    }
}

impl Tuning {
    fn neutral(&self, axis: Axis) -> u16 {
        match axis {
            Axis::Pan => self.neutral_pan_us,
            Axis::Tilt => self.neutral_tilt_us,
        }
    }
}

#[derive(Default)]
struct Bursts {
    pan: Option<JoinHandle<()>>,
    tilt: Option<JoinHandle<()>>,
}

impl Bursts {
    fn slot(&mut self, axis: Axis) -> &mut Option<JoinHandle<()>> {
        match axis {
            Axis::Pan => &mut self.pan,
            Axis::Tilt => &mut self.tilt,
        }
    }

    fn abort_all(&mut self) {
        for slot in [&mut self.pan, &mut self.tilt] {
            if let Some(h) = slot.take() {
                h.abort();
            }
        }
    }
}

/// Drives the servo bank. Owns the current head pose for positional
/// stepping and the calibration for continuous-rotation bursts.
pub struct MotionController {
    bank: Arc<dyn ServoBank>,
    tuning: Mutex<Tuning>,
    attached: AtomicBool,
    /// Current positional angles, advanced one degree per tick.
    pose: Mutex<(u8, u8)>,
    bursts: Mutex<Bursts>,
}

impl MotionController {
    pub fn new(bank: Arc<dyn ServoBank>) -> MotionController {
        MotionController {
            bank,
            tuning: Mutex::new(Tuning::default()),
            attached: AtomicBool::new(false),
            pose: Mutex::new((90, 90)),
            bursts: Mutex::new(Bursts::default()),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn tuning(&self) -> Tuning {
        *self.tuning.lock().unwrap()
    }

    /// Attach the bank and restore the current pose.
    pub async fn enable(&self) {
        self.bank.attach().await;
        self.attached.store(true, Ordering::Release);
        let (pan, tilt) = *self.pose.lock().unwrap();
        self.bank.write_angle(Axis::Pan, pan).await;
        self.bank.write_angle(Axis::Tilt, tilt).await;
    }

    /// Cancel any bursts and release the outputs.
    pub async fn disable(&self) {
        self.attached.store(false, Ordering::Release);
        self.bursts.lock().unwrap().abort_all();
        self.bank.detach().await;
    }

    /// Neutralise both axes (continuous-rotation stop).
    pub async fn stop(&self) {
        if !self.is_attached() {
            debug!("servo stop ignored; bank detached");
            return;
        }
        self.bursts.lock().unwrap().abort_all();
        let tuning = self.tuning();
        self.bank
            .write_pulse(Axis::Pan, tuning.neutral(Axis::Pan))
            .await;
        self.bank
            .write_pulse(Axis::Tilt, tuning.neutral(Axis::Tilt))
            .await;
    }

    /// Set the neutral pulse for one axis, or both when `axis` is `None`.
    /// Out-of-range values are rejected without touching state.
    pub fn calibrate(&self, axis: Option<Axis>, us: i32) -> bool {
        if !(CAL_MIN_US..=CAL_MAX_US).contains(&us) {
            warn!(us, "servo calibration out of range; rejected");
            return false;
        }
        let mut tuning = self.tuning.lock().unwrap();
        match axis {
            Some(Axis::Pan) => tuning.neutral_pan_us = us as u16,
            Some(Axis::Tilt) => tuning.neutral_tilt_us = us as u16,
            None => {
                tuning.neutral_pan_us = us as u16;
                tuning.neutral_tilt_us = us as u16;
            }
        }
        true
    }

    pub fn set_speed(&self, v: i32) -> bool {
        if !(SPEED_MIN..=SPEED_MAX).contains(&v) {
            warn!(v, "servo speed out of range; rejected");
            return false;
        }
        self.tuning.lock().unwrap().speed_us = v as u16;
        true
    }

    pub fn set_move_duration(&self, v: i32) -> bool {
        if !(DURATION_MIN_MS..=DURATION_MAX_MS).contains(&v) {
            warn!(v, "servo duration out of range; rejected");
            return false;
        }
        self.tuning.lock().unwrap().move_ms = v as u64;
        true
    }

    /// One positional tick: advance each axis one degree toward the
    /// target, monotonically, never overshooting.
    pub async fn step_toward(&self, pan: u8, tilt: u8) {
        if !self.is_attached() {
            return;
        }
        let (new_pan, new_tilt, moved_pan, moved_tilt) = {
            let mut pose = self.pose.lock().unwrap();
            let moved_pan = pose.0 != pan;
            let moved_tilt = pose.1 != tilt;
            pose.0 = step(pose.0, pan);
            pose.1 = step(pose.1, tilt);
            (pose.0, pose.1, moved_pan, moved_tilt)
        };
        if moved_pan {
            self.bank.write_angle(Axis::Pan, new_pan).await;
        }
        if moved_tilt {
            self.bank.write_angle(Axis::Tilt, new_tilt).await;
        }
    }

    /// Current positional pose.
    pub fn pose(&self) -> (u8, u8) {
        *self.pose.lock().unwrap()
    }

    /// Talk-animation perturbation: write the tilt servo directly,
    /// clamped to a safe sub-range, without disturbing the pose.
    pub async fn wiggle_tilt(&self, delta: i8) {
        if !self.is_attached() {
            return;
        }
        let tilt = self.pose.lock().unwrap().1;
        let wiggled = (tilt as i16 + delta as i16).clamp(45, 135) as u8;
        self.bank.write_angle(Axis::Tilt, wiggled).await;
    }

    /// Continuous-rotation burst: `neutral ± speed` for the configured
    /// duration, then back to neutral. A new burst on a busy axis
    /// replaces the pending return to neutral.
    pub async fn nudge(&self, axis: Axis, dir: BurstDir) {
        if !self.is_attached() {
            debug!(?axis, "nudge ignored; bank detached");
            return;
        }
        let tuning = self.tuning();
        let neutral = tuning.neutral(axis);
        let pulse = match dir {
            BurstDir::Minus => neutral.saturating_sub(tuning.speed_us),
            BurstDir::Plus => neutral.saturating_add(tuning.speed_us),
        };
        let bank = self.bank.clone();
        let hold = Duration::from_millis(tuning.move_ms);
        let task = tokio::spawn(async move {
            bank.write_pulse(axis, pulse).await;
            tokio::time::sleep(hold).await;
            bank.write_pulse(axis, neutral).await;
        });
        let mut bursts = self.bursts.lock().unwrap();
        if let Some(old) = bursts.slot(axis).replace(task) {
            old.abort();
        }
    }
}

fn step(current: u8, target: u8) -> u8 {
    use std::cmp::Ordering::*;
    match current.cmp(&target) {
        Less => current + 1,
        Greater => current - 1,
        Equal => current,
    }
}

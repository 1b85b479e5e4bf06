//! The single shared record of what the body is doing.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Mutex;

use crate::amp::AmpGate;
use crate::expression::Expression;
use crate::mood::{Mood, Rgb};

/// Lower bound for commanded pan and tilt, in degrees.
pub const ANGLE_MIN: i32 = 30;
/// Upper bound for commanded pan and tilt, in degrees.
pub const ANGLE_MAX: i32 = 150;

/// Commanded gaze target in degrees, already clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gaze {
    pub pan: u8,
    pub tilt: u8,
}

impl Default for Gaze {
    fn default() -> Gaze {
        Gaze { pan: 90, tilt: 90 }
    }
}

fn clamp_angle(v: i32) -> u8 {
    v.clamp(ANGLE_MIN, ANGLE_MAX) as u8
}

/// Process-wide device state. Created once at boot, shared as an `Arc`,
/// never destroyed.
#[derive(Debug, Default)]
pub struct BodyState {
    expression: AtomicU8,
    pub chat_mode: AtomicBool,
    pub talking: AtomicBool,
    /// True while an external command owns the gaze.
    pub locked: AtomicBool,
    /// True only while both audio tasks are alive and drivers installed.
    pub streaming: AtomicBool,
    pub amp: AmpGate,
    mood: Mutex<Mood>,
    gaze: Mutex<Gaze>,
}

impl BodyState {
    pub fn new() -> BodyState {
        BodyState::default()
    }

    pub fn expression(&self) -> Expression {
        Expression::from_u8(self.expression.load(Ordering::Acquire))
    }

    pub fn set_expression(&self, e: Expression) {
        self.expression.store(e as u8, Ordering::Release);
    }

    pub fn mood(&self) -> Mood {
        *self.mood.lock().unwrap()
    }

    pub fn set_color(&self, color: Rgb) -> Mood {
        let mut mood = self.mood.lock().unwrap();
        mood.color = color;
        *mood
    }

    /// Raw brightness command; clamps to 0..=255.
    pub fn set_brightness(&self, raw: i32) -> Mood {
        let mut mood = self.mood.lock().unwrap();
        mood.brightness = raw.clamp(0, 255) as u8;
        *mood
    }

    /// Percent brightness command; clamps to 0..=100 and maps linearly.
    pub fn set_brightness_percent(&self, raw: i32) -> Mood {
        let percent = raw.clamp(0, 100);
        let mut mood = self.mood.lock().unwrap();
        mood.brightness = (percent * 255 / 100) as u8;
        *mood
    }

    /// Reset the mood to the resting color, keeping brightness.
    pub fn reset_mood(&self) -> Mood {
        self.set_color(Rgb::REST)
    }

    pub fn gaze(&self) -> Gaze {
        *self.gaze.lock().unwrap()
    }

    /// Store a commanded gaze target, clamping both axes to the safe
    /// mechanical range. Returns the stored value.
    pub fn set_gaze(&self, pan: i32, tilt: i32) -> Gaze {
        let clamped = Gaze {
            pan: clamp_angle(pan),
            tilt: clamp_angle(tilt),
        };
        *self.gaze.lock().unwrap() = clamped;
        clamped
    }
}

//! Mood lamp color and brightness.

use serde::{Deserialize, Serialize};

/// Lamp color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    /// Resting color at boot and after `F_SLEEP`/`CHAT_STOP`.
    pub const REST: Rgb = Rgb::new(0, 0, 255);
    /// Attentive hue used while listening.
    pub const ATTENTIVE: Rgb = Rgb::new(0, 255, 0);
    /// Shown with the love expression.
    pub const LOVE: Rgb = Rgb::new(255, 20, 147);
}

/// Lamp brightness at boot.
pub const DEFAULT_BRIGHTNESS: u8 = 80;

/// Color plus brightness, as one value so readers get a consistent pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub color: Rgb,
    pub brightness: u8,
}

impl Default for Mood {
    fn default() -> Mood {
        Mood {
            color: Rgb::REST,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

/// Fixed name table for `COLOR:<name>`. Unknown names return `None` and
/// the caller leaves the mood untouched.
pub fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "red" => Rgb::new(255, 0, 0),
        "green" => Rgb::new(0, 255, 0),
        "blue" => Rgb::new(0, 0, 255),
        "yellow" => Rgb::new(255, 255, 0),
        "orange" => Rgb::new(255, 165, 0),
        "purple" => Rgb::new(128, 0, 128),
        "pink" => Rgb::LOVE,
        "cyan" => Rgb::new(0, 255, 255),
        "white" => Rgb::new(255, 255, 255),
        "warm" => Rgb::new(255, 200, 100),
        "cool" => Rgb::new(200, 220, 255),
        _ => return None,
    };
    Some(rgb)
}

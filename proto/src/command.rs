//! The line-oriented command grammar spoken by the brain.
//!
//! A command is one trimmed line of text. Parsing never fails: malformed
//! numeric arguments decay to `0`, and unrecognised verbs map to
//! [`Command::Unknown`], which the dispatcher drops without a reply.

use serde::{Deserialize, Serialize};

/// Default tone frequency when `TONE` is sent without arguments.
pub const TONE_DEFAULT_HZ: i32 = 1500;
/// Default tone duration when `TONE` is sent without arguments.
pub const TONE_DEFAULT_MS: i32 = 300;

/// One of the two head servos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Pan,
    Tilt,
}

/// Direction of a continuous-rotation pulse burst relative to neutral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstDir {
    /// Pulse width below neutral (`neutral - speed`).
    Minus,
    /// Pulse width above neutral (`neutral + speed`).
    Plus,
}

/// A parsed control line. Numeric fields carry the raw parsed value;
/// clamping and range rejection are the handler's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Discover,
    Ping,
    TalkStart,
    TalkStop,
    Happy,
    Sleep,
    Listening,
    Sad,
    Love,
    ChatStart,
    ChatStop,
    AudioStart,
    AudioStop,
    /// `P<pan>T<tilt>` gaze target in degrees.
    Gaze { pan: i32, tilt: i32 },
    /// `L<n>` lamp brightness, raw 0-255 scale.
    Brightness(i32),
    /// `B<n>` lamp brightness as a percentage.
    BrightnessPercent(i32),
    /// `C<r>,<g>,<b>` literal mood color.
    Color { r: i32, g: i32, b: i32 },
    /// `COLOR:<name>` lookup in the fixed color table.
    NamedColor(String),
    /// `TONE[:freq,durMs]`.
    Tone { freq_hz: i32, duration_ms: i32 },
    ServoEnable,
    ServoDisable,
    ServoStop,
    /// `SERVO_CAL[:_PAN/_TILT]:<us>`; `axis == None` calibrates both.
    Calibrate { axis: Option<Axis>, us: i32 },
    /// `SERVO_SPEED:<n>`.
    Speed(i32),
    /// `SERVO_DURATION:<n>`.
    MoveDuration(i32),
    /// `PAN_LEFT`/`PAN_RIGHT`/`TILT_UP`/`TILT_DOWN` pulse burst.
    Nudge { axis: Axis, dir: BurstDir },
    Unknown,
}

/// Tolerant numeric parse: anything that is not a well-formed integer
/// (including an overflowing one) is read as `0`.
fn parse_num(s: &str) -> i32 {
    s.trim().parse::<i32>().unwrap_or(0)
}

impl Command {
    /// Classify one trimmed line. Exact verbs take priority over the
    /// prefixed forms, so `PAN_LEFT` is a nudge and never a gaze target.
    pub fn parse(line: &str) -> Command {
        let line = line.trim();

        match line {
            "DISCOVER" => return Command::Discover,
            "PING" => return Command::Ping,
            "F_TALK_START" => return Command::TalkStart,
            "F_TALK_STOP" => return Command::TalkStop,
            "F_HAPPY" => return Command::Happy,
            "F_SLEEP" => return Command::Sleep,
            "F_LISTENING" => return Command::Listening,
            "F_SAD" => return Command::Sad,
            "F_LOVE" => return Command::Love,
            "CHAT_START" => return Command::ChatStart,
            "CHAT_STOP" => return Command::ChatStop,
            "AUDIO_START" => return Command::AudioStart,
            "AUDIO_STOP" => return Command::AudioStop,
            "SERVO_ENABLE" => return Command::ServoEnable,
            "SERVO_DISABLE" => return Command::ServoDisable,
            "SERVO_STOP" => return Command::ServoStop,
            "PAN_LEFT" => {
                return Command::Nudge {
                    axis: Axis::Pan,
                    dir: BurstDir::Minus,
                }
            }
            "PAN_RIGHT" => {
                return Command::Nudge {
                    axis: Axis::Pan,
                    dir: BurstDir::Plus,
                }
            }
            "TILT_UP" => {
                return Command::Nudge {
                    axis: Axis::Tilt,
                    dir: BurstDir::Plus,
                }
            }
            "TILT_DOWN" => {
                return Command::Nudge {
                    axis: Axis::Tilt,
                    dir: BurstDir::Minus,
                }
            }
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("SERVO_CAL_PAN:") {
            return Command::Calibrate {
                axis: Some(Axis::Pan),
                us: parse_num(rest),
            };
        }
        if let Some(rest) = line.strip_prefix("SERVO_CAL_TILT:") {
            return Command::Calibrate {
                axis: Some(Axis::Tilt),
                us: parse_num(rest),
            };
        }
        if let Some(rest) = line.strip_prefix("SERVO_CAL:") {
            return Command::Calibrate {
                axis: None,
                us: parse_num(rest),
            };
        }
        if let Some(rest) = line.strip_prefix("SERVO_SPEED:") {
            return Command::Speed(parse_num(rest));
        }
        if let Some(rest) = line.strip_prefix("SERVO_DURATION:") {
            return Command::MoveDuration(parse_num(rest));
        }
        if let Some(rest) = line.strip_prefix("COLOR:") {
            return Command::NamedColor(rest.trim().to_ascii_lowercase());
        }
        if line == "TONE" {
            return Command::Tone {
                freq_hz: TONE_DEFAULT_HZ,
                duration_ms: TONE_DEFAULT_MS,
            };
        }
        if let Some(rest) = line.strip_prefix("TONE:") {
            let mut parts = rest.splitn(2, ',');
            let freq_hz = parts.next().map(parse_num).unwrap_or(TONE_DEFAULT_HZ);
            let duration_ms = parts.next().map(parse_num).unwrap_or(TONE_DEFAULT_MS);
            return Command::Tone {
                freq_hz,
                duration_ms,
            };
        }

        // P<int>T<int> — the head tracker's pan/tilt stream.
        if let Some(rest) = line.strip_prefix('P') {
            if let Some(t) = rest.find('T') {
                return Command::Gaze {
                    pan: parse_num(&rest[..t]),
                    tilt: parse_num(&rest[t + 1..]),
                };
            }
        }
        if let Some(rest) = line.strip_prefix('L') {
            return Command::Brightness(parse_num(rest));
        }
        if let Some(rest) = line.strip_prefix('B') {
            return Command::BrightnessPercent(parse_num(rest));
        }
        if let Some(rest) = line.strip_prefix('C') {
            if rest.contains(',') {
                let mut parts = rest.splitn(3, ',');
                let r = parts.next().map(parse_num).unwrap_or(0);
                let g = parts.next().map(parse_num).unwrap_or(0);
                let b = parts.next().map(parse_num).unwrap_or(0);
                return Command::Color { r, g, b };
            }
        }

        Command::Unknown
    }
}

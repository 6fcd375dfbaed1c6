use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{QuoteError, QuoteResult};

pub use kurbo::{Point, Rect};

/// Number of one-minute slots in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// One minute-of-day bucket, `0..1440`.
///
/// Serialized as `"HH:MM"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(u16);

impl TimeSlot {
    /// Create a slot from minutes since midnight.
    pub fn from_minute(minute: u16) -> QuoteResult<Self> {
        if minute >= MINUTES_PER_DAY {
            return Err(QuoteError::validation(format!(
                "minute of day must be < {MINUTES_PER_DAY}, got {minute}"
            )));
        }
        Ok(Self(minute))
    }

    /// Minutes since midnight.
    pub fn minute(self) -> u16 {
        self.0
    }

    /// `"HHMM"`, used in file names so they sort by time.
    pub fn compact(self) -> String {
        format!("{:02}{:02}", self.0 / 60, self.0 % 60)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeSlot {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || QuoteError::validation(format!("time slot must be \"HH:MM\", got {s:?}"));
        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(bad());
        }
        let h: u16 = h.parse().map_err(|_| bad())?;
        let m: u16 = m.parse().map_err(|_| bad())?;
        if h >= 24 || m >= 60 {
            return Err(bad());
        }
        Ok(Self(h * 60 + m))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(value: TimeSlot) -> Self {
        value.to_string()
    }
}

/// Inclusive range of time slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MinuteRange {
    /// First processed slot.
    pub first: TimeSlot,
    /// Last processed slot (inclusive).
    pub last: TimeSlot,
}

impl MinuteRange {
    /// Create a validated range with `first <= last`.
    pub fn new(first: TimeSlot, last: TimeSlot) -> QuoteResult<Self> {
        if first > last {
            return Err(QuoteError::validation(format!(
                "minute range start {first} must be <= end {last}"
            )));
        }
        Ok(Self { first, last })
    }

    /// The whole day.
    pub fn full_day() -> Self {
        Self {
            first: TimeSlot(0),
            last: TimeSlot(MINUTES_PER_DAY - 1),
        }
    }

    pub fn slots(self) -> impl Iterator<Item = TimeSlot> {
        (self.first.0..=self.last.0).map(TimeSlot)
    }
}

/// Straight RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Rgb = Rgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a validated color.
    pub fn new(r: f32, g: f32, b: f32) -> QuoteResult<Self> {
        for c in [r, g, b] {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(QuoteError::validation(format!(
                    "color channels must be in [0, 1], got ({r}, {g}, {b})"
                )));
            }
        }
        Ok(Self { r, g, b })
    }

    /// Opaque RGBA8, rounding each channel.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }

    /// `#rrggbb` as used in span markup.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(s: &str) -> QuoteResult<Self> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| QuoteError::validation(format!("color must be #rrggbb, got {s:?}")))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| QuoteError::validation(format!("invalid hex color {s:?}")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl TryFrom<[f32; 3]> for Rgb {
    type Error = QuoteError;

    fn try_from(v: [f32; 3]) -> Result<Self, Self::Error> {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Rendered block extents in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `true` when both dimensions are within the caps.
    pub fn fits_within(self, max_width: f32, max_height: f32) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}

/// Single-line preview of `text` holding at most `max_chars` characters.
pub fn text_preview(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

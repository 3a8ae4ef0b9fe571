//! Generator configuration: event rate, pattern choice, surface geometry.

use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// The most contacts the generator will drive, and the highest MT slot the
/// device declares.
pub const MAX_CONTACTS: u16 = 10;

/// An inclusive coordinate range on one axis, matching the kernel's
/// `input_absinfo` minimum/maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Distance from `min` to `max`. Widened so extreme i32 bounds can't
    /// overflow position math.
    pub fn span(&self) -> i64 {
        self.max as i64 - self.min as i64
    }

    pub fn midpoint(&self) -> i32 {
        (self.min as i64 + self.span() / 2) as i32
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self { min: 0, max: 1024 }
    }
}

/// Which deterministic movement the generator produces.
///
/// All three advance from an event counter alone, so two runs with the same
/// config produce the same event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Pattern {
    /// A single contact scanning the surface in 16 horizontal rows,
    /// alternating left-to-right and right-to-left.
    Sweep,
    /// A single contact cycling through four straight strokes along the
    /// surface midlines: rightward, downward, leftward, upward.
    DirectionCycle,
    /// One contact per MT slot in turn, each touching down on its own row
    /// and lifting before the next slot begins.
    SlotCycle,
}

/// `FromStr` rejection for [`Pattern`], carrying the offending token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown pattern {0:?}, expected sweep, directions, or slots")]
pub struct PatternParseError(String);

impl FromStr for Pattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sweep" => Ok(Pattern::Sweep),
            "directions" | "direction-cycle" => Ok(Pattern::DirectionCycle),
            "slots" | "slot-cycle" => Ok(Pattern::SlotCycle),
            _ => Err(PatternParseError(s.to_owned())),
        }
    }
}

/// Everything a driver instance needs to know before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Target event frames per second.
    pub rate: u32,
    pub pattern: Pattern,
    pub x: AxisRange,
    pub y: AxisRange,
    /// How many MT slots the slot-cycle pattern walks, in `1..=MAX_CONTACTS`.
    pub contacts: u16,
}

impl Config {
    /// Rejects every value the pipeline cannot run with. Called by
    /// [`Driver::new`](crate::Driver::new) so an invalid config never reaches
    /// a thread or a device.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.rate > 1_000_000_000 {
            return Err(ConfigError::RateTooHigh(self.rate));
        }
        for axis in [self.x, self.y] {
            if axis.min >= axis.max {
                return Err(ConfigError::EmptyAxisRange {
                    min: axis.min,
                    max: axis.max,
                });
            }
        }
        if self.contacts == 0 || self.contacts > MAX_CONTACTS {
            return Err(ConfigError::ContactCount(self.contacts));
        }
        Ok(())
    }

    /// The scheduling period, re-derived from `rate` on every call so the two
    /// can never disagree.
    pub fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.rate))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate: 120,
            pattern: Pattern::Sweep,
            x: AxisRange::default(),
            y: AxisRange::default(),
            contacts: MAX_CONTACTS,
        }
    }
}

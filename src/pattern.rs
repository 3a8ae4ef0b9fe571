//! Deterministic movement generation.
//!
//! Every pattern is a pure function of the counters in [`PatternGenerator`]:
//! no clocks, no randomness. Two generators built from the same config yield
//! bit-identical event sequences, which is what makes throughput runs
//! comparable across hosts and kernels.

use crate::config::{AxisRange, Config, Pattern};

/// Horizontal rows a full sweep visits before starting over at the top.
const SWEEP_ROWS: u32 = 16;

/// One frame's worth of synthetic contact state, produced by
/// [`PatternGenerator::next`] and consumed immediately by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub x: i32,
    pub y: i32,
    /// `Some` when a BTN_TOUCH transition belongs in this frame.
    pub touch: Option<bool>,
    /// MT slot for multi-contact patterns, `None` for single-contact ones.
    pub slot: Option<u16>,
    /// This frame closes a publish batch and gets a SYN_REPORT terminator.
    pub sync: bool,
}

/// Counter state plus the advancement rule selected by [`Pattern`].
///
/// `count` walks one cycle (`0..n`), wrapping to zero at the cycle length;
/// `step` advances by one per wrap and wraps at its own bound (sweep row,
/// direction index, contact slot). `touching` tracks the synthetic contact:
/// down on the first call of a cycle, up on the last. All state lives here
/// and is advanced only from the dispatcher thread.
#[derive(Debug)]
pub struct PatternGenerator {
    pattern: Pattern,
    rate: u32,
    x: AxisRange,
    y: AxisRange,
    contacts: u16,
    count: u32,
    step: u32,
    touching: bool,
}

impl PatternGenerator {
    /// Builds a generator at its initial state. `config` must already have
    /// passed [`Config::validate`].
    pub fn new(config: &Config) -> Self {
        Self {
            pattern: config.pattern,
            rate: config.rate,
            x: config.x,
            y: config.y,
            contacts: config.contacts,
            count: 0,
            step: 0,
            touching: false,
        }
    }

    /// Calls per cycle. The direction cycle splits the rate across its four
    /// strokes so a full rotation takes one second at the configured rate.
    fn cycle_len(&self) -> u32 {
        match self.pattern {
            Pattern::Sweep | Pattern::SlotCycle => self.rate,
            Pattern::DirectionCycle => (self.rate / 4).max(1),
        }
    }

    fn step_bound(&self) -> u32 {
        match self.pattern {
            Pattern::Sweep => SWEEP_ROWS,
            Pattern::DirectionCycle => 4,
            Pattern::SlotCycle => u32::from(self.contacts),
        }
    }

    /// Advances the counters once and yields the frame they describe.
    pub fn next(&mut self) -> SyntheticEvent {
        let n = self.cycle_len();
        let c = self.count;
        let first = c == 0;
        let last = c + 1 == n;

        // A cycle of length 1 is both first and last, alternating down/up.
        let touch = if first && !self.touching {
            self.touching = true;
            Some(true)
        } else if last && self.touching {
            self.touching = false;
            Some(false)
        } else {
            None
        };

        let (x, y, slot) = match self.pattern {
            Pattern::Sweep => {
                let x = if self.step % 2 == 0 {
                    along(self.x, c, n)
                } else {
                    along_rev(self.x, c, n)
                };
                (x, row(self.y, self.step, SWEEP_ROWS), None)
            }
            Pattern::DirectionCycle => match self.step {
                0 => (along(self.x, c, n), self.y.midpoint(), None),
                1 => (self.x.midpoint(), along(self.y, c, n), None),
                2 => (along_rev(self.x, c, n), self.y.midpoint(), None),
                _ => (self.x.midpoint(), along_rev(self.y, c, n), None),
            },
            Pattern::SlotCycle => {
                let y = row(self.y, self.step, u32::from(self.contacts));
                (along(self.x, c, n), y, Some(self.step as u16))
            }
        };

        self.count += 1;
        if self.count == n {
            self.count = 0;
            self.step = (self.step + 1) % self.step_bound();
        }

        SyntheticEvent {
            x,
            y,
            touch,
            slot,
            sync: true,
        }
    }
}

/// Position `c` of `n` along the axis, low to high. Widened to i64 so
/// extreme ranges can't overflow the intermediate product.
fn along(axis: AxisRange, c: u32, n: u32) -> i32 {
    (axis.min as i64 + i64::from(c) * axis.span() / i64::from(n)) as i32
}

fn along_rev(axis: AxisRange, c: u32, n: u32) -> i32 {
    (axis.max as i64 - i64::from(c) * axis.span() / i64::from(n)) as i32
}

/// The `step`-th of `rows` horizontal lines across the axis.
fn row(axis: AxisRange, step: u32, rows: u32) -> i32 {
    (axis.min as i64 + i64::from(step) * axis.span() / i64::from(rows)) as i32
}

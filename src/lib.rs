//! Synthetic multitouch event generation at a fixed rate.
//!
//! MTEPS ("multitouch events per second") registers a virtual touchscreen
//! through the Linux uinput interface and drives it with deterministic touch
//! patterns at a configured event rate. It exists to measure how much
//! overhead an input or GUI stack adds while digesting a steady stream of
//! touch events, so generation is exactly reproducible: the same [`Config`]
//! yields bit-identical event sequences on every run.
//!
//! The pipeline is two named threads bridged by a capacity-1 channel. The
//! scheduler thread turns wall time into activations, one per period; when
//! the consumer is still busy the channel is full and the firing is
//! coalesced instead of queued, so backlog never exceeds one activation. The
//! dispatcher thread advances the active pattern, encodes each step into a
//! kernel input-event frame terminated by SYN_REPORT, and writes it to an
//! [`EventSink`]. [`Driver`] owns the wiring and a forward-only lifecycle:
//! register, start, stop, then take the sink back.
//!
//! ```no_run
//! # fn main() -> Result<(), mteps::Error> {
//! use mteps::uinput::VirtualTouchscreenBuilder;
//! use mteps::{Config, Driver};
//!
//! let config = Config::default();
//! let screen = VirtualTouchscreenBuilder::new()?.build(&config)?;
//! let mut driver = Driver::new(config, screen)?;
//! driver.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! driver.stop()?;
//! println!("dispatched {} frames", driver.stats().dispatched);
//! # Ok(())
//! # }
//! ```
//!
//! Patterns and their advancement rules live in [`Pattern`] and
//! [`PatternGenerator`]; the frame vocabulary (BTN_TOUCH, the ABS axes, the
//! type B multitouch codes) is in [`EventType`], [`KeyCode`], and
//! [`AbsoluteAxisCode`].

#![cfg(any(unix, target_os = "android"))]
#![allow(non_camel_case_types)]

// has to be first for its macro
#[macro_use]
mod constants;

mod compat;
mod config;
mod dispatcher;
mod driver;
mod error;
mod event;
mod inputid;
mod pattern;
mod scheduler;
mod sink;
#[cfg(any(target_os = "linux", target_os = "android"))]
mod sys;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod uinput;

pub use crate::config::{AxisRange, Config, Pattern, PatternParseError, MAX_CONTACTS};
pub use crate::constants::{AbsoluteAxisCode, EventType, KeyCode, PropType, SynchronizationCode};
pub use crate::driver::{Driver, DriverState, Stats};
pub use crate::error::{ConfigError, Error};
pub use crate::event::InputEvent;
pub use crate::inputid::{BusType, InputId};
pub use crate::pattern::{PatternGenerator, SyntheticEvent};
pub use crate::sink::EventSink;

#[cfg(any(target_os = "linux", target_os = "android"))]
fn nix_err(err: nix::Error) -> std::io::Error {
    std::io::Error::from_raw_os_error(err as i32)
}

/// SAFETY: T must not have any padding or otherwise uninitialized bytes
/// inside of it
#[cfg(any(target_os = "linux", target_os = "android"))]
unsafe fn cast_to_bytes<T: ?Sized>(mem: &T) -> &[u8] {
    std::slice::from_raw_parts(mem as *const T as *const u8, std::mem::size_of_val(mem))
}

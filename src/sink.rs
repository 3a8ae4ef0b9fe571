//! The boundary the dispatcher writes frames through.

use crate::event::InputEvent;
use std::io;

/// Consumes frames produced by the dispatcher.
///
/// One `emit` call publishes one atomic frame; the slice already carries its
/// SYN_REPORT terminator, so implementations write it as-is and append
/// nothing. The sink must exist before the pipeline starts and is released
/// only after the pipeline has fully drained.
///
/// [`VirtualTouchscreen`](crate::uinput::VirtualTouchscreen) is the real
/// device-backed implementation; tests substitute recording sinks.
pub trait EventSink: Send {
    fn emit(&mut self, frame: &[InputEvent]) -> io::Result<()>;
}

use crate::compat::input_event;
use crate::constants::EventType;
use std::fmt;

/// A single kernel `input_event`, as written to the device.
///
/// The timestamp is left zeroed: uinput ignores whatever userspace puts there
/// and stamps events itself when they enter the input core.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct InputEvent(pub(crate) input_event);

impl InputEvent {
    /// Create a new InputEvent. Only really useful for emitting events on virtual devices.
    pub fn new(type_: EventType, code: u16, value: i32) -> Self {
        InputEvent(input_event {
            time: libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
            type_: type_.0,
            code,
            value,
        })
    }

    /// Returns the type of event this describes, e.g. Key, Absolute, etc.
    pub fn event_type(&self) -> EventType {
        EventType(self.0.type_)
    }

    /// Returns the raw "code" field directly from input_event.
    pub fn code(&self) -> u16 {
        self.0.code
    }

    /// Returns the raw "value" field directly from input_event.
    pub fn value(&self) -> i32 {
        self.0.value
    }
}

impl From<input_event> for InputEvent {
    fn from(raw: input_event) -> Self {
        InputEvent(raw)
    }
}

impl fmt::Debug for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut debug = f.debug_struct("InputEvent");
        debug.field("event_type", &self.event_type());
        debug.field("code", &self.code());
        debug.field("value", &self.value());
        debug.finish()
    }
}

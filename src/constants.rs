//! The slice of the kernel's input event vocabulary that a synthetic
//! touchscreen declares and emits.
//!
//! Codes are newtypes over the raw `u16` values from
//! `include/uapi/linux/input-event-codes.h` so unrelated code spaces can't be
//! mixed up, with `Debug` printing the kernel names.

macro_rules! input_code_enum {
    ($t:ty, $($(#[$attr:meta])* $c:ident = $val:expr,)*) => {
        impl $t {
            $($(#[$attr])* pub const $c: Self = Self($val);)*
        }
        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                #[allow(unreachable_patterns)]
                match *self {
                    $(Self::$c => f.pad(stringify!($c)),)*
                    _ => write!(f, "unknown code: {}", self.0),
                }
            }
        }
    }
}

/// Event types this device emits.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventType(pub u16);

input_code_enum!(
    EventType,
    /// A bookkeeping event, used here to terminate each frame.
    SYNCHRONIZATION = 0x00,
    /// A key changed state. A key, or button, is usually a momentary switch (in the circuit
    /// sense). It has two states: down, or up. The only key here is the touch contact button.
    KEY = 0x01,
    /// Movement on an absolute axis. Used for things such as touch events and joysticks.
    ABSOLUTE = 0x03,
);

/// Key and button codes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyCode(pub u16);

input_code_enum!(
    KeyCode,
    /// At least one contact is on the surface.
    BTN_TOUCH = 0x14a,
);

/// Absolute axis codes: the single-touch pointer emulation pair and the
/// type B multitouch axes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsoluteAxisCode(pub u16);

input_code_enum!(
    AbsoluteAxisCode,
    ABS_X = 0x00,
    ABS_Y = 0x01,
    /// Selects the multitouch slot the following MT events apply to.
    ABS_MT_SLOT = 0x2f,
    ABS_MT_POSITION_X = 0x35,
    ABS_MT_POSITION_Y = 0x36,
    /// Nonnegative while a contact is down, -1 when it lifts.
    ABS_MT_TRACKING_ID = 0x39,
);

/// Synchronization event codes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SynchronizationCode(pub u16);

input_code_enum!(
    SynchronizationCode,
    /// Terminates a frame: everything since the previous SYN_REPORT happened
    /// at the same moment.
    SYN_REPORT = 0x00,
);

/// Device properties.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropType(pub u16);

input_code_enum!(
    PropType,
    /// Direct input devices: the user touches the screen surface itself, so
    /// coordinates map to the display without pointer acceleration.
    DIRECT = 0x01,
);

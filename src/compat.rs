//! Compatibility layer for non-Linux builds.
//!
//!

// input_absinfo, input_id, uinput_abs_setup, uinput_setup, input_event

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(
        target_os = "linux",
        target_os = "l4re",
        target_os = "android",
        target_os = "emscripten"
    ))] {
        pub(crate) use libc::{
            input_absinfo, input_event, input_id, uinput_abs_setup, uinput_setup,
            UINPUT_MAX_NAME_SIZE,
        };
    } else {
        mod non_linux;
        pub(crate) use non_linux::{
            input_absinfo, input_event, input_id, uinput_abs_setup, uinput_setup,
            UINPUT_MAX_NAME_SIZE,
        };
    }
}

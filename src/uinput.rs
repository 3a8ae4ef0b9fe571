//! Virtual touchscreen registration via uinput.
//!
//! The device this module creates mirrors what the fake kernel driver
//! registered: a direct-input touchscreen with single-touch pointer
//! emulation plus type B multitouch slots, named "MTEPS" on phys path
//! "mteps/input0" unless overridden.

use crate::compat::{input_absinfo, uinput_abs_setup, uinput_setup, UINPUT_MAX_NAME_SIZE};
use crate::config::Config;
use crate::constants::{AbsoluteAxisCode, EventType, KeyCode, PropType};
use crate::event::InputEvent;
use crate::inputid::{BusType, InputId};
use crate::sink::EventSink;
use crate::{nix_err, sys};
use libc::O_NONBLOCK;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::{fs::OpenOptionsExt, io::AsRawFd};
use tracing::debug;

const UINPUT_PATH: &str = "/dev/uinput";
const DEFAULT_NAME: &str = "MTEPS";
const DEFAULT_PHYS: &str = "mteps/input0";

/// Builds the [`VirtualTouchscreen`] the pipeline writes to.
#[derive(Debug)]
pub struct VirtualTouchscreenBuilder<'a> {
    file: File,
    name: &'a str,
    phys: &'a str,
    id: Option<InputId>,
}

impl<'a> VirtualTouchscreenBuilder<'a> {
    /// Opens `/dev/uinput` write-only in nonblocking mode.
    pub fn new() -> io::Result<Self> {
        let mut options = OpenOptions::new();
        let file = options
            .write(true)
            .custom_flags(O_NONBLOCK)
            .open(UINPUT_PATH)?;

        Ok(Self {
            file,
            name: DEFAULT_NAME,
            phys: DEFAULT_PHYS,
            id: None,
        })
    }

    pub fn name(mut self, name: &'a str) -> Self {
        self.name = name;
        self
    }

    pub fn phys(mut self, phys: &'a str) -> Self {
        self.phys = phys;
        self
    }

    pub fn input_id(mut self, id: InputId) -> Self {
        self.id = Some(id);
        self
    }

    /// Declares the device capabilities and creates the node.
    ///
    /// Axis ranges and the MT slot count come from the same `config` the
    /// generator runs with, so the declared ranges always match the emitted
    /// events. A name that does not fit `uinput_setup` is rejected as
    /// `InvalidInput` here, before the device exists.
    pub fn build(self, config: &Config) -> io::Result<VirtualTouchscreen> {
        let fd = self.file.as_raw_fd();

        unsafe { sys::ui_set_evbit(fd, EventType::KEY.0 as nix::sys::ioctl::ioctl_param_type) }
            .map_err(nix_err)?;
        unsafe {
            sys::ui_set_keybit(fd, KeyCode::BTN_TOUCH.0 as nix::sys::ioctl::ioctl_param_type)
        }
        .map_err(nix_err)?;

        unsafe {
            sys::ui_set_evbit(fd, EventType::ABSOLUTE.0 as nix::sys::ioctl::ioctl_param_type)
        }
        .map_err(nix_err)?;
        let max_slot = i32::from(config.contacts) - 1;
        abs_setup(fd, AbsoluteAxisCode::ABS_X, config.x.min, config.x.max)?;
        abs_setup(fd, AbsoluteAxisCode::ABS_Y, config.y.min, config.y.max)?;
        abs_setup(fd, AbsoluteAxisCode::ABS_MT_SLOT, 0, max_slot)?;
        abs_setup(fd, AbsoluteAxisCode::ABS_MT_TRACKING_ID, 0, max_slot)?;
        abs_setup(
            fd,
            AbsoluteAxisCode::ABS_MT_POSITION_X,
            config.x.min,
            config.x.max,
        )?;
        abs_setup(
            fd,
            AbsoluteAxisCode::ABS_MT_POSITION_Y,
            config.y.min,
            config.y.max,
        )?;

        unsafe { sys::ui_set_propbit(fd, PropType::DIRECT.0 as nix::sys::ioctl::ioctl_param_type) }
            .map_err(nix_err)?;

        let phys = CString::new(self.phys).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "device phys contains a NUL byte",
            )
        })?;
        unsafe { sys::ui_set_phys(fd, phys.as_bytes_with_nul()) }.map_err(nix_err)?;

        let usetup = uinput_setup {
            id: self
                .id
                .unwrap_or_else(|| InputId::new(BusType::BUS_VIRTUAL, 0, 0, 0))
                .0,
            name: encode_name(self.name)?,
            ff_effects_max: 0,
        };
        VirtualTouchscreen::create(self.file, usetup)
    }
}

/// Declares one absolute axis and its range on the device being built.
fn abs_setup(fd: libc::c_int, code: AbsoluteAxisCode, min: i32, max: i32) -> io::Result<()> {
    unsafe { sys::ui_set_absbit(fd, code.0 as nix::sys::ioctl::ioctl_param_type) }
        .map_err(nix_err)?;
    let setup = uinput_abs_setup {
        code: code.0,
        absinfo: input_absinfo {
            value: 0,
            minimum: min,
            maximum: max,
            fuzz: 0,
            flat: 0,
            resolution: 0,
        },
    };
    unsafe { sys::ui_abs_setup(fd, &setup) }.map_err(nix_err)?;
    Ok(())
}

/// Encodes a device name into the fixed `uinput_setup` field, NUL-terminated.
fn encode_name(name: &str) -> io::Result<[libc::c_char; UINPUT_MAX_NAME_SIZE]> {
    let c_name = CString::new(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "device name contains a NUL byte",
        )
    })?;
    let bytes = c_name.as_bytes_with_nul();
    if bytes.len() > UINPUT_MAX_NAME_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "device name longer than UINPUT_MAX_NAME_SIZE",
        ));
    }
    let mut encoded = [0 as libc::c_char; UINPUT_MAX_NAME_SIZE];
    for (dst, &src) in encoded.iter_mut().zip(bytes) {
        *dst = src as libc::c_char;
    }
    Ok(encoded)
}

/// A registered uinput touchscreen node. The node disappears on drop.
pub struct VirtualTouchscreen {
    file: File,
}

impl VirtualTouchscreen {
    fn create(file: File, usetup: uinput_setup) -> io::Result<Self> {
        unsafe { sys::ui_dev_setup(file.as_raw_fd(), &usetup) }.map_err(nix_err)?;
        unsafe { sys::ui_dev_create(file.as_raw_fd()) }.map_err(nix_err)?;
        debug!("virtual touchscreen created");
        Ok(VirtualTouchscreen { file })
    }

    /// Kernel sysfs name of the created node, e.g. `input23`.
    pub fn sysname(&self) -> io::Result<String> {
        let mut bytes = [0u8; 64];
        unsafe { sys::ui_get_sysname(self.file.as_raw_fd(), &mut bytes) }.map_err(nix_err)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}

impl EventSink for VirtualTouchscreen {
    /// One write per frame, so the kernel sees the frame as a unit.
    fn emit(&mut self, frame: &[InputEvent]) -> io::Result<()> {
        let bytes = unsafe { crate::cast_to_bytes(frame) };
        self.file.write_all(bytes)
    }
}

impl Drop for VirtualTouchscreen {
    fn drop(&mut self) {
        debug!("destroying virtual touchscreen");
        let _ = unsafe { sys::ui_dev_destroy(self.file.as_raw_fd()) };
    }
}

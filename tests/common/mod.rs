#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use mteps::{EventSink, EventType, InputEvent, SynchronizationCode};

/// Sink double that records every emitted frame. `log()` hands out a view
/// that stays usable after the sink itself moved into a driver; an optional
/// per-emit delay models a consumer slower than the scheduler.
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<Vec<InputEvent>>>>,
    delay: Option<Duration>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            frames: Arc::new(Mutex::new(Vec::new())),
            delay: Some(delay),
        }
    }

    pub fn log(&self) -> FrameLog {
        FrameLog {
            frames: Arc::clone(&self.frames),
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, frame: &[InputEvent]) -> io::Result<()> {
        self.frames.lock().unwrap().push(frame.to_vec());
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<Vec<InputEvent>>>>,
}

impl FrameLog {
    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn frames(&self) -> Vec<Vec<InputEvent>> {
        self.frames.lock().unwrap().clone()
    }
}

pub fn is_sync_terminated(frame: &[InputEvent]) -> bool {
    match frame.last() {
        Some(ev) => {
            ev.event_type() == EventType::SYNCHRONIZATION
                && ev.code() == SynchronizationCode::SYN_REPORT.0
        }
        None => false,
    }
}

pub fn triples(frame: &[InputEvent]) -> Vec<(u16, u16, i32)> {
    frame
        .iter()
        .map(|ev| (ev.event_type().0, ev.code(), ev.value()))
        .collect()
}

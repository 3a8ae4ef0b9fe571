//! The worker context: drains the work slot, advances the pattern, encodes
//! frames, writes them to the sink.

use crate::constants::{AbsoluteAxisCode, EventType, KeyCode, SynchronizationCode};
use crate::driver::Counters;
use crate::event::InputEvent;
use crate::pattern::{PatternGenerator, SyntheticEvent};
use crate::sink::EventSink;
use crossbeam_channel::Receiver;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Widest frame: MT slot, tracking id, two MT positions, the pointer
/// emulation pair, BTN_TOUCH, SYN_REPORT.
const MAX_FRAME_EVENTS: usize = 8;

/// Spawns the single consumer of the work slot.
///
/// The thread hands the sink back when it exits so the driver can release it
/// strictly after the pipeline has drained. A sink write error ends the loop
/// and rides along in the returned result.
pub(crate) fn spawn<S: EventSink + 'static>(
    slot: Receiver<()>,
    generator: PatternGenerator,
    sink: S,
    stop: Arc<AtomicBool>,
    counters: Arc<Counters>,
) -> io::Result<JoinHandle<(S, io::Result<()>)>> {
    thread::Builder::new()
        .name("mteps-dispatcher".into())
        .spawn(move || {
            let mut generator = generator;
            let mut sink = sink;
            let result = run(&slot, &mut generator, &mut sink, &stop, &counters);
            (sink, result)
        })
}

fn run<S: EventSink>(
    slot: &Receiver<()>,
    generator: &mut PatternGenerator,
    sink: &mut S,
    stop: &AtomicBool,
    counters: &Counters,
) -> io::Result<()> {
    debug!("dispatcher running");
    let mut frame = Vec::with_capacity(MAX_FRAME_EVENTS);
    while slot.recv().is_ok() {
        // An activation that was already queued when the stop flag went up
        // is skipped: cancel pending, wait only for the running one.
        if stop.load(Ordering::Acquire) {
            break;
        }
        let event = generator.next();
        encode(&event, &mut frame);
        if let Err(err) = sink.emit(&frame) {
            warn!(error = %err, "sink write failed, dispatcher exiting");
            return Err(err);
        }
        counters.dispatched.fetch_add(1, Ordering::Relaxed);
    }
    debug!(
        dispatched = counters.dispatched.load(Ordering::Relaxed),
        "dispatcher drained"
    );
    Ok(())
}

/// Encodes one synthetic event into `frame`, replacing its contents.
///
/// Layout: MT slot and tracking id first, MT positions while the contact is
/// down, then the pointer emulation pair, the BTN_TOUCH transition if any,
/// and the SYN_REPORT terminator. Single-contact patterns carry no MT
/// events at all. The tracking id is the slot number on the down frame and
/// -1 on the up frame, omitted in between.
fn encode(event: &SyntheticEvent, frame: &mut Vec<InputEvent>) {
    frame.clear();
    if let Some(slot) = event.slot {
        frame.push(InputEvent::new(
            EventType::ABSOLUTE,
            AbsoluteAxisCode::ABS_MT_SLOT.0,
            i32::from(slot),
        ));
        let tracking = match event.touch {
            Some(true) => Some(i32::from(slot)),
            Some(false) => Some(-1),
            None => None,
        };
        if let Some(id) = tracking {
            frame.push(InputEvent::new(
                EventType::ABSOLUTE,
                AbsoluteAxisCode::ABS_MT_TRACKING_ID.0,
                id,
            ));
        }
        // A lifted contact has no position.
        if event.touch != Some(false) {
            frame.push(InputEvent::new(
                EventType::ABSOLUTE,
                AbsoluteAxisCode::ABS_MT_POSITION_X.0,
                event.x,
            ));
            frame.push(InputEvent::new(
                EventType::ABSOLUTE,
                AbsoluteAxisCode::ABS_MT_POSITION_Y.0,
                event.y,
            ));
        }
    }

    frame.push(InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisCode::ABS_X.0, event.x));
    frame.push(InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisCode::ABS_Y.0, event.y));
    if let Some(down) = event.touch {
        frame.push(InputEvent::new(EventType::KEY, KeyCode::BTN_TOUCH.0, i32::from(down)));
    }
    if event.sync {
        frame.push(InputEvent::new(
            EventType::SYNCHRONIZATION,
            SynchronizationCode::SYN_REPORT.0,
            0,
        ));
    }
}

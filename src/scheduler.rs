//! The trigger context: a named thread that turns wall time into activations.

use crate::driver::Counters;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use spin_sleep::SpinSleeper;
use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// How far ahead of each deadline the coarse wait hands over to spinning.
const SPIN_MARGIN: Duration = Duration::from_micros(500);

/// OS sleep granularity the spin sleeper trusts before busy-waiting.
const NATIVE_SLEEP_ACCURACY_NS: u32 = 125_000;

/// Arms the periodic trigger on its own thread.
///
/// The thread owns the sending half of the work slot; when it exits, the
/// slot disconnects and the dispatcher drains out behind it.
pub(crate) fn spawn(
    period: Duration,
    slot: Sender<()>,
    shutdown: Receiver<()>,
    counters: Arc<Counters>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("mteps-scheduler".into())
        .spawn(move || run(period, slot, shutdown, counters))
}

/// One firing attempt per period. The next deadline is re-derived from the
/// current time after each firing, so a stall shifts phase instead of
/// accruing catch-up debt. Missed intervals are never made up.
fn run(period: Duration, slot: Sender<()>, shutdown: Receiver<()>, counters: Arc<Counters>) {
    let sleeper = SpinSleeper::new(NATIVE_SLEEP_ACCURACY_NS);
    debug!(period_ns = period.as_nanos() as u64, "scheduler armed");
    let mut deadline = Instant::now() + period;
    loop {
        // The coarse wait doubles as the shutdown listener: dropping the
        // sender wakes it immediately.
        let handover = deadline.checked_sub(SPIN_MARGIN).unwrap_or(deadline);
        match shutdown.recv_deadline(handover) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        sleeper.sleep(deadline.saturating_duration_since(Instant::now()));

        match slot.try_send(()) {
            Ok(()) => {
                counters.fired.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Full(())) => {
                counters.coalesced.fetch_add(1, Ordering::Relaxed);
                trace!("work slot occupied, firing coalesced");
            }
            Err(TrySendError::Disconnected(())) => {
                debug!("work slot disconnected, scheduler exiting");
                break;
            }
        }
        deadline = Instant::now() + period;
    }
    debug!(
        fired = counters.fired.load(Ordering::Relaxed),
        coalesced = counters.coalesced.load(Ordering::Relaxed),
        "scheduler stopped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn fires_into_slot_and_exits_on_shutdown_drop() {
        let (slot_tx, slot_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let counters = Arc::new(Counters::default());
        let handle = spawn(
            Duration::from_millis(5),
            slot_tx,
            shutdown_rx,
            Arc::clone(&counters),
        )
        .unwrap();

        slot_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        drop(shutdown_tx);
        handle.join().unwrap();
        assert!(counters.fired.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn undrained_slot_coalesces_further_firings() {
        let (slot_tx, slot_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let counters = Arc::new(Counters::default());
        let handle = spawn(
            Duration::from_millis(2),
            slot_tx,
            shutdown_rx,
            Arc::clone(&counters),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        drop(shutdown_tx);
        handle.join().unwrap();

        // Nobody drained the slot, so only the first firing occupies it.
        assert_eq!(counters.fired.load(Ordering::Relaxed), 1);
        assert!(counters.coalesced.load(Ordering::Relaxed) >= 1);
        drop(slot_rx);
    }

    #[test]
    fn exits_when_consumer_side_disappears() {
        let (slot_tx, slot_rx) = bounded(1);
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let counters = Arc::new(Counters::default());
        let handle = spawn(Duration::from_millis(2), slot_tx, shutdown_rx, counters).unwrap();

        drop(slot_rx);
        handle.join().unwrap();
    }
}

//! The driver instance: owns the sink, wires the pipeline, walks the
//! lifecycle forward.

use crate::config::Config;
use crate::dispatcher;
use crate::error::Error;
use crate::pattern::PatternGenerator;
use crate::scheduler;
use crate::sink::EventSink;
use crossbeam_channel::{bounded, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::info;

/// Observable lifecycle phases. Transitions only go forward; running again
/// after a stop means constructing a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Sink held, pipeline not yet started.
    Registered,
    /// Scheduler armed, dispatcher consuming.
    Running,
    /// Pipeline torn down. Terminal.
    Stopped,
}

/// Event counters shared by the scheduler and dispatcher threads.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    /// Firings that occupied the work slot.
    pub(crate) fired: AtomicU64,
    /// Firings dropped because the slot was still occupied.
    pub(crate) coalesced: AtomicU64,
    /// Frames written to the sink.
    pub(crate) dispatched: AtomicU64,
}

/// Point-in-time snapshot of the pipeline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub fired: u64,
    pub coalesced: u64,
    pub dispatched: u64,
}

impl Stats {
    /// Fraction of firings the work slot dropped; 0.0 before anything fired.
    /// A persistently high value means the sink cannot keep up with the
    /// configured rate.
    pub fn coalesce_rate(&self) -> f64 {
        let attempts = self.fired + self.coalesced;
        if attempts == 0 {
            0.0
        } else {
            self.coalesced as f64 / attempts as f64
        }
    }
}

struct Pipeline<S> {
    shutdown: Sender<()>,
    scheduler: JoinHandle<()>,
    dispatcher: JoinHandle<(S, io::Result<()>)>,
}

/// A synthetic touch event pipeline bound to one sink.
///
/// Construction validates the config and registers the sink; [`start`]
/// spawns the dispatcher and scheduler threads; [`stop`] tears them down in
/// reverse order and surfaces any sink write error the dispatcher hit. The
/// sink can be taken back with [`into_sink`] once the pipeline is down.
///
/// [`start`]: Driver::start
/// [`stop`]: Driver::stop
/// [`into_sink`]: Driver::into_sink
pub struct Driver<S: EventSink + 'static> {
    config: Config,
    state: DriverState,
    sink: Option<S>,
    counters: Arc<Counters>,
    stop: Arc<AtomicBool>,
    pipeline: Option<Pipeline<S>>,
}

impl<S: EventSink + 'static> Driver<S> {
    /// Validates `config` and registers `sink` with a fresh instance.
    pub fn new(config: Config, sink: S) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            state: DriverState::Registered,
            sink: Some(sink),
            counters: Arc::new(Counters::default()),
            stop: Arc::new(AtomicBool::new(false)),
            pipeline: None,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the shared counters. Callable from any state.
    pub fn stats(&self) -> Stats {
        Stats {
            fired: self.counters.fired.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            dispatched: self.counters.dispatched.load(Ordering::Relaxed),
        }
    }

    /// Spawns the dispatcher, then arms the scheduler.
    ///
    /// Only a freshly registered instance can start. If the dispatcher
    /// thread cannot be spawned the sink is lost with it and the instance
    /// ends `Stopped`; if the scheduler thread cannot be spawned the
    /// dispatcher is drained and joined first and the sink recovered, so no
    /// partial pipeline is ever left behind.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.state != DriverState::Registered {
            return Err(Error::NotStartable(self.state));
        }
        let sink = match self.sink.take() {
            Some(sink) => sink,
            None => return Err(Error::NotStartable(self.state)),
        };

        let generator = PatternGenerator::new(&self.config);
        let (slot_tx, slot_rx) = bounded(1);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);

        info!(
            rate = self.config.rate,
            pattern = ?self.config.pattern,
            contacts = self.config.contacts,
            "starting event pipeline"
        );

        let dispatcher = match dispatcher::spawn(
            slot_rx,
            generator,
            sink,
            Arc::clone(&self.stop),
            Arc::clone(&self.counters),
        ) {
            Ok(handle) => handle,
            Err(err) => {
                // The sink moved into the dead closure and is already gone.
                self.state = DriverState::Stopped;
                return Err(Error::WorkerSpawn(err));
            }
        };

        let scheduler = match scheduler::spawn(
            self.config.period(),
            slot_tx,
            shutdown_rx,
            Arc::clone(&self.counters),
        ) {
            Ok(handle) => handle,
            Err(err) => {
                // slot_tx went down with the failed spawn, so the dispatcher
                // sees a disconnected slot and drains immediately.
                self.stop.store(true, Ordering::Release);
                if let Ok((sink, _)) = dispatcher.join() {
                    self.sink = Some(sink);
                }
                self.state = DriverState::Stopped;
                return Err(Error::SchedulerSpawn(err));
            }
        };

        self.pipeline = Some(Pipeline {
            shutdown: shutdown_tx,
            scheduler,
            dispatcher,
        });
        self.state = DriverState::Running;
        Ok(())
    }

    /// Synchronous teardown: after this returns no further frame reaches
    /// the sink, for any firing timing.
    ///
    /// Stops are idempotent; stopping an instance that is not running is a
    /// no-op. Order: the stop flag goes up (a queued activation will be
    /// skipped), the scheduler is woken and joined (no more firings), the
    /// work slot disconnects, the dispatcher drains and is joined, and only
    /// then is the sink handed back to the instance. A sink write error the
    /// dispatcher hit during the run surfaces here.
    pub fn stop(&mut self) -> Result<(), Error> {
        if self.state != DriverState::Running {
            return Ok(());
        }
        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => {
                self.state = DriverState::Stopped;
                return Ok(());
            }
        };

        self.stop.store(true, Ordering::Release);
        drop(pipeline.shutdown);

        let scheduler_ok = pipeline.scheduler.join().is_ok();
        let dispatch_result = match pipeline.dispatcher.join() {
            Ok((sink, result)) => {
                self.sink = Some(sink);
                result
            }
            Err(_) => Err(io::Error::new(
                io::ErrorKind::Other,
                "dispatcher thread panicked",
            )),
        };
        self.state = DriverState::Stopped;

        let stats = self.stats();
        info!(
            fired = stats.fired,
            coalesced = stats.coalesced,
            dispatched = stats.dispatched,
            "event pipeline stopped"
        );

        if !scheduler_ok {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                "scheduler thread panicked",
            )));
        }
        dispatch_result.map_err(Error::from)
    }

    /// Tears the pipeline down if needed and hands the sink back. `None`
    /// only if the sink was lost to a failed start.
    pub fn into_sink(mut self) -> Option<S> {
        let _ = self.stop();
        self.sink.take()
    }
}

impl<S: EventSink + 'static> Drop for Driver<S> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;

    struct NullSink;

    impl EventSink for NullSink {
        fn emit(&mut self, _frame: &[InputEvent]) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config {
            rate: 0,
            ..Config::default()
        };
        assert!(matches!(
            Driver::new(config, NullSink),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn lifecycle_is_forward_only() {
        let mut driver = Driver::new(Config::default(), NullSink).unwrap();
        assert_eq!(driver.state(), DriverState::Registered);

        driver.start().unwrap();
        assert_eq!(driver.state(), DriverState::Running);
        assert!(matches!(
            driver.start(),
            Err(Error::NotStartable(DriverState::Running))
        ));

        driver.stop().unwrap();
        assert_eq!(driver.state(), DriverState::Stopped);
        assert!(matches!(
            driver.start(),
            Err(Error::NotStartable(DriverState::Stopped))
        ));
        // Stopping again stays a no-op.
        driver.stop().unwrap();
    }

    #[test]
    fn stop_before_start_keeps_the_instance_usable() {
        let mut driver = Driver::new(Config::default(), NullSink).unwrap();
        driver.stop().unwrap();
        assert_eq!(driver.state(), DriverState::Registered);
        driver.start().unwrap();
        driver.stop().unwrap();
    }

    #[test]
    fn into_sink_recovers_the_sink() {
        let mut driver = Driver::new(Config::default(), NullSink).unwrap();
        driver.start().unwrap();
        driver.stop().unwrap();
        assert!(driver.into_sink().is_some());
    }

    #[test]
    fn into_sink_stops_a_running_driver() {
        let mut driver = Driver::new(Config::default(), NullSink).unwrap();
        driver.start().unwrap();
        assert!(driver.into_sink().is_some());
    }

    #[test]
    fn stats_start_at_zero() {
        let driver = Driver::new(Config::default(), NullSink).unwrap();
        let stats = driver.stats();
        assert_eq!(
            stats,
            Stats {
                fired: 0,
                coalesced: 0,
                dispatched: 0
            }
        );
        assert_eq!(stats.coalesce_rate(), 0.0);
    }
}

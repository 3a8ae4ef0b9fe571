use crate::driver::DriverState;
use thiserror::Error;

/// Rejected `Config` values. Everything here is caught by
/// [`Config::validate`](crate::Config::validate) before any thread or device
/// exists.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate must be at least 1 event per second")]
    ZeroRate,
    #[error("rate {0} exceeds one event per nanosecond")]
    RateTooHigh(u32),
    #[error("axis range [{min}, {max}] must satisfy min < max")]
    EmptyAxisRange { min: i32, max: i32 },
    #[error("contact count {0} not in 1..={max}", max = crate::config::MAX_CONTACTS)]
    ContactCount(u16),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    /// The dispatcher thread could not be spawned. The driver instance is
    /// dead; the sink has already been released.
    #[error("failed to spawn dispatcher thread: {0}")]
    WorkerSpawn(std::io::Error),
    /// The scheduler thread could not be spawned. The already-running
    /// dispatcher has been stopped and the sink recovered before this
    /// returns, so `into_sink` still works.
    #[error("failed to spawn scheduler thread: {0}")]
    SchedulerSpawn(std::io::Error),
    /// `start` on a driver that is not freshly registered. The lifecycle only
    /// moves forward; a new run needs a new instance.
    #[error("driver not startable from state {0:?}")]
    NotStartable(DriverState),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Nix(#[from] nix::Error),
}

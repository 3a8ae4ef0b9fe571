// Registers a virtual touchscreen and streams synthetic touch frames into it.
//
// Usage: stream [RATE] [PATTERN] [SECONDS]
//
// Watch the device from another terminal with evtest or
// `libinput debug-events` while it runs.

use std::thread::sleep;
use std::time::Duration;

use mteps::uinput::VirtualTouchscreenBuilder;
use mteps::{Config, Driver};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let mut config = Config::default();
    if let Some(rate) = args.next() {
        config.rate = rate.parse()?;
    }
    if let Some(pattern) = args.next() {
        config.pattern = pattern.parse()?;
    }
    let seconds: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 10,
    };

    let screen = VirtualTouchscreenBuilder::new()?.build(&config)?;
    println!("registered as {}", screen.sysname()?);

    let mut driver = Driver::new(config, screen)?;
    driver.start()?;
    sleep(Duration::from_secs(seconds));
    driver.stop()?;

    let stats = driver.stats();
    println!(
        "fired {}, dispatched {}, coalesced {} ({:.1}% of attempts)",
        stats.fired,
        stats.dispatched,
        stats.coalesced,
        100.0 * stats.coalesce_rate()
    );
    Ok(())
}

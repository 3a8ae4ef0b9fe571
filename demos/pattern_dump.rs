// Prints the first frames of a pattern without touching any device.
//
// Usage: pattern_dump [PATTERN] [COUNT]

use mteps::{Config, PatternGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let mut config = Config {
        // Short cycles so a small dump spans several of them.
        rate: 8,
        ..Config::default()
    };
    if let Some(pattern) = args.next() {
        config.pattern = pattern.parse()?;
    }
    let count: usize = match args.next() {
        Some(s) => s.parse()?,
        None => 32,
    };
    config.validate()?;

    let mut generator = PatternGenerator::new(&config);
    for i in 0..count {
        println!("{:4}  {:?}", i, generator.next());
    }
    Ok(())
}

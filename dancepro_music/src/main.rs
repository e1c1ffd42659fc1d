// DancePro note engine: offline simulator.
//
// Feeds a stream of orientation samples through the engine and prints the
// resulting event log as JSON, optionally writing it to a file and to MIDI.
// Samples come from a JSON file (an array of `OrientationSample`) or are
// synthesized: a wrist swinging through varying tilts and speeds, one
// sample every `--spacing-ms`.
//
// Usage:
//   cargo run -p dancepro_music --bin simulate -- [OPTIONS]
//     --config <PATH>      Engine config JSON (default: built-in defaults)
//     --samples <PATH>     Orientation samples JSON (default: synthesize)
//     --count <N>          Samples to synthesize (default: 200)
//     --spacing-ms <MS>    Synthesized sample spacing (default: 300)
//     --seed <N>           RNG seed (default: from the clock)
//     --midi <PATH>        Also write the log as a MIDI file
//     --out <PATH>         Write the JSON log to a file instead of stdout
//
// Set RUST_LOG=dancepro_music=trace to see every emitted event.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use dancepro_music::midi::write_midi;
use dancepro_music::{Engine, EngineConfig, EventLog, OrientationSample, Result, Vec3};
use dancepro_prng::SeqRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("simulate: {e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = match parse_flag::<PathBuf>(args, "--config") {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };
    let seed: u64 = parse_flag(args, "--seed").unwrap_or_else(clock_seed);
    let count: usize = parse_flag(args, "--count").unwrap_or(200);
    let spacing_ms: u64 = parse_flag(args, "--spacing-ms").unwrap_or(300);

    let samples = match parse_flag::<PathBuf>(args, "--samples") {
        Some(path) => load_samples(&path)?,
        None => synthesize(count, spacing_ms, seed),
    };
    info!(samples = samples.len(), seed, "running engine");

    let mut engine = Engine::with_seed(config, seed);
    let mut log = EventLog::new();
    for sample in &samples {
        engine.map_sample(sample, &mut log);
    }
    info!(
        events = log.len(),
        duration_ms = log.total_duration_ms(),
        "session finished"
    );

    let json = log.to_json();
    match parse_flag::<PathBuf>(args, "--out") {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    if let Some(path) = parse_flag::<PathBuf>(args, "--midi") {
        write_midi(&log, &path)?;
        info!(path = %path.display(), "wrote MIDI");
    }
    Ok(())
}

fn load_samples(path: &Path) -> Result<Vec<OrientationSample>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// A wrist swinging through a slow tilt cycle, with bursts of fast rotation
/// and a little jitter on every axis.
fn synthesize(count: usize, spacing_ms: u64, seed: u64) -> Vec<OrientationSample> {
    let mut rng = SeqRng::new(seed);
    let mut jitter = move |scale: f32| (rng.next_f64() as f32 - 0.5) * scale;

    (0..count)
        .map(|i| {
            let t = i as f32;
            let tilt = (45.0 + 40.0 * (t / 16.0).sin() + jitter(10.0)).to_radians();
            let burst = if (i / 12) % 3 == 0 { 260.0 } else { 80.0 };
            let rate = if i > count * 5 / 6 { 20.0 } else { burst };
            OrientationSample::from_raw(
                i as u64 * spacing_ms,
                Vec3::new(tilt.sin(), jitter(0.05), tilt.cos()),
                Vec3::new(rate + jitter(30.0), jitter(30.0), jitter(30.0)),
                Vec3::new(30.0 + jitter(5.0), jitter(5.0), -40.0),
            )
        })
        .collect()
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>      Engine config JSON (default: built-in defaults)");
    println!("  --samples <PATH>     Orientation samples JSON (default: synthesize)");
    println!("  --count <N>          Samples to synthesize (default: 200)");
    println!("  --spacing-ms <MS>    Synthesized sample spacing (default: 300)");
    println!("  --seed <N>           RNG seed (default: from the clock)");
    println!("  --midi <PATH>        Also write the log as a MIDI file");
    println!("  --out <PATH>         Write the JSON log to a file instead of stdout");
    println!("  --help, -h           Show this help");
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

//! Spin Wheel demo entry point
//!
//! Runs one seeded spin at a fixed frame delta and logs the lifecycle.
//! Usage: `spin-wheel [seed] [config.json]`

use spin_wheel::consts::DEFAULT_DURATION_MS;
use spin_wheel::{Segment, SpinConfig, SpinEngine, SpinOverrides, SpinPhase};

/// Simulated frame delta (60 Hz)
const FRAME_MS: f64 = 1000.0 / 60.0;

fn demo_config() -> SpinConfig<u32> {
    let segments = vec![
        Segment::new("bronze").with_label("Bronze").with_weight(6.0).with_payload(10),
        Segment::new("silver").with_label("Silver").with_weight(3.0).with_payload(50),
        Segment::new("gold").with_label("Gold").with_weight(1.0).with_payload(250),
        Segment::new("miss").with_label("Try again").with_weight(4.0).with_payload(0),
    ];
    SpinConfig::new(segments)
        .with_duration_ms(DEFAULT_DURATION_MS / 2.0)
        .with_jitter(0.6)
}

fn run() -> spin_wheel::Result<()> {
    let mut args = std::env::args().skip(1);
    let seed = args.next().unwrap_or_else(|| "demo".to_string());

    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| spin_wheel::SpinError::Config(format!("{}: {}", path, e)))?;
            SpinConfig::from_json(&json)?
        }
        None => demo_config(),
    };
    let config = match seed.parse::<u64>() {
        Ok(n) => config.with_seed(n),
        Err(_) => config.with_seed(seed.as_str()),
    };

    let mut engine = SpinEngine::new(config)?;
    let _subscription = engine.subscribe(|event| match event.kind {
        spin_wheel::SpinEventKind::SpinProgress => {}
        kind => log::info!("{} (angle {:.1})", kind.as_str(), event.state.angle),
    });

    let plan = engine.spin(SpinOverrides::default())?;
    log::info!(
        "Planned: segment {} after {} rotations over {} ms",
        plan.winning_index,
        plan.rotations,
        plan.duration_ms
    );

    let mut frames = 0u32;
    while engine.tick(FRAME_MS).phase == SpinPhase::Spinning {
        frames += 1;
    }

    if let Some(winner) = engine.winning_segment() {
        println!(
            "Winner: {} ({} points) after {} frames",
            winner.label.as_deref().unwrap_or(&winner.id),
            winner.payload.unwrap_or(0),
            frames + 1
        );
    }

    engine.dispose();
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Spin Wheel demo starting...");

    if let Err(e) = run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

//! Name Wheel entry point
//!
//! Native: spins once over the names given on the command line, stepping the
//! animation in simulated time. The browser build goes through `web::start`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use name_wheel::Settings;
    use name_wheel::consts::INSUFFICIENT_ENTRIES_MESSAGE;
    use name_wheel::wheel::{LogFeedback, SpinError, WheelSession};

    env_logger::init();
    log::info!("Name Wheel (native) starting...");

    let settings = Settings::load();
    // NAME_WHEEL_SEED replays a spin; otherwise seed from OS entropy
    let session = match std::env::var("NAME_WHEEL_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        Some(seed) => WheelSession::from_settings(&settings, seed),
        None => WheelSession::from_settings_entropy(&settings),
    };

    let mut session = match session {
        Ok(s) => s.with_feedback(Box::new(LogFeedback::default())),
        Err(e) => {
            eprintln!("Bad settings: {}", e);
            std::process::exit(2);
        }
    };
    for name in std::env::args().skip(1) {
        session.add_entry(&name);
    }
    println!("{} on the wheel", session.entries().count_label());

    let plan = match session.spin() {
        Ok(plan) => plan,
        Err(SpinError::InsufficientEntries { .. }) => {
            println!("{}", INSUFFICIENT_ENTRIES_MESSAGE);
            return;
        }
        Err(e) => {
            eprintln!("Spin failed: {}", e);
            std::process::exit(1);
        }
    };

    // Simulated 60 Hz animation
    let frame_ms = 1000.0 / 60.0;
    let mut elapsed = 0.0;
    while elapsed < plan.duration_ms {
        let angle = session.rotation_at(&plan, elapsed);
        log::trace!("t={:.0}ms rotation={:.2}°", elapsed, angle);
        elapsed += frame_ms;
    }

    match session.finish(&plan) {
        Ok(outcome) => println!(
            "Winner: {} (#{}, rested at {:.1}°)",
            outcome.winner_label,
            outcome.winner_index + 1,
            outcome.final_rotation_deg
        ),
        Err(e) => {
            eprintln!("Spin failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

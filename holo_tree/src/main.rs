//! holo_tree interactive entry point.

use clap::Parser;
use holo_tree::app::run;
use holo_tree::cli::Cli;
use holo_wish::WishConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let cfg = cli.into_config(WishConfig::from_env());

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            HoloTree: Interactive 3D Particle Tree            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    if cfg.is_simulated() {
        println!("  Mode: Keyboard simulation  (use --detector <cmd> for a camera)");
    } else {
        println!("  Mode: External hand detector");
    }
    if cfg.wish.api_key.is_none() {
        println!("  Wishes: fallback text only  (set API_KEY for generated wishes)");
    }
    println!();

    info!(particles = cfg.particle_count, color = %cfg.color, "opening visualizer window");

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

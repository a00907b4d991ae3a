//! Print one generated holiday wish.

use clap::Parser;
use holo_wish::{WishConfig, WishGenerator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wish", about = "Generate a short holiday wish (API_KEY enables the real API)")]
struct Args {
    /// Theme the wish is written around.
    #[arg(long, default_value = "Winter Wonder")]
    theme: String,

    /// Override the text-generation model.
    #[arg(long)]
    model: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = WishConfig::from_env();
    if let Some(model) = args.model {
        cfg = cfg.with_model(model);
    }

    match WishGenerator::from_config(&cfg) {
        Ok(generator) => println!("{}", generator.generate_wish(&args.theme)),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

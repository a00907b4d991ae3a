//! Classify landmark sets read from stdin, one JSON array per line.
//!
//! ```text
//! $ detector --dump | gesture_probe --json
//! ```

use std::io::{self, BufRead, Write};

use clap::Parser;
use holo_gesture::{classify, HandLandmarks, HandSignal};

#[derive(Parser, Debug)]
#[command(name = "gesture_probe", about = "Classify 21-point hand landmark sets from stdin")]
struct Args {
    /// Print each signal as a JSON object instead of a table row.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> io::Result<()> {
    let stdin  = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.json {
        writeln!(out, "{:>5}  {:<7} {:>6} {:>6} {:>8} {:>7}", "line", "gesture", "x", "y", "rotation", "pinch")?;
    }

    for (n, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }

        let signal = match HandLandmarks::from_json(&line) {
            Ok(hand) => hand.classify(),
            Err(e) => {
                eprintln!("  line {}: {}", n + 1, e);
                classify(None)
            }
        };

        if args.json {
            writeln!(out, "{}", serde_json::to_string(&signal).map_err(io::Error::other)?)?;
        } else {
            write_row(&mut out, n + 1, &signal)?;
        }
    }
    Ok(())
}

fn write_row(out: &mut impl Write, line: usize, s: &HandSignal) -> io::Result<()> {
    writeln!(
        out,
        "{:>5}  {:<7} {:>6.3} {:>6.3} {:>8.3} {:>7.3}",
        line, s.gesture, s.x, s.y, s.rotation, s.pinch_distance
    )
}

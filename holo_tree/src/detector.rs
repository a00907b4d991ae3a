//! External hand-landmark detector process.
//!
//! The detector owns the camera. It is started as a child process and talks
//! newline-delimited JSON on stdout:
//!
//! ```text
//! READY
//! {"hands":[{"landmarks":[{"x":0.51,"y":0.72,"z":0.0}, … 21 points]}]}
//! {"hands":[]}
//! {"error":"could not open camera"}
//! ```
//!
//! `READY` is printed once the model is loaded. An `error` object means the
//! camera could not be acquired; that is permanent for the session.

use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use holo_gesture::HandLandmarks;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::source::{DetectorEvent, LandmarkSource, StopFlag};

pub const DEFAULT_COMMAND: &str = "holo-hand-detector";
/// How often the pump wakes to check the stop flag.
const POLL: Duration = Duration::from_millis(100);

// ════════════════════════════════════════════════════════════════════════════
// DetectorConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    pub command:                  String,
    /// Passed before the generated flags.
    pub args:                     Vec<String>,
    pub width:                    u32,
    pub height:                   u32,
    pub facing:                   String,
    pub max_hands:                u32,
    pub model_complexity:         u8,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
    pub retry_delay:              Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            command:                  DEFAULT_COMMAND.to_string(),
            args:                     Vec::new(),
            width:                    640,
            height:                   480,
            facing:                   "user".to_string(),
            max_hands:                1,
            model_complexity:         1,
            min_detection_confidence: 0.5,
            min_tracking_confidence:  0.5,
            retry_delay:              Duration::from_millis(500),
        }
    }
}

impl DetectorConfig {
    pub fn with_command(command: impl Into<String>, args: Vec<String>) -> Self {
        DetectorConfig { command: command.into(), args, ..Self::default() }
    }

    /// Full argument list handed to the detector.
    pub fn command_args(&self) -> Vec<String> {
        let mut out = self.args.clone();
        out.extend([
            "--width".to_string(),                    self.width.to_string(),
            "--height".to_string(),                   self.height.to_string(),
            "--facing".to_string(),                   self.facing.clone(),
            "--max-hands".to_string(),                self.max_hands.to_string(),
            "--model-complexity".to_string(),         self.model_complexity.to_string(),
            "--min-detection-confidence".to_string(), self.min_detection_confidence.to_string(),
            "--min-tracking-confidence".to_string(),  self.min_tracking_confidence.to_string(),
        ]);
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire protocol
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum DetectorLine {
    Ready,
    Hands(Vec<HandLandmarks>),
    Error(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Message {
    Error { error: String },
    Hands { hands: Vec<WireHand> },
}

#[derive(Deserialize)]
struct WireHand {
    landmarks: HandLandmarks,
}

/// Parse one stdout line. Hands with the wrong point count fail the line.
pub fn parse_line(line: &str) -> Result<DetectorLine, serde_json::Error> {
    let line = line.trim();
    if line == "READY" {
        return Ok(DetectorLine::Ready);
    }
    Ok(match serde_json::from_str::<Message>(line)? {
        Message::Error { error } => DetectorLine::Error(error),
        Message::Hands { hands } => {
            DetectorLine::Hands(hands.into_iter().map(|h| h.landmarks).collect())
        }
    })
}

// ════════════════════════════════════════════════════════════════════════════
// RunningDetector: child process plus a line-forwarding reader thread
// ════════════════════════════════════════════════════════════════════════════

struct RunningDetector {
    child: Child,
    lines: Receiver<String>,
}

impl RunningDetector {
    fn spawn(cfg: &DetectorConfig) -> io::Result<Self> {
        let mut child = Command::new(&cfg.command)
            .args(cfg.command_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "detector stdout not captured")
        })?;

        let (tx, lines) = mpsc::channel();
        // Ends on EOF, which follows the child exiting or being killed.
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(l) => if tx.send(l).is_err() { return; },
                    Err(_) => return,
                }
            }
        });

        Ok(RunningDetector { child, lines })
    }
}

impl Drop for RunningDetector {
    fn drop(&mut self) {
        // Killing the detector releases the camera.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

enum Outcome {
    Stopped,
    Disconnected,
    CameraFailed(String),
    Exited { ready: bool },
}

fn pump(running: &RunningDetector, tx: &Sender<DetectorEvent>, stop: &StopFlag) -> Outcome {
    let mut ready = false;
    loop {
        if stop.is_raised() {
            return Outcome::Stopped;
        }
        let line = match running.lines.recv_timeout(POLL) {
            Ok(l) => l,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Outcome::Exited { ready },
        };
        match parse_line(&line) {
            Ok(DetectorLine::Ready) => {
                ready = true;
                info!("hand detector ready");
            }
            Ok(DetectorLine::Hands(hands)) => {
                if tx.send(DetectorEvent::Hands(hands)).is_err() {
                    return Outcome::Disconnected;
                }
            }
            Ok(DetectorLine::Error(msg)) => return Outcome::CameraFailed(msg),
            Err(e) => debug!(error = %e, line = %line, "skipping detector line"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorLandmarkSource
// ════════════════════════════════════════════════════════════════════════════

pub struct DetectorLandmarkSource {
    pub config: DetectorConfig,
}

impl DetectorLandmarkSource {
    pub fn new(config: DetectorConfig) -> Self { DetectorLandmarkSource { config } }
}

impl LandmarkSource for DetectorLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>, stop: StopFlag) {
        let cfg = &self.config;
        let delay = cfg.retry_delay;

        while !stop.is_raised() {
            let running = match RunningDetector::spawn(cfg) {
                Ok(r) => r,
                Err(e) => {
                    warn!(command = %cfg.command, error = %e,
                          "hand detector not available; retrying in {:?}", delay);
                    if stop.sleep(delay) { return; }
                    continue;
                }
            };
            info!(command = %cfg.command, pid = running.child.id(), "hand detector started");

            match pump(&running, &tx, &stop) {
                Outcome::Stopped | Outcome::Disconnected => return,
                Outcome::CameraFailed(msg) => {
                    drop(running);
                    error!("camera unavailable: {}", msg);
                    let _ = tx.send(DetectorEvent::CameraFailed(msg));
                    return;
                }
                Outcome::Exited { ready: false } => {
                    warn!("hand detector exited before READY; retrying in {:?}", delay);
                }
                Outcome::Exited { ready: true } => {
                    warn!("hand detector exited; restarting in {:?}", delay);
                }
            }
            drop(running);
            if stop.sleep(delay) { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::spawn_landmark_source;
    use holo_gesture::{pose, Gesture};
    use std::time::Instant;

    fn hands_json(hands: &[HandLandmarks]) -> String {
        let wire: Vec<_> = hands
            .iter()
            .map(|h| serde_json::json!({ "landmarks": h }))
            .collect();
        serde_json::json!({ "hands": wire }).to_string()
    }

    #[test]
    fn default_args() {
        let args = DetectorConfig::with_command("det", vec!["--model".into(), "m.task".into()])
            .command_args();
        assert_eq!(&args[..2], ["--model", "m.task"]);
        let joined = args.join(" ");
        assert!(joined.contains("--width 640 --height 480"));
        assert!(joined.contains("--facing user"));
        assert!(joined.contains("--max-hands 1"));
        assert!(joined.contains("--model-complexity 1"));
        assert!(joined.contains("--min-detection-confidence 0.5"));
        assert!(joined.contains("--min-tracking-confidence 0.5"));
    }

    #[test]
    fn parses_ready() {
        assert_eq!(parse_line("READY\n").unwrap(), DetectorLine::Ready);
    }

    #[test]
    fn parses_hands() {
        let line = hands_json(&[pose::fist(0.4, 0.6)]);
        match parse_line(&line).unwrap() {
            DetectorLine::Hands(h) => {
                assert_eq!(h.len(), 1);
                assert_eq!(h[0].classify().gesture, Gesture::Fist);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(parse_line(r#"{"hands":[]}"#).unwrap(), DetectorLine::Hands(vec![]));
    }

    #[test]
    fn parses_error() {
        assert_eq!(
            parse_line(r#"{"error":"camera busy"}"#).unwrap(),
            DetectorLine::Error("camera busy".into())
        );
    }

    #[test]
    fn rejects_garbage_and_short_hands() {
        assert!(parse_line("loading model...").is_err());
        assert!(parse_line("{}").is_err());
        assert!(parse_line(r#"{"hands":[{"landmarks":[{"x":0.1,"y":0.2}]}]}"#).is_err());
    }

    #[test]
    fn missing_binary_retries_until_stopped() {
        let mut cfg = DetectorConfig::with_command("/nonexistent/holo-hand-detector", vec![]);
        cfg.retry_delay = Duration::from_millis(20);
        let mut handle = spawn_landmark_source(DetectorLandmarkSource::new(cfg));

        thread::sleep(Duration::from_millis(150));
        let (events, disconnected) = handle.drain();
        assert!(events.is_empty());
        assert!(!disconnected);

        let start = Instant::now();
        handle.stop();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[cfg(unix)]
    fn sh(script: String) -> DetectorConfig {
        let mut cfg = DetectorConfig::with_command("sh", vec!["-c".into(), script]);
        cfg.retry_delay = Duration::from_millis(20);
        cfg
    }

    #[cfg(unix)]
    #[test]
    fn forwards_frames_after_ready() {
        let frame = hands_json(&[pose::open_hand(0.5, 0.7)]);
        let script = format!("echo READY; echo 'not json'; printf '%s\\n' '{}'", frame);
        let handle = spawn_landmark_source(DetectorLandmarkSource::new(sh(script)));

        let deadline = Instant::now() + Duration::from_secs(5);
        let hands = loop {
            let (events, _) = handle.drain();
            if let Some(DetectorEvent::Hands(h)) = events.into_iter().next() {
                break h;
            }
            assert!(Instant::now() < deadline, "no frame from detector");
            thread::sleep(Duration::from_millis(10));
        };
        assert_eq!(hands[0].classify().gesture, Gesture::Open);
    }

    #[cfg(unix)]
    #[test]
    fn exit_before_ready_keeps_retrying() {
        let mut handle = spawn_landmark_source(DetectorLandmarkSource::new(sh("exit 0".into())));

        thread::sleep(Duration::from_millis(200));
        let (events, disconnected) = handle.drain();
        assert!(events.is_empty());
        assert!(!disconnected);

        let start = Instant::now();
        handle.stop();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(handle.is_stopped());
    }

    #[cfg(unix)]
    #[test]
    fn camera_error_is_reported_once() {
        let script = r#"echo '{"error":"camera busy"}'"#.to_string();
        let handle = spawn_landmark_source(DetectorLandmarkSource::new(sh(script)));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        loop {
            let (events, disconnected) = handle.drain();
            seen.extend(events);
            if disconnected { break; }
            assert!(Instant::now() < deadline, "source did not finish");
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(seen, vec![DetectorEvent::CameraFailed("camera busy".into())]);
    }
}

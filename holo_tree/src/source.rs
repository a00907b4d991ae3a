//! Hand landmark sources, real detector or keyboard simulation.
//!
//! Consumers only see [`DetectorEvent`]s arriving over a `mpsc` channel and
//! cannot tell whether the frames came from a camera or from the keyboard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use holo_gesture::{pose, HandLandmarks};
use tracing::{debug, warn};

// ════════════════════════════════════════════════════════════════════════════
// DetectorEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum DetectorEvent {
    /// One processed frame; empty when no hand is in view.
    Hands(Vec<HandLandmarks>),
    /// The camera could not be opened. Sent once, never retried.
    CameraFailed(String),
    /// The source asked the application to exit.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// StopFlag
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self { Self::default() }

    pub fn raise(&self) { self.0.store(true, Ordering::SeqCst); }

    pub fn is_raised(&self) -> bool { self.0.load(Ordering::SeqCst) }

    /// Sleep up to `total`, waking early if the flag goes up.
    /// Returns `true` when stopped.
    pub fn sleep(&self, total: Duration) -> bool {
        const SLICE: Duration = Duration::from_millis(20);
        let deadline = Instant::now() + total;
        loop {
            if self.is_raised() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep(SLICE.min(deadline - now));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`DetectorEvent`]s until `stop` is raised.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<DetectorEvent>, stop: StopFlag);
}

/// Owning handle to a running source thread.
pub struct SourceHandle {
    events: Receiver<DetectorEvent>,
    stop:   StopFlag,
    thread: Option<JoinHandle<()>>,
}

/// Spawn a landmark source on its own thread.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> SourceHandle {
    let (tx, events) = mpsc::channel();
    let stop = StopFlag::new();
    let flag = stop.clone();
    let thread = thread::spawn(move || Box::new(source).run(tx, flag));
    SourceHandle { events, stop, thread: Some(thread) }
}

impl SourceHandle {
    /// Everything delivered since the last call, without blocking.
    /// The flag is `true` once the source thread has gone away.
    pub fn drain(&self) -> (Vec<DetectorEvent>, bool) {
        let mut out = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(ev) => out.push(ev),
                Err(mpsc::TryRecvError::Empty) => return (out, false),
                Err(mpsc::TryRecvError::Disconnected) => return (out, true),
            }
        }
    }

    /// Raise the stop flag and wait for the thread to finish.
    pub fn stop(&mut self) {
        self.stop.raise();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("landmark source thread panicked");
            }
        }
    }

    pub fn is_stopped(&self) -> bool { self.thread.is_none() }
}

impl Drop for SourceHandle {
    fn drop(&mut self) { self.stop(); }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard simulation
// ════════════════════════════════════════════════════════════════════════════

/// Hand shapes the simulator can hold up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    Open,
    Fist,
    Pinch,
    /// Two fingers folded; classifies as no gesture.
    Partial,
}

/// Raw input forwarded by the visualizer in simulation mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    Show(SimPose),
    Hide,
    /// Move the wrist in screen space (already mirrored).
    Nudge { dx: f32, dy: f32 },
    Quit,
}

/// Frame cadence, close to a webcam's 30 fps.
pub const SIM_FRAME: Duration = Duration::from_millis(33);

/// Turns [`SimInput`] into synthetic landmark frames.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
    pose:    Option<SimPose>,
    wrist_x: f32,
    wrist_y: f32,
}

impl SimLandmarkSource {
    /// Starts with the hand out of view.
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimLandmarkSource { rx, pose: None, wrist_x: 0.5, wrist_y: 0.7 }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Show(p) => self.pose = Some(p),
            SimInput::Hide    => self.pose = None,
            SimInput::Nudge { dx, dy } => {
                // Camera x is mirrored relative to the screen.
                self.wrist_x = (self.wrist_x - dx).clamp(0.05, 0.95);
                self.wrist_y = (self.wrist_y + dy).clamp(0.05, 0.95);
            }
            SimInput::Quit => {}
        }
    }

    /// Landmarks for the current simulated hand, if shown.
    pub fn frame(&self) -> Vec<HandLandmarks> {
        let (x, y) = (self.wrist_x, self.wrist_y);
        match self.pose {
            None                   => Vec::new(),
            Some(SimPose::Open)    => vec![pose::open_hand(x, y)],
            Some(SimPose::Fist)    => vec![pose::fist(x, y)],
            Some(SimPose::Pinch)   => vec![pose::pinch(x, y)],
            Some(SimPose::Partial) => vec![pose::partial(x, y)],
        }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(mut self: Box<Self>, tx: Sender<DetectorEvent>, stop: StopFlag) {
        let mut last_frame = Instant::now();
        while !stop.is_raised() {
            match self.rx.recv_timeout(SIM_FRAME) {
                Ok(SimInput::Quit) => {
                    let _ = tx.send(DetectorEvent::Quit);
                    return;
                }
                Ok(input) => {
                    debug!(?input, "sim input");
                    self.apply(input);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
            if last_frame.elapsed() >= SIM_FRAME {
                last_frame = Instant::now();
                if tx.send(DetectorEvent::Hands(self.frame())).is_err() {
                    return;
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

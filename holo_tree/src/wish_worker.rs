//! Background wish generation.
//!
//! The HTTP call blocks for as long as the API takes, so it runs on its own
//! thread. Requests and results travel over channels.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use holo_wish::WishGenerator;
use tracing::debug;

pub enum WishCommand {
    /// Generate a wish for this theme.
    Generate(String),
    /// Terminate the thread once the current request returns.
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedWish {
    pub theme: String,
    pub text:  String,
}

/// Handle to the wish thread.
pub struct WishWorker {
    cmd_tx:  Sender<WishCommand>,
    wish_rx: Receiver<FinishedWish>,
    thread:  Option<JoinHandle<()>>,
}

impl WishWorker {
    pub fn spawn(generator: WishGenerator) -> Self {
        let (cmd_tx, cmd_rx)   = mpsc::channel::<WishCommand>();
        let (wish_tx, wish_rx) = mpsc::channel::<FinishedWish>();

        let thread = thread::spawn(move || worker_thread(generator, cmd_rx, wish_tx));

        WishWorker { cmd_tx, wish_rx, thread: Some(thread) }
    }

    pub fn request(&self, theme: impl Into<String>) {
        let _ = self.cmd_tx.send(WishCommand::Generate(theme.into()));
    }

    /// Ask the thread to exit. It is not joined: an in-flight request
    /// cannot be interrupted and its result is simply discarded.
    pub fn quit(&mut self) {
        let _ = self.cmd_tx.send(WishCommand::Quit);
        self.thread.take();
    }

    /// Drain any finished wishes (non-blocking).
    pub fn drain(&self) -> Vec<FinishedWish> {
        let mut out = Vec::new();
        while let Ok(w) = self.wish_rx.try_recv() { out.push(w); }
        out
    }

    #[cfg(test)]
    fn join(mut self) {
        let _ = self.cmd_tx.send(WishCommand::Quit);
        if let Some(t) = self.thread.take() {
            t.join().unwrap();
        }
    }
}

fn worker_thread(
    generator: WishGenerator,
    cmd_rx:    Receiver<WishCommand>,
    wish_tx:   Sender<FinishedWish>,
) {
    for cmd in cmd_rx {
        match cmd {
            WishCommand::Generate(theme) => {
                let text = generator.generate_wish(&theme);
                debug!(%theme, %text, "wish finished");
                if wish_tx.send(FinishedWish { theme, text }).is_err() {
                    return;
                }
            }
            WishCommand::Quit => return,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use holo_wish::{TextGenerator, WishError, NO_CREDENTIAL_WISH};
    use std::time::{Duration, Instant};

    struct Echo;

    impl TextGenerator for Echo {
        fn generate(&self, _model: &str, prompt: &str) -> Result<String, WishError> {
            Ok(format!(" {} ", prompt.len()))
        }
    }

    fn wait_for(worker: &WishWorker, n: usize) -> Vec<FinishedWish> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();
        while out.len() < n {
            out.extend(worker.drain());
            assert!(Instant::now() < deadline, "wishes not delivered");
            std::thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn fallback_without_credential() {
        let worker = WishWorker::spawn(WishGenerator::new(None, "m"));
        worker.request("Winter Wonder");
        let w = &wait_for(&worker, 1)[0];
        assert_eq!(w.theme, "Winter Wonder");
        assert_eq!(w.text, NO_CREDENTIAL_WISH);
        worker.join();
    }

    #[test]
    fn results_arrive_in_request_order() {
        let worker = WishWorker::spawn(WishGenerator::new(Some(Box::new(Echo)), "m"));
        worker.request("Red");
        worker.request("Gold");
        let done = wait_for(&worker, 2);
        assert_eq!(done[0].theme, "Red");
        assert_eq!(done[1].theme, "Gold");
        // Generator output is trimmed.
        assert_eq!(done[0].text, done[0].text.trim());
        worker.join();
    }

    #[test]
    fn drain_is_empty_when_idle() {
        let mut worker = WishWorker::spawn(WishGenerator::new(None, "m"));
        assert!(worker.drain().is_empty());
        worker.quit();
        worker.request("ignored after quit");
    }
}

//! One running session: the landmark source and the wish worker.
//!
//! Both are started together by [`Session::start`] and torn down together by
//! [`Session::stop`] or on drop.

use holo_wish::WishGenerator;
use tracing::info;

use crate::source::{spawn_landmark_source, DetectorEvent, LandmarkSource, SourceHandle};
use crate::wish_worker::{FinishedWish, WishWorker};

pub struct Session {
    source: SourceHandle,
    wishes: WishWorker,
    live:   bool,
}

impl Session {
    pub fn start<S: LandmarkSource>(source: S, generator: WishGenerator) -> Self {
        info!(credential = generator.has_credential(), model = generator.model(), "session starting");
        Session {
            source: spawn_landmark_source(source),
            wishes: WishWorker::spawn(generator),
            live:   true,
        }
    }

    /// Pending detector events, plus whether the source has gone away.
    pub fn detector_events(&self) -> (Vec<DetectorEvent>, bool) {
        self.source.drain()
    }

    pub fn request_wish(&self, theme: &str) {
        self.wishes.request(theme);
    }

    pub fn finished_wishes(&self) -> Vec<FinishedWish> {
        self.wishes.drain()
    }

    pub fn stop(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;
        self.source.stop();
        self.wishes.quit();
        info!("session stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) { self.teardown(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SimInput, SimLandmarkSource, SimPose};
    use holo_gesture::Gesture;
    use holo_wish::NO_CREDENTIAL_WISH;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn poll<T>(mut f: impl FnMut() -> Option<T>) -> T {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(v) = f() { return v; }
            assert!(Instant::now() < deadline, "timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn drives_source_and_wishes() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let session = Session::start(SimLandmarkSource::new(sim_rx), WishGenerator::new(None, "m"));

        sim_tx.send(SimInput::Show(SimPose::Pinch)).unwrap();
        let gesture = poll(|| {
            session.detector_events().0.into_iter().find_map(|ev| match ev {
                DetectorEvent::Hands(h) if !h.is_empty() => Some(h[0].classify().gesture),
                _ => None,
            })
        });
        assert_eq!(gesture, Gesture::Pinch);

        session.request_wish("Wealth and Light");
        let wish = poll(|| session.finished_wishes().into_iter().next());
        assert_eq!(wish.text, NO_CREDENTIAL_WISH);

        session.stop();
        // The sim thread has exited, so its input channel is closed.
        assert!(sim_tx.send(SimInput::Hide).is_err());
    }

    #[test]
    fn drop_tears_down() {
        let (sim_tx, sim_rx) = mpsc::channel();
        {
            let _session = Session::start(SimLandmarkSource::new(sim_rx), WishGenerator::new(None, "m"));
        }
        assert!(sim_tx.send(SimInput::Hide).is_err());
    }
}

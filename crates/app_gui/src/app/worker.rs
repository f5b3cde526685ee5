//! Background request thread and the channel its outcomes come back on.

use eframe::egui;
use landcover_core::{Classify, ClassifyError, Submission, Ticket};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

pub(crate) type Outcome = (Ticket, Result<String, ClassifyError>);

/// Runs one blocking request per submission on its own thread.
pub(crate) struct Worker<C> {
    classifier: Arc<C>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl<C: Classify + Send + Sync + 'static> Worker<C> {
    pub(crate) fn new(classifier: C) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            classifier: Arc::new(classifier),
            tx,
            rx,
        }
    }

    /// Spawn the request. The outcome is delivered through [`Worker::drain`]
    /// and a repaint is requested so the window picks it up.
    pub(crate) fn spawn(&self, submission: Submission, ctx: Option<egui::Context>) {
        let ticket = submission.ticket;
        let classifier = Arc::clone(&self.classifier);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("classify-{}", ticket.attempt))
            .spawn(move || {
                let outcome = classifier.classify(&submission.file);
                if tx.send((ticket, outcome)).is_err() {
                    tracing::debug!("Window closed before attempt {} finished", ticket.attempt);
                }
                if let Some(ctx) = ctx {
                    ctx.request_repaint();
                }
            });
        if let Err(e) = spawned {
            tracing::error!("Could not start request thread: {e}");
            // The receiver lives in `self`, so this send cannot fail.
            let _ = self.tx.send((ticket, Err(ClassifyError::Io(e))));
        }
    }

    /// Outcomes that arrived since the last call.
    pub(crate) fn drain(&self) -> Vec<Outcome> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landcover_core::{ClassifierSession, SelectedFile, Settled};
    use std::time::Duration;

    struct Echo;

    impl Classify for Echo {
        fn classify(&self, file: &SelectedFile) -> Result<String, ClassifyError> {
            if file.name.ends_with(".txt") {
                Err(ClassifyError::Remote("invalid image".into()))
            } else {
                Ok(format!("label for {}", file.name))
            }
        }
    }

    fn wait_one(worker: &Worker<Echo>) -> Outcome {
        worker
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker did not answer")
    }

    fn select(session: &mut ClassifierSession, name: &str) {
        let id = session.next_file_id();
        session.select_image(Some(SelectedFile::new(id, name, "image/png", vec![1, 2, 3])));
    }

    #[test]
    fn outcome_comes_back_with_its_ticket() {
        let worker = Worker::new(Echo);
        let mut session = ClassifierSession::new();
        select(&mut session, "cat.png");

        let sub = session.begin_submit().unwrap();
        let ticket = sub.ticket;
        worker.spawn(sub, None);

        let (got, outcome) = wait_one(&worker);
        assert_eq!(got, ticket);
        assert_eq!(session.settle(got, outcome), Settled::Applied);
        assert_eq!(session.result(), Some("label for cat.png"));
        assert!(!session.is_loading());
    }

    #[test]
    fn remote_error_settles_without_result() {
        let worker = Worker::new(Echo);
        let mut session = ClassifierSession::new();
        select(&mut session, "bad.txt");

        worker.spawn(session.begin_submit().unwrap(), None);
        let (ticket, outcome) = wait_one(&worker);
        assert_eq!(session.settle(ticket, outcome), Settled::Failed);
        assert_eq!(session.result(), None);
        assert!(!session.is_loading());
    }

    #[test]
    fn drain_is_empty_when_nothing_arrived() {
        let worker = Worker::new(Echo);
        assert!(worker.drain().is_empty());
    }
}

//! Selection, submission and result state of the classifier window.

use crate::client::Classify;
use crate::error::ClassifyError;
use crate::selection::{FileId, SelectedFile};

pub const TITLE: &str = "Land Cover Classification";
pub const UPLOAD_LABEL: &str = "Upload Image";
pub const PREVIEW_HEADING: &str = "Preview:";
pub const SUBMIT_LABEL: &str = "Classify Land Cover";
pub const SUBMITTING_LABEL: &str = "Classifying...";
pub const RESULT_HEADING: &str = "Classification Result:";

/// Identifies one submission: which file it was for and which attempt it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub file: FileId,
    pub attempt: u64,
}

/// Everything a worker needs to perform one request.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: Ticket,
    pub file: SelectedFile,
}

/// What [`ClassifierSession::settle`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// The label is now the displayed result.
    Applied,
    /// The request failed; no result is shown.
    Failed,
    /// The outcome belongs to a superseded submission and was discarded.
    Stale,
}

/// Coarse state, derived from the fields of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Submitting,
    Result,
}

/// Snapshot of what the window should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub title: &'static str,
    pub upload_label: &'static str,
    pub show_preview: bool,
    pub preview_file: Option<FileId>,
    pub file_name: Option<String>,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub result: Option<String>,
}

/// Single-owner UI state. All mutation goes through `&mut self`.
#[derive(Debug, Default)]
pub struct ClassifierSession {
    selected: Option<SelectedFile>,
    result: Option<String>,
    loading: bool,
    next_id: u64,
    attempt: u64,
    in_flight: Option<Ticket>,
}

impl ClassifierSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an identity for a file about to be selected.
    pub fn next_file_id(&mut self) -> FileId {
        self.next_id += 1;
        FileId(self.next_id)
    }

    /// Store a newly chosen file and clear any previous result.
    ///
    /// `None` (the picker was cancelled) changes nothing. A pending
    /// submission is superseded: its outcome will be discarded when it arrives.
    pub fn select_image(&mut self, file: Option<SelectedFile>) -> Option<&SelectedFile> {
        let file = file?;
        tracing::info!("Selected {} as {} ({})", file.name, file.id, file.mime);
        if let Some(ticket) = self.in_flight.take() {
            tracing::debug!(
                "Superseding attempt {} for {}",
                ticket.attempt,
                ticket.file
            );
        }
        self.loading = false;
        self.result = None;
        self.selected = Some(file);
        self.selected.as_ref()
    }

    /// Start a submission for the selected file.
    ///
    /// Returns `None` without touching any state when nothing is selected or
    /// a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.loading {
            tracing::debug!("Submit ignored: request already in flight");
            return None;
        }
        let file = self.selected.clone()?;
        self.attempt += 1;
        let ticket = Ticket {
            file: file.id,
            attempt: self.attempt,
        };
        self.loading = true;
        self.in_flight = Some(ticket);
        tracing::info!("Submitting {} (attempt {})", file.name, ticket.attempt);
        Some(Submission { ticket, file })
    }

    /// Apply the outcome of a submission.
    pub fn settle(
        &mut self,
        ticket: Ticket,
        outcome: Result<String, ClassifyError>,
    ) -> Settled {
        let current_file = self.selected.as_ref().map(|f| f.id);
        if self.in_flight != Some(ticket) || current_file != Some(ticket.file) {
            tracing::info!(
                "Discarding outcome of attempt {} for {}; selection moved on",
                ticket.attempt,
                ticket.file
            );
            return Settled::Stale;
        }

        self.in_flight = None;
        self.loading = false;
        match outcome {
            Ok(label) => {
                tracing::info!("Classified {} as {label:?}", ticket.file);
                self.result = Some(label);
                Settled::Applied
            }
            Err(ClassifyError::Remote(msg)) => {
                tracing::error!("Error: {msg}");
                Settled::Failed
            }
            Err(e) => {
                tracing::error!("Upload failed: {e}");
                Settled::Failed
            }
        }
    }

    /// Run a whole submission synchronously against `classifier`.
    pub fn submit_with(&mut self, classifier: &dyn Classify) -> Option<Settled> {
        let Submission { ticket, file } = self.begin_submit()?;
        let outcome = classifier.classify(&file);
        Some(self.settle(ticket, outcome))
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn phase(&self) -> Phase {
        match (&self.selected, self.loading, &self.result) {
            (None, _, _) => Phase::Idle,
            (Some(_), true, _) => Phase::Submitting,
            (Some(_), false, Some(_)) => Phase::Result,
            (Some(_), false, None) => Phase::Ready,
        }
    }

    /// Derive the widgets to draw. An empty label is not shown.
    pub fn view(&self) -> ViewModel {
        ViewModel {
            title: TITLE,
            upload_label: UPLOAD_LABEL,
            show_preview: self.selected.is_some(),
            preview_file: self.selected.as_ref().map(|f| f.id),
            file_name: self.selected.as_ref().map(|f| f.name.clone()),
            submit_enabled: self.selected.is_some() && !self.loading,
            submit_label: if self.loading {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
            result: self.result.clone().filter(|r| !r.is_empty()),
        }
    }
}

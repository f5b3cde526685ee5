//! Core of the land cover classifier: the selected image, its preview, the
//! remote endpoint client, and the session state the window renders from.

pub mod client;
pub mod error;
pub mod preview;
pub mod selection;
pub mod session;

pub use client::{Classify, ClientConfig, DEFAULT_ENDPOINT, HttpClassifier, decode_response};
pub use error::{ClassifyError, Result};
pub use preview::{PREVIEW_MAX_EDGE, Preview, PreviewSlot};
pub use selection::{FileId, IMAGE_EXTENSIONS, SelectedFile, mime_for_path};
pub use session::{ClassifierSession, Phase, Settled, Submission, Ticket, ViewModel};

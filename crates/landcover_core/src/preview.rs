//! Local preview of the selected image and the slot that owns its display resource.

use crate::error::Result;
use crate::selection::{FileId, SelectedFile};

/// Longest edge of a decoded preview, in pixels.
pub const PREVIEW_MAX_EDGE: u32 = 1024;

/// Decoded RGBA pixels of a [`SelectedFile`], ready to upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file: FileId,
    pub width: u32,
    pub height: u32,
    /// Row-major, unmultiplied RGBA8.
    pub rgba: Vec<u8>,
}

impl Preview {
    /// Decode the selected file's own bytes, downscaling large images.
    pub fn decode(file: &SelectedFile) -> Result<Self> {
        let img = image::load_from_memory(&file.bytes)?;
        let img = if img.width() > PREVIEW_MAX_EDGE || img.height() > PREVIEW_MAX_EDGE {
            img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
        } else {
            img
        };
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            file: file.id,
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Owns at most one preview resource at a time.
///
/// Storing a new entry drops the old one first, and dropping the slot drops
/// whatever it still holds. With `T = egui::TextureHandle` that frees the
/// texture, so repeated selections never accumulate GPU memory.
#[derive(Debug)]
pub struct PreviewSlot<T> {
    entry: Option<(FileId, T)>,
    released: usize,
}

impl<T> Default for PreviewSlot<T> {
    fn default() -> Self {
        Self {
            entry: None,
            released: 0,
        }
    }
}

impl<T> PreviewSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the current entry (if any) and store `value` for `file`.
    pub fn replace(&mut self, file: FileId, value: T) {
        self.clear();
        self.entry = Some((file, value));
    }

    /// Release the current entry. Returns whether something was released.
    pub fn clear(&mut self) -> bool {
        match self.entry.take() {
            Some((file, value)) => {
                drop(value);
                self.released += 1;
                tracing::debug!("Released preview for {file}");
                true
            }
            None => false,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    /// The entry, but only if it belongs to `file`.
    pub fn get_for(&self, file: FileId) -> Option<&T> {
        match &self.entry {
            Some((owner, v)) if *owner == file => Some(v),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<FileId> {
        self.entry.as_ref().map(|(f, _)| *f)
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    /// How many entries this slot has released so far.
    pub fn released(&self) -> usize {
        self.released
    }
}

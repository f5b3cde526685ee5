//! Texture upload for the selected image.

use eframe::egui;
use landcover_core::{Preview, SelectedFile};

pub(crate) type Texture = egui::TextureHandle;

/// Decode `file` and hand its pixels to the GPU. Dropping the handle frees the texture.
pub(crate) fn upload(ctx: &egui::Context, file: &SelectedFile) -> landcover_core::Result<Texture> {
    let decoded = Preview::decode(file)?;
    let color = egui::ColorImage::from_rgba_unmultiplied(decoded.size(), &decoded.rgba);
    let name = format!("preview:{}", file.id);
    Ok(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
}

/// Full-width image widget keeping the aspect ratio.
pub(crate) fn image(tex: &Texture, max_width: f32) -> egui::Image<'static> {
    let sized = egui::load::SizedTexture::from_handle(tex);
    egui::Image::from_texture(sized)
        .max_width(max_width)
        .maintain_aspect_ratio(true)
}

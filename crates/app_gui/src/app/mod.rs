//! The classifier window: one picker, one preview, one submit button, one result.

mod preview;
mod worker;

use eframe::{App, Frame, egui};
use landcover_core::session::{PREVIEW_HEADING, RESULT_HEADING};
use landcover_core::{
    ClassifierSession, Classify, IMAGE_EXTENSIONS, PreviewSlot, SelectedFile, Settled,
};
use rfd::FileDialog;
use std::path::Path;
use worker::Worker;

pub(crate) struct UiApp<C> {
    session: ClassifierSession,
    worker: Worker<C>,
    preview: PreviewSlot<preview::Texture>,
    /// Set when the selected file could not be decoded for display.
    preview_failed: bool,
}

impl<C: Classify + Send + Sync + 'static> UiApp<C> {
    pub(crate) fn new(classifier: C) -> Self {
        Self {
            session: ClassifierSession::new(),
            worker: Worker::new(classifier),
            preview: PreviewSlot::new(),
            preview_failed: false,
        }
    }

    fn choose_file(&mut self, ctx: &egui::Context) {
        let picked = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.select_path(ctx, &path);
        }
    }

    fn select_path(&mut self, ctx: &egui::Context, path: &Path) {
        let id = self.session.next_file_id();
        match SelectedFile::from_path(id, path) {
            Ok(file) => self.select(ctx, file),
            Err(e) => tracing::warn!("Could not read {}: {e}", path.display()),
        }
    }

    fn select(&mut self, ctx: &egui::Context, file: SelectedFile) {
        match preview::upload(ctx, &file) {
            Ok(tex) => {
                self.preview.replace(file.id, tex);
                self.preview_failed = false;
            }
            Err(e) => {
                tracing::warn!("No preview for {}: {e}", file.name);
                self.preview.clear();
                self.preview_failed = true;
            }
        }
        self.session.select_image(Some(file));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(first) = dropped.into_iter().next() else {
            return;
        };
        if let Some(path) = &first.path {
            self.select_path(ctx, path);
        } else if let Some(bytes) = first.bytes {
            let id = self.session.next_file_id();
            let mime = if first.mime.is_empty() {
                landcover_core::mime_for_path(Path::new(&first.name)).to_string()
            } else {
                first.mime
            };
            self.select(ctx, SelectedFile::new(id, first.name, mime, bytes));
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        if let Some(submission) = self.session.begin_submit() {
            self.worker.spawn(submission, Some(ctx.clone()));
        }
    }

    fn apply_outcomes(&mut self) {
        for (ticket, outcome) in self.worker.drain() {
            if self.session.settle(ticket, outcome) == Settled::Stale {
                tracing::debug!("Ignored late answer for {}", ticket.file);
            }
        }
    }
}

impl<C: Classify + Send + Sync + 'static> App for UiApp<C> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.apply_outcomes();
        self.handle_dropped_files(ctx);

        let view = self.session.view();

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(format!("v{}", env!("LANDCOVER_VERSION")));
                if let Some(name) = &view.file_name {
                    ui.separator();
                    ui.weak(name);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(view.title);
                ui.add_space(12.0);

                if ui
                    .add(egui::Button::new(view.upload_label).min_size(egui::vec2(200.0, 36.0)))
                    .clicked()
                {
                    self.choose_file(ctx);
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .max_height((ui.available_height() - 120.0).max(120.0))
                    .show(ui, |ui| {
                        if view.show_preview {
                            ui.add_space(12.0);
                            ui.strong(PREVIEW_HEADING);
                            let tex = view.preview_file.and_then(|id| self.preview.get_for(id));
                            match tex {
                                Some(tex) => {
                                    ui.add(preview::image(tex, ui.available_width()));
                                }
                                None if self.preview_failed => {
                                    ui.weak("Preview not available for this file");
                                }
                                None => {}
                            }
                        }
                    });

                ui.add_space(12.0);
                let submit = egui::Button::new(view.submit_label).min_size(egui::vec2(200.0, 36.0));
                if ui.add_enabled(view.submit_enabled, submit).clicked() {
                    self.submit(ctx);
                }
                if self.session.is_loading() {
                    ui.spinner();
                }

                if let Some(result) = &view.result {
                    ui.add_space(12.0);
                    ui.strong(RESULT_HEADING);
                    ui.label(
                        egui::RichText::new(result)
                            .size(18.0)
                            .color(egui::Color32::from_rgb(22, 163, 74)),
                    );
                }
            });
        });
    }
}

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_lumen::data::text::Delimiter;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – range and tag widgets
// ---------------------------------------------------------------------------

/// Render the left analysis panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    if state.pipeline.dataset().is_none() {
        ui.label("No data imported.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            range_section(ui, state);
            ui.separator();
            tag_section(ui, state);
            ui.separator();

            if ui
                .button("Raster scan → grid")
                .on_hover_text("Relabel columns as x/y pixels of a square scan")
                .clicked()
            {
                state.remap_to_grid();
            }

            if let Some(info) = &state.header_info {
                ui.separator();
                egui::CollapsingHeader::new(RichText::new("SPE header").strong())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.label(RichText::new(info).monospace());
                    });
            }
        });
}

fn range_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Range");
    let input = &mut state.range_input;
    egui::Grid::new("range_grid")
        .num_columns(3)
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            ui.label("min");
            ui.label("max");
            ui.end_row();

            ui.label("Axis");
            bound_edit(ui, &mut input.x_min);
            bound_edit(ui, &mut input.x_max);
            ui.end_row();

            ui.label("Intensity");
            bound_edit(ui, &mut input.y_min);
            bound_edit(ui, &mut input.y_max);
            ui.end_row();
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Crop").clicked() {
            state.crop();
        }
        if ui.small_button("Reset").clicked() {
            state.range_input = Default::default();
            state.crop();
        }
    });
}

fn bound_edit(ui: &mut Ui, text: &mut String) {
    ui.add(
        egui::TextEdit::singleline(text)
            .hint_text("auto")
            .desired_width(70.0),
    );
}

fn tag_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Tags");
    egui::Grid::new("tag_grid")
        .num_columns(3)
        .spacing([6.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("start");
            ui.label("final");
            ui.label("step");
            ui.end_row();

            for triple in &mut state.tag_rows {
                for field in [&mut triple.start, &mut triple.stop, &mut triple.step] {
                    ui.add(egui::TextEdit::singleline(field).desired_width(55.0));
                }
                ui.end_row();
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Apply tags").clicked() {
            state.apply_tags();
        }
        if ui.small_button("Clear").clicked() {
            state.tag_rows.iter_mut().for_each(|t| *t = Default::default());
            state.apply_tags();
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Import…").clicked() {
                import_dialog(state);
                ui.close_menu();
            }
            let loaded = state.pipeline.dataset().is_some();
            if ui.add_enabled(loaded, egui::Button::new("Export…")).clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Delimiter");
        egui::ComboBox::from_id_salt("delimiter")
            .selected_text(state.delimiter.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for d in Delimiter::ALL {
                    ui.selectable_value(&mut state.delimiter, d, d.to_string());
                }
            });

        ui.checkbox(&mut state.export_image, "Export image");

        ui.separator();

        if let Some(ctx) = state.pipeline.context() {
            let view = ctx.view();
            ui.label(format!(
                "{} file(s), {} column(s), {}/{} rows in range",
                ctx.files.len(),
                ctx.dataset.n_columns(),
                view.len(),
                ctx.dataset.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn import_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Import spectra")
        .add_filter("Supported files", &["spe", "SPE", "txt", "dat", "csv"])
        .add_filter("SPE", &["spe", "SPE"])
        .add_filter("Text", &["txt", "dat", "csv"])
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        state.import(paths);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Export into folder")
        .pick_folder();

    if let Some(dir) = dir {
        state.export(&dir);
    }
}

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader;
use crate::data::model::Dimension;
use crate::report::SummaryReport;
use crate::state::AppState;

const CLEAR_RED: Color32 = Color32::from_rgb(255, 75, 75);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the four filter dropdowns and the Clear Filters button.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    for dim in Dimension::ALL {
        // Options are rebuilt from the vocabulary each frame; it is small.
        let options = state.dataset.vocabulary.options(dim);
        let current = state.selection.display(dim);
        let mut picked: Option<usize> = None;

        ui.strong(dim.column());
        egui::ComboBox::from_id_salt(dim.column())
            .selected_text(&current)
            .width(ui.available_width())
            .show_ui(ui, |ui: &mut Ui| {
                for (i, opt) in options.iter().enumerate() {
                    // Index 0 is the wildcard; compare by position, not text.
                    let is_selected = if i == 0 {
                        is_wildcard(state, dim)
                    } else {
                        !is_wildcard(state, dim) && *opt == current
                    };
                    if ui.selectable_label(is_selected, opt).clicked() {
                        picked = Some(i);
                    }
                }
            });
        ui.add_space(6.0);

        if let Some(i) = picked {
            let value = if i == 0 { None } else { Some(options[i].as_str()) };
            state.set_filter(dim, value);
        }
    }

    ui.add_space(8.0);
    let clear =
        egui::Button::new(RichText::new("Clear Filters").color(Color32::WHITE)).fill(CLEAR_RED);
    if ui.add_enabled(!state.selection.is_cleared(), clear).clicked() {
        state.clear_filters();
    }
}

fn is_wildcard(state: &AppState, dim: Dimension) -> bool {
    match dim {
        Dimension::Disease => state.selection.disease.is_any(),
        Dimension::County => state.selection.county.is_any(),
        Dimension::Year => state.selection.year.is_any(),
        Dimension::Sex => state.selection.sex.is_any(),
    }
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Total cases, first and last reported year.
pub fn metric_cards(ui: &mut Ui, state: &AppState) {
    let cards = [
        ("Total Cases", state.result.total_label()),
        ("First Reported Year", state.result.first_year_label()),
        ("Last Reported Year", state.result.last_year_label()),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (ui, (label, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(label).color(Color32::GRAY));
                    ui.label(
                        RichText::new(value)
                            .size(26.0)
                            .strong()
                            .color(crate::color::ACCENT),
                    );
                });
            });
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
            if ui.button("Open case table…").clicked() {
                open_cases_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open county boundaries…").clicked() {
                open_boundaries_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export summary…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} rows from {}, {} counties from {} ('{}' key)",
            state.dataset.len(),
            file_name(&state.cases_path),
            state.boundaries.len(),
            file_name(&state.boundaries_path),
            state.boundaries.name_key.as_str(),
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_cases_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open case table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_cases(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} case rows from {}", dataset.len(), path.display());
                state.replace_dataset(dataset, path);
            }
            Err(e) => {
                log::error!("Failed to load case table: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn open_boundaries_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open county boundaries")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_boundaries(&path) {
            Ok(boundaries) => state.replace_boundaries(boundaries, path),
            Err(e) => {
                log::error!("Failed to load boundaries: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .add_filter("JSON", &["json"])
        .set_file_name("summary.json")
        .save_file();

    if let Some(path) = file {
        let report = SummaryReport::new(&state.selection, &state.result, &state.join);
        if let Err(e) = report.write_json(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use crate::color::{ColorScale, NO_DATA};
use crate::data::aggregate::group_thousands;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Choropleth ("Cases by County Map")
// ---------------------------------------------------------------------------

/// Shade each county polygon by its joined case total. Counties without
/// data keep the neutral fill; hovering shows the county and its total.
pub fn county_map(ui: &mut Ui, state: &AppState, height: f32) {
    ui.label(RichText::new("Cases by County Map").strong());

    let scale = ColorScale::new(state.result.max_county_cases());

    let mut plot = Plot::new("county_map")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(false)
        .show_x(false)
        .show_y(false);
    if let Some(rect) = state.boundaries.bounds() {
        plot = plot
            .include_x(rect.min().x)
            .include_x(rect.max().x)
            .include_y(rect.min().y)
            .include_y(rect.max().y);
    }

    let response = plot.show(ui, |plot_ui| {
        let hovered = plot_ui
            .pointer_coordinate()
            .and_then(|p| state.boundaries.feature_at(p.x, p.y))
            .map(|f| f.name.clone());

        for (i, feature) in state.boundaries.features.iter().enumerate() {
            let fill = state
                .join
                .cases_for(i)
                .map_or(NO_DATA, |cases| scale.color_for(cases));
            let stroke = if hovered.as_deref() == Some(feature.name.as_str()) {
                Stroke::new(2.0, Color32::BLACK)
            } else {
                Stroke::new(0.5, Color32::WHITE)
            };
            for outline in feature.outlines() {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(outline))
                        .fill_color(fill)
                        .stroke(stroke),
                );
            }
        }

        hovered
    });

    if let Some(name) = response.inner {
        let cases = state
            .boundaries
            .features
            .iter()
            .position(|f| f.name == name)
            .and_then(|i| state.join.cases_for(i));
        let text = match cases {
            Some(c) => format!("{name}: {} cases", group_thousands(c)),
            None => format!("{name}: no data"),
        };
        response.response.on_hover_text_at_pointer(text);
    }

    legend(ui, &scale);

    if !state.join.unmatched_counties.is_empty() {
        ui.label(
            RichText::new(format!(
                "Not on map: {}",
                state.join.unmatched_counties.join(", ")
            ))
            .small()
            .color(Color32::GRAY),
        );
    }
}

/// Horizontal gradient strip with the 0 and max labels.
fn legend(ui: &mut Ui, scale: &ColorScale) {
    const STOPS: usize = 24;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("0").small());
        let width = (ui.available_width() - 60.0).max(40.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 10.0), Sense::hover());
        let step = rect.width() / STOPS as f32;
        for (t, color) in scale.legend_stops(STOPS) {
            let x = rect.left() + t * (rect.width() - step);
            let cell = egui::Rect::from_min_size(
                egui::pos2(x, rect.top()),
                egui::vec2(step + 0.5, rect.height()),
            );
            ui.painter().rect_filled(cell, 0.0, color);
        }
        ui.label(RichText::new(group_thousands(scale.max())).small());
    });
}

use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

use crate::color::ACCENT;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Year charts (bar + area), both fed by `result.by_year`
// ---------------------------------------------------------------------------

/// Bar chart of cases per year ("Filtered Data Breakdown").
pub fn cases_by_year_bar(ui: &mut Ui, state: &AppState, height: f32) {
    ui.label(RichText::new("Filtered Data Breakdown").strong());

    let bars: Vec<Bar> = state
        .result
        .by_year
        .iter()
        .map(|y| Bar::new(f64::from(y.year), y.cases as f64).width(0.8))
        .collect();

    Plot::new("cases_by_year")
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Number of Cases")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Cases").color(ACCENT));
        });
}

/// Filled line of cases per year ("Cases Over Time").
pub fn cases_over_time_area(ui: &mut Ui, state: &AppState, height: f32) {
    ui.label(RichText::new("Cases Over Time").strong());

    let points: PlotPoints = state
        .result
        .by_year
        .iter()
        .map(|y| [f64::from(y.year), y.cases as f64])
        .collect();

    Plot::new("cases_over_time")
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Number of Cases")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Cases")
                    .color(ACCENT)
                    .width(2.0)
                    .fill(0.0),
            );
        });
}

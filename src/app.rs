use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::filter_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    header(ui, &self.state);
                    panels::metric_cards(ui, &self.state);
                    if self.state.result.is_empty() {
                        ui.label(
                            RichText::new("No cases match the current filters.")
                                .color(Color32::GRAY),
                        );
                    }
                    ui.add_space(12.0);

                    ui.columns(2, |cols: &mut [Ui]| {
                        plot::cases_by_year_bar(&mut cols[0], &self.state, CHART_HEIGHT);
                        map::county_map(&mut cols[1], &self.state, CHART_HEIGHT);
                    });
                    ui.add_space(12.0);

                    plot::cases_over_time_area(ui, &self.state, CHART_HEIGHT * 0.75);
                    ui.add_space(12.0);

                    table::county_table(ui, &self.state);
                });
        });
    }
}

fn header(ui: &mut Ui, state: &AppState) {
    let years = &state.dataset.vocabulary.years;
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("California Infectious Disease Dashboard");
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            ui.label(
                RichText::new(format!("Data from {first}-{last} (Provisional)"))
                    .color(Color32::GRAY),
            );
        }
    });
    ui.add_space(8.0);
}

use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::group_thousands;
use crate::data::join::title_case;
use crate::state::AppState;

/// County totals for the current selection, largest first.
pub fn county_table(ui: &mut Ui, state: &AppState) {
    ui.label(RichText::new("Cases by County").strong());

    let mut rows: Vec<(String, u64)> = state
        .result
        .by_county
        .iter()
        .map(|c| (title_case(&c.county), c.cases))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    TableBuilder::new(ui)
        .id_salt("county_table")
        .striped(true)
        .vscroll(false)
        .column(Column::remainder())
        .column(Column::auto().at_least(80.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("County");
            });
            header.col(|ui| {
                ui.strong("Cases");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let (county, cases) = &rows[row.index()];
                row.col(|ui| {
                    ui.label(county);
                });
                row.col(|ui| {
                    ui.label(group_thousands(*cases));
                });
            });
        });
}

use eframe::egui::{self, Color32, ProgressBar, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Dataset, FlowRow, StateRow};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – demographic selectors
// ---------------------------------------------------------------------------

/// Render the selector panel: one combo box per filter column, options
/// taken from the loaded data. Any change recomputes the rankings.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select Characteristics");
    ui.separator();

    let options = match &state.data {
        Some(data) => data.selector_options().clone(),
        None => {
            ui.label("No data loaded.");
            return;
        }
    };
    let Some(selection) = state.selection.as_mut() else {
        ui.label("The loaded tables have no selector values.");
        return;
    };

    let mut changed = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            changed |= selector_combo(ui, "Sex", "sex_select", &options.sexes, &mut selection.sex);
            changed |= selector_combo(
                ui,
                "Age Group",
                "age_select",
                &options.age_groups,
                &mut selection.age_group,
            );
            changed |= selector_combo(
                ui,
                "Highest Level of Education",
                "education_select",
                &options.educations,
                &mut selection.education,
            );
            changed |= selector_combo(
                ui,
                "Marital Status",
                "marital_select",
                &options.marital_statuses,
                &mut selection.marital_status,
            );
        });

    if changed {
        state.refilter();
    }
}

/// A single exact-match selector. Returns true when the selection changed.
fn selector_combo(
    ui: &mut Ui,
    label: &str,
    id: &str,
    options: &[String],
    current: &mut String,
) -> bool {
    let mut changed = false;
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                let selected = *current == *option;
                if ui.selectable_label(selected, option).clicked() && !selected {
                    *current = option.clone();
                    changed = true;
                }
            }
        });
    ui.add_space(8.0);
    changed
}

// ---------------------------------------------------------------------------
// Right side panel – ranked tables
// ---------------------------------------------------------------------------

/// Render the ranked tables: top inbound states, top outbound states, and
/// the top-10 origin→destination flows.
pub fn tables_panel(ui: &mut Ui, state: &AppState) {
    let data = match &state.data {
        Some(data) => data,
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Top Inbound States");
            ranked_state_table(
                ui,
                "top_inbound",
                "Inbound State",
                &data.inbound,
                &state.inbound_ranked,
            );
            ui.add_space(12.0);

            ui.strong("Top Outbound States");
            ranked_state_table(
                ui,
                "top_outbound",
                "Outbound State",
                &data.outbound,
                &state.outbound_ranked,
            );
            ui.add_space(12.0);

            ui.strong("Top State-to-State Flows");
            flows_table(ui, &data.flows, &state.flows_ranked);
            ui.add_space(12.0);

            about_section(ui);
        });
}

/// Full ranking of one movers table, with a progress-style count column
/// scaled to the top count.
fn ranked_state_table(
    ui: &mut Ui,
    id: &str,
    state_header: &str,
    dataset: &Dataset<StateRow>,
    ranked: &[usize],
) {
    if ranked.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }
    // First entry holds the largest count; the ranking is descending.
    let max_count = dataset.rows()[ranked[0]].count.max(1);

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(110.0))
            .column(Column::remainder())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong(state_header);
                });
                header.col(|ui| {
                    ui.strong("Count");
                });
            })
            .body(|mut body| {
                for &i in ranked {
                    let row_data = &dataset.rows()[i];
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&row_data.state);
                        });
                        row.col(|ui| {
                            let frac = row_data.count as f32 / max_count as f32;
                            ui.add(ProgressBar::new(frac).text(row_data.count.to_string()));
                        });
                    });
                }
            });
    });
}

/// The top ten origin→destination pairs for the current selection.
fn flows_table(ui: &mut Ui, dataset: &Dataset<FlowRow>, ranked: &[usize]) {
    if ranked.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }
    let max_count = dataset.rows()[ranked[0]].count.max(1);

    ui.push_id("top_flows", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(150.0))
            .column(Column::remainder())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Flow");
                });
                header.col(|ui| {
                    ui.strong("Count");
                });
            })
            .body(|mut body| {
                for &i in ranked.iter().take(10) {
                    let row_data = &dataset.rows()[i];
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&row_data.flow);
                        });
                        row.col(|ui| {
                            let frac = row_data.count as f32 / max_count as f32;
                            ui.add(ProgressBar::new(frac).text(row_data.count.to_string()));
                        });
                    });
                }
            });
    });
}

fn about_section(ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("About").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Counts are pre-aggregated ACS movers estimates.");
            ui.hyperlink_to(
                "Data: U.S. Census Bureau",
                "https://www.census.gov/programs-surveys/acs/microdata/access.html",
            );
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(data) = &state.data {
            ui.label(format!(
                "{} rows loaded, {} match the selection",
                data.total_rows(),
                state.matched_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

/// Pick a data directory holding inbound/outbound/flows tables and load it.
pub fn open_data_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data folder")
        .pick_folder();

    if let Some(dir) = folder {
        state.load_from_dir(&dir);
    }
}

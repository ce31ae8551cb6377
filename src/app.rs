use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MoverscopeApp {
    pub state: AppState,
}

impl Default for MoverscopeApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for MoverscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: demographic selectors ----
        egui::SidePanel::left("selector_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: ranked tables ----
        egui::SidePanel::right("ranking_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::tables_panel(ui, &self.state);
            });

        // ---- Central panel: ranked bar charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::movers_charts(ui, &self.state);
        });
    }
}

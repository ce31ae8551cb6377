use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::CountScale;
use crate::data::model::{Dataset, StateRow};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ranked bar charts (central panel)
// ---------------------------------------------------------------------------

/// How many states each chart shows; the full ranking lives in the tables.
const TOP_STATES: usize = 15;

/// Render the inbound and outbound charts in the central panel.
pub fn movers_charts(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.data {
        Some(data) => data,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a data folder to view movers  (File → Open data folder…)");
            });
            return;
        }
    };

    let chart_height = (ui.available_height() - 60.0).max(120.0) / 2.0;

    ui.strong("Count of Inbound Movers by Select Characteristics");
    ranked_bar_chart(
        ui,
        "inbound_chart",
        &dataset.inbound,
        &state.inbound_ranked,
        chart_height,
    );

    ui.add_space(8.0);
    ui.strong("Count of Outbound Movers by Select Characteristics");
    ranked_bar_chart(
        ui,
        "outbound_chart",
        &dataset.outbound,
        &state.outbound_ranked,
        chart_height,
    );
}

/// One bar per state, ranked left to right, filled from the red count ramp.
fn ranked_bar_chart(
    ui: &mut Ui,
    id: &str,
    dataset: &Dataset<StateRow>,
    ranked: &[usize],
    height: f32,
) {
    let top: Vec<&StateRow> = ranked
        .iter()
        .take(TOP_STATES)
        .map(|&i| &dataset.rows()[i])
        .collect();

    if top.is_empty() {
        ui.label("No rows match the current selection.");
        return;
    }

    let scale = CountScale::from_counts(top.iter().map(|row| row.count));
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(pos, row)| {
            Bar::new(pos as f64, row.count as f64)
                .width(0.7)
                .name(format!("{} ({})", row.state, row.state_code))
                .fill(scale.color_for(row.count))
        })
        .collect();

    // Tick labels: the state code under each bar, nothing between bars.
    let codes: Vec<String> = top.iter().map(|row| row.state_code.clone()).collect();

    Plot::new(id)
        .height(height)
        .y_axis_label("Count")
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_y(0.0)
        .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            codes.get(pos as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

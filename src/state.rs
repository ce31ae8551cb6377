use std::path::Path;

use crate::data::filter::{FilterSpec, RankedResult, rank};
use crate::data::loader;
use crate::data::model::MoversData;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables (None until a data directory is opened).
    pub data: Option<MoversData>,

    /// Current demographic selection. None only while no data is loaded or
    /// the outbound table has an empty selector column.
    pub selection: Option<FilterSpec>,

    /// Ranked indices per table for the current selection (cached; the
    /// presentation layer reads these every frame).
    pub inbound_ranked: RankedResult,
    pub outbound_ranked: RankedResult,
    pub flows_ranked: RankedResult,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data: None,
            selection: None,
            inbound_ranked: Vec::new(),
            outbound_ranked: Vec::new(),
            flows_ranked: Vec::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest freshly loaded tables and initialise the selection to the
    /// first value of every selector column.
    pub fn set_data(&mut self, data: MoversData) {
        self.selection = FilterSpec::first_of(data.selector_options());
        if self.selection.is_none() {
            self.status_message =
                Some("Outbound table has no selector values; nothing to display".to_string());
        } else {
            self.status_message = None;
        }
        self.data = Some(data);
        self.loading = false;
        self.refilter();
    }

    /// Recompute the three ranked results after a selection change. An
    /// empty match is a valid outcome and leaves the results empty.
    pub fn refilter(&mut self) {
        let (Some(data), Some(selection)) = (&self.data, &self.selection) else {
            self.inbound_ranked.clear();
            self.outbound_ranked.clear();
            self.flows_ranked.clear();
            return;
        };
        self.inbound_ranked = rank(&data.inbound, selection);
        self.outbound_ranked = rank(&data.outbound, selection);
        self.flows_ranked = rank(&data.flows, selection);
    }

    /// Load a data directory and swap it in, reporting failures on the
    /// status line instead of propagating.
    pub fn load_from_dir(&mut self, dir: &Path) {
        self.loading = true;
        match loader::load_dir(dir) {
            Ok(data) => {
                log::info!("Loaded {} rows from {}", data.total_rows(), dir.display());
                self.set_data(data);
            }
            Err(e) => {
                log::error!("Failed to load data directory: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Rows matching the current selection, summed over the three tables.
    pub fn matched_rows(&self) -> usize {
        self.inbound_ranked.len() + self.outbound_ranked.len() + self.flows_ranked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dataset, Demographics, FlowRow, StateRow};

    fn demo(sex: &str) -> Demographics {
        Demographics {
            sex: sex.to_string(),
            age_group: "18-24".to_string(),
            education: "BA".to_string(),
            marital_status: "Single".to_string(),
        }
    }

    fn sample_data() -> MoversData {
        let state_row = |sex: &str, code: &str, count: u64| StateRow {
            demographics: demo(sex),
            state_code: code.to_string(),
            state: format!("State {code}"),
            count,
        };
        let flow_row = |sex: &str, count: u64| FlowRow {
            demographics: demo(sex),
            origin_state_code: "06".to_string(),
            dest_state_code: "48".to_string(),
            flow: "California → Texas".to_string(),
            count,
        };
        MoversData {
            inbound: Dataset::from_rows(vec![
                state_row("Female", "06", 120),
                state_row("Female", "48", 300),
                state_row("Male", "36", 50),
            ]),
            outbound: Dataset::from_rows(vec![
                state_row("Female", "36", 80),
                state_row("Male", "06", 20),
            ]),
            flows: Dataset::from_rows(vec![flow_row("Female", 90), flow_row("Male", 10)]),
        }
    }

    #[test]
    fn set_data_selects_first_options_and_ranks() {
        let mut state = AppState::default();
        state.set_data(sample_data());

        let selection = state.selection.as_ref().unwrap();
        // Outbound table drives the options; its first sex is "Female".
        assert_eq!(selection.sex, "Female");

        assert_eq!(state.inbound_ranked.len(), 2);
        assert_eq!(state.outbound_ranked.len(), 1);
        assert_eq!(state.flows_ranked.len(), 1);
        // Texas (300) ranks above California (120).
        assert_eq!(state.inbound_ranked[0], 1);
    }

    #[test]
    fn selection_change_refilters_all_tables() {
        let mut state = AppState::default();
        state.set_data(sample_data());

        state.selection.as_mut().unwrap().sex = "Male".to_string();
        state.refilter();

        assert_eq!(state.inbound_ranked, vec![2]);
        assert_eq!(state.outbound_ranked, vec![1]);
        assert_eq!(state.flows_ranked, vec![1]);
    }

    #[test]
    fn unmatched_selection_is_empty_not_an_error() {
        let mut state = AppState::default();
        state.set_data(sample_data());

        state.selection.as_mut().unwrap().age_group = "65+".to_string();
        state.refilter();

        assert_eq!(state.matched_rows(), 0);
    }
}

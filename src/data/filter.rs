use super::model::{Dataset, Demographics, SelectorOptions, TableRow};

// ---------------------------------------------------------------------------
// FilterSpec: the selected value for each demographic column
// ---------------------------------------------------------------------------

/// One exact-match value per filter column, all applied together (logical
/// AND). Created per user interaction; the app holds one per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub sex: String,
    pub age_group: String,
    pub education: String,
    pub marital_status: String,
}

impl FilterSpec {
    /// Initial selection: the first observed value of every column, like a
    /// freshly rendered select box. `None` when any column has no values.
    pub fn first_of(options: &SelectorOptions) -> Option<FilterSpec> {
        Some(FilterSpec {
            sex: options.sexes.first()?.clone(),
            age_group: options.age_groups.first()?.clone(),
            education: options.educations.first()?.clone(),
            marital_status: options.marital_statuses.first()?.clone(),
        })
    }

    /// Whether a row's demographics satisfy all four predicates.
    pub fn matches(&self, demo: &Demographics) -> bool {
        self.sex == demo.sex
            && self.age_group == demo.age_group
            && self.education == demo.education
            && self.marital_status == demo.marital_status
    }
}

// ---------------------------------------------------------------------------
// rank: filter by spec, order by count descending
// ---------------------------------------------------------------------------

/// Indices into a dataset's rows, ordered by count descending.
pub type RankedResult = Vec<usize>;

/// Return indices of rows matching `spec`, ranked by count descending.
///
/// * A spec value absent from the dataset yields an empty result, not an
///   error.
/// * The sort is stable: rows with equal counts keep their source order.
/// * Pure function of its inputs; the dataset is never touched.
pub fn rank<R: TableRow>(dataset: &Dataset<R>, spec: &FilterSpec) -> RankedResult {
    let rows = dataset.rows();
    let mut indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| spec.matches(row.demographics()))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| rows[b].count().cmp(&rows[a].count()));
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::StateRow;

    fn demo(sex: &str, age: &str, edu: &str, marital: &str) -> Demographics {
        Demographics {
            sex: sex.to_string(),
            age_group: age.to_string(),
            education: edu.to_string(),
            marital_status: marital.to_string(),
        }
    }

    fn row(demo: Demographics, code: &str, count: u64) -> StateRow {
        StateRow {
            demographics: demo,
            state_code: code.to_string(),
            state: format!("State {code}"),
            count,
        }
    }

    fn spec(sex: &str, age: &str, edu: &str, marital: &str) -> FilterSpec {
        FilterSpec {
            sex: sex.to_string(),
            age_group: age.to_string(),
            education: edu.to_string(),
            marital_status: marital.to_string(),
        }
    }

    fn sample_dataset() -> Dataset<StateRow> {
        Dataset::from_rows(vec![
            row(demo("Female", "18-24", "BA", "Single"), "06", 120),
            row(demo("Male", "18-24", "BA", "Single"), "06", 950),
            row(demo("Female", "18-24", "BA", "Single"), "48", 300),
            row(demo("Female", "25-34", "BA", "Single"), "48", 410),
            row(demo("Female", "18-24", "BA", "Married"), "36", 75),
            row(demo("Female", "18-24", "BA", "Single"), "36", 300),
        ])
    }

    #[test]
    fn every_result_row_matches_all_four_predicates() {
        let ds = sample_dataset();
        let s = spec("Female", "18-24", "BA", "Single");
        let ranked = rank(&ds, &s);
        assert!(!ranked.is_empty());
        for &i in &ranked {
            assert!(s.matches(ds.rows()[i].demographics()));
        }
    }

    #[test]
    fn result_is_a_subset_of_the_dataset() {
        let ds = sample_dataset();
        let ranked = rank(&ds, &spec("Female", "18-24", "BA", "Single"));
        assert!(ranked.len() <= ds.len());
        let mut seen = ranked.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ranked.len(), "no index appears twice");
        assert!(ranked.iter().all(|&i| i < ds.len()));
    }

    #[test]
    fn counts_are_non_increasing() {
        let ds = sample_dataset();
        let ranked = rank(&ds, &spec("Female", "18-24", "BA", "Single"));
        for pair in ranked.windows(2) {
            assert!(ds.rows()[pair[0]].count >= ds.rows()[pair[1]].count);
        }
    }

    #[test]
    fn ties_keep_source_order() {
        // Rows 2 and 5 both count 300 and both match; row 2 comes first in
        // the source, so it must come first in the result.
        let ds = sample_dataset();
        let ranked = rank(&ds, &spec("Female", "18-24", "BA", "Single"));
        let pos_2 = ranked.iter().position(|&i| i == 2).unwrap();
        let pos_5 = ranked.iter().position(|&i| i == 5).unwrap();
        assert!(pos_2 < pos_5);
    }

    #[test]
    fn rank_is_idempotent() {
        let ds = sample_dataset();
        let s = spec("Female", "18-24", "BA", "Single");
        assert_eq!(rank(&ds, &s), rank(&ds, &s));
    }

    #[test]
    fn worked_example_orders_texas_before_california() {
        let ds = Dataset::from_rows(vec![
            row(demo("F", "18-24", "BA", "Single"), "06", 120),
            row(demo("F", "18-24", "BA", "Single"), "48", 300),
        ]);
        let ranked = rank(&ds, &spec("F", "18-24", "BA", "Single"));
        let codes: Vec<&str> = ranked
            .iter()
            .map(|&i| ds.rows()[i].state_code.as_str())
            .collect();
        assert_eq!(codes, vec!["48", "06"]);
    }

    #[test]
    fn absent_combination_yields_empty_result() {
        let ds = sample_dataset();
        let ranked = rank(&ds, &spec("Female", "65+", "BA", "Single"));
        assert!(ranked.is_empty());
    }

    #[test]
    fn empty_dataset_yields_empty_result() {
        let ds: Dataset<StateRow> = Dataset::from_rows(Vec::new());
        assert!(rank(&ds, &spec("F", "18-24", "BA", "Single")).is_empty());
    }

    #[test]
    fn first_of_picks_the_first_value_of_every_column() {
        let ds = sample_dataset();
        let first = FilterSpec::first_of(ds.options()).unwrap();
        assert_eq!(first, spec("Female", "18-24", "BA", "Single"));
    }

    #[test]
    fn first_of_is_none_for_an_empty_table() {
        let ds: Dataset<StateRow> = Dataset::from_rows(Vec::new());
        assert!(FilterSpec::first_of(ds.options()).is_none());
    }
}

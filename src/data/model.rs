// ---------------------------------------------------------------------------
// Demographics – the four selector columns shared by every table
// ---------------------------------------------------------------------------

/// The demographic attributes a row is bucketed by. Values are kept verbatim
/// as they appear in the source tables ("Female", "18-24", "Bachelor's", …).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demographics {
    pub sex: String,
    pub age_group: String,
    pub education: String,
    pub marital_status: String,
}

// ---------------------------------------------------------------------------
// Rows – one record of a movers or flows table
// ---------------------------------------------------------------------------

/// One row of the inbound or outbound movers table: how many people with the
/// given demographics moved into (or out of) `state`.
#[derive(Debug, Clone)]
pub struct StateRow {
    pub demographics: Demographics,
    /// Two-digit FIPS code, e.g. "06".
    pub state_code: String,
    /// Human-readable state name.
    pub state: String,
    pub count: u64,
}

/// One row of the flows table: movement between a specific origin and
/// destination state pair.
#[derive(Debug, Clone)]
pub struct FlowRow {
    pub demographics: Demographics,
    pub origin_state_code: String,
    pub dest_state_code: String,
    /// Human-readable pair label, e.g. "California → Texas".
    pub flow: String,
    pub count: u64,
}

/// Common access for the filter/rank pipeline, which only cares about the
/// demographic columns and the count.
pub trait TableRow {
    fn demographics(&self) -> &Demographics;
    fn count(&self) -> u64;
}

impl TableRow for StateRow {
    fn demographics(&self) -> &Demographics {
        &self.demographics
    }
    fn count(&self) -> u64 {
        self.count
    }
}

impl TableRow for FlowRow {
    fn demographics(&self) -> &Demographics {
        &self.demographics
    }
    fn count(&self) -> u64 {
        self.count
    }
}

// ---------------------------------------------------------------------------
// SelectorOptions – distinct values per filter column
// ---------------------------------------------------------------------------

/// The distinct values observed in each filter column, in first-appearance
/// order. The set of valid selections is defined by the data, never
/// hardcoded; the UI populates its combo boxes from this.
///
/// First-appearance order is deliberate: age buckets like "5-17" would sort
/// lexicographically after "18-24".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorOptions {
    pub sexes: Vec<String>,
    pub age_groups: Vec<String>,
    pub educations: Vec<String>,
    pub marital_statuses: Vec<String>,
}

impl SelectorOptions {
    fn observe(&mut self, demo: &Demographics) {
        push_unique(&mut self.sexes, &demo.sex);
        push_unique(&mut self.age_groups, &demo.age_group);
        push_unique(&mut self.educations, &demo.education);
        push_unique(&mut self.marital_statuses, &demo.marital_status);
    }

    /// True when at least one column has no observed values (empty table).
    pub fn is_empty(&self) -> bool {
        self.sexes.is_empty()
            || self.age_groups.is_empty()
            || self.educations.is_empty()
            || self.marital_statuses.is_empty()
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

// ---------------------------------------------------------------------------
// Dataset – an immutable table plus its selector metadata
// ---------------------------------------------------------------------------

/// A loaded table. Rows keep their source order; the selector options are
/// computed once at construction and cached (datasets are never modified
/// after load).
#[derive(Debug, Clone)]
pub struct Dataset<R: TableRow> {
    rows: Vec<R>,
    options: SelectorOptions,
}

impl<R: TableRow> Dataset<R> {
    pub fn from_rows(rows: Vec<R>) -> Self {
        let mut options = SelectorOptions::default();
        for row in &rows {
            options.observe(row.demographics());
        }
        Dataset { rows, options }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MoversData – the three tables of one data directory
// ---------------------------------------------------------------------------

/// Everything loaded from a data directory.
#[derive(Debug, Clone)]
pub struct MoversData {
    pub inbound: Dataset<StateRow>,
    pub outbound: Dataset<StateRow>,
    pub flows: Dataset<FlowRow>,
}

impl MoversData {
    /// Selector options driving the UI. Taken from the outbound table, which
    /// is what the source dashboard populated its select boxes from.
    pub fn selector_options(&self) -> &SelectorOptions {
        self.outbound.options()
    }

    pub fn total_rows(&self) -> usize {
        self.inbound.len() + self.outbound.len() + self.flows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn selector_options_keep_first_appearance_order() {
        let rows = vec![
            row(demo("Female", "5-17", "None", "Single"), "06", 1),
            row(demo("Male", "18-24", "High School", "Married"), "06", 2),
            row(demo("Female", "25-34", "High School", "Single"), "48", 3),
        ];
        let ds = Dataset::from_rows(rows);

        assert_eq!(ds.options().sexes, vec!["Female", "Male"]);
        // "5-17" stays first even though it sorts after "18-24" as a string.
        assert_eq!(ds.options().age_groups, vec!["5-17", "18-24", "25-34"]);
        assert_eq!(ds.options().educations, vec!["None", "High School"]);
        assert_eq!(ds.options().marital_statuses, vec!["Single", "Married"]);
    }

    #[test]
    fn selector_options_dedup_repeated_values() {
        let rows = vec![
            row(demo("Female", "18-24", "BA", "Single"), "06", 1),
            row(demo("Female", "18-24", "BA", "Single"), "48", 2),
        ];
        let ds = Dataset::from_rows(rows);
        assert_eq!(ds.options().sexes, vec!["Female"]);
        assert_eq!(ds.options().age_groups, vec!["18-24"]);
    }

    #[test]
    fn empty_dataset_has_empty_options() {
        let ds: Dataset<StateRow> = Dataset::from_rows(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.options().is_empty());
    }
}

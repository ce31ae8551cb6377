use std::fs::File;
use std::path::Path;

use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_range(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Source categories
// ---------------------------------------------------------------------------

/// (FIPS code, name, relative mover volume).
const STATES: &[(&str, &str, f64)] = &[
    ("01", "Alabama", 1.5),
    ("02", "Alaska", 0.4),
    ("04", "Arizona", 2.6),
    ("05", "Arkansas", 0.9),
    ("06", "California", 9.0),
    ("08", "Colorado", 2.2),
    ("09", "Connecticut", 1.0),
    ("10", "Delaware", 0.4),
    ("11", "District of Columbia", 0.5),
    ("12", "Florida", 7.5),
    ("13", "Georgia", 3.4),
    ("15", "Hawaii", 0.5),
    ("16", "Idaho", 0.8),
    ("17", "Illinois", 3.2),
    ("18", "Indiana", 1.9),
    ("19", "Iowa", 0.9),
    ("20", "Kansas", 0.9),
    ("21", "Kentucky", 1.3),
    ("22", "Louisiana", 1.2),
    ("23", "Maine", 0.4),
    ("24", "Maryland", 1.8),
    ("25", "Massachusetts", 1.9),
    ("26", "Michigan", 2.5),
    ("27", "Minnesota", 1.5),
    ("28", "Mississippi", 0.8),
    ("29", "Missouri", 1.8),
    ("30", "Montana", 0.4),
    ("31", "Nebraska", 0.6),
    ("32", "Nevada", 1.2),
    ("33", "New Hampshire", 0.4),
    ("34", "New Jersey", 2.3),
    ("35", "New Mexico", 0.7),
    ("36", "New York", 4.8),
    ("37", "North Carolina", 3.3),
    ("38", "North Dakota", 0.3),
    ("39", "Ohio", 3.1),
    ("40", "Oklahoma", 1.2),
    ("41", "Oregon", 1.4),
    ("42", "Pennsylvania", 3.3),
    ("44", "Rhode Island", 0.3),
    ("45", "South Carolina", 1.7),
    ("46", "South Dakota", 0.3),
    ("47", "Tennessee", 2.2),
    ("48", "Texas", 8.0),
    ("49", "Utah", 1.1),
    ("50", "Vermont", 0.2),
    ("51", "Virginia", 2.6),
    ("53", "Washington", 2.5),
    ("54", "West Virginia", 0.5),
    ("55", "Wisconsin", 1.6),
    ("56", "Wyoming", 0.2),
];

const SEXES: &[&str] = &["Female", "Male"];

const AGE_GROUPS: &[&str] = &["5-17", "18-24", "25-34", "35-44", "45-54", "55-64", "65+"];

const EDUCATIONS: &[&str] = &[
    "Less than High School",
    "High School",
    "Some College",
    "Bachelor's",
    "Graduate or Professional",
];

const MARITAL_STATUSES: &[&str] = &["Never Married", "Married", "Divorced", "Widowed"];

/// Movers skew young; weight counts by age bucket.
const AGE_WEIGHTS: &[f64] = &[0.8, 1.6, 2.0, 1.3, 0.8, 0.6, 0.5];

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct InboundRecord<'a> {
    sex: &'a str,
    age_group: &'a str,
    education: &'a str,
    marital_status: &'a str,
    current_state_code: &'a str,
    current_state: &'a str,
    count: u64,
}

#[derive(Serialize)]
struct OutboundRecord<'a> {
    sex: &'a str,
    age_group: &'a str,
    education: &'a str,
    marital_status: &'a str,
    previous_state_code: &'a str,
    previous_state: &'a str,
    count: u64,
}

#[derive(Serialize)]
struct FlowRecord<'a> {
    sex: &'a str,
    age_group: &'a str,
    education: &'a str,
    marital_status: &'a str,
    origin_state_code: &'a str,
    dest_state_code: &'a str,
    flow: String,
    count: u64,
}

/// One demographic cell of the cartesian product.
struct Cell<'a> {
    sex: &'a str,
    age_idx: usize,
    education: &'a str,
    marital_status: &'a str,
}

fn demographic_cells() -> Vec<Cell<'static>> {
    let mut cells = Vec::new();
    for &sex in SEXES {
        for age_idx in 0..AGE_GROUPS.len() {
            for &education in EDUCATIONS {
                for &marital_status in MARITAL_STATUSES {
                    cells.push(Cell {
                        sex,
                        age_idx,
                        education,
                        marital_status,
                    });
                }
            }
        }
    }
    cells
}

fn draw_count(rng: &mut SimpleRng, state_volume: f64, age_idx: usize) -> u64 {
    let mu = 180.0 * state_volume * AGE_WEIGHTS[age_idx];
    rng.gauss(mu, mu * 0.35).max(0.0).round() as u64
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).expect("Failed to create data directory");

    let cells = demographic_cells();

    // ---- inbound.csv / outbound.csv ----
    let mut inbound = csv::Writer::from_writer(
        File::create(out_dir.join("inbound.csv")).expect("Failed to create inbound.csv"),
    );
    let mut outbound = csv::Writer::from_writer(
        File::create(out_dir.join("outbound.csv")).expect("Failed to create outbound.csv"),
    );

    let mut state_rows = 0u64;
    for cell in &cells {
        for &(code, name, volume) in STATES {
            inbound
                .serialize(InboundRecord {
                    sex: cell.sex,
                    age_group: AGE_GROUPS[cell.age_idx],
                    education: cell.education,
                    marital_status: cell.marital_status,
                    current_state_code: code,
                    current_state: name,
                    count: draw_count(&mut rng, volume, cell.age_idx),
                })
                .expect("Failed to write inbound row");
            outbound
                .serialize(OutboundRecord {
                    sex: cell.sex,
                    age_group: AGE_GROUPS[cell.age_idx],
                    education: cell.education,
                    marital_status: cell.marital_status,
                    previous_state_code: code,
                    previous_state: name,
                    count: draw_count(&mut rng, volume, cell.age_idx),
                })
                .expect("Failed to write outbound row");
            state_rows += 2;
        }
    }
    inbound.flush().expect("Failed to flush inbound.csv");
    outbound.flush().expect("Failed to flush outbound.csv");

    // ---- flows_01.csv / flows_02.csv ----
    // Two shards so the loader's concatenation path sees realistic input.
    const PAIRS_PER_CELL: usize = 25;
    let mut flow_rows = 0u64;
    let half = cells.len() / 2;

    for (shard_name, shard_cells) in [
        ("flows_01.csv", &cells[..half]),
        ("flows_02.csv", &cells[half..]),
    ] {
        let mut writer = csv::Writer::from_writer(
            File::create(out_dir.join(shard_name)).expect("Failed to create flows shard"),
        );
        for cell in shard_cells {
            for _ in 0..PAIRS_PER_CELL {
                let origin = &STATES[rng.next_range(STATES.len())];
                let dest = &STATES[rng.next_range(STATES.len())];
                if origin.0 == dest.0 {
                    continue;
                }
                let volume = (origin.2 * dest.2).sqrt() * 0.2;
                writer
                    .serialize(FlowRecord {
                        sex: cell.sex,
                        age_group: AGE_GROUPS[cell.age_idx],
                        education: cell.education,
                        marital_status: cell.marital_status,
                        origin_state_code: origin.0,
                        dest_state_code: dest.0,
                        flow: format!("{} → {}", origin.1, dest.1),
                        count: draw_count(&mut rng, volume, cell.age_idx),
                    })
                    .expect("Failed to write flow row");
                flow_rows += 1;
            }
        }
        writer.flush().expect("Failed to flush flows shard");
    }

    println!(
        "Wrote {state_rows} movers rows and {flow_rows} flow rows to {}",
        out_dir.display()
    );
}

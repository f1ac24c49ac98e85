use async_trait::async_trait;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::InsightError;
use crate::models::dataset::{CellValue, Dataset, Row, PREVIEW_ROWS};
use crate::models::upload::FileHandle;
use crate::services::DatasetSource;

pub const COLUMNS: [&str; 10] = [
    "ID",
    "Name",
    "Age",
    "Gender",
    "Income",
    "Job",
    "Location",
    "Purchase Date",
    "Amount",
    "Product",
];

pub const NAMES: [&str; 5] = [
    "John Doe",
    "Jane Smith",
    "Alex Johnson",
    "Emily Brown",
    "Michael Davis",
];
pub const JOBS: [&str; 5] = ["Engineer", "Designer", "Manager", "Analyst", "Developer"];
pub const LOCATIONS: [&str; 5] = ["New York", "San Francisco", "Chicago", "Boston", "Seattle"];
pub const PRODUCTS: [&str; 5] = ["Laptop", "Phone", "Tablet", "Monitor", "Keyboard"];

/// Reported totals. These are fixed mock figures, not derived from the sample.
pub const REPORTED_ROW_COUNT: usize = 487;
pub const REPORTED_MISSING_VALUES: usize = 23;

/// Synthesizes a fixed-shape dataset after a simulated processing delay.
/// The uploaded bytes are never read.
#[derive(Clone, Debug)]
pub struct MockDatasetGenerator {
    latency: Duration,
    rng: Arc<Mutex<StdRng>>,
}

impl MockDatasetGenerator {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Same as `new` but with repeatable output
    #[cfg(test)]
    pub fn with_seed(latency: Duration, seed: u64) -> Self {
        Self {
            latency,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn build(&self) -> Result<Dataset, InsightError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to lock dataset generator rng"))?;

        let rows: Vec<Row> = (0..PREVIEW_ROWS)
            .map(|i| sample_row(&mut *rng, i as i64 + 1))
            .collect();

        Ok(Dataset::new(
            COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
            REPORTED_ROW_COUNT,
            REPORTED_MISSING_VALUES,
        ))
    }
}

fn sample_row<R: Rng>(rng: &mut R, id: i64) -> Row {
    let mut pick = |pool: &[&str]| -> CellValue {
        CellValue::Text(pool.choose(&mut *rng).copied().unwrap_or_default().to_string())
    };
    let name = pick(&NAMES);
    let job = pick(&JOBS);
    let location = pick(&LOCATIONS);
    let product = pick(&PRODUCTS);

    let gender = if rng.gen_bool(0.5) { "Male" } else { "Female" };
    let purchase_date = format!("2025-{}-{}", rng.gen_range(1..=5), rng.gen_range(1..=28));

    let mut row = Row::new();
    row.insert("ID".to_string(), CellValue::Int(id));
    row.insert("Name".to_string(), name);
    row.insert("Age".to_string(), CellValue::Int(rng.gen_range(20..60)));
    row.insert("Gender".to_string(), CellValue::Text(gender.to_string()));
    row.insert("Income".to_string(), CellValue::Int(rng.gen_range(30_000..80_000)));
    row.insert("Job".to_string(), job);
    row.insert("Location".to_string(), location);
    row.insert("Purchase Date".to_string(), CellValue::Text(purchase_date));
    row.insert("Amount".to_string(), CellValue::Int(rng.gen_range(50..550)));
    row.insert("Product".to_string(), product);
    row
}

#[async_trait]
impl DatasetSource for MockDatasetGenerator {
    async fn generate(&self, file: &FileHandle) -> Result<Dataset, InsightError> {
        info!(
            "🧪 Generating mock dataset for \"{}\" ({} bytes ignored)",
            file.name,
            file.bytes.len()
        );
        tokio::time::sleep(self.latency).await;
        self.build()
    }
}

use crate::models::chart::{ChartKind, ChartSpec, ChartStyle, Series};
use crate::models::dataset::Dataset;
use crate::services::dataset_generator::JOBS;

const GENDERS: [&str; 2] = ["Male", "Female"];
const LOAN_DEFAULTED: [f64; 2] = [18.0, 14.0];
const LOAN_REPAID: [f64; 2] = [112.0, 121.0];

const PRODUCT_SALES: [(&str, f64); 5] = [
    ("Laptop", 320.0),
    ("Phone", 275.0),
    ("Tablet", 190.0),
    ("Monitor", 140.0),
    ("Keyboard", 95.0),
];

const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const MONTHLY_REVENUE: [f64; 6] = [42_000.0, 45_500.0, 51_200.0, 48_700.0, 56_300.0, 61_800.0];

/// Age buckets as (label, lower bound inclusive, upper bound exclusive)
const AGE_BUCKETS: [(&str, i64, i64); 4] = [
    ("20-29", 20, 30),
    ("30-39", 30, 40),
    ("40-49", 40, 50),
    ("50-59", 50, 60),
];

/// Build the chart description for `kind`. Pure: the same dataset always
/// yields the same spec.
pub fn build_spec(kind: ChartKind, dataset: &Dataset) -> ChartSpec {
    match kind {
        ChartKind::LoanDefaultsByGender => ChartSpec {
            kind,
            style: ChartStyle::Bar,
            title: "Loan Defaults by Gender".to_string(),
            categories: labels(&GENDERS),
            series: vec![
                series("Defaulted", LOAN_DEFAULTED.to_vec()),
                series("Repaid", LOAN_REPAID.to_vec()),
            ],
        },
        ChartKind::TransactionsByJob => {
            let counts = JOBS
                .iter()
                .map(|job| dataset.text_column("Job").filter(|j| j == job).count() as f64)
                .collect();
            ChartSpec {
                kind,
                style: ChartStyle::Bar,
                title: "Transactions by Job Category".to_string(),
                categories: labels(&JOBS),
                series: vec![series("Transactions", counts)],
            }
        }
        ChartKind::AgeDistribution => {
            let counts = AGE_BUCKETS
                .iter()
                .map(|(_, lo, hi)| {
                    dataset
                        .int_column("Age")
                        .filter(|a| a >= lo && a < hi)
                        .count() as f64
                })
                .collect();
            ChartSpec {
                kind,
                style: ChartStyle::Histogram,
                title: "Age Distribution".to_string(),
                categories: AGE_BUCKETS.iter().map(|(label, _, _)| label.to_string()).collect(),
                series: vec![series("Customers", counts)],
            }
        }
        ChartKind::TopProducts => {
            let mut ranked = PRODUCT_SALES.to_vec();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            ChartSpec {
                kind,
                style: ChartStyle::Bar,
                title: "Top Products by Sales Volume".to_string(),
                categories: ranked.iter().map(|(p, _)| p.to_string()).collect(),
                series: vec![series("Units sold", ranked.iter().map(|(_, v)| *v).collect())],
            }
        }
        ChartKind::MonthlyRevenue => ChartSpec {
            kind,
            style: ChartStyle::Line,
            title: "Monthly Revenue".to_string(),
            categories: labels(&MONTHS),
            series: vec![series("Revenue", MONTHLY_REVENUE.to_vec())],
        },
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn series(name: &str, values: Vec<f64>) -> Series {
    Series {
        name: name.to_string(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dataset::{CellValue, Row};

    fn dataset(rows: &[(&str, i64)]) -> Dataset {
        let rows = rows
            .iter()
            .map(|(job, age)| {
                let mut row = Row::new();
                row.insert("Job".to_string(), CellValue::Text(job.to_string()));
                row.insert("Age".to_string(), CellValue::Int(*age));
                row
            })
            .collect();
        Dataset::new(vec!["Job".to_string(), "Age".to_string()], rows, 487, 23)
    }

    #[test]
    fn jobs_are_counted_from_the_sample() {
        let ds = dataset(&[("Engineer", 25), ("Manager", 33), ("Engineer", 41), ("Developer", 59)]);
        let spec = build_spec(ChartKind::TransactionsByJob, &ds);
        assert_eq!(spec.style, ChartStyle::Bar);
        assert_eq!(spec.categories, labels(&JOBS));
        assert_eq!(spec.series[0].values, vec![2.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn ages_fall_into_decade_buckets() {
        let ds = dataset(&[("Engineer", 20), ("Engineer", 29), ("Engineer", 30), ("Engineer", 59)]);
        let spec = build_spec(ChartKind::AgeDistribution, &ds);
        assert_eq!(spec.style, ChartStyle::Histogram);
        assert_eq!(spec.series[0].values, vec![2.0, 1.0, 0.0, 1.0]);
        let total: f64 = spec.series[0].values.iter().sum();
        assert_eq!(total as usize, ds.sample_rows.len());
    }

    #[test]
    fn fixed_aggregates_for_mock_charts() {
        let ds = dataset(&[]);
        let loans = build_spec(ChartKind::LoanDefaultsByGender, &ds);
        assert_eq!(loans.categories, vec!["Male", "Female"]);
        assert_eq!(loans.series.len(), 2);

        let products = build_spec(ChartKind::TopProducts, &ds);
        let values = &products.series[0].values;
        assert!(values.windows(2).all(|w| w[0] >= w[1]));

        let revenue = build_spec(ChartKind::MonthlyRevenue, &ds);
        assert_eq!(revenue.style, ChartStyle::Line);
        assert_eq!(revenue.categories.len(), revenue.series[0].values.len());
        assert_eq!(revenue.max_value(), 61_800.0);
    }

    #[test]
    fn building_twice_is_identical() {
        let ds = dataset(&[("Analyst", 44)]);
        assert_eq!(
            build_spec(ChartKind::TransactionsByJob, &ds),
            build_spec(ChartKind::TransactionsByJob, &ds)
        );
    }
}

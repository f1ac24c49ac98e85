use serde::{Deserialize, Serialize};

/// What a chart-producing reply wants drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChartKind {
    LoanDefaultsByGender,
    TransactionsByJob,
    AgeDistribution,
    TopProducts,
    MonthlyRevenue,
}

/// How the series are drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChartStyle {
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "histogram")]
    Histogram,
    #[serde(rename = "line")]
    Line,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Library-agnostic chart description. Rebuilt on every render request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub style: ChartStyle,
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// Largest value across all series, 0 for an empty chart
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

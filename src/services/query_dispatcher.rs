use log::{debug, info};

use crate::error::InsightError;
use crate::models::chart::ChartKind;
use crate::models::conversation::{ChatEntry, TablePreview};
use crate::models::dataset::{CellValue, Dataset};
use crate::models::upload::Phase;

pub const NOT_READY_MESSAGE: &str = "Please upload an Excel file first before asking questions.";
pub const FALLBACK_MESSAGE: &str = "I'm not sure how to answer that question with the current dataset. Could you try rephrasing or ask another question?";
pub const DATA_QUALITY_MESSAGE: &str = "Data Quality Summary:\n- 23 missing values detected (4.7% of the dataset)\n- Missing values are primarily in the Income (12) and Location (8) columns\n- No duplicate records found\n- 3 outliers detected in the Age column";

/// Example questions offered as suggestions
pub const EXAMPLE_QUESTIONS: [&str; 8] = [
    "What is the average income?",
    "Show me customers under 30",
    "Compare loan defaults by gender",
    "Show chart of transactions by job",
    "What's the distribution of ages?",
    "Summarize the data quality issues",
    "Which products have the highest sales?",
    "Show monthly revenue trend",
];

/// Rows shown for the "under 30" follow-up table
const UNDER_30_PREVIEW: usize = 5;

/// Represents the classified intent of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AverageIncome,
    CustomersUnder30,
    LoanDefaultsByGender,
    TransactionsByJob,
    AgeDistribution,
    DataQuality,
    TopProducts,
    MonthlyRevenue,
}

struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Evaluated top to bottom, first match wins. Several predicates overlap,
/// so the order is part of the behavior.
const RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::AverageIncome,
        matches: |q| q.contains("average income") || q.contains("avg income"),
    },
    IntentRule {
        intent: Intent::CustomersUnder30,
        matches: |q| q.contains("under 30") || q.contains("below 30"),
    },
    IntentRule {
        intent: Intent::LoanDefaultsByGender,
        matches: |q| q.contains("loan") && q.contains("gender"),
    },
    IntentRule {
        intent: Intent::TransactionsByJob,
        matches: |q| q.contains("chart") && q.contains("job"),
    },
    IntentRule {
        intent: Intent::AgeDistribution,
        matches: |q| q.contains("distribution") && q.contains("age"),
    },
    IntentRule {
        intent: Intent::DataQuality,
        matches: |q| q.contains("quality") || q.contains("missing"),
    },
    IntentRule {
        intent: Intent::TopProducts,
        matches: |q| q.contains("highest sales") || q.contains("top products"),
    },
    IntentRule {
        intent: Intent::MonthlyRevenue,
        matches: |q| q.contains("monthly") && (q.contains("revenue") || q.contains("trend")),
    },
];

/// What the dispatcher answers with
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub intent: Option<Intent>,
    pub text: String,
    pub chart: Option<ChartKind>,
    pub table: Option<TablePreview>,
}

impl Reply {
    fn text(intent: Option<Intent>, text: &str) -> Self {
        Self {
            intent,
            text: text.to_string(),
            chart: None,
            table: None,
        }
    }

    fn chart(intent: Intent, text: &str, chart: ChartKind) -> Self {
        Self {
            intent: Some(intent),
            text: text.to_string(),
            chart: Some(chart),
            table: None,
        }
    }

    pub fn to_entry(&self) -> ChatEntry {
        match (&self.table, self.chart) {
            (Some(table), _) => ChatEntry::with_table(self.text.clone(), table.clone()),
            (None, Some(_)) => ChatEntry::with_chart(self.text.clone()),
            (None, None) => ChatEntry::system(self.text.clone()),
        }
    }
}

/// Maps free text onto canned replies
#[derive(Clone, Debug, Default)]
pub struct QueryDispatcher;

impl QueryDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Classify a query against the rule table
    pub fn classify(&self, raw_text: &str) -> Result<Intent, InsightError> {
        let query = raw_text.to_lowercase();
        RULES
            .iter()
            .find(|rule| (rule.matches)(&query))
            .map(|rule| rule.intent)
            .ok_or(InsightError::UnrecognizedIntent)
    }

    /// Answer a query. The readiness check comes first and does not look
    /// at the text at all.
    pub fn dispatch(&self, raw_text: &str, dataset: Option<&Dataset>, phase: Phase) -> Reply {
        let dataset = match self.require_ready(dataset, phase) {
            Ok(dataset) => dataset,
            Err(e) => {
                debug!("Query rejected before classification: {}", e);
                return Reply::text(None, NOT_READY_MESSAGE);
            }
        };

        let intent = match self.classify(raw_text) {
            Ok(intent) => intent,
            Err(e) => {
                info!("🤷 {}: {:?}", e, raw_text);
                return Reply::text(None, FALLBACK_MESSAGE);
            }
        };
        info!("🧭 Query classified as {:?}", intent);

        match intent {
            Intent::AverageIncome => Reply::text(
                Some(intent),
                "The average income in the dataset is $42,873.",
            ),
            Intent::CustomersUnder30 => Reply {
                intent: Some(intent),
                text: "There are 142 customers under the age of 30. Here are the first 5:"
                    .to_string(),
                chart: None,
                table: Some(under_30_preview(dataset)),
            },
            Intent::LoanDefaultsByGender => Reply::chart(
                intent,
                "Here's the comparison of loan defaults by gender:",
                ChartKind::LoanDefaultsByGender,
            ),
            Intent::TransactionsByJob => Reply::chart(
                intent,
                "Here's a chart showing transactions by job category:",
                ChartKind::TransactionsByJob,
            ),
            Intent::AgeDistribution => Reply::chart(
                intent,
                "Here's the age distribution in the dataset:",
                ChartKind::AgeDistribution,
            ),
            Intent::DataQuality => Reply::text(Some(intent), DATA_QUALITY_MESSAGE),
            Intent::TopProducts => Reply::chart(
                intent,
                "Here are the top products by sales volume:",
                ChartKind::TopProducts,
            ),
            Intent::MonthlyRevenue => Reply::chart(
                intent,
                "Here's the monthly revenue trend:",
                ChartKind::MonthlyRevenue,
            ),
        }
    }

    fn require_ready<'a>(
        &self,
        dataset: Option<&'a Dataset>,
        phase: Phase,
    ) -> Result<&'a Dataset, InsightError> {
        match (phase, dataset) {
            (Phase::Ready, Some(dataset)) => Ok(dataset),
            _ => Err(InsightError::DatasetNotReady),
        }
    }
}

fn under_30_preview(dataset: &Dataset) -> TablePreview {
    let rows = dataset
        .sample_rows
        .iter()
        .filter(|row| matches!(row.get("Age"), Some(CellValue::Int(age)) if *age < 30))
        .take(UNDER_30_PREVIEW)
        .cloned()
        .collect();

    TablePreview {
        columns: dataset.columns.clone(),
        rows,
    }
}

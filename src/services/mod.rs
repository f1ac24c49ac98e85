pub mod chart_builder;
pub mod chart_sink;
pub mod conversation;
pub mod dataset_generator;
pub mod query_dispatcher;
pub mod session;
pub mod upload_simulator;

use anyhow::Result;

use crate::error::InsightError;
use crate::models::chart::ChartSpec;
use crate::models::dataset::Dataset;
use crate::models::upload::FileHandle;

/// Produces a dataset for an accepted upload. The shipped implementation is
/// a mock; a real spreadsheet reader would report
/// `MalformedSpreadsheet` or `PartialExtraction` through the same seam.
#[async_trait::async_trait]
pub trait DatasetSource: Send + Sync + 'static {
    async fn generate(&self, file: &FileHandle) -> Result<Dataset, InsightError>;
}

/// A chart currently shown in a container
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    pub svg: String,
}

/// Opaque rendering target. Rendering into a container replaces whatever
/// was there, so a container never holds more than one live chart.
pub trait ChartSink: Send + Sync + 'static {
    fn render(&self, container: &str, spec: &ChartSpec) -> Result<()>;
    fn dispose(&self, container: &str) -> Result<()>;
    fn current(&self, container: &str) -> Result<Option<RenderedChart>>;
    fn live_instances(&self) -> usize;
}

pub use chart_sink::SvgChartSink;
pub use dataset_generator::MockDatasetGenerator;
pub use session::Session;

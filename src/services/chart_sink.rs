use anyhow::{anyhow, Result};
use log::{debug, info};
use plotters::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::chart::{ChartSpec, ChartStyle};
use crate::services::{ChartSink, RenderedChart};

const CHART_SIZE: (u32, u32) = (640, 400);

/// ECharts default palette
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(84, 112, 198),
    RGBColor(145, 204, 117),
    RGBColor(250, 200, 88),
    RGBColor(238, 102, 102),
];

/// Renders chart specs to SVG and keeps one live chart per container.
#[derive(Clone, Debug, Default)]
pub struct SvgChartSink {
    containers: Arc<Mutex<HashMap<String, RenderedChart>>>,
}

impl SvgChartSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartSink for SvgChartSink {
    fn render(&self, container: &str, spec: &ChartSpec) -> Result<()> {
        let svg = draw_svg(spec)?;

        let mut containers = self
            .containers
            .lock()
            .map_err(|_| anyhow!("Failed to lock chart containers"))?;
        let replaced = containers
            .insert(
                container.to_string(),
                RenderedChart {
                    spec: spec.clone(),
                    svg,
                },
            )
            .is_some();

        info!(
            "📈 Rendered {:?} into container '{}'{}",
            spec.kind,
            container,
            if replaced { " (replaced previous chart)" } else { "" }
        );
        Ok(())
    }

    fn dispose(&self, container: &str) -> Result<()> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|_| anyhow!("Failed to lock chart containers"))?;
        if containers.remove(container).is_some() {
            debug!("🧹 Disposed chart in container '{}'", container);
        }
        Ok(())
    }

    fn current(&self, container: &str) -> Result<Option<RenderedChart>> {
        let containers = self
            .containers
            .lock()
            .map_err(|_| anyhow!("Failed to lock chart containers"))?;
        Ok(containers.get(container).cloned())
    }

    fn live_instances(&self) -> usize {
        self.containers.lock().map(|c| c.len()).unwrap_or(0)
    }
}

/// Draw a spec with plotters' SVG backend
fn draw_svg(spec: &ChartSpec) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let n = spec.categories.len().max(1);
        let y_max = (spec.max_value() * 1.1).max(1.0);
        let categories = &spec.categories;

        // categories sit on integer x positions
        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| category_label(categories, *x))
            .draw()?;

        match spec.style {
            ChartStyle::Bar | ChartStyle::Histogram => {
                let group_width = if spec.style == ChartStyle::Histogram { 1.0 } else { 0.8 };
                let bar_width = group_width / spec.series.len().max(1) as f64;

                for (j, series) in spec.series.iter().enumerate() {
                    let color = SERIES_COLORS[j % SERIES_COLORS.len()];
                    let offset = -group_width / 2.0 + j as f64 * bar_width;
                    chart
                        .draw_series(series.values.iter().enumerate().map(|(i, v)| {
                            let left = i as f64 + offset;
                            Rectangle::new([(left, 0.0), (left + bar_width, *v)], color.filled())
                        }))?
                        .label(series.name.clone())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                        });
                }
            }
            ChartStyle::Line => {
                for (j, series) in spec.series.iter().enumerate() {
                    let color = SERIES_COLORS[j % SERIES_COLORS.len()];
                    let points: Vec<(f64, f64)> = series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (i as f64, *v))
                        .collect();
                    chart
                        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                        .label(series.name.clone())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
                    chart.draw_series(
                        points
                            .into_iter()
                            .map(|p| Circle::new(p, 3, color.filled())),
                    )?;
                }
            }
        }

        if spec.series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
    }
    Ok(svg)
}

fn category_label(categories: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories.get(rounded as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::ChartKind;
    use crate::models::dataset::Dataset;
    use crate::services::chart_builder::build_spec;

    fn empty_dataset() -> Dataset {
        Dataset::new(vec![], vec![], 487, 23)
    }

    #[test]
    fn every_chart_kind_renders_to_svg() {
        let sink = SvgChartSink::new();
        for kind in [
            ChartKind::LoanDefaultsByGender,
            ChartKind::TransactionsByJob,
            ChartKind::AgeDistribution,
            ChartKind::TopProducts,
            ChartKind::MonthlyRevenue,
        ] {
            let spec = build_spec(kind, &empty_dataset());
            sink.render("chart", &spec).unwrap();
            let live = sink.current("chart").unwrap().unwrap();
            assert_eq!(live.spec, spec);
            assert!(live.svg.contains("<svg"));
        }
        assert_eq!(sink.live_instances(), 1);
    }

    #[test]
    fn rendering_same_spec_twice_keeps_one_instance() {
        let sink = SvgChartSink::new();
        let spec = build_spec(ChartKind::TopProducts, &empty_dataset());
        sink.render("chart", &spec).unwrap();
        let first = sink.current("chart").unwrap().unwrap();
        sink.render("chart", &spec).unwrap();
        let second = sink.current("chart").unwrap().unwrap();

        assert_eq!(sink.live_instances(), 1);
        assert_eq!(first.svg, second.svg);
    }

    #[test]
    fn dispose_releases_the_container() {
        let sink = SvgChartSink::new();
        let spec = build_spec(ChartKind::MonthlyRevenue, &empty_dataset());
        sink.render("chart", &spec).unwrap();
        sink.dispose("chart").unwrap();
        assert_eq!(sink.live_instances(), 0);
        assert!(sink.current("chart").unwrap().is_none());
        // disposing an empty container is fine
        sink.dispose("chart").unwrap();
    }

    #[test]
    fn labels_only_on_whole_positions() {
        let cats = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_label(&cats, 0.0), "A");
        assert_eq!(category_label(&cats, 1.0), "B");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
        assert_eq!(category_label(&cats, -0.5), "");
    }
}

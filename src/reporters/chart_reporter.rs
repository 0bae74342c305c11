use std::{
    fs,
    path::{Path, PathBuf},
};

use plotters::{drawing::DrawingAreaErrorKind, prelude::*};

use crate::{config::ChartOptions, error::ReportError, model::movie_table::MovieTable};

pub const DISTRIBUTION_CHART: &str = "rating_distribution.svg";
pub const TOP_RATED_CHART: &str = "top_10_by_rating.svg";
pub const DECADE_CHART: &str = "average_rating_by_decade.svg";

type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

pub struct ChartReporter {}

impl ChartReporter {
    /// Renders the three summary charts of `movies` into `chart_dir` and
    /// returns their paths in display order.
    pub fn render_all(
        movies: &MovieTable,
        chart_dir: &Path,
        options: &ChartOptions,
    ) -> Result<Vec<PathBuf>, ReportError> {
        log::info!("Generating visualizations...");
        fs::create_dir_all(chart_dir)?;

        let charts = vec![
            ChartReporter::render_rating_distribution(movies, &chart_dir.join(DISTRIBUTION_CHART), options)?,
            ChartReporter::render_top_rated(movies, &chart_dir.join(TOP_RATED_CHART), options)?,
            ChartReporter::render_decade_trend(movies, &chart_dir.join(DECADE_CHART), options)?,
        ];

        log::info!("Visualization complete!");
        Ok(charts)
    }

    pub fn render_rating_distribution(
        movies: &MovieTable,
        path: &Path,
        options: &ChartOptions,
    ) -> Result<PathBuf, ReportError> {
        let histogram = movies.rating_histogram(options.histogram_bins);
        let (low, high) = histogram.range().unwrap_or((0.0, 10.0));
        let density = movies.rating_density(low, high, histogram.bin_width(), options.density_samples);
        let y_max = density
            .iter()
            .map(|(_, y)| *y)
            .fold(histogram.max_count() as f64, f64::max)
            .max(1.0)
            * 1.1;

        let draw = || -> DrawResult {
            let root = SVGBackend::new(path, options.distribution_size).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Distribution of IMDb Ratings", CAPTION_FONT)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(low..high, 0f64..y_max)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Rating")
                .y_desc("Number of Movies")
                .draw()?;

            chart.draw_series(histogram.bins.iter().map(|bin| {
                Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], BLUE.mix(0.5).filled())
            }))?;
            if !density.is_empty() {
                chart.draw_series(LineSeries::new(density.iter().copied(), BLUE.stroke_width(2)))?;
            }

            root.present()
        };

        ChartReporter::finish("rating distribution", path, draw())
    }

    pub fn render_top_rated(
        movies: &MovieTable,
        path: &Path,
        options: &ChartOptions,
    ) -> Result<PathBuf, ReportError> {
        let top = movies.top_n(options.top_n);
        for movie in &top {
            log::info!(
                "#{} {} ({}) {}",
                movie.rank,
                movie.title,
                movie.year,
                movie.rating.unwrap_or_default()
            );
        }

        let slots = top.len().max(1) as i32;
        let x_max = top.iter().filter_map(|m| m.rating).fold(10.0, f64::max);
        // best rated on top
        let title_at = |slot: i32| -> String {
            top.get((slots - 1 - slot) as usize)
                .map(|m| m.title.clone())
                .unwrap_or_default()
        };

        let draw = || -> DrawResult {
            let root = SVGBackend::new(path, options.top_size).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("Top {} IMDb Movies by Rating", options.top_n), CAPTION_FONT)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(320)
                .build_cartesian_2d(0f64..x_max, (0..slots).into_segmented())?;
            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(slots as usize)
                .y_label_formatter(&|value| match value {
                    SegmentValue::CenterOf(slot) => title_at(*slot),
                    _ => String::new(),
                })
                .x_desc("Rating")
                .y_desc("Movie Title")
                .draw()?;

            chart.draw_series(top.iter().enumerate().map(|(i, movie)| {
                let slot = slots - 1 - i as i32;
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(slot)),
                        (movie.rating.unwrap_or_default(), SegmentValue::Exact(slot + 1)),
                    ],
                    GREEN.mix(0.7).filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            }))?;

            root.present()
        };

        ChartReporter::finish("top rated", path, draw())
    }

    pub fn render_decade_trend(
        movies: &MovieTable,
        path: &Path,
        options: &ChartOptions,
    ) -> Result<PathBuf, ReportError> {
        let averages = movies.decade_averages();
        let (first, last) = match (averages.first(), averages.last()) {
            (Some((first, _)), Some((last, _))) => (*first, *last),
            _ => (1920, 2020),
        };
        let (y_low, y_high) = if averages.is_empty() {
            (0.0, 10.0)
        } else {
            let low = averages.iter().map(|(_, r)| *r).fold(f64::INFINITY, f64::min);
            let high = averages.iter().map(|(_, r)| *r).fold(f64::NEG_INFINITY, f64::max);
            (low - 0.2, high + 0.2)
        };

        let draw = || -> DrawResult {
            let root = SVGBackend::new(path, options.decade_size).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Average IMDb Rating by Decade", CAPTION_FONT)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d((first - 5)..(last + 5), y_low..y_high)?;
            chart
                .configure_mesh()
                .x_desc("Decade")
                .y_desc("Average Rating")
                .draw()?;

            chart.draw_series(LineSeries::new(averages.iter().copied(), RED.stroke_width(2)))?;
            chart.draw_series(
                averages
                    .iter()
                    .map(|(decade, rating)| Circle::new((*decade, *rating), 4, RED.filled())),
            )?;

            root.present()
        };

        ChartReporter::finish("decade trend", path, draw())
    }

    fn finish(chart: &str, path: &Path, drawn: DrawResult) -> Result<PathBuf, ReportError> {
        drawn.map_err(|e| ReportError::Render {
            chart: chart.to_string(),
            message: e.to_string(),
        })?;
        log::info!("Rendered {} chart to {}", chart, path.display());
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::movie::Movie;

    fn table(count: u32) -> MovieTable {
        (1..=count)
            .map(|i| Movie {
                rank: i,
                title: format!("Movie {}", i),
                year: (1950 + i * 4).to_string(),
                rating: Some(9.5 - i as f64 * 0.1),
            })
            .collect()
    }

    #[test]
    fn renders_all_charts_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let chart_dir = dir.path().join("charts");

        let charts = ChartReporter::render_all(&table(15), &chart_dir, &ChartOptions::default()).unwrap();

        assert_eq!(
            charts,
            vec![
                chart_dir.join(DISTRIBUTION_CHART),
                chart_dir.join(TOP_RATED_CHART),
                chart_dir.join(DECADE_CHART),
            ]
        );
        for chart in &charts {
            assert!(fs::read_to_string(chart).unwrap().contains("<svg"));
        }
    }

    #[test]
    fn top_rated_chart_labels_only_the_best_titles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOP_RATED_CHART);

        ChartReporter::render_top_rated(&table(15), &path, &ChartOptions::default()).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Top 10 IMDb Movies by Rating"));
        assert!(!svg.contains("Movie 11<"));
        assert!(!svg.contains("Movie 15<"));
    }

    #[test]
    fn renders_empty_table_without_failing() {
        let dir = tempfile::tempdir().unwrap();

        let charts = ChartReporter::render_all(&MovieTable::new(), dir.path(), &ChartOptions::default()).unwrap();

        assert_eq!(charts.len(), 3);
        assert!(charts.iter().all(|c| c.exists()));
    }
}

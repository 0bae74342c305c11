use std::path::PathBuf;

mod clients;

pub mod config;
use config::ScraperConfig;

pub mod error;
use error::Result;

pub mod extractors;
use extractors::movie_extractor::MovieExtractor;

mod fetchers;
use fetchers::top_chart_fetcher::TopChartFetcher;

pub mod model;

mod persisters;
use persisters::csv_writer::CsvWriter;

mod reporters;
use reporters::chart_reporter::ChartReporter;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// List entries located on the page.
    pub found: usize,
    pub accepted: usize,
    /// Entries discarded for a non-numeric rank.
    pub dropped: usize,
    pub rows_written: usize,
    pub csv_path: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Scrapes the chart page in a headless browser, then saves and charts it.
pub async fn run(config: ScraperConfig) -> Result<RunSummary> {
    let html = TopChartFetcher::fetch_rendered_page(&config).await?;

    process_rendered_page(&html, &config)
}

/// Extracts the movies out of an already rendered chart page, writes them to
/// the configured CSV file and renders the summary charts.
pub fn process_rendered_page(html: &str, config: &ScraperConfig) -> Result<RunSummary> {
    let extraction = MovieExtractor::extract_movies_from_html(html, &config.selectors);
    log::info!(
        "Data extraction completed: {} of {} entries accepted, {} dropped",
        extraction.movies.len(),
        extraction.found,
        extraction.dropped
    );

    let rows_written = CsvWriter::save_movies_to_csv(&extraction.movies, &config.output_path)?;
    let charts = ChartReporter::render_all(&extraction.movies, &config.chart_dir, &config.charts)?;

    Ok(RunSummary {
        found: extraction.found,
        accepted: extraction.movies.len(),
        dropped: extraction.dropped,
        rows_written,
        csv_path: config.output_path.clone(),
        charts,
    })
}

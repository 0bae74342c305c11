use std::process;

use imdbtop2csv::config::ScraperConfig;

mod logging;

#[tokio::main]
async fn main() {
    logging::setup_logging();

    match imdbtop2csv::run(ScraperConfig::default()).await {
        Ok(summary) => log::info!(
            "Finished! {} movies saved to {}, charts written to {:?}",
            summary.rows_written,
            summary.csv_path.display(),
            summary.charts
        ),
        Err(e) => {
            log::error!("Scrape failed: {}", e);
            process::exit(1);
        }
    }
}

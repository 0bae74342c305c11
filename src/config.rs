use std::{path::PathBuf, time::Duration};

use select::predicate::{And, Class, Name};

pub const TOP_CHART_URL: &str = "https://www.imdb.com/chart/top/";
pub const OUTPUT_FILE_NAME: &str = "imdb_top_250_final.csv";
pub const CHART_DIR: &str = "charts";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/119.0.6045.105 Safari/537.36";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub url: String,
    pub output_path: PathBuf,
    pub chart_dir: PathBuf,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub browser: BrowserOptions,
    pub selectors: PageSelectors,
    pub charts: ChartOptions,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: TOP_CHART_URL.to_string(),
            output_path: PathBuf::from(OUTPUT_FILE_NAME),
            chart_dir: PathBuf::from(CHART_DIR),
            wait_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
            browser: BrowserOptions::default(),
            selectors: PageSelectors::default(),
            charts: ChartOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub viewport: (u32, u32),
    pub user_agent: String,
    pub hide_automation: bool,
    pub extra_args: Vec<String>,
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: (1920, 1080),
            user_agent: USER_AGENT.to_string(),
            hide_automation: true,
            extra_args: vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
            ],
            chrome_executable: None,
        }
    }
}

/// `tag.class`, queried as CSS in the browser and as a `select` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSelector {
    pub tag: &'static str,
    pub class: &'static str,
}

impl ElementSelector {
    pub const fn new(tag: &'static str, class: &'static str) -> Self {
        Self { tag, class }
    }

    pub fn css(&self) -> String {
        format!("{}.{}", self.tag, self.class)
    }

    pub fn predicate(&self) -> And<Name<&'static str>, Class<&'static str>> {
        And(Name(self.tag), Class(self.class))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSelectors {
    pub entry: ElementSelector,
    pub title: ElementSelector,
    // first match is the release year
    pub year: ElementSelector,
    pub rating: ElementSelector,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            entry: ElementSelector::new("li", "ipc-metadata-list-summary-item"),
            title: ElementSelector::new("h3", "ipc-title__text"),
            year: ElementSelector::new("span", "cli-title-metadata-item"),
            rating: ElementSelector::new("span", "ipc-rating-star--rating"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub histogram_bins: usize,
    pub density_samples: usize,
    pub top_n: usize,
    pub distribution_size: (u32, u32),
    pub top_size: (u32, u32),
    pub decade_size: (u32, u32),
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            density_samples: 200,
            top_n: 10,
            distribution_size: (1000, 500),
            top_size: (1000, 600),
            decade_size: (1000, 500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_top_chart() {
        let config = ScraperConfig::default();

        assert_eq!(config.url, "https://www.imdb.com/chart/top/");
        assert_eq!(config.output_path, PathBuf::from("imdb_top_250_final.csv"));
        assert_eq!(config.wait_timeout, Duration::from_secs(15));
        assert_eq!(config.charts.histogram_bins, 20);
        assert_eq!(config.charts.top_n, 10);
    }

    #[test]
    fn selectors_render_as_css() {
        let selectors = PageSelectors::default();

        assert_eq!(selectors.entry.css(), "li.ipc-metadata-list-summary-item");
        assert_eq!(selectors.rating.css(), "span.ipc-rating-star--rating");
    }
}

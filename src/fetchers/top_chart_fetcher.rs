use std::{future::Future, time::Duration};

use chromiumoxide::Page;
use tokio_retry::{strategy::FixedInterval, RetryIf};

use crate::{clients::browser_client::BrowserSession, config::ScraperConfig, error::FetchError};

/// Outcome of one look for the list entries.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadyCheck {
    /// Nothing matched yet, worth asking again.
    Pending(String),
    /// The page can no longer be queried.
    Failed(String),
}

/// A browser session able to produce the rendered chart page.
pub(crate) trait ChartSession {
    async fn load_rendered_html(&self, config: &ScraperConfig) -> Result<String, FetchError>;

    async fn close(self);
}

impl ChartSession for BrowserSession {
    async fn load_rendered_html(&self, config: &ScraperConfig) -> Result<String, FetchError> {
        let page = self.open(&config.url).await?;
        let found = TopChartFetcher::wait_for_entries(&page, config).await?;
        log::info!("Found {} movie entries", found);

        page.content().await.map_err(FetchError::Snapshot)
    }

    async fn close(self) {
        BrowserSession::close(self).await
    }
}

pub struct TopChartFetcher {}

impl TopChartFetcher {
    pub async fn fetch_rendered_page(config: &ScraperConfig) -> Result<String, FetchError> {
        log::info!("Fetching top chart from {}, please wait", config.url);

        let session = BrowserSession::launch(&config.browser).await?;
        TopChartFetcher::fetch_with_session(session, config).await
    }

    /// Reads the page through `session` and closes it afterwards, whatever
    /// the outcome of the read.
    pub(crate) async fn fetch_with_session<S: ChartSession>(
        session: S,
        config: &ScraperConfig,
    ) -> Result<String, FetchError> {
        let rendered = session.load_rendered_html(config).await;
        session.close().await;

        rendered
    }

    async fn wait_for_entries(page: &Page, config: &ScraperConfig) -> Result<usize, FetchError> {
        let selector = config.selectors.entry.css();
        TopChartFetcher::poll_until_ready(
            || TopChartFetcher::count_entries(page, selector.as_str()),
            &selector,
            config.wait_timeout,
            config.poll_interval,
        )
        .await
    }

    async fn count_entries(page: &Page, selector: &str) -> Result<usize, ReadyCheck> {
        match page.find_elements(selector).await {
            Ok(elements) if !elements.is_empty() => Ok(elements.len()),
            Ok(_) => Err(ReadyCheck::Pending(format!("no element matches {}", selector))),
            Err(e) => Err(ReadyCheck::Failed(e.to_string())),
        }
    }

    /// Runs `probe` every `interval` until it finds entries, giving up after
    /// `timeout`. A failed probe ends the wait right away.
    pub async fn poll_until_ready<F, Fut>(
        probe: F,
        selector: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<usize, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<usize, ReadyCheck>>,
    {
        let attempts = (timeout.as_millis() / interval.as_millis().max(1)) as usize + 1;
        let strategy = FixedInterval::new(interval).take(attempts);
        let polling = RetryIf::spawn(strategy, probe, |check: &ReadyCheck| {
            matches!(check, ReadyCheck::Pending(_))
        });

        match tokio::time::timeout(timeout, polling).await {
            Ok(Ok(found)) => Ok(found),
            Ok(Err(ReadyCheck::Failed(message))) => Err(FetchError::Query {
                selector: selector.to_string(),
                message,
            }),
            Ok(Err(ReadyCheck::Pending(last))) => {
                log::debug!("Gave up waiting for page: {}", last);
                Err(FetchError::Timeout {
                    selector: selector.to_string(),
                    waited: timeout,
                })
            }
            Err(_) => Err(FetchError::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            }),
        }
    }
}

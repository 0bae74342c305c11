use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    handler::viewport::Viewport,
    Page,
};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::{config::BrowserOptions, error::FetchError};

const HIDE_WEBDRIVER_FLAG: &str = "--disable-blink-features=AutomationControlled";

/// A launched browser and the task pumping its devtools connection.
/// Must be released with [`BrowserSession::close`].
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    options: BrowserOptions,
}

impl BrowserSession {
    pub async fn launch(options: &BrowserOptions) -> Result<Self, FetchError> {
        let config = BrowserSession::build_config(options)?;

        log::debug!("Launching browser with {:?}", options);
        let (browser, mut handler) = Browser::launch(config).await.map_err(FetchError::Launch)?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::warn!("Browser handler error: {}", e);
                }
            }
            log::debug!("Browser handler task ended");
        });

        Ok(Self {
            browser,
            handler_task,
            options: options.clone(),
        })
    }

    pub fn build_config(options: &BrowserOptions) -> Result<BrowserConfig, FetchError> {
        let (width, height) = options.viewport;
        let mut builder = BrowserConfig::builder()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            });

        if !options.headless {
            builder = builder.with_head();
        }

        if options.hide_automation {
            // the driver's defaults include --enable-automation
            builder = builder.disable_default_args().arg(HIDE_WEBDRIVER_FLAG);
        }

        for arg in &options.extra_args {
            builder = builder.arg(arg.as_str());
        }

        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(FetchError::Config)
    }

    /// Opens a tab carrying the configured user agent and navigates it to `url`.
    pub async fn open(&self, url: &str) -> Result<Page, FetchError> {
        let navigation_error = |source| FetchError::Navigation {
            url: url.to_string(),
            source,
        };

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(navigation_error)?;
        page.set_user_agent(self.options.user_agent.as_str())
            .await
            .map_err(navigation_error)?;
        page.goto(url).await.map_err(navigation_error)?;

        Ok(page)
    }

    /// Shuts the browser down. Failures are logged, the process is gone either way.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            log::warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            log::warn!("Failed waiting for browser process to exit: {}", e);
        }
        if let Err(e) = self.handler_task.await {
            log::warn!("Browser handler task panicked: {}", e);
        }
        log::debug!("Browser session released");
    }
}

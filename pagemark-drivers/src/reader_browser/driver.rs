use crate::reader_browser::{page::RenderedPage, FetchOptions};
use fantoccini::ClientBuilder;
use pagemark_common::Result;
use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct PageDriver {
    pub client: fantoccini::Client,
    options: FetchOptions,
}

impl PageDriver {
    /// Create a new driver connected to a running WebDriver service.
    ///
    /// Default: connects to `http://localhost:9515` (Chromedriver).
    pub async fn connect(options: FetchOptions) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();

        let mut args = vec![
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
        ];
        if options.headless {
            args.push("--headless".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));

        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .map_err(anyhow::Error::from)?;

        Ok(Self { client, options })
    }

    /// Navigate to `url` and return a [`RenderedPage`] once the page has
    /// settled within the configured deadline.
    pub async fn goto(&mut self, url: &str) -> Result<RenderedPage> {
        let mut page = RenderedPage::new(
            self.client.clone(),
            self.options.settle,
            self.options.deadline,
        );
        page.goto(url).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await.map_err(anyhow::Error::from)?;
        Ok(())
    }
}

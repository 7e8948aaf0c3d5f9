//! One-shot fetch helpers.
//!
//! Each helper opens a fresh browser session and closes it again whether
//! the fetch succeeds or fails; a wedged page must not leak sessions on
//! the WebDriver host.

use crate::reader_browser::{driver::PageDriver, FetchOptions};
use pagemark_common::Result;
use pagemark_sanitize::{clean_html, SanitizeOptions};
use url::Url;

/// Fetch `url` and return the rendered HTML source.
pub async fn fetch_rendered_html(url: &Url, options: &FetchOptions) -> Result<String> {
    let mut driver = PageDriver::connect(options.clone()).await?;
    let outcome = navigate_and_read(&mut driver, url).await;
    // Close the session before propagating any error.
    if let Err(e) = driver.close().await {
        tracing::warn!("failed to close browser session: {e}");
    }
    outcome
}

async fn navigate_and_read(driver: &mut PageDriver, url: &Url) -> Result<String> {
    let page = driver.goto(url.as_str()).await?;
    page.content().await
}

/// Fetch `url` and run the sanitizer over the rendered HTML.
pub async fn fetch_and_clean(
    url: &Url,
    options: &FetchOptions,
    sanitize: &SanitizeOptions,
) -> Result<String> {
    let html = fetch_rendered_html(url, options).await?;
    tracing::debug!(raw_len = html.len(), "fetched rendered page");
    Ok(clean_html(&html, sanitize))
}

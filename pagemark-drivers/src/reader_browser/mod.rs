pub mod driver;
pub mod page;

use std::time::Duration;

/// Connection and settling parameters for a fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// WebDriver endpoint to connect to (chromedriver by default).
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Quiet window with no new network resources before the page counts
    /// as settled.
    pub settle: Duration,
    /// Hard deadline for navigation plus settling.
    pub deadline: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            settle: Duration::from_millis(500),
            deadline: Duration::from_secs(30),
        }
    }
}

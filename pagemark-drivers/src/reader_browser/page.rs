use fantoccini::Client;
use pagemark_common::{PagemarkError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

// readyState and the resource-timing count in one round trip.
const SETTLE_PROBE: &str =
    "return [document.readyState, performance.getEntriesByType('resource').length];";

/// A navigated page whose network activity has settled.
pub struct RenderedPage {
    client: Client,
    settle: Duration,
    deadline: Duration,
}

impl RenderedPage {
    pub(crate) fn new(client: Client, settle: Duration, deadline: Duration) -> Self {
        Self {
            client,
            settle,
            deadline,
        }
    }

    /// Navigate to `url` and wait for the page to settle.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(anyhow::Error::from)?;
        self.wait_until_settled().await
    }

    /// Wait until the document is complete and no new network resources
    /// have appeared for the configured quiet window. The whole wait is
    /// bounded by the deadline; exhausting it is [`PagemarkError::Timeout`].
    async fn wait_until_settled(&self) -> Result<()> {
        let deadline = Instant::now() + self.deadline;
        let mut quiet_since = Instant::now();
        let mut last_resources: Option<u64> = None;

        loop {
            let probe = self
                .client
                .execute(SETTLE_PROBE, vec![])
                .await
                .map_err(anyhow::Error::from)?;

            let complete = probe.get(0).and_then(|v| v.as_str()) == Some("complete");
            let resources = probe.get(1).and_then(|v| v.as_u64());

            if !complete || resources != last_resources {
                last_resources = resources;
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= self.settle {
                tracing::debug!(?resources, "page settled");
                return Ok(());
            }

            if Instant::now() + POLL_INTERVAL >= deadline {
                return Err(PagemarkError::Timeout);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Return the full rendered page HTML source.
    pub async fn content(&self) -> Result<String> {
        Ok(self.client.source().await.map_err(anyhow::Error::from)?)
    }

    /// Return the page title.
    pub async fn title(&self) -> Result<String> {
        Ok(self.client.title().await.map_err(anyhow::Error::from)?)
    }
}

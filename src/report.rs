use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

const POST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget reporting of the current count to a remote endpoint.
///
/// Posting never fails from the caller's point of view: network and HTTP
/// errors are logged and swallowed. An unset URL skips the request entirely.
pub struct Reporter {
    client: Client,
    url: String,
    field: String,
}

impl Reporter {
    pub fn new(url: &str, field: &str) -> Result<Self> {
        let client = Client::builder().timeout(POST_TIMEOUT).build()?;

        Ok(Reporter {
            client,
            url: url.to_string(),
            field: field.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Post `{field: count}` as a URL-encoded form, best effort.
    pub async fn post(&self, count: u64) {
        if !self.is_configured() {
            log::warn!("report URL is not configured, skipping post");
            return;
        }

        let form = [(self.field.as_str(), count.to_string())];
        match self.client.post(&self.url).form(&form).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    log::info!("posted count {} to {}", count, self.url);
                } else {
                    log::error!("count report rejected: HTTP {}", status);
                }
            }
            Err(e) => log::error!("failed to post count: {}", e),
        }
    }
}

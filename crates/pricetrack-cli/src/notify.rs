//! Price-change alerts over a Discord-style webhook.

use tracing::{info, warn};

use crate::scan::ChangeNotifier;

pub struct Notifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl Notifier {
    #[must_use]
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    /// Posts `message` to the webhook. Without a configured URL this is a
    /// dry run and the message is only logged. Failures are logged and
    /// swallowed; alerting must never take the pipeline down.
    async fn send(&self, message: &str) {
        let Some(url) = &self.webhook_url else {
            info!(message, "notification (dry run)");
            return;
        };

        let payload = serde_json::json!({ "content": message });
        let result = self.client.post(url).json(&payload).send().await;
        match result {
            Ok(response) if !response.status().is_success() => {
                warn!(status = %response.status(), "webhook rejected notification");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "failed to send notification"),
        }
    }
}

impl ChangeNotifier for Notifier {
    async fn notify_change(&self, product_name: &str, old_price: f64, new_price: f64) {
        let message = format!(
            "Price alert: {product_name} changed from ${old_price:.2} to ${new_price:.2}"
        );
        self.send(&message).await;
    }
}

//! SNS topic notifications

use aws_sdk_sns::Client;
use tracing::info;

use super::{Notification, NotificationSink, PublishReceipt};
use crate::error::{from_sdk_error, RelayError, RelayResult};

/// Publishes to one SNS topic. Build once per process and share it.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig, topic_arn: impl Into<String>) -> Self {
        Self::new(Client::new(sdk_config), topic_arn)
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

impl NotificationSink for SnsNotifier {
    async fn publish(&self, notification: &Notification) -> RelayResult<PublishReceipt> {
        if self.topic_arn.is_empty() {
            return Err(RelayError::Configuration("SNS_TOPIC_ARN is not set".to_string()));
        }

        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(&notification.subject)
            .message(&notification.message)
            .send()
            .await
            .map_err(|e| from_sdk_error("Publish", e))?;

        let receipt = PublishReceipt {
            message_id: output.message_id().map(str::to_string),
            sequence_number: output.sequence_number().map(str::to_string),
        };

        info!(topic = %self.topic_arn, message_id = ?receipt.message_id, "published notification");

        Ok(receipt)
    }
}

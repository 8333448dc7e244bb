//! Notifications module
//!
//! Provides:
//! - The `NotificationSink` trait the pipeline publishes through
//! - SNS topic delivery

mod sns;

pub use sns::SnsNotifier;

use serde::Serialize;
use std::future::Future;

use crate::error::RelayResult;

/// Build the notification subject for a repository
pub fn build_subject(repository: &str) -> String {
    format!("CodeCommit Update - Repository: {}", repository)
}

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

impl Notification {
    pub fn for_repository(repository: &str, message: String) -> Self {
        Self {
            subject: build_subject(repository),
            message,
        }
    }
}

/// Delivery acknowledgment from the notification service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub message_id: Option<String>,
    /// Only set for FIFO topics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// Where rendered reports are delivered
pub trait NotificationSink: Send + Sync {
    fn publish(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = RelayResult<PublishReceipt>> + Send;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording sink used by the pipeline tests

    use std::sync::Mutex;

    use super::*;

    pub struct RecordingSink {
        receipt: PublishReceipt,
        published: Mutex<Vec<Notification>>,
    }

    impl RecordingSink {
        pub fn new(message_id: &str) -> Self {
            Self {
                receipt: PublishReceipt {
                    message_id: Some(message_id.to_string()),
                    sequence_number: None,
                },
                published: Mutex::new(Vec::new()),
            }
        }

        pub fn published(&self) -> Vec<Notification> {
            self.published.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        async fn publish(&self, notification: &Notification) -> RelayResult<PublishReceipt> {
            self.published.lock().unwrap().push(notification.clone());
            Ok(self.receipt.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_subject() {
        assert_eq!(build_subject("myRepo"), "CodeCommit Update - Repository: myRepo");
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = PublishReceipt {
            message_id: Some("m-1".to_string()),
            sequence_number: None,
        };

        let value = serde_json::to_value(&receipt).unwrap();
        assert_eq!(value, serde_json::json!({ "messageId": "m-1" }));
    }
}

//! Sequential batch deploys with per-item failure tolerance.

use crate::error::PublishError;
use crate::publisher::{PublishReceipt, PublishRequest, Publisher};
use std::time::Duration;

/// A request that did not make it, kept with its error for reporting.
#[derive(Debug)]
pub struct BatchFailure {
    pub filename: String,
    pub error: PublishError,
}

/// What a batch run accomplished. Failures never abort the batch, so
/// `deployed` and `failed` together cover every request.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub deployed: Vec<PublishReceipt>,
    pub failed: Vec<BatchFailure>,
}

/// Publish `requests` one at a time, pausing `delay` between items.
///
/// Each item gets its own `timeout`; an item that exceeds it is recorded
/// as failed and the batch moves on. Nothing cancels an in-flight publish
/// other than its timeout expiring.
pub async fn deploy_all(
    publisher: &dyn Publisher,
    requests: Vec<PublishRequest>,
    delay: Duration,
    timeout: Duration,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    let total = requests.len();

    for (index, request) in requests.into_iter().enumerate() {
        let result = match tokio::time::timeout(timeout, publisher.publish(&request)).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::TimedOut {
                seconds: timeout.as_secs(),
            }),
        };

        match result {
            Ok(receipt) => outcome.deployed.push(receipt),
            Err(error) => {
                tracing::warn!(filename = %request.filename, %error, "deploy failed, continuing");
                outcome.failed.push(BatchFailure {
                    filename: request.filename,
                    error,
                });
            }
        }

        if index + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use snipdeck_core::SnippetKind;
    use uuid::Uuid;

    struct FlakyPublisher {
        fail_filename: String,
    }

    #[async_trait]
    impl Publisher for FlakyPublisher {
        async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
            if request.filename == self.fail_filename {
                return Err(PublishError::Failed {
                    message: "remote rejected the asset".to_string(),
                });
            }
            Ok(receipt_for(request))
        }
    }

    struct SlowPublisher {
        duration: Duration,
    }

    #[async_trait]
    impl Publisher for SlowPublisher {
        async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
            tokio::time::sleep(self.duration).await;
            Ok(receipt_for(request))
        }
    }

    fn receipt_for(request: &PublishRequest) -> PublishReceipt {
        PublishReceipt {
            filename: request.filename.clone(),
            url: format!("https://cdn.example.com/{}", request.filename),
            size: request.content.len() as u64,
            deployed_at: Utc::now(),
        }
    }

    fn request(filename: &str) -> PublishRequest {
        PublishRequest {
            manifest_id: Uuid::new_v4(),
            name: filename.to_string(),
            filename: filename.to_string(),
            kind: SnippetKind::Css,
            content: ".x {}".to_string(),
        }
    }

    #[tokio::test]
    async fn failures_do_not_abort_the_batch() {
        let publisher = FlakyPublisher {
            fail_filename: "second.min.css".to_string(),
        };
        let requests = vec![
            request("first.min.css"),
            request("second.min.css"),
            request("third.min.css"),
        ];

        let outcome = deploy_all(
            &publisher,
            requests,
            Duration::ZERO,
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(outcome.deployed.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].filename, "second.min.css");
        assert!(outcome.failed[0]
            .error
            .to_string()
            .contains("remote rejected"));
    }

    #[tokio::test]
    async fn deploys_preserve_request_order() {
        let publisher = FlakyPublisher {
            fail_filename: "none".to_string(),
        };
        let requests = vec![request("a.min.css"), request("b.min.css")];

        let outcome = deploy_all(
            &publisher,
            requests,
            Duration::ZERO,
            Duration::from_secs(5),
        )
        .await;

        let filenames: Vec<&str> = outcome
            .deployed
            .iter()
            .map(|receipt| receipt.filename.as_str())
            .collect();
        assert_eq!(filenames, ["a.min.css", "b.min.css"]);
    }

    #[tokio::test]
    async fn batch_pauses_between_items() {
        let publisher = FlakyPublisher {
            fail_filename: "none".to_string(),
        };
        let requests = vec![
            request("a.min.css"),
            request("b.min.css"),
            request("c.min.css"),
        ];

        let started = std::time::Instant::now();
        deploy_all(
            &publisher,
            requests,
            Duration::from_millis(50),
            Duration::from_secs(5),
        )
        .await;

        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn slow_items_are_recorded_as_timeouts() {
        let publisher = SlowPublisher {
            duration: Duration::from_millis(500),
        };
        let requests = vec![request("slow.min.css")];

        let outcome = deploy_all(
            &publisher,
            requests,
            Duration::ZERO,
            Duration::from_millis(20),
        )
        .await;

        assert!(outcome.deployed.is_empty());
        assert_eq!(outcome.failed.len(), 1);
        assert!(matches!(
            outcome.failed[0].error,
            PublishError::TimedOut { .. }
        ));
    }
}

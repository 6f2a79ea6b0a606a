//! Best-effort push notifications for private messages.
//!
//! Talks to a Pusher-Beams-style publish REST API: one POST per
//! recipient, addressed by the recipient's external id, authorized
//! with the instance secret. The dispatch handler decides *whether*
//! to notify; this module only carries the delivery mechanics, and
//! its errors are for the logs, never for the caller.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("push request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("push service returned {0}")]
    Status(reqwest::StatusCode),
}

/// What the dispatch handler knows about the message being pushed.
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub sender_id: i64,
    pub sender_name: String,
    pub recipient_id: i64,
    pub message_id: i64,
    pub content: String,
}

// Wire shapes of the Beams publish body.

#[derive(Serialize)]
struct PublishBody<'a> {
    users: [&'a str; 1],
    web: WebPush,
}

#[derive(Serialize)]
struct WebPush {
    notification: WebNotification,
    data: PushData,
}

#[derive(Serialize)]
struct WebNotification {
    title: String,
    body: String,
    deep_link: String,
}

/// Structured metadata for client-side routing of the notification.
#[derive(Serialize)]
struct PushData {
    sender_id: String,
    recipient_id: String,
    message_id: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Push delivery seam. `Disabled` keeps dispatch a logged no-op when
/// no push service is configured.
#[derive(Clone)]
pub enum PushNotifier {
    Beams(BeamsClient),
    Disabled,
}

impl PushNotifier {
    pub async fn publish(
        &self,
        external_id: &str,
        message: &PushMessage,
    ) -> Result<(), NotificationError> {
        match self {
            Self::Beams(client) => client.publish_to_user(external_id, message).await,
            Self::Disabled => {
                tracing::debug!("push notifier disabled, skipping notification");
                Ok(())
            }
        }
    }
}

/// REST client for the Beams publish API.
#[derive(Clone)]
pub struct BeamsClient {
    http: reqwest::Client,
    base_url: String,
    instance_id: String,
    secret_key: String,
}

impl BeamsClient {
    pub fn new(instance_id: &str, secret_key: &str) -> Self {
        let base_url = format!("https://{instance_id}.pushnotifications.pusher.com");
        Self::with_base_url(instance_id, secret_key, &base_url)
    }

    /// Same client against an arbitrary endpoint, for tests.
    pub fn with_base_url(instance_id: &str, secret_key: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            instance_id: instance_id.to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    async fn publish_to_user(
        &self,
        external_id: &str,
        message: &PushMessage,
    ) -> Result<(), NotificationError> {
        let url = format!(
            "{}/publish_api/v1/instances/{}/publishes/users",
            self.base_url, self.instance_id
        );
        let body = PublishBody {
            users: [external_id],
            web: WebPush {
                notification: WebNotification {
                    title: message.sender_name.clone(),
                    body: message.content.clone(),
                    deep_link: format!("/chat?user={}", message.sender_id),
                },
                data: PushData {
                    sender_id: message.sender_id.to_string(),
                    recipient_id: message.recipient_id.to_string(),
                    message_id: message.message_id.to_string(),
                    kind: "private_message",
                },
            },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotificationError::Status(response.status()));
        }
        tracing::debug!("push notification published for message {}", message.message_id);
        Ok(())
    }
}

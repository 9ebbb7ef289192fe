//! HTTP webhook delivery.
//!
//! # Design
//! - One shared `reqwest::Client` with a fixed request timeout.
//! - The target URL is validated per dispatch; malformed targets never reach the network.

use std::time::Duration;

use async_trait::async_trait;
use intake_config::DownstreamTarget;
use intake_core::{Notifier, NotifyError, NotifyResult};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{WebhookError, WebhookResult};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Header naming the event type on every dispatch.
pub const EVENT_HEADER: &str = "x-intake-event";
/// Event type sent for renamed objects.
pub const OBJECT_READY_EVENT: &str = "object-ready";

/// JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReadyEvent<'a> {
    /// Container holding the object.
    pub container: &'a str,
    /// Key the object was renamed to.
    pub key: &'a str,
    /// Target handle the event was addressed to.
    pub target: &'a str,
}

/// Posts an [`ObjectReadyEvent`] to the rule's downstream target URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Build a notifier whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Client`] when the HTTP client cannot be initialised.
    pub fn new(timeout: Duration) -> WebhookResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(EVENT_HEADER, HeaderValue::from_static(OBJECT_READY_EVENT));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| WebhookError::Client { source })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        target: &DownstreamTarget,
        container_name: &str,
        new_key: &str,
    ) -> NotifyResult<()> {
        let endpoint = parse_target(target.as_str())?;
        let event = ObjectReadyEvent {
            container: container_name,
            key: new_key,
            target: target.as_str(),
        };

        let response = self
            .client
            .post(endpoint)
            .json(&event)
            .send()
            .await
            .map_err(|err| {
                warn!(downstream = %target, error = %err, "webhook request failed");
                NotifyError::dispatch(target.as_str(), err)
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(downstream = %target, status = status.as_u16(), "webhook accepted event");
            Ok(())
        } else {
            warn!(downstream = %target, status = status.as_u16(), "webhook rejected event");
            Err(NotifyError::Rejected {
                target: target.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

fn parse_target(target: &str) -> NotifyResult<Url> {
    let invalid = |reason: &'static str| NotifyError::InvalidTarget {
        target: target.to_string(),
        reason,
    };
    let url = Url::parse(target).map_err(|_| invalid("not_a_url"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid("unsupported_scheme")),
    }
}

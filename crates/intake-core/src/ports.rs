//! Capabilities the engine consumes from its collaborators.

use async_trait::async_trait;
use intake_config::{DownstreamTarget, IntakeConfiguration};

use crate::error::{NotifyResult, StorageResult};

/// Object storage operations needed to transition and quarantine objects.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Copy `key` to `new_key` and delete `key`.
    ///
    /// The two steps are not atomic together: a failure between them may leave both
    /// objects present. Callers must treat any `Err` as "not renamed".
    async fn rename_object(&self, key: &str, new_key: &str) -> StorageResult<()>;

    /// Move `key` to `scope_path/_error/<timestamp>-<basename(key)>`, attaching `reason`
    /// as metadata, and return the quarantine key.
    async fn move_to_quarantine(
        &self,
        key: &str,
        scope_path: &str,
        reason: &str,
    ) -> StorageResult<String>;

    /// Intake rules the gateway was provisioned with.
    fn configuration(&self) -> &IntakeConfiguration;

    /// Container the gateway operates on.
    fn container_name(&self) -> &str;
}

/// Fire-and-forget dispatch to a downstream consumer.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Hand `new_key` to `target`; `Ok` means the dispatch was accepted, not completed.
    async fn notify(
        &self,
        target: &DownstreamTarget,
        container_name: &str,
        new_key: &str,
    ) -> NotifyResult<()>;
}

//! In-memory storage gateway and scriptable notifier.
//!
//! # Design
//! - Mirror object-store semantics closely enough to drive the notification feedback loop:
//!   every object written (rename target or quarantine copy) is queued as a creation event.
//! - Record every port call so tests can assert on what the engine asked for.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use intake_config::{DownstreamTarget, IntakeConfiguration};
use intake_core::{
    Clock, FixedClock, NotificationRecord, Notifier, NotifyError, NotifyResult, StorageError,
    StorageGateway, StorageResult, quarantine_key,
};

use crate::fixtures::{FIXED_TIMESTAMP, TEST_CONTAINER};

/// Metadata key carrying the quarantine reason.
pub const REASON_METADATA: &str = "failure-reason";

/// Port call observed by [`InMemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    /// `rename_object(key, new_key)`.
    Rename {
        /// Source key.
        key: String,
        /// Destination key.
        new_key: String,
    },
    /// `move_to_quarantine(key, scope_path, reason)`.
    Quarantine {
        /// Source key.
        key: String,
        /// Intake path the quarantine is scoped under.
        scope_path: String,
        /// Failure reason attached as metadata.
        reason: String,
    },
}

#[derive(Default)]
struct StorageState {
    objects: BTreeMap<String, BTreeMap<String, String>>,
    calls: Vec<StorageCall>,
    created: VecDeque<String>,
    fail_renames: bool,
    fail_quarantine: bool,
}

/// Object store held in memory, keyed by full object key.
pub struct InMemoryStorage {
    config: IntakeConfiguration,
    container: String,
    clock: Arc<dyn Clock>,
    state: Mutex<StorageState>,
}

impl InMemoryStorage {
    /// Empty store for `config` using the fixture container and timestamp.
    #[must_use]
    pub fn new(config: IntakeConfiguration) -> Self {
        Self {
            config,
            container: TEST_CONTAINER.to_string(),
            clock: Arc::new(FixedClock::new(FIXED_TIMESTAMP)),
            state: Mutex::new(StorageState::default()),
        }
    }

    /// Use `clock` when stamping quarantine keys.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make every rename fail.
    #[must_use]
    pub fn failing_renames(self) -> Self {
        self.state().fail_renames = true;
        self
    }

    /// Make every quarantine move fail.
    #[must_use]
    pub fn failing_quarantine(self) -> Self {
        self.state().fail_quarantine = true;
        self
    }

    /// Upload an object, queuing its creation event.
    pub fn put(&self, key: &str) {
        let mut state = self.state();
        state.objects.insert(key.to_string(), BTreeMap::new());
        state.created.push_back(key.to_string());
    }

    /// Whether an object exists at `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.state().objects.contains_key(key)
    }

    /// All object keys in lexical order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.state().objects.keys().cloned().collect()
    }

    /// Metadata stored on `key`, if the object exists.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<BTreeMap<String, String>> {
        self.state().objects.get(key).cloned()
    }

    /// Port calls in the order they were made.
    #[must_use]
    pub fn calls(&self) -> Vec<StorageCall> {
        self.state().calls.clone()
    }

    /// Number of rename calls made.
    #[must_use]
    pub fn rename_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, StorageCall::Rename { .. }))
            .count()
    }

    /// Take the creation events queued since the last call, as notification records.
    #[must_use]
    pub fn drain_notifications(&self) -> Vec<NotificationRecord> {
        let mut state = self.state();
        state
            .created
            .drain(..)
            .map(|key| NotificationRecord::new(TEST_CONTAINER, key))
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, StorageState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn transfer(
        state: &mut StorageState,
        key: &str,
        destination: &str,
    ) -> StorageResult<BTreeMap<String, String>> {
        let metadata = state
            .objects
            .remove(key)
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })?;
        state.created.push_back(destination.to_string());
        Ok(metadata)
    }
}

#[async_trait]
impl StorageGateway for InMemoryStorage {
    async fn rename_object(&self, key: &str, new_key: &str) -> StorageResult<()> {
        let mut state = self.state();
        state.calls.push(StorageCall::Rename {
            key: key.to_string(),
            new_key: new_key.to_string(),
        });
        if state.fail_renames {
            return Err(StorageError::io(
                "copy",
                key,
                io::Error::other("simulated copy failure"),
            ));
        }
        let metadata = Self::transfer(&mut state, key, new_key)?;
        state.objects.insert(new_key.to_string(), metadata);
        Ok(())
    }

    async fn move_to_quarantine(
        &self,
        key: &str,
        scope_path: &str,
        reason: &str,
    ) -> StorageResult<String> {
        let mut state = self.state();
        state.calls.push(StorageCall::Quarantine {
            key: key.to_string(),
            scope_path: scope_path.to_string(),
            reason: reason.to_string(),
        });
        if state.fail_quarantine {
            return Err(StorageError::io(
                "quarantine",
                key,
                io::Error::other("simulated quarantine failure"),
            ));
        }
        let destination = quarantine_key(scope_path, &self.clock.timestamp(), key);
        let mut metadata = Self::transfer(&mut state, key, &destination)?;
        metadata.insert(REASON_METADATA.to_string(), reason.to_string());
        state.objects.insert(destination.clone(), metadata);
        Ok(destination)
    }

    fn configuration(&self) -> &IntakeConfiguration {
        &self.config
    }

    fn container_name(&self) -> &str {
        &self.container
    }
}

/// Dispatch observed by [`ScriptedNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Downstream target handle.
    pub target: String,
    /// Container passed with the dispatch.
    pub container_name: String,
    /// Key handed downstream.
    pub key: String,
}

/// Notifier that accepts or rejects every dispatch and records them all.
#[derive(Default)]
pub struct ScriptedNotifier {
    rejection: Option<String>,
    dispatches: Mutex<Vec<Dispatch>>,
}

impl ScriptedNotifier {
    /// Notifier that accepts every dispatch.
    #[must_use]
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Notifier that rejects every dispatch with `message` as the underlying cause.
    #[must_use]
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rejection: Some(message.into()),
            dispatches: Mutex::new(Vec::new()),
        }
    }

    /// Dispatches received so far.
    #[must_use]
    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.dispatches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for ScriptedNotifier {
    async fn notify(
        &self,
        target: &DownstreamTarget,
        container_name: &str,
        new_key: &str,
    ) -> NotifyResult<()> {
        self.dispatches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Dispatch {
                target: target.to_string(),
                container_name: container_name.to_string(),
                key: new_key.to_string(),
            });
        match &self.rejection {
            Some(message) => Err(NotifyError::dispatch(
                target.as_str(),
                io::Error::other(message.clone()),
            )),
            None => Ok(()),
        }
    }
}

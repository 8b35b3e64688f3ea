// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness that assembles a complete dialogue stack.
//!
//! Replies and operator notifications both go to one [`MockChannel`];
//! claims go to a [`MemoryClaimStore`] or, with [`TestHarnessBuilder::with_sqlite`],
//! to a SQLite database in a temporary directory.

use std::sync::Arc;
use std::time::Duration;

use vendclaim_config::model::StorageConfig;
use vendclaim_core::{ChatId, ClaimRepository, InboundEvent, OutboundMessage, VendclaimError};
use vendclaim_dialogue::{DialogueController, DialogueStore, Notifier};
use vendclaim_storage::SqliteClaimStore;

use crate::memory_claims::MemoryClaimStore;
use crate::mock_channel::MockChannel;

/// Builder for [`TestHarness`].
#[derive(Default)]
pub struct TestHarnessBuilder {
    operator: Option<ChatId>,
    expire_after: Option<Duration>,
    sqlite: bool,
}

impl TestHarnessBuilder {
    /// Notify this chat about new claims.
    pub fn with_operator(mut self, chat: ChatId) -> Self {
        self.operator = Some(chat);
        self
    }

    /// Expire idle dialogues after `ttl`.
    pub fn with_expiry(mut self, ttl: Duration) -> Self {
        self.expire_after = Some(ttl);
        self
    }

    /// Persist claims to a temporary SQLite database.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    pub async fn build(self) -> Result<TestHarness, VendclaimError> {
        let channel = Arc::new(MockChannel::new());

        let mut memory = None;
        let mut temp_dir = None;
        let claims: Arc<dyn ClaimRepository> = if self.sqlite {
            let dir = tempfile::TempDir::new().map_err(|e| VendclaimError::Storage {
                source: Box::new(e),
            })?;
            let store = SqliteClaimStore::new(StorageConfig {
                database_path: dir.path().join("claims.db").to_string_lossy().into_owned(),
                wal_mode: true,
            });
            store.initialize().await?;
            temp_dir = Some(dir);
            Arc::new(store)
        } else {
            let store = Arc::new(MemoryClaimStore::new());
            memory = Some(store.clone());
            store
        };

        let notifier = Notifier::new(channel.clone(), self.operator);
        let controller = Arc::new(DialogueController::new(
            DialogueStore::with_expiry(self.expire_after),
            claims.clone(),
            notifier,
        ));

        Ok(TestHarness {
            controller,
            channel,
            claims,
            memory,
            _temp_dir: temp_dir,
        })
    }
}

/// A dialogue controller wired to mock adapters.
pub struct TestHarness {
    pub controller: Arc<DialogueController>,
    pub channel: Arc<MockChannel>,
    pub claims: Arc<dyn ClaimRepository>,
    memory: Option<Arc<MemoryClaimStore>>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }

    /// Feed one event through the controller.
    pub async fn send(&self, event: InboundEvent) -> Vec<OutboundMessage> {
        self.controller.handle_event(event).await
    }

    /// The in-memory store, when the harness is not backed by SQLite.
    pub fn memory_store(&self) -> Option<&Arc<MemoryClaimStore>> {
        self.memory.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;

    #[tokio::test]
    async fn memory_harness_runs_a_dialogue() {
        let harness = TestHarness::builder()
            .with_operator(ChatId(-1))
            .build()
            .await
            .unwrap();

        harness.send(events::command(5, "claim")).await;
        harness.send(events::contact(5, "+5")).await;
        harness.send(events::text(5, "5")).await;
        harness.send(events::text(5, "five")).await;

        assert_eq!(harness.claims.list_claims(10).await.unwrap().len(), 1);
        assert_eq!(harness.channel.sent_to(ChatId(-1)).await.len(), 1);
        assert!(harness.memory_store().is_some());
    }

    #[tokio::test]
    async fn sqlite_harness_persists() {
        let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
        assert!(harness.memory_store().is_none());

        harness.send(events::command(6, "claim")).await;
        harness.send(events::text(6, "+6")).await;
        harness.send(events::text(6, "60")).await;
        harness.send(events::text(6, "six")).await;

        let claims = harness.claims.list_claims(10).await.unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].amount, 60);
    }
}

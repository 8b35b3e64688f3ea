// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user dialogue state.
//!
//! Each user gets a slot holding an async mutex. The controller takes the
//! slot's lock for the whole event, so events from one user are applied in
//! arrival order (tokio mutexes are fair) while different users proceed in
//! parallel. Slots live in a sharded `DashMap`; the shard lock is released
//! before the per-user lock is awaited.
//!
//! An idle slot with nothing collected reads the same as a missing one, so
//! it is evicted when its last holder lets go. The map only holds users
//! with a dialogue in progress.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::debug;

use vendclaim_core::UserId;

/// Position of a user in the claim dialogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DialogueStep {
    #[default]
    Idle,
    AwaitingPhone,
    AwaitingAmount,
    AwaitingComment,
}

impl DialogueStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueStep::Idle => "idle",
            DialogueStep::AwaitingPhone => "awaiting_phone",
            DialogueStep::AwaitingAmount => "awaiting_amount",
            DialogueStep::AwaitingComment => "awaiting_comment",
        }
    }
}

impl std::fmt::Display for DialogueStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields gathered by completed steps.
///
/// Also used as a partial update: `Some` fields overwrite, `None` fields
/// are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFields {
    pub phone: Option<String>,
    pub amount: Option<u32>,
    pub comment: Option<String>,
}

impl CollectedFields {
    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    pub fn amount(amount: u32) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    pub fn merge(&mut self, partial: CollectedFields) {
        if partial.phone.is_some() {
            self.phone = partial.phone;
        }
        if partial.amount.is_some() {
            self.amount = partial.amount;
        }
        if partial.comment.is_some() {
            self.comment = partial.comment;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.amount.is_none() && self.comment.is_none()
    }
}

/// Dialogue state of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueState {
    pub user_id: UserId,
    pub step: DialogueStep,
    pub collected: CollectedFields,
    pub updated_at: Instant,
}

impl DialogueState {
    /// Fresh idle state with nothing collected.
    pub fn idle(user_id: UserId) -> Self {
        Self {
            user_id,
            step: DialogueStep::Idle,
            collected: CollectedFields::default(),
            updated_at: Instant::now(),
        }
    }

    fn reset(&mut self) {
        self.step = DialogueStep::Idle;
        self.collected = CollectedFields::default();
        self.updated_at = Instant::now();
    }
}

type Slots = DashMap<UserId, Arc<Mutex<DialogueState>>>;

/// Exclusive handle on one user's state, held for the length of an event.
pub struct DialogueEntry {
    guard: OwnedMutexGuard<DialogueState>,
    slots: Arc<Slots>,
}

impl DialogueEntry {
    pub fn state(&self) -> &DialogueState {
        &self.guard
    }

    pub fn step(&self) -> DialogueStep {
        self.guard.step
    }

    pub fn collected(&self) -> &CollectedFields {
        &self.guard.collected
    }

    /// Move to `step`, keeping the collected fields.
    pub fn set_step(&mut self, step: DialogueStep) {
        self.guard.step = step;
        self.guard.updated_at = Instant::now();
    }

    /// Merge `partial` into the collected fields.
    pub fn update_fields(&mut self, partial: CollectedFields) {
        self.guard.collected.merge(partial);
        self.guard.updated_at = Instant::now();
    }

    /// Back to idle with nothing collected.
    pub fn clear(&mut self) {
        self.guard.reset();
    }
}

impl Drop for DialogueEntry {
    fn drop(&mut self) {
        let state = &*self.guard;
        if state.step != DialogueStep::Idle || !state.collected.is_empty() {
            return;
        }
        // Two references mean the map and this guard: nobody else holds the
        // slot or waits on it, and the shard lock keeps newcomers out.
        let removed = self
            .slots
            .remove_if(&state.user_id, |_, slot| Arc::strong_count(slot) == 2);
        if removed.is_some() {
            debug!(user_id = state.user_id.0, "idle dialogue evicted");
        }
    }
}

/// Store of every user's dialogue state.
#[derive(Default)]
pub struct DialogueStore {
    slots: Arc<Slots>,
    expire_after: Option<Duration>,
}

impl DialogueStore {
    /// Store whose dialogues never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that resets an unfinished dialogue untouched for longer than
    /// `expire_after` on its next access.
    pub fn with_expiry(expire_after: Option<Duration>) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            expire_after,
        }
    }

    /// Lock a user's state, creating an idle one on first contact.
    pub async fn lock(&self, user_id: UserId) -> DialogueEntry {
        let slot = self
            .slots
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(DialogueState::idle(user_id))))
            .clone();
        self.enter(slot).await
    }

    /// Snapshot of a user's state. Unknown users read as idle and are not
    /// inserted.
    pub async fn get(&self, user_id: UserId) -> DialogueState {
        let Some(slot) = self.slots.get(&user_id).map(|s| Arc::clone(s.value())) else {
            return DialogueState::idle(user_id);
        };
        self.enter(slot).await.state().clone()
    }

    pub async fn set_step(&self, user_id: UserId, step: DialogueStep) {
        self.lock(user_id).await.set_step(step);
    }

    pub async fn update_fields(&self, user_id: UserId, partial: CollectedFields) {
        self.lock(user_id).await.update_fields(partial);
    }

    pub async fn clear(&self, user_id: UserId) {
        self.lock(user_id).await.clear();
    }

    /// Number of users holding a slot: a dialogue in progress, or a lock
    /// currently taken.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    async fn enter(&self, slot: Arc<Mutex<DialogueState>>) -> DialogueEntry {
        let mut guard = slot.lock_owned().await;
        self.expire_if_stale(&mut guard);
        DialogueEntry {
            guard,
            slots: Arc::clone(&self.slots),
        }
    }

    fn expire_if_stale(&self, state: &mut DialogueState) {
        if let Some(ttl) = self.expire_after
            && state.step != DialogueStep::Idle
            && state.updated_at.elapsed() > ttl
        {
            debug!(user_id = state.user_id.0, step = %state.step, "dialogue expired");
            state.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    #[tokio::test]
    async fn unknown_user_reads_as_idle_without_insert() {
        let store = DialogueStore::new();
        let state = store.get(ALICE).await;
        assert_eq!(state.step, DialogueStep::Idle);
        assert!(state.collected.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn set_step_preserves_collected() {
        let store = DialogueStore::new();
        store.update_fields(ALICE, CollectedFields::phone("+1")).await;
        store.set_step(ALICE, DialogueStep::AwaitingAmount).await;

        let state = store.get(ALICE).await;
        assert_eq!(state.step, DialogueStep::AwaitingAmount);
        assert_eq!(state.collected.phone.as_deref(), Some("+1"));
    }

    #[tokio::test]
    async fn update_fields_merges() {
        let store = DialogueStore::new();
        store.update_fields(ALICE, CollectedFields::phone("+1")).await;
        store.update_fields(ALICE, CollectedFields::amount(50)).await;

        let collected = store.get(ALICE).await.collected;
        assert_eq!(collected.phone.as_deref(), Some("+1"));
        assert_eq!(collected.amount, Some(50));
        assert!(collected.comment.is_none());
    }

    #[tokio::test]
    async fn clear_resets_to_idle() {
        let store = DialogueStore::new();
        store.update_fields(ALICE, CollectedFields::phone("+1")).await;
        store.set_step(ALICE, DialogueStep::AwaitingAmount).await;
        store.clear(ALICE).await;

        let state = store.get(ALICE).await;
        assert_eq!(state.step, DialogueStep::Idle);
        assert!(state.collected.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn idle_slots_are_evicted_on_release() {
        let store = DialogueStore::new();
        {
            let entry = store.lock(ALICE).await;
            assert_eq!(entry.step(), DialogueStep::Idle);
            assert_eq!(store.len(), 1);
        }
        assert!(store.is_empty());

        store.set_step(ALICE, DialogueStep::AwaitingPhone).await;
        store.update_fields(BOB, CollectedFields::phone("+2")).await;
        assert_eq!(store.len(), 2);

        store.clear(ALICE).await;
        store.clear(BOB).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn slot_with_a_waiter_is_kept() {
        let store = Arc::new(DialogueStore::new());
        let first = store.lock(ALICE).await;

        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut entry = store.lock(ALICE).await;
                entry.set_step(DialogueStep::AwaitingAmount);
            })
        };
        tokio::task::yield_now().await;
        drop(first);
        waiter.await.unwrap();

        assert_eq!(store.get(ALICE).await.step, DialogueStep::AwaitingAmount);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn many_finished_dialogues_leave_no_slots() {
        let store = DialogueStore::new();
        for user in 0..500 {
            let mut entry = store.lock(UserId(user)).await;
            entry.set_step(DialogueStep::AwaitingPhone);
            entry.update_fields(CollectedFields::phone("+1"));
            entry.clear();
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = DialogueStore::new();
        store.set_step(ALICE, DialogueStep::AwaitingComment).await;
        store.update_fields(BOB, CollectedFields::phone("+2")).await;

        assert_eq!(store.get(ALICE).await.step, DialogueStep::AwaitingComment);
        assert!(store.get(ALICE).await.collected.is_empty());
        assert_eq!(store.get(BOB).await.step, DialogueStep::Idle);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn holding_one_user_does_not_block_another() {
        let store = DialogueStore::new();
        let _alice = store.lock(ALICE).await;

        let bob = tokio::time::timeout(Duration::from_secs(1), store.lock(BOB)).await;
        assert!(bob.is_ok(), "another user's lock must not wait");
    }

    #[tokio::test]
    async fn same_user_waits_for_the_holder() {
        let store = Arc::new(DialogueStore::new());
        let mut first = store.lock(ALICE).await;

        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.lock(ALICE).await.step() })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        first.set_step(DialogueStep::AwaitingPhone);
        drop(first);
        assert_eq!(waiter.await.unwrap(), DialogueStep::AwaitingPhone);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_dialogue_expires_on_access() {
        let store = DialogueStore::with_expiry(Some(Duration::from_secs(60)));
        store.update_fields(ALICE, CollectedFields::phone("+1")).await;
        store.set_step(ALICE, DialogueStep::AwaitingAmount).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.get(ALICE).await.step, DialogueStep::AwaitingAmount);

        tokio::time::advance(Duration::from_secs(61)).await;
        let state = store.get(ALICE).await;
        assert_eq!(state.step, DialogueStep::Idle);
        assert!(state.collected.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn without_expiry_dialogues_persist() {
        let store = DialogueStore::new();
        store.set_step(ALICE, DialogueStep::AwaitingPhone).await;
        tokio::time::advance(Duration::from_secs(86_400 * 30)).await;
        assert_eq!(store.get(ALICE).await.step, DialogueStep::AwaitingPhone);
    }
}

// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The claim dialogue state machine.
//!
//! `Idle -> AwaitingPhone -> AwaitingAmount -> AwaitingComment -> Idle`.
//! Each event is dispatched on `(step, payload)` while the user's state is
//! locked. On the final step the claim is persisted, then the operator is
//! notified, then the dialogue is cleared, in that order.
//!
//! [`DialogueController::respond`] also sends the replies before the lock
//! is released, so a user's replies leave in the order their events were
//! applied even when the transport hands events over concurrently.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use vendclaim_core::{
    ChannelAdapter, ChatId, ClaimRepository, EventHandler, EventPayload, InboundEvent, NewClaim,
    OutboundMessage, UserId, VendclaimError,
};

use crate::notifier::Notifier;
use crate::prompts;
use crate::store::{CollectedFields, DialogueEntry, DialogueStep, DialogueStore};
use crate::validate::{self, ValidationError};

/// Drives every user's claim dialogue.
pub struct DialogueController {
    store: DialogueStore,
    claims: Arc<dyn ClaimRepository>,
    notifier: Notifier,
}

impl DialogueController {
    pub fn new(store: DialogueStore, claims: Arc<dyn ClaimRepository>, notifier: Notifier) -> Self {
        Self {
            store,
            claims,
            notifier,
        }
    }

    pub fn store(&self) -> &DialogueStore {
        &self.store
    }

    /// Process one event and return the replies for its sender.
    pub async fn handle_event(&self, event: InboundEvent) -> Vec<OutboundMessage> {
        let (entry, replies) = self.process(event).await;
        drop(entry);
        replies
    }

    /// Process one event and send its replies through `out` while the
    /// sender's state is still locked. Returns the delivery failures.
    pub async fn respond(
        &self,
        event: InboundEvent,
        out: &dyn ChannelAdapter,
    ) -> Vec<VendclaimError> {
        let (entry, replies) = self.process(event).await;
        let failures = vendclaim_core::send_all(out, replies).await;
        drop(entry);
        failures
    }

    /// Applies the event and hands back the still-locked entry.
    async fn process(&self, event: InboundEvent) -> (DialogueEntry, Vec<OutboundMessage>) {
        let started = Instant::now();
        let kind = event.payload.kind();
        vendclaim_prometheus::record_event(&kind.to_string());

        let mut entry = self.store.lock(event.user_id).await;
        let before = entry.step();
        let replies = self.dispatch(&mut entry, event).await;

        debug!(%kind, from = %before, to = %entry.step(), replies = replies.len(), "event handled");
        vendclaim_prometheus::record_event_duration(started.elapsed().as_secs_f64());
        (entry, replies)
    }

    async fn dispatch(
        &self,
        entry: &mut DialogueEntry,
        event: InboundEvent,
    ) -> Vec<OutboundMessage> {
        let InboundEvent {
            user_id,
            chat_id: chat,
            username,
            payload,
        } = event;

        match (entry.step(), payload) {
            (_, EventPayload::Command { name, .. }) => self.on_command(entry, &name, user_id, chat),
            (_, EventPayload::Callback { data, .. }) => self.on_callback(entry, &data, user_id, chat),

            (DialogueStep::Idle, EventPayload::Text(_) | EventPayload::Contact { .. }) => {
                vec![prompts::idle_hint(chat)]
            }

            (DialogueStep::AwaitingPhone, EventPayload::Contact { phone }) => {
                accept_phone(entry, validate::accept_contact(&phone), chat)
            }
            (DialogueStep::AwaitingPhone, EventPayload::Text(raw)) => {
                match validate::validate_phone(&raw) {
                    Ok(phone) => accept_phone(entry, phone, chat),
                    Err(e) => {
                        rejected(user_id, &e);
                        vec![prompts::phone_empty(chat)]
                    }
                }
            }

            (DialogueStep::AwaitingAmount, EventPayload::Text(raw)) => {
                match validate::validate_amount(&raw) {
                    Ok(amount) => {
                        entry.update_fields(CollectedFields::amount(amount));
                        entry.set_step(DialogueStep::AwaitingComment);
                        vec![prompts::ask_comment(chat)]
                    }
                    Err(e) => {
                        rejected(user_id, &e);
                        vec![prompts::amount_invalid(chat)]
                    }
                }
            }

            (DialogueStep::AwaitingComment, EventPayload::Text(raw)) => {
                self.submit(entry, user_id, username, &raw, chat).await
            }

            (step, EventPayload::Contact { .. }) => {
                debug!(user_id = user_id.0, %step, "contact outside the phone step");
                vec![reprompt(step, chat)]
            }
        }
    }

    fn on_command(
        &self,
        entry: &mut DialogueEntry,
        name: &str,
        user_id: UserId,
        chat: ChatId,
    ) -> Vec<OutboundMessage> {
        match name {
            "start" => {
                let mut replies = vec![prompts::greeting(chat)];
                replies.extend(start_claim(entry, user_id, chat));
                replies
            }
            "help" => vec![prompts::help(chat)],
            "status" => vec![prompts::status(chat, chrono::Utc::now())],
            "menu" => vec![prompts::menu(chat)],
            "claim" => start_claim(entry, user_id, chat),
            "cancel" => {
                let had_dialogue = entry.step() != DialogueStep::Idle;
                entry.clear();
                if had_dialogue {
                    info!(user_id = user_id.0, "claim dialogue cancelled");
                }
                vec![prompts::cancelled(chat, had_dialogue)]
            }
            other => {
                debug!(user_id = user_id.0, command = other, "unknown command");
                vec![prompts::help(chat)]
            }
        }
    }

    fn on_callback(
        &self,
        entry: &mut DialogueEntry,
        data: &str,
        user_id: UserId,
        chat: ChatId,
    ) -> Vec<OutboundMessage> {
        match data {
            prompts::CALLBACK_CLAIM => start_claim(entry, user_id, chat),
            prompts::CALLBACK_TOPUP => {
                vec![prompts::not_implemented(chat, prompts::TOPUP_NOT_IMPLEMENTED)]
            }
            prompts::CALLBACK_HISTORY => {
                vec![prompts::not_implemented(chat, prompts::HISTORY_NOT_IMPLEMENTED)]
            }
            other => {
                debug!(user_id = user_id.0, data = other, "ignoring unknown callback");
                Vec::new()
            }
        }
    }

    /// Final step: persist, notify, clear.
    async fn submit(
        &self,
        entry: &mut DialogueEntry,
        user_id: UserId,
        username: Option<String>,
        raw: &str,
        chat: ChatId,
    ) -> Vec<OutboundMessage> {
        let comment = match validate::validate_comment(raw) {
            Ok(comment) => comment,
            Err(e) => {
                rejected(user_id, &e);
                return vec![prompts::comment_empty(chat)];
            }
        };

        let collected = entry.collected();
        let (Some(phone), Some(amount)) = (collected.phone.clone(), collected.amount) else {
            warn!(user_id = user_id.0, "comment step reached without phone and amount, restarting");
            return start_claim(entry, user_id, chat);
        };

        let claim = NewClaim {
            user_id,
            username,
            phone,
            amount,
            comment,
        };

        let id = match self.claims.insert_claim(&claim).await {
            Ok(id) => id,
            Err(e) => {
                error!(user_id = user_id.0, error = %e, "failed to store claim");
                vendclaim_prometheus::record_claim("storage_failed");
                return vec![prompts::save_failed(chat)];
            }
        };
        vendclaim_prometheus::record_claim("submitted");
        info!(user_id = user_id.0, claim_id = id.0, amount, "claim submitted");

        let outcome = self.notifier.notify(id, &claim).await;
        debug!(claim_id = id.0, outcome = outcome.as_str(), "notification finished");

        entry.clear();
        vec![prompts::submitted(chat, id)]
    }
}

#[async_trait]
impl EventHandler for DialogueController {
    async fn handle_event(&self, event: InboundEvent) -> Vec<OutboundMessage> {
        DialogueController::handle_event(self, event).await
    }

    async fn respond(&self, event: InboundEvent, out: &dyn ChannelAdapter) -> Vec<VendclaimError> {
        DialogueController::respond(self, event, out).await
    }
}

fn start_claim(entry: &mut DialogueEntry, user_id: UserId, chat: ChatId) -> Vec<OutboundMessage> {
    if entry.step() != DialogueStep::Idle {
        debug!(user_id = user_id.0, step = %entry.step(), "restarting claim dialogue");
    }
    entry.clear();
    entry.set_step(DialogueStep::AwaitingPhone);
    info!(user_id = user_id.0, "claim dialogue started");
    vec![prompts::ask_phone(chat)]
}

fn accept_phone(entry: &mut DialogueEntry, phone: String, chat: ChatId) -> Vec<OutboundMessage> {
    entry.update_fields(CollectedFields::phone(phone));
    entry.set_step(DialogueStep::AwaitingAmount);
    vec![prompts::ask_amount(chat)]
}

fn reprompt(step: DialogueStep, chat: ChatId) -> OutboundMessage {
    match step {
        DialogueStep::Idle => prompts::idle_hint(chat),
        DialogueStep::AwaitingPhone => prompts::ask_phone(chat),
        DialogueStep::AwaitingAmount => prompts::ask_amount(chat),
        DialogueStep::AwaitingComment => prompts::ask_comment(chat),
    }
}

fn rejected(user_id: UserId, err: &ValidationError) {
    debug!(user_id = user_id.0, field = err.field(), error = %err, "input rejected");
    vendclaim_prometheus::record_validation_reject(err.field());
}

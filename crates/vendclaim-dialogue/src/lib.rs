// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claim-intake dialogue.
//!
//! The [`DialogueController`] is the single entry point: transports hand it
//! [`InboundEvent`](vendclaim_core::InboundEvent)s and deliver the replies it
//! returns. It validates input, keeps per-user state in a
//! [`DialogueStore`], persists finished claims through a
//! [`ClaimRepository`](vendclaim_core::ClaimRepository), and tells the
//! operator through the [`Notifier`].

pub mod controller;
pub mod notifier;
pub mod prompts;
pub mod store;
pub mod validate;

pub use controller::DialogueController;
pub use notifier::{Notifier, NotifyOutcome};
pub use store::{CollectedFields, DialogueEntry, DialogueState, DialogueStep, DialogueStore};
pub use validate::ValidationError;

// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for vendclaim.
//!
//! - [`MockChannel`] captures outbound messages and can be told to fail.
//! - [`MemoryClaimStore`] is an in-memory claim repository with a failure switch.
//! - [`events`] builds inbound events.
//! - [`TestHarness`] wires a dialogue controller to the mocks or to a
//!   temporary SQLite database.

pub mod events;
pub mod harness;
pub mod memory_claims;
pub mod mock_channel;

pub use harness::TestHarness;
pub use memory_claims::MemoryClaimStore;
pub use mock_channel::MockChannel;

// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage entities.
//!
//! The canonical types live in `vendclaim-core` so they can cross the
//! [`ClaimRepository`](vendclaim_core::ClaimRepository) boundary.

pub use vendclaim_core::types::{Claim, ClaimId, ClaimStatus, NewClaim};

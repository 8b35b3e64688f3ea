// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claim repository trait for durable claim persistence.

use async_trait::async_trait;

use crate::error::VendclaimError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Claim, ClaimId, NewClaim};

/// Durable store for finalized claims.
///
/// Implementations must assign identifiers that are unique and strictly
/// increasing, even under concurrent inserts, and must never expose a
/// partially written claim.
#[async_trait]
pub trait ClaimRepository: PluginAdapter {
    /// Initializes the backend (migrations, connections).
    async fn initialize(&self) -> Result<(), VendclaimError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), VendclaimError>;

    /// Inserts a claim with status `new` and a fresh timestamp.
    async fn insert_claim(&self, claim: &NewClaim) -> Result<ClaimId, VendclaimError>;

    /// Fetches a single claim.
    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, VendclaimError>;

    /// Lists the most recent claims, newest first.
    async fn list_claims(&self, limit: usize) -> Result<Vec<Claim>, VendclaimError>;
}

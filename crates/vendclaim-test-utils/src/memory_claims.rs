// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory claim repository.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use vendclaim_core::{
    AdapterType, Claim, ClaimId, ClaimRepository, ClaimStatus, HealthStatus, NewClaim,
    PluginAdapter, VendclaimError,
};

/// Claim repository backed by a vector. Ids start at 1 and increase by one.
pub struct MemoryClaimStore {
    claims: Mutex<Vec<Claim>>,
    failing: AtomicBool,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self {
            claims: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent inserts fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every stored claim in insertion order.
    pub async fn claims(&self) -> Vec<Claim> {
        self.claims.lock().await.clone()
    }
}

impl Default for MemoryClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MemoryClaimStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VendclaimError> {
        if self.failing.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("failure injected".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VendclaimError> {
        Ok(())
    }
}

#[async_trait]
impl ClaimRepository for MemoryClaimStore {
    async fn initialize(&self) -> Result<(), VendclaimError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), VendclaimError> {
        Ok(())
    }

    async fn insert_claim(&self, claim: &NewClaim) -> Result<ClaimId, VendclaimError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(VendclaimError::Storage {
                source: "database is locked".into(),
            });
        }
        let mut claims = self.claims.lock().await;
        let id = ClaimId(claims.len() as i64 + 1);
        claims.push(Claim {
            id,
            created_at: chrono::Utc::now().to_rfc3339(),
            user_id: claim.user_id,
            username: claim.username.clone(),
            phone: claim.phone.clone(),
            amount: claim.amount,
            comment: claim.comment.clone(),
            status: ClaimStatus::New,
        });
        Ok(id)
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, VendclaimError> {
        Ok(self
            .claims
            .lock()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_claims(&self, limit: usize) -> Result<Vec<Claim>, VendclaimError> {
        Ok(self
            .claims
            .lock()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

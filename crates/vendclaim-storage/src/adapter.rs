// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`ClaimRepository`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use vendclaim_config::model::StorageConfig;
use vendclaim_core::{
    AdapterType, Claim, ClaimId, ClaimRepository, HealthStatus, NewClaim, PluginAdapter,
    VendclaimError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed claim repository.
///
/// The database is opened by [`ClaimRepository::initialize`]; every other
/// operation fails with a storage error until then.
pub struct SqliteClaimStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteClaimStore {
    /// Create a store for the configured path without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, VendclaimError> {
        self.db.get().ok_or_else(|| VendclaimError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteClaimStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VendclaimError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), VendclaimError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ClaimRepository for SqliteClaimStore {
    async fn initialize(&self) -> Result<(), VendclaimError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VendclaimError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite claim store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VendclaimError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn insert_claim(&self, claim: &NewClaim) -> Result<ClaimId, VendclaimError> {
        queries::claims::insert_claim(self.db()?, claim).await
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Option<Claim>, VendclaimError> {
        queries::claims::get_claim(self.db()?, id).await
    }

    async fn list_claims(&self, limit: usize) -> Result<Vec<Claim>, VendclaimError> {
        queries::claims::list_claims(self.db()?, limit).await
    }
}

// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claim insert and lookup queries.

use std::str::FromStr;

use rusqlite::{Row, params};
use vendclaim_core::VendclaimError;

use crate::database::Database;
use crate::models::{Claim, ClaimId, ClaimStatus, NewClaim};
use vendclaim_core::types::UserId;

const CLAIM_COLUMNS: &str =
    "id, created_at, user_id, username, phone, amount, comment, status";

/// Insert a claim with status `new` and the current UTC time.
///
/// The insert and the id read happen inside one transaction on the writer
/// thread, so the returned id is the one SQLite assigned to this row.
pub async fn insert_claim(db: &Database, claim: &NewClaim) -> Result<ClaimId, VendclaimError> {
    let claim = claim.clone();
    let created_at = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO claims (created_at, user_id, username, phone, amount, comment, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    created_at,
                    claim.user_id.0,
                    claim.username,
                    claim.phone,
                    claim.amount,
                    claim.comment,
                    ClaimStatus::New.to_string(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(ClaimId(id))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a claim by id.
pub async fn get_claim(db: &Database, id: ClaimId) -> Result<Option<Claim>, VendclaimError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE id = ?1"))?;
            match stmt.query_row(params![id.0], claim_from_row) {
                Ok(claim) => Ok(Some(claim)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The `limit` most recent claims, newest first.
pub async fn list_claims(db: &Database, limit: usize) -> Result<Vec<Claim>, VendclaimError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLAIM_COLUMNS} FROM claims ORDER BY id DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], claim_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn claim_from_row(row: &Row<'_>) -> rusqlite::Result<Claim> {
    let status: String = row.get(7)?;
    let status = ClaimStatus::from_str(&status).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Claim {
        id: ClaimId(row.get(0)?),
        created_at: row.get(1)?,
        user_id: UserId(row.get(2)?),
        username: row.get(3)?,
        phone: row.get(4)?,
        amount: row.get(5)?,
        comment: row.get(6)?,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_claim(user: i64, amount: u32) -> NewClaim {
        NewClaim {
            user_id: UserId(user),
            username: Some("alice".to_string()),
            phone: "+1234567890".to_string(),
            amount,
            comment: "water did not dispense".to_string(),
        }
    }

    async fn open(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("claims.db");
        Database::open(path.to_str().unwrap(), true).await.unwrap()
    }

    #[tokio::test]
    async fn insert_then_get_round_trips_fields() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;

        let id = insert_claim(&db, &new_claim(7, 50)).await.unwrap();
        let claim = get_claim(&db, id).await.unwrap().expect("claim exists");

        assert_eq!(claim.id, id);
        assert_eq!(claim.user_id, UserId(7));
        assert_eq!(claim.username.as_deref(), Some("alice"));
        assert_eq!(claim.phone, "+1234567890");
        assert_eq!(claim.amount, 50);
        assert_eq!(claim.comment, "water did not dispense");
        assert_eq!(claim.status, ClaimStatus::New);
        assert!(claim.created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn get_missing_claim_returns_none() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;
        assert!(get_claim(&db, ClaimId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_increase_and_list_is_newest_first() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;

        let a = insert_claim(&db, &new_claim(1, 10)).await.unwrap();
        let b = insert_claim(&db, &new_claim(2, 20)).await.unwrap();
        let c = insert_claim(&db, &new_claim(3, 30)).await.unwrap();
        assert!(a < b && b < c);

        let listed = list_claims(&db, 2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, c);
        assert_eq!(listed[1].id, b);
    }

    #[tokio::test]
    async fn amount_outside_six_digits_is_rejected_by_schema() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;

        let err = insert_claim(&db, &new_claim(1, 1_000_000)).await.unwrap_err();
        assert!(err.is_storage());
        assert!(list_claims(&db, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unicode_and_long_comments_are_preserved() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;

        let mut claim = new_claim(1, 5);
        claim.comment = format!("вода не налилась {}", "x".repeat(10_000));
        claim.username = None;
        let id = insert_claim(&db, &claim).await.unwrap();

        let stored = get_claim(&db, id).await.unwrap().unwrap();
        assert_eq!(stored.comment, claim.comment);
        assert!(stored.username.is_none());
    }
}

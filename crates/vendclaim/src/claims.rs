// SPDX-FileCopyrightText: 2026 Vendclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vendclaim claims` command implementation.
//!
//! Prints the most recent claims straight from the database, newest first.
//! `--json` outputs structured JSON for scripting.

use colored::Colorize;
use vendclaim_config::model::VendclaimConfig;
use vendclaim_core::{Claim, ClaimRepository, ClaimStatus, VendclaimError};
use vendclaim_storage::SqliteClaimStore;

/// Run the `vendclaim claims` command.
pub async fn run_claims(
    config: &VendclaimConfig,
    limit: usize,
    json: bool,
) -> Result<(), VendclaimError> {
    let store = SqliteClaimStore::new(config.storage.clone());
    store.initialize().await?;
    let claims = store.list_claims(limit).await?;
    store.close().await?;

    if json {
        let out = serde_json::to_string_pretty(&claims)
            .map_err(|e| VendclaimError::Internal(format!("failed to encode claims: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    if claims.is_empty() {
        println!("no claims yet");
        return Ok(());
    }

    for claim in &claims {
        println!("{}", format_claim_line(claim));
    }
    Ok(())
}

/// One human-readable line per claim.
fn format_claim_line(claim: &Claim) -> String {
    let status = match claim.status {
        ClaimStatus::New => claim.status.to_string().yellow(),
        ClaimStatus::InProgress => claim.status.to_string().cyan(),
        ClaimStatus::Resolved => claim.status.to_string().green(),
        ClaimStatus::Rejected => claim.status.to_string().red(),
    };
    let who = match &claim.username {
        Some(name) => format!("@{name}"),
        None => format!("id {}", claim.user_id),
    };
    format!(
        "{}  {}  {}  {} rub  {}  {}  {}",
        format!("#{}", claim.id).bold(),
        claim.created_at.dimmed(),
        status,
        claim.amount,
        claim.phone,
        who,
        claim.comment,
    )
}

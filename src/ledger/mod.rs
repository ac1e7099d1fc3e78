// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! The ledger boundary.
//!
//! The registry treats the append-only ledger as an external collaborator
//! reachable through the [`Ledger`] trait: fetch a transaction, submit a
//! fulfilled transaction, list the TRANSFER transactions of an asset. All
//! calls are blocking round trips from the caller's point of view; nothing
//! here retries or spawns background work.
//!
//! Two implementations ship with the crate: [`MemoryLedger`] for tests and
//! bootstrap flows, and [`HttpLedger`] for a real ledger node.

mod http;
mod memory;
mod transaction;

pub use http::HttpLedger;
pub use memory::MemoryLedger;
pub use transaction::{Asset, Input, Operation, Output, OutputRef, Transaction};

use serde_json::Value;

use crate::documents::{self, DocumentType};
use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::validate;

/// Contract the core needs from the external ledger service.
pub trait Ledger {
    /// Fetch a transaction by id. Fails with [`Error::NotFound`] when the id
    /// does not resolve.
    async fn get_transaction(&self, id: &str) -> Result<Transaction>;

    /// Submit a fulfilled transaction; returns its id. Fails with
    /// [`Error::Submission`] on rejection.
    async fn post_transaction(&self, tx: &Transaction) -> Result<String>;

    /// All TRANSFER transactions spending the given asset, oldest first.
    async fn list_transfers(&self, asset_id: &str) -> Result<Vec<Transaction>>;

    /// Fetch the document created by transaction `id` and check it against
    /// the expected type.
    async fn query_document(&self, id: &str, expected: DocumentType) -> Result<Value> {
        let tx = self.get_transaction(validate::require_id(id)?).await?;
        let document = tx
            .asset_document()
            .ok_or_else(|| Error::NotFound(format!("transaction {id} carries no document")))?;
        let actual = documents::type_of(document)?;
        if !expected.matches(actual) {
            return Err(Error::TypeMismatch {
                expected: expected.as_str().to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(document.clone())
    }

    /// Identity lookup: resolve a party id to its currently registered public
    /// key (the key that signed the party's registration).
    async fn resolve_party_key(&self, party_id: &str) -> Result<PublicKey> {
        let tx = self
            .get_transaction(validate::require_id(party_id)?)
            .await?;
        let document = tx
            .asset_document()
            .ok_or_else(|| Error::NotFound(format!("transaction {party_id} carries no document")))?;
        let actual = documents::type_of(document)?;
        if !DocumentType::Party.matches(actual) {
            return Err(Error::TypeMismatch {
                expected: DocumentType::Party.as_str().to_string(),
                actual: actual.to_string(),
            });
        }
        tx.sender()
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Authenticated party context.
//!
//! An [`Identity`] is passed explicitly into every mutating operation instead
//! of living in ambient session state, so one process can act for any number
//! of parties concurrently.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::documents::DocumentType;
use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::ledger::Ledger;
use crate::validate;

/// What a registration hands back to the caller: the party's ledger id and
/// the base-58 private key. The caller is responsible for storing these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub id: String,
    pub private_key: String,
}

/// The acting party: its ledger id and signing key.
#[derive(Debug, Clone)]
pub struct Identity {
    party_id: String,
    key: PrivateKey,
}

impl Identity {
    /// Assemble an identity without checking it against the ledger. Useful in
    /// tests and right after registration, when the registered key is known
    /// to be the one in hand.
    pub fn new(party_id: impl Into<String>, key: PrivateKey) -> Self {
        Self {
            party_id: party_id.into(),
            key,
        }
    }

    /// Authenticate against the ledger: resolve the party document and check
    /// that the supplied private key matches the registered public key.
    pub async fn login<L: Ledger>(ledger: &L, credentials: &Credentials) -> Result<Self> {
        let key: PrivateKey = credentials.private_key.parse()?;
        let party_id = validate::require_id(&credentials.id)?;
        let document = ledger.query_document(party_id, DocumentType::Party).await?;
        let registered = ledger.resolve_party_key(party_id).await?;
        if registered != key.public() {
            return Err(Error::Key(
                "private key does not match the registered party key".to_string(),
            ));
        }
        let name = document
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("<unnamed>");
        info!(party = name, %party_id, "logged in");
        Ok(Self {
            party_id: party_id.to_string(),
            key,
        })
    }

    pub fn party_id(&self) -> &str {
        &self.party_id
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public()
    }

    pub fn key(&self) -> &PrivateKey {
        &self.key
    }
}

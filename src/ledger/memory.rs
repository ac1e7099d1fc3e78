// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! In-process ledger for tests and bootstrap flows.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::{Error, Result};

use super::{Ledger, Operation, Transaction};

#[derive(Default)]
struct Inner {
    by_id: HashMap<String, Transaction>,
    /// Insertion order, so transfer chains come back oldest first.
    order: Vec<String>,
}

/// A ledger backed by a process-local map.
///
/// Posts validate the fulfillment signature and reject duplicate ids, which
/// is enough to exercise every core code path without a running ledger node.
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed transactions. Used by tests to assert that failed
    /// operations made no submission.
    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.order.is_empty()
    }
}

impl Ledger for MemoryLedger {
    async fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.inner
            .read()
            .await
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("transaction {id}")))
    }

    async fn post_transaction(&self, tx: &Transaction) -> Result<String> {
        tx.verify_fulfillment()
            .map_err(|e| Error::Submission(format!("unfulfilled transaction: {e}")))?;
        let id = tx.require_id()?.to_string();
        let mut inner = self.inner.write().await;
        if inner.by_id.contains_key(&id) {
            return Err(Error::Submission(format!("duplicate transaction {id}")));
        }
        inner.by_id.insert(id.clone(), tx.clone());
        inner.order.push(id.clone());
        Ok(id)
    }

    async fn list_transfers(&self, asset_id: &str) -> Result<Vec<Transaction>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .filter(|tx| {
                tx.operation == Operation::Transfer
                    && tx.asset_id().is_ok_and(|aid| aid == asset_id)
            })
            .cloned()
            .collect())
    }
}

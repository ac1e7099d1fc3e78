// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! HTTP client for a ledger node.
//!
//! Speaks the node's REST surface: fetch a transaction by id, list the
//! TRANSFER transactions of an asset, and commit a fulfilled transaction.
//! No retries and no timeouts beyond reqwest's defaults; callers own their
//! retry policy.

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

use super::{Ledger, Transaction};

#[derive(Debug)]
pub struct HttpLedger {
    base: Url,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct PostResponse {
    id: String,
}

impl HttpLedger {
    /// Create a client for the node at `base_url`, e.g.
    /// `http://localhost:9984/api/v1/`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base: Url = base_url
            .parse()
            .map_err(|e: url::ParseError| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            base,
            client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::InvalidUrl(e.to_string()))
    }
}

impl Ledger for HttpLedger {
    async fn get_transaction(&self, id: &str) -> Result<Transaction> {
        let url = self.endpoint(&format!("transactions/{id}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("transaction {id}")));
        }
        let response = response
            .error_for_status()
            .map_err(|e| Error::Request(e.to_string()))?;
        response
            .json::<Transaction>()
            .await
            .map_err(|e| Error::Request(e.to_string()))
    }

    async fn post_transaction(&self, tx: &Transaction) -> Result<String> {
        let mut url = self.endpoint("transactions")?;
        url.query_pairs_mut().append_pair("mode", "commit");
        let response = self
            .client
            .post(url)
            .json(tx)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Submission(format!("{status}: {body}")));
        }
        let posted = response
            .json::<PostResponse>()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;
        Ok(posted.id)
    }

    async fn list_transfers(&self, asset_id: &str) -> Result<Vec<Transaction>> {
        let mut url = self.endpoint("transactions")?;
        url.query_pairs_mut()
            .append_pair("asset_id", asset_id)
            .append_pair("operation", "TRANSFER");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Request(e.to_string()))?;
        response
            .json::<Vec<Transaction>>()
            .await
            .map_err(|e| Error::Request(e.to_string()))
    }
}

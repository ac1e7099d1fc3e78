// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Ledger transaction model.
//!
//! CREATE transactions carry a document as their asset and mint outputs;
//! TRANSFER transactions spend a previous output of the same asset and split
//! its amount across new owners. A divisible right lives entirely in output
//! amounts: the document bodies never carry share counts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey, Signature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Create,
    Transfer,
}

/// A CREATE transaction defines a new asset inline; a TRANSFER cites the
/// asset it spends by the id of its CREATE transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    Definition { data: Value },
    Link { id: String },
}

/// The output of an earlier transaction being spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRef {
    pub transaction_id: String,
    pub output_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub owners_before: Vec<PublicKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<Signature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfills: Option<OutputRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub amount: u64,
    pub public_key: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub operation: Operation,
    pub asset: Asset,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl Transaction {
    /// Single-owner CREATE with the default amount of 1.
    pub fn create(document: Value, owner: &PublicKey, signer: &PublicKey) -> Self {
        Self::create_with_shares(1, document, owner, signer)
    }

    /// CREATE minting `shares` units of the asset to `owner`, signed by
    /// `signer`. Used for right issuance, where the output amount is the
    /// authoritative total share count.
    pub fn create_with_shares(
        shares: u64,
        document: Value,
        owner: &PublicKey,
        signer: &PublicKey,
    ) -> Self {
        Self {
            id: None,
            operation: Operation::Create,
            asset: Asset::Definition { data: document },
            inputs: vec![Input {
                owners_before: vec![*signer],
                fulfillment: None,
                fulfills: None,
            }],
            outputs: vec![Output {
                amount: shares,
                public_key: *owner,
            }],
        }
    }

    /// CREATE with one unit output per co-owner.
    pub fn create_multi_owner(document: Value, owners: &[PublicKey], signer: &PublicKey) -> Self {
        Self {
            id: None,
            operation: Operation::Create,
            asset: Asset::Definition { data: document },
            inputs: vec![Input {
                owners_before: vec![*signer],
                fulfillment: None,
                fulfills: None,
            }],
            outputs: owners
                .iter()
                .map(|owner| Output {
                    amount: 1,
                    public_key: *owner,
                })
                .collect(),
        }
    }

    /// TRANSFER spending `spent_output` of `spent_tx_id` and splitting the
    /// amount across `splits` in order. A single split is a full handover; two
    /// splits divide the amount between a retained and a transferred portion.
    pub fn transfer(
        splits: &[(u64, PublicKey)],
        asset_id: &str,
        spent_tx_id: &str,
        spent_output: u32,
        signer: &PublicKey,
    ) -> Self {
        Self {
            id: None,
            operation: Operation::Transfer,
            asset: Asset::Link {
                id: asset_id.to_string(),
            },
            inputs: vec![Input {
                owners_before: vec![*signer],
                fulfillment: None,
                fulfills: Some(OutputRef {
                    transaction_id: spent_tx_id.to_string(),
                    output_index: spent_output,
                }),
            }],
            outputs: splits
                .iter()
                .map(|(amount, owner)| Output {
                    amount: *amount,
                    public_key: *owner,
                })
                .collect(),
        }
    }

    /// Canonical serialization of the unsigned body (no id, no fulfillments).
    fn signing_payload(&self) -> Result<Vec<u8>> {
        let mut unsigned = self.clone();
        unsigned.id = None;
        for input in &mut unsigned.inputs {
            input.fulfillment = None;
        }
        Ok(serde_json::to_vec(&unsigned)?)
    }

    /// Sign every input and assign the transaction id.
    pub fn fulfill(&mut self, key: &PrivateKey) -> Result<()> {
        let payload = self.signing_payload()?;
        let signature = key.sign(&payload);
        for input in &mut self.inputs {
            input.fulfillment = Some(signature);
        }
        let mut body = self.clone();
        body.id = None;
        self.id = Some(hex::encode(Sha256::digest(serde_json::to_vec(&body)?)));
        Ok(())
    }

    /// Check that every input carries a signature from its owner over the
    /// unsigned body.
    pub fn verify_fulfillment(&self) -> Result<()> {
        let payload = self.signing_payload()?;
        for input in &self.inputs {
            let signature = input
                .fulfillment
                .as_ref()
                .ok_or(Error::InvalidSignature)?;
            let owner = input
                .owners_before
                .first()
                .ok_or_else(|| Error::CriteriaNotMet("input has no owner".to_string()))?;
            if !owner.verify(&payload, signature) {
                return Err(Error::InvalidSignature);
            }
        }
        Ok(())
    }

    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| Error::CriteriaNotMet("transaction is not fulfilled".to_string()))
    }

    /// The party that signed this transaction (first input owner).
    pub fn sender(&self) -> Result<PublicKey> {
        self.inputs
            .first()
            .and_then(|input| input.owners_before.first())
            .copied()
            .ok_or_else(|| Error::CriteriaNotMet("transaction has no inputs".to_string()))
    }

    /// The share amount minted by a CREATE (its sole output).
    pub fn share_amount(&self) -> Result<u64> {
        self.output_amount(0)
    }

    pub fn output_amount(&self, index: u32) -> Result<u64> {
        self.outputs
            .get(index as usize)
            .map(|output| output.amount)
            .ok_or_else(|| Error::NotFound(format!("output {index}")))
    }

    pub fn output_owner(&self, index: u32) -> Result<PublicKey> {
        self.outputs
            .get(index as usize)
            .map(|output| output.public_key)
            .ok_or_else(|| Error::NotFound(format!("output {index}")))
    }

    /// The inline document of a CREATE transaction.
    pub fn asset_document(&self) -> Option<&Value> {
        match &self.asset {
            Asset::Definition { data } => Some(data),
            Asset::Link { .. } => None,
        }
    }

    /// The asset this transaction belongs to: its own id for a CREATE, the
    /// cited asset id for a TRANSFER.
    pub fn asset_id(&self) -> Result<&str> {
        match &self.asset {
            Asset::Definition { .. } => self.require_id(),
            Asset::Link { id } => Ok(id),
        }
    }
}

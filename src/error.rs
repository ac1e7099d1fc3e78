// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Crate-wide error type.
//!
//! Local construction errors (malformed document input, mismatched list
//! lengths) abort an operation before any ledger call is made. Boundary errors
//! propagate unchanged; the core performs no silent recovery.

/// Errors produced by the registry core and the ledger boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fixed-width byte value decoded to the wrong length.
    #[error("Invalid size: expected {expected} bytes, got {actual}")]
    InvalidSize { expected: usize, actual: usize },

    /// An identifier failed the ledger identifier format check.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// An identifier did not resolve to a ledger transaction.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An unrecognized claim or document type discriminator.
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// A resolved document is not of the expected type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A business-rule violation: share overdraw, role mismatch, missing
    /// required reference.
    #[error("Criteria not met: {0}")]
    CriteriaNotMet(String),

    /// A challenge signature did not verify against any authorized key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The ledger boundary rejected a submitted transaction.
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// A ledger round trip failed before a response was obtained.
    #[error("Ledger request failed: {0}")]
    Request(String),

    /// The ledger base URL could not be parsed.
    #[error("Invalid ledger URL: {0}")]
    InvalidUrl(String),

    /// The share spend committed but the follow-up provenance record was
    /// rejected. Callers must persist `spend_tx_id` for reconciliation; the
    /// share movement is already final on the ledger.
    #[error("Share spend {spend_tx_id} committed but provenance record failed: {source}")]
    ProvenanceNotRecorded {
        spend_tx_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Key material could not be derived or reconstructed.
    #[error("Key error: {0}")]
    Key(String),

    /// A document or transaction failed to (de)serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Rights Registry - Music Rights Provenance Ledger Client
//!
//! This crate registers music-industry documents (parties, compositions,
//! recordings, publications, releases) on an append-only ledger, moves
//! divisible right shares between parties with a verifiable provenance
//! chain, and answers challenge-based proofs of identity and ownership.
//!
//! ## Modules
//!
//! - `documents` - Typed registry documents and their builders
//! - `ledger` - Transaction model and the ledger boundary (HTTP + in-memory)
//! - `registry` - Document registration operations
//! - `transfer` - Share transfers along a right's provenance chain
//! - `proof` - Challenge-based identity and ownership proofs

pub mod documents;
pub mod error;
pub mod identity;
pub mod keys;
pub mod ledger;
pub mod proof;
pub mod registry;
pub mod transfer;
pub mod validate;

pub use error::{Error, Result};

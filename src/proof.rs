// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Challenge-based identity proofs.
//!
//! A verifier hands the claimant a challenge, the claimant signs it with
//! their registered key, and the verifier checks the signature against the
//! keys the ledger authorizes for the claim. Challenges are caller-supplied
//! and nothing here prevents replay; verifiers that need freshness must mint
//! single-use challenges themselves.

use std::str::FromStr;

use tracing::debug;

use crate::documents::{
    Composition, DocumentType, License, Publication, Recording, Release, Right, RightKind,
};
use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey, Signature};
use crate::ledger::Ledger;
use crate::transfer::{self, TransferRole};

/// What a party can claim to be, relative to a target document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    Composer,
    CompositionRightHolder,
    CompositionRightTransferHolder,
    MechanicalLicenseHolder,
    Publisher,
    Performer,
    RecordingRightHolder,
    RecordingRightTransferHolder,
    RecordLabel,
    MasterLicenseHolder,
}

impl ClaimKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimKind::Composer => "composition",
            ClaimKind::CompositionRightHolder => "composition_right",
            ClaimKind::CompositionRightTransferHolder => "composition_right_transfer",
            ClaimKind::MechanicalLicenseHolder => "mechanical_license",
            ClaimKind::Publisher => "publication",
            ClaimKind::Performer => "recording",
            ClaimKind::RecordingRightHolder => "recording_right",
            ClaimKind::RecordingRightTransferHolder => "recording_right_transfer",
            ClaimKind::RecordLabel => "release",
            ClaimKind::MasterLicenseHolder => "master_license",
        }
    }
}

impl FromStr for ClaimKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "composition" => Ok(ClaimKind::Composer),
            "composition_right" => Ok(ClaimKind::CompositionRightHolder),
            "composition_right_transfer" => Ok(ClaimKind::CompositionRightTransferHolder),
            "mechanical_license" => Ok(ClaimKind::MechanicalLicenseHolder),
            "publication" => Ok(ClaimKind::Publisher),
            "recording" => Ok(ClaimKind::Performer),
            "recording_right" => Ok(ClaimKind::RecordingRightHolder),
            "recording_right_transfer" => Ok(ClaimKind::RecordingRightTransferHolder),
            "release" => Ok(ClaimKind::RecordLabel),
            "master_license" => Ok(ClaimKind::MasterLicenseHolder),
            other => Err(Error::InvalidType(other.to_string())),
        }
    }
}

/// A claim over `target_id`. Right-holder claims additionally name the
/// publication or release scoping the right; transfer-holder claims name the
/// claimant so their side of the transfer can be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub kind: ClaimKind,
    pub target_id: String,
    pub container_id: Option<String>,
    pub party_id: Option<String>,
}

impl Claim {
    pub fn new(kind: ClaimKind, target_id: impl Into<String>) -> Self {
        Self {
            kind,
            target_id: target_id.into(),
            container_id: None,
            party_id: None,
        }
    }

    pub fn within(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn by(mut self, party_id: impl Into<String>) -> Self {
        self.party_id = Some(party_id.into());
        self
    }
}

/// Sign a verifier's challenge.
pub fn prove(challenge: &str, key: &PrivateKey) -> Signature {
    key.sign(challenge.as_bytes())
}

/// The public keys the ledger currently authorizes for a claim.
pub async fn authorized_keys<L: Ledger>(ledger: &L, claim: &Claim) -> Result<Vec<PublicKey>> {
    let keys = match claim.kind {
        ClaimKind::Composer => {
            let value = ledger
                .query_document(&claim.target_id, DocumentType::Composition)
                .await?;
            let composition: Composition = serde_json::from_value(value)?;
            vec![ledger.resolve_party_key(&composition.composer.id).await?]
        }
        ClaimKind::Publisher => {
            let value = ledger
                .query_document(&claim.target_id, DocumentType::Publication)
                .await?;
            let publication: Publication = serde_json::from_value(value)?;
            vec![ledger.resolve_party_key(&publication.publisher.id).await?]
        }
        ClaimKind::Performer => {
            let value = ledger
                .query_document(&claim.target_id, DocumentType::Recording)
                .await?;
            let recording: Recording = serde_json::from_value(value)?;
            vec![ledger.resolve_party_key(&recording.by_artist.id).await?]
        }
        ClaimKind::RecordLabel => {
            let value = ledger
                .query_document(&claim.target_id, DocumentType::Release)
                .await?;
            let release: Release = serde_json::from_value(value)?;
            vec![ledger.resolve_party_key(&release.record_label.id).await?]
        }
        ClaimKind::MechanicalLicenseHolder => license_holder_key(ledger, claim, DocumentType::MechanicalLicense).await?,
        ClaimKind::MasterLicenseHolder => license_holder_key(ledger, claim, DocumentType::MasterLicense).await?,
        ClaimKind::CompositionRightHolder => {
            right_holder_keys(ledger, claim, RightKind::Composition).await?
        }
        ClaimKind::RecordingRightHolder => {
            right_holder_keys(ledger, claim, RightKind::Recording).await?
        }
        ClaimKind::CompositionRightTransferHolder => {
            transfer_holder_key(ledger, claim, RightKind::Composition).await?
        }
        ClaimKind::RecordingRightTransferHolder => {
            transfer_holder_key(ledger, claim, RightKind::Recording).await?
        }
    };
    debug!(kind = claim.kind.as_str(), candidates = keys.len(), "resolved authorized keys");
    Ok(keys)
}

/// Verify a signed challenge: valid when any authorized key verifies it.
pub async fn verify<L: Ledger>(
    ledger: &L,
    claim: &Claim,
    challenge: &str,
    signature: &Signature,
) -> Result<()> {
    let candidates = authorized_keys(ledger, claim).await?;
    if candidates
        .iter()
        .any(|key| key.verify(challenge.as_bytes(), signature))
    {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}

async fn license_holder_key<L: Ledger>(
    ledger: &L,
    claim: &Claim,
    document_type: DocumentType,
) -> Result<Vec<PublicKey>> {
    let value = ledger.query_document(&claim.target_id, document_type).await?;
    let license: License = serde_json::from_value(value)?;
    Ok(vec![ledger.resolve_party_key(&license.recipient.id).await?])
}

/// Holders of a right: the keys owning the outputs of the latest spend along
/// its chain, or the original recipient's registered key when the right has
/// never been transferred. The claim must name the container listing the
/// right.
async fn right_holder_keys<L: Ledger>(
    ledger: &L,
    claim: &Claim,
    kind: RightKind,
) -> Result<Vec<PublicKey>> {
    let container_id = claim.container_id.as_deref().ok_or_else(|| {
        Error::CriteriaNotMet("right holder claim must name a publication or release".to_string())
    })?;
    let container = ledger
        .query_document(container_id, kind.container_document_type())
        .await?;
    let listed = match kind {
        RightKind::Composition => {
            let publication: Publication = serde_json::from_value(container)?;
            publication.composition_right.contains(&claim.target_id)
        }
        RightKind::Recording => {
            let release: Release = serde_json::from_value(container)?;
            release.recording_right.contains(&claim.target_id)
        }
    };
    if !listed {
        return Err(Error::CriteriaNotMet(
            "publication or release does not list the right".to_string(),
        ));
    }
    let spends = ledger.list_transfers(&claim.target_id).await?;
    match spends.last() {
        Some(latest) => Ok(latest.outputs.iter().map(|o| o.public_key).collect()),
        None => {
            let value = ledger
                .query_document(&claim.target_id, kind.document_type())
                .await?;
            let right: Right = serde_json::from_value(value)?;
            Ok(vec![ledger.resolve_party_key(&right.recipient.id).await?])
        }
    }
}

/// A party's standing under a recorded transfer. The claim must name the
/// party; a zero-share side has no standing.
async fn transfer_holder_key<L: Ledger>(
    ledger: &L,
    claim: &Claim,
    kind: RightKind,
) -> Result<Vec<PublicKey>> {
    let party_id = claim.party_id.as_deref().ok_or_else(|| {
        Error::CriteriaNotMet("transfer holder claim must name the claimant party".to_string())
    })?;
    let record = transfer::fetch_transfer(ledger, &claim.target_id, kind).await?;
    if let Some(container_id) = claim.container_id.as_deref() {
        if record.document.container.id != container_id {
            return Err(Error::CriteriaNotMet(
                "cited transfer belongs to a different publication or release".to_string(),
            ));
        }
    }
    let role = transfer::role_of(&record, party_id)?;
    let held = match role {
        TransferRole::Sender => record.sender_shares,
        TransferRole::Recipient => record.recipient_shares,
    };
    if held == 0 {
        return Err(Error::CriteriaNotMet(
            "party holds no shares under the cited transfer".to_string(),
        ));
    }
    Ok(vec![ledger.resolve_party_key(party_id).await?])
}

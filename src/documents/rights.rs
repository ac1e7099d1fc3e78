// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Rights, right transfers, and licenses.
//!
//! The total divisible share count of a right is not stored in the document
//! body; it lives on the creation transaction's output. Likewise a transfer
//! document only links the spend transaction that moved the shares, and the
//! amounts are always read back from that transaction's outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate;

use super::{DocumentType, ItemList, Link, CONTEXT};

/// Which family of rights a right, transfer, or license belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RightKind {
    Composition,
    Recording,
}

impl RightKind {
    pub fn document_type(&self) -> DocumentType {
        match self {
            RightKind::Composition => DocumentType::CompositionRight,
            RightKind::Recording => DocumentType::RecordingRight,
        }
    }

    pub fn transfer_document_type(&self) -> DocumentType {
        match self {
            RightKind::Composition => DocumentType::CompositionRightTransfer,
            RightKind::Recording => DocumentType::RecordingRightTransfer,
        }
    }

    /// The container document that scopes rights of this kind: a publication
    /// for composition rights, a release for recording rights.
    pub fn container_document_type(&self) -> DocumentType {
        match self {
            RightKind::Composition => DocumentType::Publication,
            RightKind::Recording => DocumentType::Release,
        }
    }
}

/// A divisible claim over a composition or recording, granted by `sender` to
/// `recipient` for a territory set and validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Right {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub recipient: Link,
    pub sender: Link,
    pub territory: Vec<String>,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct RightDraft {
    pub kind: RightKind,
    pub recipient_id: String,
    pub territory: Vec<String>,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
}

impl RightDraft {
    /// `sender_id` is the issuing party, supplied by the authenticated
    /// session rather than the draft.
    pub fn build(self, sender_id: &str) -> Result<Right> {
        if self.valid_from > self.valid_through {
            return Err(Error::CriteriaNotMet(
                "validity window ends before it starts".to_string(),
            ));
        }
        Ok(Right {
            context: CONTEXT.to_string(),
            kind: self.kind.document_type().as_str().to_string(),
            recipient: Link::checked(&self.recipient_id)?,
            sender: Link::checked(sender_id)?,
            territory: validate::territories(self.territory),
            valid_from: self.valid_from,
            valid_through: self.valid_through,
        })
    }
}

/// Provenance record: some shares of `right` moved from `sender` to
/// `recipient` in the spend transaction `tx`, scoped to `container` (the
/// publication or release the right appears in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightTransfer {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub right: Link,
    pub container: Link,
    pub recipient: Link,
    pub sender: Link,
    pub tx: Link,
}

impl RightTransfer {
    pub fn new(
        kind: RightKind,
        right_id: &str,
        container_id: &str,
        recipient_id: &str,
        sender_id: &str,
        tx_id: &str,
    ) -> Result<Self> {
        Ok(Self {
            context: CONTEXT.to_string(),
            kind: kind.transfer_document_type().as_str().to_string(),
            right: Link::checked(right_id)?,
            container: Link::checked(container_id)?,
            recipient: Link::checked(recipient_id)?,
            sender: Link::checked(sender_id)?,
            tx: Link::checked(tx_id)?,
        })
    }
}

/// Which family of licenses is being granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseKind {
    Mechanical,
    Master,
}

impl LicenseKind {
    pub fn document_type(&self) -> DocumentType {
        match self {
            LicenseKind::Mechanical => DocumentType::MechanicalLicense,
            LicenseKind::Master => DocumentType::MasterLicense,
        }
    }

    pub fn right_kind(&self) -> RightKind {
        match self {
            LicenseKind::Mechanical => RightKind::Composition,
            LicenseKind::Master => RightKind::Recording,
        }
    }
}

/// A usage grant over enumerated assets or over an entire publication or
/// release, tied to the right (or right transfer) that authorizes the sender
/// to grant it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub recipient: Link,
    pub sender: Link,
    pub territory: Vec<String>,
    pub usage: Vec<String>,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<ItemList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_transfer: Option<Link>,
}

#[derive(Debug, Clone)]
pub struct LicenseDraft {
    pub kind: LicenseKind,
    pub recipient_id: String,
    /// Enumerated composition or recording ids; may be empty when a container
    /// is cited instead.
    pub asset_ids: Vec<String>,
    /// Publication or release id covering the whole grant.
    pub container_id: Option<String>,
    /// The right authorizing the sender to grant this license.
    pub right_id: Option<String>,
    /// Alternatively, the transfer under which the sender holds shares.
    pub right_transfer_id: Option<String>,
    pub territory: Vec<String>,
    pub usage: Vec<String>,
    pub valid_from: NaiveDate,
    pub valid_through: NaiveDate,
}

impl LicenseDraft {
    pub fn build(self, sender_id: &str) -> Result<License> {
        if self.valid_from > self.valid_through {
            return Err(Error::CriteriaNotMet(
                "validity window ends before it starts".to_string(),
            ));
        }
        let asset = if self.asset_ids.is_empty() {
            None
        } else {
            Some(ItemList::from_ids(&self.asset_ids)?)
        };
        let container = self
            .container_id
            .filter(|id| validate::is_id(id))
            .map(Link::new);
        if asset.is_none() && container.is_none() {
            return Err(Error::CriteriaNotMet(
                "license must enumerate assets or cite a publication/release".to_string(),
            ));
        }
        // A container-wide grant must name the authority under which the
        // sender grants it.
        let (right, right_transfer) = if container.is_some() {
            let right = self.right_id.filter(|id| validate::is_id(id)).map(Link::new);
            let transfer = self
                .right_transfer_id
                .filter(|id| validate::is_id(id))
                .map(Link::new);
            match (right, transfer) {
                (Some(right), None) => (Some(right), None),
                (None, Some(transfer)) => (None, Some(transfer)),
                (Some(_), Some(_)) => {
                    return Err(Error::CriteriaNotMet(
                        "cite either the right or the right transfer, not both".to_string(),
                    ))
                }
                (None, None) => {
                    return Err(Error::CriteriaNotMet(
                        "container-wide license must cite a right or right transfer".to_string(),
                    ))
                }
            }
        } else {
            (None, None)
        };
        Ok(License {
            context: CONTEXT.to_string(),
            kind: self.kind.document_type().as_str().to_string(),
            recipient: Link::checked(&self.recipient_id)?,
            sender: Link::checked(sender_id)?,
            territory: validate::territories(self.territory),
            usage: self.usage,
            valid_from: self.valid_from,
            valid_through: self.valid_through,
            asset,
            container,
            right,
            right_transfer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> String {
        hex::encode([byte; 32])
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn right_draft() -> RightDraft {
        RightDraft {
            kind: RightKind::Composition,
            recipient_id: id(2),
            territory: vec!["US".into(), "GB".into()],
            valid_from: date("2024-01-01"),
            valid_through: date("2034-01-01"),
        }
    }

    #[test]
    fn right_carries_kind_discriminator() {
        let right = right_draft().build(&id(1)).unwrap();
        assert_eq!(right.kind, "CompositionRight");
        assert_eq!(right.sender.id, id(1));
        assert_eq!(right.territory, vec!["US".to_string(), "GB".to_string()]);

        let json = serde_json::to_value(&right).unwrap();
        assert_eq!(json["@type"], "CompositionRight");
        assert_eq!(json["validFrom"], "2024-01-01");
    }

    #[test]
    fn right_rejects_inverted_validity_window() {
        let mut draft = right_draft();
        draft.valid_from = date("2035-01-01");
        assert!(matches!(
            draft.build(&id(1)).unwrap_err(),
            Error::CriteriaNotMet(_)
        ));
    }

    #[test]
    fn right_drops_invalid_territory_codes() {
        let mut draft = right_draft();
        draft.territory = vec!["US".into(), "Narnia".into()];
        let right = draft.build(&id(1)).unwrap();
        assert_eq!(right.territory, vec!["US".to_string()]);
    }

    #[test]
    fn transfer_round_trips_through_json() {
        let transfer = RightTransfer::new(
            RightKind::Recording,
            &id(1),
            &id(2),
            &id(3),
            &id(4),
            &id(5),
        )
        .unwrap();
        assert_eq!(transfer.kind, "RecordingRightTransfer");

        let value = serde_json::to_value(&transfer).unwrap();
        assert_eq!(value["@type"], "RecordingRightTransfer");
        let back: RightTransfer = serde_json::from_value(value).unwrap();
        assert_eq!(back, transfer);
    }

    fn license_draft() -> LicenseDraft {
        LicenseDraft {
            kind: LicenseKind::Mechanical,
            recipient_id: id(2),
            asset_ids: vec![],
            container_id: Some(id(3)),
            right_id: Some(id(4)),
            right_transfer_id: None,
            territory: vec!["US".into()],
            usage: vec!["stream".into(), "download".into()],
            valid_from: date("2024-01-01"),
            valid_through: date("2026-01-01"),
        }
    }

    #[test]
    fn container_license_requires_exactly_one_authority() {
        let ok = license_draft().build(&id(1)).unwrap();
        assert_eq!(ok.kind, "MechanicalLicense");
        assert!(ok.right.is_some());
        assert!(ok.right_transfer.is_none());

        let mut neither = license_draft();
        neither.right_id = None;
        assert!(matches!(
            neither.build(&id(1)).unwrap_err(),
            Error::CriteriaNotMet(_)
        ));

        let mut both = license_draft();
        both.right_transfer_id = Some(id(5));
        assert!(matches!(
            both.build(&id(1)).unwrap_err(),
            Error::CriteriaNotMet(_)
        ));
    }

    #[test]
    fn enumerated_license_needs_no_authority_link() {
        let mut draft = license_draft();
        draft.container_id = None;
        draft.right_id = None;
        draft.asset_ids = vec![id(7), id(8)];
        let license = draft.build(&id(1)).unwrap();
        assert_eq!(license.asset.as_ref().unwrap().ids(), vec![id(7), id(8)]);
        assert!(license.container.is_none());
        assert!(license.right.is_none());
    }

    #[test]
    fn license_without_assets_or_container_is_fatal() {
        let mut draft = license_draft();
        draft.container_id = Some("malformed".into());
        draft.asset_ids = vec![];
        assert!(matches!(
            draft.build(&id(1)).unwrap_err(),
            Error::CriteriaNotMet(_)
        ));
    }

    #[test]
    fn enumerated_license_rejects_malformed_asset_id() {
        let mut draft = license_draft();
        draft.container_id = None;
        draft.asset_ids = vec!["junk".into()];
        assert!(matches!(
            draft.build(&id(1)).unwrap_err(),
            Error::InvalidId(_)
        ));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Typed registry documents.
//!
//! Every document type has a draft struct carrying caller-supplied primitive
//! fields and a `build` step producing the immutable document. Builders are
//! pure: identical inputs produce structurally identical documents and no
//! ledger calls are made.
//!
//! Field policy: required identifiers and list invariants fail fast with a
//! tagged error; optional fields that fail their format pattern are silently
//! omitted from the built document (see [`crate::validate`]).

mod catalog;
mod party;
mod rights;

pub use catalog::{
    Collaboration, CollaborationDraft, CollaborationMember, Composition, CompositionDraft,
    Publication, PublicationDraft, Recording, RecordingDraft, Release, ReleaseDraft,
};
pub use party::{Party, PartyDraft, PartyKind};
pub use rights::{
    License, LicenseDraft, LicenseKind, Right, RightDraft, RightKind, RightTransfer,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate;

/// JSON-LD context attached to every document.
pub const CONTEXT: &str = "https://w3id.org/rights-registry/v1";

/// A reference to another ledger document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "@id")]
    pub id: String,
}

impl Link {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// A link whose target must be a well-formed ledger id.
    pub fn checked(id: &str) -> Result<Self> {
        Ok(Self::new(validate::require_id(id)?))
    }
}

/// One positioned entry of an [`ItemList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: String,
    pub position: usize,
    pub item: Link,
}

/// Ordered one-to-many reference encoding. Positions are 1-based and preserve
/// the caller-supplied order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemList {
    #[serde(rename = "@type")]
    pub kind: String,
    pub number_of_items: usize,
    pub item_list_element: Vec<ListItem>,
}

impl ItemList {
    /// Build from ledger ids, validating each. Fails on the first malformed id.
    pub fn from_ids(ids: &[String]) -> Result<Self> {
        let item_list_element = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                Ok(ListItem {
                    kind: "ListItem".to_string(),
                    position: i + 1,
                    item: Link::checked(id)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            kind: "ItemList".to_string(),
            number_of_items: item_list_element.len(),
            item_list_element,
        })
    }

    /// Referenced ids in list order.
    pub fn ids(&self) -> Vec<&str> {
        self.item_list_element
            .iter()
            .map(|e| e.item.id.as_str())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.item_list_element.iter().any(|e| e.item.id == id)
    }
}

/// The closed set of document types the ledger boundary can be asked to
/// validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Party,
    Collaboration,
    Composition,
    Publication,
    Recording,
    Release,
    CompositionRight,
    RecordingRight,
    CompositionRightTransfer,
    RecordingRightTransfer,
    MechanicalLicense,
    MasterLicense,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Party => "Party",
            DocumentType::Collaboration => "MusicCollaboration",
            DocumentType::Composition => "MusicComposition",
            DocumentType::Publication => "MusicPublication",
            DocumentType::Recording => "MusicRecording",
            DocumentType::Release => "MusicRelease",
            DocumentType::CompositionRight => "CompositionRight",
            DocumentType::RecordingRight => "RecordingRight",
            DocumentType::CompositionRightTransfer => "CompositionRightTransfer",
            DocumentType::RecordingRightTransfer => "RecordingRightTransfer",
            DocumentType::MechanicalLicense => "MechanicalLicense",
            DocumentType::MasterLicense => "MasterLicense",
        }
    }

    /// Whether a document's `@type` discriminator satisfies this expectation.
    /// `Party` accepts any of the three party kinds.
    pub fn matches(&self, type_name: &str) -> bool {
        match self {
            DocumentType::Party => {
                matches!(type_name, "Person" | "MusicGroup" | "Organization")
            }
            other => type_name == other.as_str(),
        }
    }
}

/// Read the `@type` discriminator of a raw document value.
pub fn type_of(document: &serde_json::Value) -> Result<&str> {
    document
        .get("@type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| Error::InvalidType("document has no @type".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> String {
        hex::encode([byte; 32])
    }

    #[test]
    fn item_list_preserves_order_with_one_based_positions() {
        let ids = vec![id(3), id(1), id(2)];
        let list = ItemList::from_ids(&ids).unwrap();
        assert_eq!(list.number_of_items, 3);
        assert_eq!(list.ids(), vec![ids[0].as_str(), ids[1].as_str(), ids[2].as_str()]);
        let positions: Vec<usize> = list.item_list_element.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert!(list.contains(&ids[1]));
        assert!(!list.contains(&id(9)));
    }

    #[test]
    fn item_list_rejects_malformed_id() {
        let err = ItemList::from_ids(&[id(1), "bogus".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)));
    }

    #[test]
    fn party_type_matches_all_party_kinds() {
        assert!(DocumentType::Party.matches("Person"));
        assert!(DocumentType::Party.matches("MusicGroup"));
        assert!(DocumentType::Party.matches("Organization"));
        assert!(!DocumentType::Party.matches("MusicComposition"));
        assert!(DocumentType::Composition.matches("MusicComposition"));
    }

    #[test]
    fn type_of_reads_discriminator() {
        let value = serde_json::json!({"@type": "MusicRelease"});
        assert_eq!(type_of(&value).unwrap(), "MusicRelease");
        assert!(matches!(
            type_of(&serde_json::json!({})).unwrap_err(),
            Error::InvalidType(_)
        ));
    }
}

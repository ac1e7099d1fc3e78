// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Catalog documents: compositions, recordings, publications, releases, and
//! collaborations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate;

use super::{ItemList, Link, CONTEXT};

/// A musical work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub composer: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hfa_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iswc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompositionDraft {
    pub title: String,
    pub composer_id: String,
    pub hfa: Option<String>,
    pub iswc: Option<String>,
    pub language: Option<String>,
    pub publisher_id: Option<String>,
    pub same_as: Option<String>,
}

impl CompositionDraft {
    pub fn build(self) -> Result<Composition> {
        if self.title.is_empty() {
            return Err(Error::CriteriaNotMet(
                "composition title is required".to_string(),
            ));
        }
        Ok(Composition {
            context: CONTEXT.to_string(),
            kind: "MusicComposition".to_string(),
            name: self.title,
            composer: Link::checked(&self.composer_id)?,
            hfa_code: validate::optional("hfa", self.hfa, validate::is_hfa),
            iswc_code: validate::optional("iswc", self.iswc, validate::is_iswc),
            in_language: validate::optional("language", self.language, validate::is_language),
            publisher: validate::optional("publisher", self.publisher_id, validate::is_id)
                .map(Link::new),
            same_as: validate::optional("sameAs", self.same_as, validate::is_url),
        })
    }
}

/// A recorded performance of a composition.
///
/// A recording must establish the performer's authority over the underlying
/// work: either a composition right together with the publication it appears
/// in, or a mechanical license, or neither (the artist is the composer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub by_artist: Link,
    pub recording_of: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition_right: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanical_license: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isrc_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_label: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDraft {
    pub artist_id: String,
    pub composition_id: String,
    pub composition_right_id: Option<String>,
    pub publication_id: Option<String>,
    pub mechanical_license_id: Option<String>,
    pub duration: Option<String>,
    pub isrc: Option<String>,
    pub record_label_id: Option<String>,
    pub same_as: Option<String>,
}

impl RecordingDraft {
    pub fn build(self) -> Result<Recording> {
        let composition_right =
            validate::optional("compositionRight", self.composition_right_id, validate::is_id);
        // A cited composition right is only meaningful relative to the
        // publication that lists it.
        let (composition_right, publication, mechanical_license) = match composition_right {
            Some(right_id) => {
                let publication_id = self
                    .publication_id
                    .filter(|id| validate::is_id(id))
                    .ok_or_else(|| {
                        Error::CriteriaNotMet(
                            "a recording citing a composition right must cite its publication"
                                .to_string(),
                        )
                    })?;
                (Some(Link::new(right_id)), Some(Link::new(publication_id)), None)
            }
            None => {
                let license = validate::optional(
                    "mechanicalLicense",
                    self.mechanical_license_id,
                    validate::is_id,
                )
                .map(Link::new);
                (None, None, license)
            }
        };
        Ok(Recording {
            context: CONTEXT.to_string(),
            kind: "MusicRecording".to_string(),
            by_artist: Link::checked(&self.artist_id)?,
            recording_of: Link::checked(&self.composition_id)?,
            composition_right,
            publication,
            mechanical_license,
            duration: self.duration.filter(|d| !d.is_empty()),
            isrc_code: validate::optional("isrc", self.isrc, validate::is_isrc),
            record_label: validate::optional("recordLabel", self.record_label_id, validate::is_id)
                .map(Link::new),
            same_as: validate::optional("sameAs", self.same_as, validate::is_url),
        })
    }
}

/// A published set of compositions and the rights covering them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub publisher: Link,
    pub composition: ItemList,
    pub composition_right: ItemList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PublicationDraft {
    pub title: String,
    pub publisher_id: String,
    pub composition_ids: Vec<String>,
    pub composition_right_ids: Vec<String>,
    pub same_as: Option<String>,
}

impl PublicationDraft {
    pub fn build(self) -> Result<Publication> {
        if self.title.is_empty() {
            return Err(Error::CriteriaNotMet(
                "publication title is required".to_string(),
            ));
        }
        if self.composition_ids.is_empty() {
            return Err(Error::CriteriaNotMet(
                "publication must cite at least one composition".to_string(),
            ));
        }
        if self.composition_right_ids.is_empty() {
            return Err(Error::CriteriaNotMet(
                "publication must cite at least one composition right".to_string(),
            ));
        }
        Ok(Publication {
            context: CONTEXT.to_string(),
            kind: "MusicPublication".to_string(),
            name: self.title,
            publisher: Link::checked(&self.publisher_id)?,
            composition: ItemList::from_ids(&self.composition_ids)?,
            composition_right: ItemList::from_ids(&self.composition_right_ids)?,
            same_as: validate::optional("sameAs", self.same_as, validate::is_url),
        })
    }
}

/// A released set of recordings and the rights covering them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub record_label: Link,
    pub recording: ItemList,
    pub recording_right: ItemList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseDraft {
    pub title: String,
    pub record_label_id: String,
    pub recording_ids: Vec<String>,
    pub recording_right_ids: Vec<String>,
    pub same_as: Option<String>,
}

impl ReleaseDraft {
    pub fn build(self) -> Result<Release> {
        if self.title.is_empty() {
            return Err(Error::CriteriaNotMet("release title is required".to_string()));
        }
        if self.recording_ids.is_empty() {
            return Err(Error::CriteriaNotMet(
                "release must cite at least one recording".to_string(),
            ));
        }
        if self.recording_right_ids.is_empty() {
            return Err(Error::CriteriaNotMet(
                "release must cite at least one recording right".to_string(),
            ));
        }
        Ok(Release {
            context: CONTEXT.to_string(),
            kind: "MusicRelease".to_string(),
            name: self.title,
            record_label: Link::checked(&self.record_label_id)?,
            recording: ItemList::from_ids(&self.recording_ids)?,
            recording_right: ItemList::from_ids(&self.recording_right_ids)?,
            same_as: validate::optional("sameAs", self.same_as, validate::is_url),
        })
    }
}

/// One member of a collaboration, with an optional role and split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationMember {
    #[serde(rename = "@type")]
    pub kind: String,
    pub member: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<u32>,
}

/// A multi-party working arrangement, registered with every member as a
/// transaction co-owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub member: Vec<CollaborationMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CollaborationDraft {
    pub name: Option<String>,
    pub member_ids: Vec<String>,
    /// If present, must have one entry per member.
    pub role_names: Vec<String>,
    /// If present, must have one entry per member.
    pub splits: Vec<u32>,
}

impl CollaborationDraft {
    pub fn build(self) -> Result<Collaboration> {
        let count = self.member_ids.len();
        if count == 0 {
            return Err(Error::CriteriaNotMet(
                "collaboration needs at least one member".to_string(),
            ));
        }
        if !self.role_names.is_empty() && self.role_names.len() != count {
            return Err(Error::CriteriaNotMet(
                "role name count does not match member count".to_string(),
            ));
        }
        if !self.splits.is_empty() && self.splits.len() != count {
            return Err(Error::CriteriaNotMet(
                "split count does not match member count".to_string(),
            ));
        }
        let member = self
            .member_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                Ok(CollaborationMember {
                    kind: "OrganizationRole".to_string(),
                    member: Link::checked(id)?,
                    role_name: self.role_names.get(i).cloned(),
                    split: self.splits.get(i).copied(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Collaboration {
            context: CONTEXT.to_string(),
            kind: "MusicCollaboration".to_string(),
            member,
            name: self.name.filter(|n| !n.is_empty()),
        })
    }

    pub fn member_ids(&self) -> &[String] {
        &self.member_ids
    }
}

impl Collaboration {
    pub fn member_ids(&self) -> Vec<&str> {
        self.member.iter().map(|m| m.member.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> String {
        hex::encode([byte; 32])
    }

    #[test]
    fn composition_requires_composer_id() {
        let err = CompositionDraft {
            title: "Etude".into(),
            composer_id: "not-an-id".into(),
            ..CompositionDraft::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)));
    }

    #[test]
    fn composition_drops_malformed_codes() {
        let composition = CompositionDraft {
            title: "Etude".into(),
            composer_id: id(1),
            hfa: Some("!!!".into()),
            iswc: Some("T-034.524.680-1".into()),
            language: Some("en".into()),
            publisher_id: Some("bogus".into()),
            same_as: None,
        }
        .build()
        .unwrap();
        assert!(composition.hfa_code.is_none());
        assert_eq!(composition.iswc_code.as_deref(), Some("T-034.524.680-1"));
        assert!(composition.publisher.is_none());

        let json = serde_json::to_value(&composition).unwrap();
        assert!(json.get("hfaCode").is_none());
        assert_eq!(json["iswcCode"], "T-034.524.680-1");
    }

    #[test]
    fn recording_right_requires_publication() {
        let err = RecordingDraft {
            artist_id: id(1),
            composition_id: id(2),
            composition_right_id: Some(id(3)),
            publication_id: None,
            ..RecordingDraft::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));

        let ok = RecordingDraft {
            artist_id: id(1),
            composition_id: id(2),
            composition_right_id: Some(id(3)),
            publication_id: Some(id(4)),
            ..RecordingDraft::default()
        }
        .build()
        .unwrap();
        assert_eq!(ok.composition_right.as_ref().unwrap().id, id(3));
        assert_eq!(ok.publication.as_ref().unwrap().id, id(4));
        assert!(ok.mechanical_license.is_none());
    }

    #[test]
    fn recording_malformed_right_id_falls_back_to_license() {
        let recording = RecordingDraft {
            artist_id: id(1),
            composition_id: id(2),
            composition_right_id: Some("junk".into()),
            mechanical_license_id: Some(id(5)),
            ..RecordingDraft::default()
        }
        .build()
        .unwrap();
        assert!(recording.composition_right.is_none());
        assert_eq!(recording.mechanical_license.as_ref().unwrap().id, id(5));
    }

    #[test]
    fn recording_with_neither_right_nor_license() {
        // The artist is the composer; no authority link required.
        let recording = RecordingDraft {
            artist_id: id(1),
            composition_id: id(2),
            isrc: Some("US-S1Z-99-00001".into()),
            ..RecordingDraft::default()
        }
        .build()
        .unwrap();
        assert!(recording.composition_right.is_none());
        assert!(recording.mechanical_license.is_none());
        assert_eq!(recording.isrc_code.as_deref(), Some("US-S1Z-99-00001"));
    }

    #[test]
    fn publication_requires_compositions_and_rights() {
        let base = PublicationDraft {
            title: "Collected Works".into(),
            publisher_id: id(9),
            composition_ids: vec![id(1)],
            composition_right_ids: vec![id(2)],
            same_as: None,
        };

        assert!(base.clone().build().is_ok());

        let mut missing_compositions = base.clone();
        missing_compositions.composition_ids.clear();
        assert!(matches!(
            missing_compositions.build().unwrap_err(),
            Error::CriteriaNotMet(_)
        ));

        let mut missing_rights = base;
        missing_rights.composition_right_ids.clear();
        assert!(matches!(
            missing_rights.build().unwrap_err(),
            Error::CriteriaNotMet(_)
        ));
    }

    #[test]
    fn release_preserves_recording_order() {
        let release = ReleaseDraft {
            title: "First Pressing".into(),
            record_label_id: id(9),
            recording_ids: vec![id(3), id(1)],
            recording_right_ids: vec![id(4)],
            same_as: None,
        }
        .build()
        .unwrap();
        assert_eq!(release.recording.ids(), vec![id(3), id(1)]);
    }

    #[test]
    fn collaboration_list_length_invariants() {
        let ok = CollaborationDraft {
            name: Some("Duo".into()),
            member_ids: vec![id(1), id(2)],
            role_names: vec!["composer".into(), "lyricist".into()],
            splits: vec![60, 40],
        }
        .build()
        .unwrap();
        assert_eq!(ok.member.len(), 2);
        assert_eq!(ok.member[1].split, Some(40));

        let err = CollaborationDraft {
            member_ids: vec![id(1), id(2)],
            role_names: vec!["composer".into()],
            ..CollaborationDraft::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));

        let err = CollaborationDraft {
            member_ids: vec![id(1), id(2)],
            splits: vec![100],
            ..CollaborationDraft::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));

        let err = CollaborationDraft::default().build().unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));
    }
}

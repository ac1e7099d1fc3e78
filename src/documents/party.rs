// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Party identity documents.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate;

use super::{Link, CONTEXT};

/// Kind of party recorded on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyKind {
    Person,
    MusicGroup,
    Organization,
}

impl PartyKind {
    /// Group kinds may carry member links.
    pub fn is_group(&self) -> bool {
        matches!(self, PartyKind::MusicGroup | PartyKind::Organization)
    }
}

impl FromStr for PartyKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Person" => Ok(PartyKind::Person),
            "MusicGroup" => Ok(PartyKind::MusicGroup),
            "Organization" => Ok(PartyKind::Organization),
            other => Err(Error::InvalidType(other.to_string())),
        }
    }
}

/// A person, group, or organization holding rights or granting licenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: PartyKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipi_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isni_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<Vec<Link>>,
}

/// Caller-supplied fields for a new party record.
#[derive(Debug, Clone, Default)]
pub struct PartyDraft {
    pub name: String,
    pub email: Option<String>,
    pub ipi: Option<String>,
    pub isni: Option<String>,
    pub pro: Option<String>,
    pub same_as: Option<String>,
    /// Member party ids; only meaningful for group kinds.
    pub member_ids: Vec<String>,
}

impl PartyDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn build(self, kind: PartyKind) -> Result<Party> {
        if self.name.is_empty() {
            return Err(Error::CriteriaNotMet("party name is required".to_string()));
        }
        let member = if kind.is_group() && !self.member_ids.is_empty() {
            let links = self
                .member_ids
                .iter()
                .map(|id| Link::checked(id))
                .collect::<Result<Vec<_>>>()?;
            Some(links)
        } else {
            if !self.member_ids.is_empty() {
                tracing::debug!(kind = ?kind, "ignoring member ids on a non-group party");
            }
            None
        };
        Ok(Party {
            context: CONTEXT.to_string(),
            kind,
            name: self.name,
            email: validate::optional("email", self.email, validate::is_email),
            ipi_number: validate::optional("ipi", self.ipi, validate::is_ipi),
            isni_number: validate::optional("isni", self.isni, validate::is_isni),
            pro: validate::optional("pro", self.pro, validate::is_pro),
            same_as: validate::optional("sameAs", self.same_as, validate::is_url),
            member,
        })
    }
}

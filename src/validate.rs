// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Format patterns for ledger identifiers and music-industry codes.
//!
//! Document builders apply a permissive policy to optional fields: a value
//! that fails its pattern is dropped from the document instead of failing the
//! whole construction. Required identifiers are strict and fail fast.

use std::sync::LazyLock;

use regex::Regex;

/// Ledger transaction id: 64 lowercase hex characters.
static ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{64}$").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$").unwrap());

/// ISWC, e.g. `T-034.524.680-1`. Separators are optional.
static ISWC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^T-?\d{3}\.?\d{3}\.?\d{3}-?\d$").unwrap());

/// ISRC, e.g. `US-S1Z-99-00001`. Separators are optional.
static ISRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}-?[A-Z0-9]{3}-?\d{2}-?\d{5}$").unwrap());

/// IPI name number: 9 to 11 digits.
static IPI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9,11}$").unwrap());

/// ISNI: 16 characters, last may be a check `X`.
static ISNI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{15}[\dX]$").unwrap());

/// HFA song code: 6 alphanumeric characters.
static HFA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{6}$").unwrap());

/// Performance rights organizations accepted on party records.
static PRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ASCAP|BMI|SESAC|GMR|SOCAN|PRS|PPL|GEMA|SACEM|JASRAC)$").unwrap()
});

/// BCP-47-ish language tag: `en`, `pt-BR`.
static LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").unwrap());

/// ISO 3166-1 alpha-2 territory code.
static TERRITORY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

pub fn is_id(value: &str) -> bool {
    ID.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_iswc(value: &str) -> bool {
    ISWC.is_match(value)
}

pub fn is_isrc(value: &str) -> bool {
    ISRC.is_match(value)
}

pub fn is_ipi(value: &str) -> bool {
    IPI.is_match(value)
}

pub fn is_isni(value: &str) -> bool {
    ISNI.is_match(value)
}

pub fn is_hfa(value: &str) -> bool {
    HFA.is_match(value)
}

pub fn is_pro(value: &str) -> bool {
    PRO.is_match(value)
}

pub fn is_language(value: &str) -> bool {
    LANGUAGE.is_match(value)
}

pub fn is_territory(value: &str) -> bool {
    TERRITORY.is_match(value)
}

pub fn is_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Strict identifier check for required references.
pub fn require_id(value: &str) -> crate::Result<&str> {
    if is_id(value) {
        Ok(value)
    } else {
        Err(crate::Error::InvalidId(value.to_string()))
    }
}

/// Permissive filter for an optional field: keeps the value when it matches,
/// drops it (with a debug log) otherwise.
pub fn optional(
    field: &'static str,
    value: Option<String>,
    matches: impl Fn(&str) -> bool,
) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    if matches(&value) {
        Some(value)
    } else {
        tracing::debug!(field, %value, "dropping optional field that failed validation");
        None
    }
}

/// Permissive filter over a territory list: invalid codes are dropped.
pub fn territories(codes: Vec<String>) -> Vec<String> {
    codes
        .into_iter()
        .filter(|code| {
            let ok = is_territory(code);
            if !ok {
                tracing::debug!(%code, "dropping invalid territory code");
            }
            ok
        })
        .collect()
}

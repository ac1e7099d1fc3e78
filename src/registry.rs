// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Document registration operations.
//!
//! Every operation follows the same shape: build and validate the document,
//! wrap it in a CREATE transaction, fulfill with the acting party's key, and
//! submit through the ledger boundary. Construction errors abort before any
//! boundary call is made.

use tracing::info;

use crate::documents::{
    Collaboration, CollaborationDraft, Composition, CompositionDraft, License, LicenseDraft,
    Party, PartyDraft, PartyKind, Publication, PublicationDraft, Recording, RecordingDraft,
    Release, ReleaseDraft, Right, RightDraft,
};
use crate::error::Result;
use crate::identity::{Credentials, Identity};
use crate::keys::PrivateKey;
use crate::ledger::{Ledger, Transaction};

/// A document that has been committed to the ledger, paired with the id of
/// the transaction that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted<T> {
    pub id: String,
    pub document: T,
}

/// The registry service, generic over the ledger boundary.
pub struct Registry<L> {
    ledger: L,
}

impl<L: Ledger> Registry<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Register a new party. The keypair is derived from the password (see
    /// [`PrivateKey::from_password`] for the caveat) and the returned
    /// credentials are the only copy of it.
    pub async fn register_party(
        &self,
        kind: PartyKind,
        draft: PartyDraft,
        password: &str,
    ) -> Result<Submitted<Party>> {
        let key = PrivateKey::from_password(password)?;
        let party = draft.build(kind)?;
        let mut tx = Transaction::create(
            serde_json::to_value(&party)?,
            &key.public(),
            &key.public(),
        );
        tx.fulfill(&key)?;
        let id = self.ledger.post_transaction(&tx).await?;
        info!(name = %party.name, %id, "registered new party");
        Ok(Submitted {
            id,
            document: party,
        })
    }

    /// Credentials for a party registered through [`Self::register_party`].
    pub fn credentials(submitted: &Submitted<Party>, password: &str) -> Result<Credentials> {
        Ok(Credentials {
            id: submitted.id.clone(),
            private_key: PrivateKey::from_password(password)?.to_string(),
        })
    }

    pub async fn compose(
        &self,
        identity: &Identity,
        draft: CompositionDraft,
    ) -> Result<Submitted<Composition>> {
        let composition = draft.build()?;
        let id = self.submit(identity, serde_json::to_value(&composition)?).await?;
        info!(%id, "registered composition");
        Ok(Submitted {
            id,
            document: composition,
        })
    }

    /// Register a collaboration with every member as a transaction co-owner.
    pub async fn collaborate(
        &self,
        identity: &Identity,
        draft: CollaborationDraft,
    ) -> Result<Submitted<Collaboration>> {
        let mut owners = Vec::with_capacity(draft.member_ids().len());
        for member_id in draft.member_ids() {
            owners.push(self.ledger.resolve_party_key(member_id).await?);
        }
        let collaboration = draft.build()?;
        let mut tx = Transaction::create_multi_owner(
            serde_json::to_value(&collaboration)?,
            &owners,
            &identity.public_key(),
        );
        tx.fulfill(identity.key())?;
        let id = self.ledger.post_transaction(&tx).await?;
        info!(%id, members = owners.len(), "registered collaboration");
        Ok(Submitted {
            id,
            document: collaboration,
        })
    }

    pub async fn record(
        &self,
        identity: &Identity,
        draft: RecordingDraft,
    ) -> Result<Submitted<Recording>> {
        let recording = draft.build()?;
        let id = self.submit(identity, serde_json::to_value(&recording)?).await?;
        info!(%id, "registered recording");
        Ok(Submitted {
            id,
            document: recording,
        })
    }

    pub async fn publish(
        &self,
        identity: &Identity,
        draft: PublicationDraft,
    ) -> Result<Submitted<Publication>> {
        let publication = draft.build()?;
        let id = self.submit(identity, serde_json::to_value(&publication)?).await?;
        info!(%id, "registered publication");
        Ok(Submitted {
            id,
            document: publication,
        })
    }

    pub async fn release(
        &self,
        identity: &Identity,
        draft: ReleaseDraft,
    ) -> Result<Submitted<Release>> {
        let release = draft.build()?;
        let id = self.submit(identity, serde_json::to_value(&release)?).await?;
        info!(%id, "registered release");
        Ok(Submitted {
            id,
            document: release,
        })
    }

    /// Issue a right with `total_shares` divisible shares. The share count is
    /// recorded as the creation transaction's output amount, owned by the
    /// recipient; the document body never carries it.
    pub async fn issue_right(
        &self,
        identity: &Identity,
        draft: RightDraft,
        total_shares: u64,
    ) -> Result<Submitted<Right>> {
        let recipient_key = self.ledger.resolve_party_key(&draft.recipient_id).await?;
        let right = draft.build(identity.party_id())?;
        let mut tx = Transaction::create_with_shares(
            total_shares,
            serde_json::to_value(&right)?,
            &recipient_key,
            &identity.public_key(),
        );
        tx.fulfill(identity.key())?;
        let id = self.ledger.post_transaction(&tx).await?;
        info!(%id, total_shares, "issued right");
        Ok(Submitted {
            id,
            document: right,
        })
    }

    pub async fn license(
        &self,
        identity: &Identity,
        draft: LicenseDraft,
    ) -> Result<Submitted<License>> {
        let license = draft.build(identity.party_id())?;
        let id = self.submit(identity, serde_json::to_value(&license)?).await?;
        info!(%id, "granted license");
        Ok(Submitted {
            id,
            document: license,
        })
    }

    async fn submit(&self, identity: &Identity, document: serde_json::Value) -> Result<String> {
        let mut tx =
            Transaction::create(document, &identity.public_key(), &identity.public_key());
        tx.fulfill(identity.key())?;
        self.ledger.post_transaction(&tx).await
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! Share transfers along a right's provenance chain.
//!
//! Shares move in two steps: a TRANSFER transaction splits the spent output
//! between the sender's retained portion and the recipient's portion, then a
//! provenance document citing that spend is committed. The two steps are not
//! atomic; when the second fails the shares have still moved, and the error
//! carries the spend transaction id so the caller can retry the document.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::{Publication, Release, RightKind, RightTransfer};
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::ledger::{Ledger, Transaction};
use crate::registry::Submitted;

/// Which side of a recorded transfer a party stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRole {
    Sender,
    Recipient,
}

/// A committed right transfer together with the share amounts read back from
/// its spend transaction's outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub id: String,
    pub document: RightTransfer,
    /// Shares the sender retained in the spend. Zero for a full divestment.
    pub sender_shares: u64,
    /// Shares the recipient received in the spend.
    pub recipient_shares: u64,
}

/// Load a transfer document and recover its share amounts from the cited
/// spend transaction. One output means the sender divested fully; two outputs
/// split retained and transferred portions in that order.
pub async fn fetch_transfer<L: Ledger>(
    ledger: &L,
    transfer_id: &str,
    kind: RightKind,
) -> Result<TransferRecord> {
    let value = ledger
        .query_document(transfer_id, kind.transfer_document_type())
        .await?;
    let document: RightTransfer = serde_json::from_value(value)?;
    let spend = ledger.get_transaction(&document.tx.id).await?;
    let (sender_shares, recipient_shares) = match spend.outputs.len() {
        1 => (0, spend.output_amount(0)?),
        2 => (spend.output_amount(0)?, spend.output_amount(1)?),
        n => {
            return Err(Error::CriteriaNotMet(format!(
                "spend transaction has {n} outputs, expected 1 or 2"
            )))
        }
    };
    Ok(TransferRecord {
        id: transfer_id.to_string(),
        document,
        sender_shares,
        recipient_shares,
    })
}

/// Which side of the recorded transfer `party_id` stands on.
pub fn role_of(record: &TransferRecord, party_id: &str) -> Result<TransferRole> {
    if record.document.sender.id == party_id {
        Ok(TransferRole::Sender)
    } else if record.document.recipient.id == party_id {
        Ok(TransferRole::Recipient)
    } else {
        Err(Error::CriteriaNotMet(
            "party is neither sender nor recipient of the cited transfer".to_string(),
        ))
    }
}

/// The output of the recorded spend that the given role now owns and would
/// spend next. The sender's retained portion is always output 0. The
/// recipient's portion is output 1, except after a full divestment, where the
/// spend had a single output.
pub fn spend_output_index(role: TransferRole, record: &TransferRecord) -> u32 {
    match role {
        TransferRole::Sender => 0,
        TransferRole::Recipient => {
            if record.sender_shares == 0 {
                0
            } else {
                1
            }
        }
    }
}

/// What the caller's shares rest on: the right issuance itself, or a prior
/// transfer along its chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferBasis {
    Right(String),
    Transfer(String),
}

#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub kind: RightKind,
    pub basis: TransferBasis,
    /// The publication or release the right appears in.
    pub container_id: String,
    pub recipient_id: String,
    pub recipient_shares: u64,
}

/// Executes share transfers against a ledger.
pub struct TransferAccountant<'a, L> {
    ledger: &'a L,
}

impl<'a, L: Ledger> TransferAccountant<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Move `recipient_shares` of a right from the caller to the recipient.
    ///
    /// The caller's available shares and the output to spend are derived from
    /// the basis: the full issuance amount when transferring directly from
    /// the right, or the caller's side of a prior transfer. Overdraw fails
    /// before anything is submitted.
    pub async fn transfer(
        &self,
        identity: &Identity,
        request: TransferRequest,
    ) -> Result<Submitted<RightTransfer>> {
        if request.recipient_shares == 0 {
            return Err(Error::CriteriaNotMet(
                "cannot transfer zero shares".to_string(),
            ));
        }
        let recipient_key = self.ledger.resolve_party_key(&request.recipient_id).await?;
        let basis = self.resolve_basis(identity, &request).await?;

        let sender_shares = basis
            .available
            .checked_sub(request.recipient_shares)
            .ok_or_else(|| {
                Error::CriteriaNotMet("cannot transfer this many shares".to_string())
            })?;

        let splits = if sender_shares == 0 {
            vec![(request.recipient_shares, recipient_key)]
        } else {
            vec![
                (sender_shares, identity.public_key()),
                (request.recipient_shares, recipient_key),
            ]
        };
        let mut spend = Transaction::transfer(
            &splits,
            &basis.right_id,
            &basis.spent_tx_id,
            basis.spent_output,
            &identity.public_key(),
        );
        spend.fulfill(identity.key())?;
        let spend_tx_id = self.ledger.post_transaction(&spend).await?;
        info!(
            %spend_tx_id,
            retained = sender_shares,
            transferred = request.recipient_shares,
            "committed share spend"
        );

        let document = RightTransfer::new(
            request.kind,
            &basis.right_id,
            &request.container_id,
            &request.recipient_id,
            identity.party_id(),
            &spend_tx_id,
        )?;
        let mut provenance = Transaction::create(
            serde_json::to_value(&document)?,
            &identity.public_key(),
            &identity.public_key(),
        );
        provenance.fulfill(identity.key())?;
        let id = match self.ledger.post_transaction(&provenance).await {
            Ok(id) => id,
            Err(source) => {
                warn!(%spend_tx_id, "shares moved but provenance document was not recorded");
                return Err(Error::ProvenanceNotRecorded {
                    spend_tx_id,
                    source: Box::new(source),
                });
            }
        };
        info!(%id, "recorded right transfer");
        Ok(Submitted { id, document })
    }

    /// Resolve the basis into the right id, the available share count, and
    /// the output the caller would spend.
    async fn resolve_basis(
        &self,
        identity: &Identity,
        request: &TransferRequest,
    ) -> Result<ResolvedBasis> {
        match &request.basis {
            TransferBasis::Right(right_id) => {
                let right = self
                    .ledger
                    .query_document(right_id, request.kind.document_type())
                    .await?;
                let right: crate::documents::Right = serde_json::from_value(right)?;
                if right.recipient.id != identity.party_id() {
                    return Err(Error::CriteriaNotMet(
                        "only the right holder can transfer from the issuance".to_string(),
                    ));
                }
                self.check_container(request, right_id).await?;
                let creation = self.ledger.get_transaction(right_id).await?;
                Ok(ResolvedBasis {
                    right_id: right_id.clone(),
                    available: creation.share_amount()?,
                    spent_tx_id: right_id.clone(),
                    spent_output: 0,
                })
            }
            TransferBasis::Transfer(transfer_id) => {
                let record = fetch_transfer(self.ledger, transfer_id, request.kind).await?;
                if record.document.container.id != request.container_id {
                    return Err(Error::CriteriaNotMet(
                        "cited transfer belongs to a different publication or release"
                            .to_string(),
                    ));
                }
                let role = role_of(&record, identity.party_id())?;
                let available = match role {
                    TransferRole::Sender => record.sender_shares,
                    TransferRole::Recipient => record.recipient_shares,
                };
                Ok(ResolvedBasis {
                    right_id: record.document.right.id.clone(),
                    available,
                    spent_tx_id: record.document.tx.id.clone(),
                    spent_output: spend_output_index(role, &record),
                })
            }
        }
    }

    /// The container must list the right being transferred.
    async fn check_container(&self, request: &TransferRequest, right_id: &str) -> Result<()> {
        let container = self
            .ledger
            .query_document(&request.container_id, request.kind.container_document_type())
            .await?;
        let listed = match request.kind {
            RightKind::Composition => {
                let publication: Publication = serde_json::from_value(container)?;
                publication.composition_right.contains(right_id)
            }
            RightKind::Recording => {
                let release: Release = serde_json::from_value(container)?;
                release.recording_right.contains(right_id)
            }
        };
        if !listed {
            return Err(Error::CriteriaNotMet(
                "publication or release does not list the right".to_string(),
            ));
        }
        Ok(())
    }
}

struct ResolvedBasis {
    right_id: String,
    available: u64,
    spent_tx_id: String,
    spent_output: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{PartyDraft, PartyKind, PublicationDraft, RightDraft};
    use crate::keys::PrivateKey;
    use crate::ledger::MemoryLedger;
    use crate::registry::Registry;

    struct Fixture {
        registry: Registry<MemoryLedger>,
        composer: Identity,
        publisher: Identity,
        carol: Identity,
        dave: Identity,
        right_id: String,
        publication_id: String,
    }

    /// Ledger double that commits share spends but rejects the follow-up
    /// provenance documents, as a flaky node would between the two steps.
    struct ProvenanceRejectingLedger {
        inner: MemoryLedger,
    }

    impl Ledger for ProvenanceRejectingLedger {
        async fn get_transaction(&self, id: &str) -> Result<Transaction> {
            self.inner.get_transaction(id).await
        }

        async fn post_transaction(&self, tx: &Transaction) -> Result<String> {
            let is_provenance = tx
                .asset_document()
                .and_then(|doc| doc.get("@type"))
                .and_then(serde_json::Value::as_str)
                .is_some_and(|t| t.ends_with("RightTransfer"));
            if is_provenance {
                return Err(Error::Submission("node unavailable".to_string()));
            }
            self.inner.post_transaction(tx).await
        }

        async fn list_transfers(&self, asset_id: &str) -> Result<Vec<Transaction>> {
            self.inner.list_transfers(asset_id).await
        }
    }

    async fn identity<L: Ledger>(registry: &Registry<L>, name: &str) -> Identity {
        let submitted = registry
            .register_party(PartyKind::Person, PartyDraft::new(name), name)
            .await
            .unwrap();
        Identity::new(submitted.id, PrivateKey::from_password(name).unwrap())
    }

    /// Composer issues a 100-share composition right to the publisher and the
    /// publisher registers the publication listing it.
    async fn fixture() -> Fixture {
        let registry = Registry::new(MemoryLedger::new());
        let composer = identity(&registry, "composer").await;
        let publisher = identity(&registry, "publisher").await;
        let carol = identity(&registry, "carol").await;
        let dave = identity(&registry, "dave").await;

        let composition = registry
            .compose(
                &composer,
                crate::documents::CompositionDraft {
                    title: "Etude".into(),
                    composer_id: composer.party_id().to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let right = registry
            .issue_right(
                &composer,
                RightDraft {
                    kind: RightKind::Composition,
                    recipient_id: publisher.party_id().to_string(),
                    territory: vec!["US".into()],
                    valid_from: "2024-01-01".parse().unwrap(),
                    valid_through: "2034-01-01".parse().unwrap(),
                },
                100,
            )
            .await
            .unwrap();
        let publication = registry
            .publish(
                &publisher,
                PublicationDraft {
                    title: "Collected Works".into(),
                    publisher_id: publisher.party_id().to_string(),
                    composition_ids: vec![composition.id],
                    composition_right_ids: vec![right.id.clone()],
                    same_as: None,
                },
            )
            .await
            .unwrap();
        Fixture {
            registry,
            composer,
            publisher,
            carol,
            dave,
            right_id: right.id,
            publication_id: publication.id,
        }
    }

    fn request(f: &Fixture, basis: TransferBasis, recipient: &Identity, shares: u64) -> TransferRequest {
        TransferRequest {
            kind: RightKind::Composition,
            basis,
            container_id: f.publication_id.clone(),
            recipient_id: recipient.party_id().to_string(),
            recipient_shares: shares,
        }
    }

    #[tokio::test]
    async fn partial_transfer_conserves_shares() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());

        let transfer = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 40),
            )
            .await
            .unwrap();

        let record = fetch_transfer(f.registry.ledger(), &transfer.id, RightKind::Composition)
            .await
            .unwrap();
        assert_eq!(record.sender_shares, 60);
        assert_eq!(record.recipient_shares, 40);
        assert_eq!(record.document.sender.id, f.publisher.party_id());
        assert_eq!(record.document.recipient.id, f.carol.party_id());
        assert_eq!(record.document.right.id, f.right_id);
    }

    #[tokio::test]
    async fn overdraw_fails_before_any_submission() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());
        let before = f.registry.ledger().len().await;

        let err = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 101),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));
        assert_eq!(f.registry.ledger().len().await, before);

        let err = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));
        assert_eq!(f.registry.ledger().len().await, before);
    }

    #[tokio::test]
    async fn only_the_right_holder_transfers_from_the_issuance() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());

        let err = accountant
            .transfer(
                &f.carol,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.dave, 10),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));
    }

    #[tokio::test]
    async fn chained_transfer_spends_the_callers_output() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());

        // publisher keeps 60, carol gets 40
        let first = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 40),
            )
            .await
            .unwrap();

        // carol divests her full 40 to dave
        let second = accountant
            .transfer(
                &f.carol,
                request(&f, TransferBasis::Transfer(first.id.clone()), &f.dave, 40),
            )
            .await
            .unwrap();
        let record = fetch_transfer(f.registry.ledger(), &second.id, RightKind::Composition)
            .await
            .unwrap();
        assert_eq!(record.sender_shares, 0);
        assert_eq!(record.recipient_shares, 40);

        // dave's portion after a full divestment sits on output 0
        let role = role_of(&record, f.dave.party_id()).unwrap();
        assert_eq!(role, TransferRole::Recipient);
        assert_eq!(spend_output_index(role, &record), 0);

        // dave passes 10 back to the publisher, spending that single output
        let third = accountant
            .transfer(
                &f.dave,
                request(&f, TransferBasis::Transfer(second.id.clone()), &f.publisher, 10),
            )
            .await
            .unwrap();
        let record = fetch_transfer(f.registry.ledger(), &third.id, RightKind::Composition)
            .await
            .unwrap();
        assert_eq!(record.sender_shares, 30);
        assert_eq!(record.recipient_shares, 10);
    }

    #[tokio::test]
    async fn sender_retained_shares_stay_spendable() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());

        let first = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 40),
            )
            .await
            .unwrap();

        // publisher spends the retained 60 via the same transfer record
        let second = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Transfer(first.id.clone()), &f.dave, 25),
            )
            .await
            .unwrap();
        let record = fetch_transfer(f.registry.ledger(), &second.id, RightKind::Composition)
            .await
            .unwrap();
        assert_eq!(record.sender_shares, 35);
        assert_eq!(record.recipient_shares, 25);
    }

    #[tokio::test]
    async fn third_party_cannot_spend_someone_elses_transfer() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());

        let first = accountant
            .transfer(
                &f.publisher,
                request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 40),
            )
            .await
            .unwrap();

        let err = accountant
            .transfer(
                &f.composer,
                request(&f, TransferBasis::Transfer(first.id), &f.dave, 5),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));
    }

    #[tokio::test]
    async fn container_must_list_the_right() {
        let f = fixture().await;
        let accountant = TransferAccountant::new(f.registry.ledger());

        // a second publication that does not list the right
        let other = f
            .registry
            .publish(
                &f.publisher,
                PublicationDraft {
                    title: "Other".into(),
                    publisher_id: f.publisher.party_id().to_string(),
                    composition_ids: vec!["ab".repeat(32)],
                    composition_right_ids: vec!["cd".repeat(32)],
                    same_as: None,
                },
            )
            .await
            .unwrap();

        let mut req = request(&f, TransferBasis::Right(f.right_id.clone()), &f.carol, 10);
        req.container_id = other.id;
        let err = accountant.transfer(&f.publisher, req).await.unwrap_err();
        assert!(matches!(err, Error::CriteriaNotMet(_)));
    }

    #[tokio::test]
    async fn provenance_failure_surfaces_committed_spend() {
        let registry = Registry::new(ProvenanceRejectingLedger {
            inner: MemoryLedger::new(),
        });
        let composer = identity(&registry, "composer").await;
        let publisher = identity(&registry, "publisher").await;
        let carol = identity(&registry, "carol").await;

        let composition = registry
            .compose(
                &composer,
                crate::documents::CompositionDraft {
                    title: "Etude".into(),
                    composer_id: composer.party_id().to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let right = registry
            .issue_right(
                &composer,
                RightDraft {
                    kind: RightKind::Composition,
                    recipient_id: publisher.party_id().to_string(),
                    territory: vec!["US".into()],
                    valid_from: "2024-01-01".parse().unwrap(),
                    valid_through: "2034-01-01".parse().unwrap(),
                },
                100,
            )
            .await
            .unwrap();
        let publication = registry
            .publish(
                &publisher,
                PublicationDraft {
                    title: "Collected Works".into(),
                    publisher_id: publisher.party_id().to_string(),
                    composition_ids: vec![composition.id],
                    composition_right_ids: vec![right.id.clone()],
                    same_as: None,
                },
            )
            .await
            .unwrap();

        let before = registry.ledger().inner.len().await;
        let accountant = TransferAccountant::new(registry.ledger());
        let err = accountant
            .transfer(
                &publisher,
                TransferRequest {
                    kind: RightKind::Composition,
                    basis: TransferBasis::Right(right.id.clone()),
                    container_id: publication.id.clone(),
                    recipient_id: carol.party_id().to_string(),
                    recipient_shares: 40,
                },
            )
            .await
            .unwrap_err();

        // The error carries the committed spend id and the rejection cause.
        let spend_tx_id = match err {
            Error::ProvenanceNotRecorded {
                spend_tx_id,
                source,
            } => {
                assert!(matches!(*source, Error::Submission(_)));
                spend_tx_id
            }
            other => panic!("expected ProvenanceNotRecorded, got {other:?}"),
        };

        // The shares already moved: the spend is final on the ledger.
        let spend = registry.ledger().get_transaction(&spend_tx_id).await.unwrap();
        assert_eq!(spend.output_amount(0).unwrap(), 60);
        assert_eq!(spend.output_amount(1).unwrap(), 40);
        assert_eq!(spend.output_owner(1).unwrap(), carol.public_key());

        // Exactly one new transaction (the spend); no provenance document.
        assert_eq!(registry.ledger().inner.len().await, before + 1);
        let spends = registry.ledger().list_transfers(&right.id).await.unwrap();
        assert_eq!(spends.len(), 1);
        assert!(fetch_transfer(registry.ledger(), &spend_tx_id, RightKind::Composition)
            .await
            .is_err());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rights Registry Contributors

//! End-to-end walkthrough against an in-process ledger: register parties,
//! publish a composition, move right shares down a chain, and prove current
//! ownership.

use tracing::info;
use tracing_subscriber::EnvFilter;

use rights_registry::documents::{
    CompositionDraft, PartyDraft, PartyKind, PublicationDraft, RightDraft, RightKind,
};
use rights_registry::identity::Identity;
use rights_registry::ledger::MemoryLedger;
use rights_registry::proof::{self, Claim, ClaimKind};
use rights_registry::registry::Registry;
use rights_registry::transfer::{TransferAccountant, TransferBasis, TransferRequest};
use rights_registry::Result;

fn date(value: &str) -> chrono::NaiveDate {
    value.parse().expect("valid date literal")
}

async fn register(registry: &Registry<MemoryLedger>, name: &str, password: &str) -> Result<Identity> {
    let submitted = registry
        .register_party(PartyKind::Person, PartyDraft::new(name), password)
        .await?;
    let credentials = Registry::<MemoryLedger>::credentials(&submitted, password)?;
    Identity::login(registry.ledger(), &credentials).await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let registry = Registry::new(MemoryLedger::new());
    let alice = register(&registry, "Alice", "alice-passphrase").await?;
    let bob = register(&registry, "Bob", "bob-passphrase").await?;
    let carol = register(&registry, "Carol", "carol-passphrase").await?;
    let dave = register(&registry, "Dave", "dave-passphrase").await?;

    // Alice writes a composition and issues its right to Bob, who publishes.
    let composition = registry
        .compose(
            &alice,
            CompositionDraft {
                title: "Étude in Plain Sight".into(),
                composer_id: alice.party_id().to_string(),
                ..Default::default()
            },
        )
        .await?;
    let right = registry
        .issue_right(
            &alice,
            RightDraft {
                kind: RightKind::Composition,
                recipient_id: bob.party_id().to_string(),
                territory: vec!["US".into(), "GB".into()],
                valid_from: date("2024-01-01"),
                valid_through: date("2034-01-01"),
            },
            100,
        )
        .await?;
    let publication = registry
        .publish(
            &bob,
            PublicationDraft {
                title: "Plain Sight Sessions".into(),
                publisher_id: bob.party_id().to_string(),
                composition_ids: vec![composition.id.clone()],
                composition_right_ids: vec![right.id.clone()],
                same_as: None,
            },
        )
        .await?;

    // Bob keeps 60 shares and passes 40 to Carol; Carol divests to Dave.
    let accountant = TransferAccountant::new(registry.ledger());
    let first = accountant
        .transfer(
            &bob,
            TransferRequest {
                kind: RightKind::Composition,
                basis: TransferBasis::Right(right.id.clone()),
                container_id: publication.id.clone(),
                recipient_id: carol.party_id().to_string(),
                recipient_shares: 40,
            },
        )
        .await?;
    let second = accountant
        .transfer(
            &carol,
            TransferRequest {
                kind: RightKind::Composition,
                basis: TransferBasis::Transfer(first.id.clone()),
                container_id: publication.id.clone(),
                recipient_id: dave.party_id().to_string(),
                recipient_shares: 40,
            },
        )
        .await?;

    // Dave proves he now holds shares of the right.
    let claim = Claim::new(ClaimKind::CompositionRightHolder, right.id.clone())
        .within(publication.id.clone());
    let challenge = "one-time-challenge-7f3a";
    let signature = proof::prove(challenge, dave.key());
    proof::verify(registry.ledger(), &claim, challenge, &signature).await?;

    info!(
        composition = %composition.id,
        right = %right.id,
        publication = %publication.id,
        first_transfer = %first.id,
        second_transfer = %second.id,
        "walkthrough complete; ownership proof verified"
    );
    Ok(())
}

//! Integration harness
//!
//! One `TestLedger` per test: a shared in-memory network, one notary, and
//! a broadcast notifier. Parties join with a deterministic key seed; each
//! join wires a vault, registers it for finality broadcast, and spawns a
//! responder task that approves anything passing the transition rules.

pub mod conflict;
pub mod scenarios;

use dc_01_transition_validation::{SignerPolicy, TransitionValidator};
use dc_02_transfer_coordination::adapters::{
    Ed25519Signer, InMemoryVault, MemoryNetwork, MemoryNotifier,
};
use dc_02_transfer_coordination::{
    CoordinationConfig, IdentitySigner, InitiatorService, ResponderService,
};
use dc_03_notary_sequencing::NotaryService;
use shared_types::PartyId;
use std::sync::Arc;

/// Shared infrastructure for one test scenario.
pub struct TestLedger {
    pub config: CoordinationConfig,
    pub network: Arc<MemoryNetwork>,
    pub notary: Arc<NotaryService>,
    pub notifier: Arc<MemoryNotifier>,
}

impl TestLedger {
    /// Ledger with the default signer policy.
    pub fn new() -> Self {
        Self::with_config(CoordinationConfig::default())
    }

    /// Ledger with an explicit signer policy.
    pub fn with_policy(policy: SignerPolicy) -> Self {
        Self::with_config(CoordinationConfig {
            signer_policy: policy,
            ..Default::default()
        })
    }

    pub fn with_config(config: CoordinationConfig) -> Self {
        crate::init_tracing();
        let validator = TransitionValidator::with_policy(config.signer_policy);
        Self {
            network: Arc::new(MemoryNetwork::with_config(&config)),
            notary: Arc::new(NotaryService::new(validator)),
            notifier: Arc::new(MemoryNotifier::new()),
            config,
        }
    }

    /// Join a party: vault registered for broadcast, responder serving in
    /// the background.
    pub fn join(&self, seed: u8) -> TestParty {
        let party = self.join_silent(seed);

        let mut listener = self.network.register(party.id());
        let responder = ResponderService::with_validator(
            party.signer.clone(),
            TransitionValidator::with_policy(self.config.signer_policy),
        );
        tokio::spawn(async move { responder.serve(&mut listener).await });

        party
    }

    /// Join a party without a responder task (it can initiate but never
    /// countersign). Its vault still receives broadcasts.
    pub fn join_silent(&self, seed: u8) -> TestParty {
        let signer = Arc::new(Ed25519Signer::from_seed([seed; 32]));
        let vault = Arc::new(InMemoryVault::new());
        self.notifier.register(signer.party_id(), vault.clone());
        TestParty { signer, vault }
    }

    /// A second initiator handle for the same identity with its own vault
    /// replica; used to stage conflicting transfers from one snapshot.
    pub fn replica(&self, party: &TestParty) -> TestParty {
        TestParty {
            signer: party.signer.clone(),
            vault: Arc::new(InMemoryVault::new()),
        }
    }

    /// Wire an initiator service acting as `party`.
    pub fn initiator(&self, party: &TestParty) -> InitiatorService {
        InitiatorService::new(
            &self.config,
            self.notary.notary_id(),
            party.vault.clone(),
            self.network.clone(),
            self.notary.clone(),
            party.signer.clone(),
            self.notifier.clone(),
        )
    }
}

/// One party's identity and local vault.
pub struct TestParty {
    pub signer: Arc<Ed25519Signer>,
    pub vault: Arc<InMemoryVault>,
}

impl TestParty {
    pub fn id(&self) -> PartyId {
        self.signer.party_id()
    }
}

//! # DC-02: Transfer Coordination Subsystem
//!
//! The multi-party protocol that moves an asset proposal from assembly to
//! finality: build, validate locally, self-sign, collect counterparty
//! approvals over sessions, submit to the notary, broadcast the result.
//! One protocol run per proposal; runs share no mutable state with each
//! other, so any number may be in flight concurrently.
//!
//! ## Architecture
//!
//! - **Domain**: proposal phase machine (`ProposalRun`), error taxonomy
//! - **Ports**: inbound (`TransferCoordinationApi`, `ProposalReviewer`) and
//!   outbound (`VaultStore`, `SessionTransport`, `SequencerGateway`,
//!   `IdentitySigner`, `ParticipantNotifier`)
//! - **Application**: `InitiatorService` and `ResponderService`
//! - **IPC**: session message payloads exchanged between the two roles
//! - **Adapters**: in-memory transport, vault, signer, and notifier

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use application::initiator::InitiatorService;
pub use application::responder::{ResponderOutcome, ResponderService, ValidatingReviewer};
pub use config::CoordinationConfig;
pub use domain::errors::CoordinationError;
pub use domain::run::{ProposalPhase, ProposalRun};
pub use ipc::payloads::{SessionMessage, PROTOCOL_VERSION};
pub use ports::inbound::{ProposalReviewer, TransferCoordinationApi};
pub use ports::outbound::{
    IdentitySigner, NotifyError, ParticipantNotifier, PeerSession, SequencerError,
    SequencerGateway, SessionError, SessionListener, SessionTransport, StoreError, VaultStore,
};

//! Outbound Ports (Driven Ports / SPI)
//!
//! Contracts for every external collaborator the coordination protocol
//! calls through: the vault, the session transport, the sequencing notary,
//! the identity/signing capability, and the finality broadcast. The core
//! never implements these itself; adapters do.

use crate::ipc::payloads::SessionMessage;
use async_trait::async_trait;
use shared_types::{
    Approval, FinalizedTransition, NotaryId, PartyId, Proposal, RecordRef, SequencePosition,
    SignedProposal, UnspentRecord,
};
use thiserror::Error;

/// Vault lookup or update failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("vault lookup failed: {0}")]
    LookupFailed(String),

    #[error("vault update failed: {0}")]
    UpdateFailed(String),
}

/// Session transport failure. Recoverable: the caller may re-run the whole
/// proposal from the start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No route to the requested party.
    #[error("peer {party} unreachable")]
    PeerUnreachable { party: PartyId },

    /// The peer did not answer within the transport's deadline.
    #[error("session timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The peer went away mid-session.
    #[error("session channel closed by peer")]
    ChannelClosed,

    /// The peer sent a message that does not fit the protocol step.
    #[error("unexpected message: expected {expected}, got {got}")]
    UnexpectedMessage {
        expected: &'static str,
        got: &'static str,
    },
}

/// Rejection from the sequencing notary. `Conflict` and `NotaryMismatch`
/// are terminal; the coordinator never retries them automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// The consumed input was already spent by an accepted transition.
    #[error("conflict: input record {record_ref} already consumed")]
    Conflict { record_ref: RecordRef },

    /// The proposal names a different notary instance.
    #[error("notary mismatch: proposal names {proposal}, submitted to {notary}")]
    NotaryMismatch { proposal: NotaryId, notary: NotaryId },

    /// The proposal failed the notary's own well-formedness re-check.
    #[error("malformed proposal: {0}")]
    Malformed(String),
}

/// Failure to deliver the finalized transition to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("broadcast to {party} failed: {reason}")]
    Delivery { party: PartyId, reason: String },
}

/// A party's local record store.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Locate the unspent record of the lineage identified by `address`.
    async fn find_unspent(&self, address: &str) -> Result<Option<UnspentRecord>, StoreError>;

    /// Fold a finalized transition into the local view: consume its input,
    /// store its output as the new unspent head of the lineage.
    async fn apply_finalized(&self, finalized: &FinalizedTransition) -> Result<(), StoreError>;
}

/// One reliable, ordered, point-to-point channel to a peer. Messages are
/// delivered exactly once, in order, per session.
#[async_trait]
pub trait PeerSession: Send {
    async fn send(&mut self, message: SessionMessage) -> Result<(), SessionError>;

    async fn recv(&mut self) -> Result<SessionMessage, SessionError>;
}

/// Opens sessions to peers by party identity.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn open(&self, party: PartyId) -> Result<Box<dyn PeerSession>, SessionError>;
}

/// The inbound side of a party's transport: a stream of sessions opened by
/// remote initiators.
#[async_trait]
pub trait SessionListener: Send {
    /// Next inbound session, or `None` once the transport shuts down.
    async fn accept(&mut self) -> Option<Box<dyn PeerSession>>;
}

/// The ordering/notarization service: accepts a completed proposal at most
/// once per consumed input across the whole network.
#[async_trait]
pub trait SequencerGateway: Send + Sync {
    async fn submit(&self, proposal: &SignedProposal) -> Result<SequencePosition, SequencerError>;
}

/// Identity and signing capability of the local party.
///
/// Synchronous: key material is local and signing never suspends.
pub trait IdentitySigner: Send + Sync {
    /// The local party's identity.
    fn party_id(&self) -> PartyId;

    /// Produce this party's approval over the proposal's canonical digest.
    fn sign(&self, proposal: &Proposal) -> Approval;

    /// Whether `approval` is `party`'s valid signature over `proposal`.
    fn verify(&self, approval: &Approval, proposal: &Proposal, party: PartyId) -> bool;
}

/// Broadcast of finalized transitions to every participant.
#[async_trait]
pub trait ParticipantNotifier: Send + Sync {
    async fn notify(
        &self,
        participants: &[PartyId],
        finalized: &FinalizedTransition,
    ) -> Result<(), NotifyError>;
}

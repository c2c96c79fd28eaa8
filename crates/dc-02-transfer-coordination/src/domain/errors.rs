//! Error types for Transfer Coordination

use crate::ports::outbound::{NotifyError, SequencerError, SessionError, StoreError};
use dc_01_transition_validation::ValidationError;
use shared_types::PartyId;
use thiserror::Error;

/// All errors a coordination run can surface to its caller.
///
/// Validation and signature problems are caught before any network I/O;
/// session failures are recoverable by re-running the proposal from the
/// start; sequencer conflicts are terminal and never retried automatically,
/// since a blind retry could silently apply a stale transfer.
#[derive(Debug, Error)]
pub enum CoordinationError {
    /// A transition rule was violated (local, immediate).
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No unspent record exists for the requested lineage.
    #[error("no unspent record found for address \"{address}\"")]
    NotFound { address: String },

    /// A required approval never arrived or failed verification.
    #[error("required approval missing from {party}")]
    SignatureMissing { party: PartyId },

    /// A counterparty refused to approve; its reason is kept verbatim.
    #[error("counterparty {party} declined: {reason}")]
    Declined { party: PartyId, reason: String },

    /// Session transport failure (timeout, closed channel, bad message).
    #[error("session failure: {0}")]
    Session(#[from] SessionError),

    /// The notary rejected the completed proposal.
    #[error("sequencer rejected proposal: {0}")]
    Sequencer(#[from] SequencerError),

    /// Vault lookup or update failure.
    #[error("vault failure: {0}")]
    Store(#[from] StoreError),

    /// Broadcast of the finalized transition failed.
    #[error("broadcast failure: {0}")]
    Notify(#[from] NotifyError),

    /// Protocol invariant violated (illegal phase transition, bad peer
    /// behavior that fits no other variant).
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl CoordinationError {
    /// The reason string recorded in the terminal `Rejected` phase.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

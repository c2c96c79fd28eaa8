//! Inbound Ports (Driving Ports / API)

use crate::domain::errors::CoordinationError;
use async_trait::async_trait;
use shared_types::{AssetFacts, FinalizedTransition, PartyId, Proposal};

/// Primary Transfer Coordination API
///
/// One call is one complete protocol run: the returned transition has been
/// validated, fully approved, sequenced by the notary, and broadcast to
/// every participant. On failure the run is terminally rejected and the
/// error carries the reason.
#[async_trait]
pub trait TransferCoordinationApi: Send + Sync {
    /// Issue a new asset: the local party is builder and first owner.
    ///
    /// No counterparty round-trip is needed; the builder's own approval is
    /// the only one required.
    async fn issue(&self, facts: AssetFacts) -> Result<FinalizedTransition, CoordinationError>;

    /// Transfer the asset at `address` to `new_owner`.
    ///
    /// Opens one session per required counterparty, collects approvals,
    /// and commits through the notary exactly once.
    async fn transfer(
        &self,
        address: &str,
        new_owner: PartyId,
    ) -> Result<FinalizedTransition, CoordinationError>;
}

/// Responder-side review capability: decide whether to approve a received
/// proposal.
///
/// Pluggable so additional asset types or stricter local rule sets can be
/// added without touching the coordinator: the responder re-validates with
/// whatever reviewer it was built with, and a veto becomes an
/// `ApprovalDeclined` carrying the reason.
pub trait ProposalReviewer: Send + Sync {
    /// `Ok` to approve; `Err(reason)` to decline.
    fn review(&self, proposal: &Proposal) -> Result<(), String>;
}

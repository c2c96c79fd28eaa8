//! Session Payloads for Transfer Coordination
//!
//! The structured messages the initiator and responder exchange over one
//! session. A session carries exactly one proposal run: offer, then either
//! a granted approval or a decline.

use serde::{Deserialize, Serialize};
use shared_types::{Approval, SignedProposal};

/// Current protocol version for session messages.
pub const PROTOCOL_VERSION: u16 = 1;

// ============================================================
// INITIATOR -> RESPONDER
// ============================================================

/// Messages exchanged over a proposal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionMessage {
    /// Initiator offers a proposal for approval. Carries the approvals
    /// already attached (at least the initiator's own), so the responder
    /// sees exactly what it is countersigning.
    ProposalOffer {
        version: u16,
        proposal: SignedProposal,
    },

    /// Responder grants its approval over the offered proposal.
    ApprovalGranted { approval: Approval },

    /// Responder declines; the reason travels back verbatim.
    ApprovalDeclined { reason: String },
}

impl SessionMessage {
    /// Short name used in `UnexpectedMessage` errors and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProposalOffer { .. } => "ProposalOffer",
            Self::ApprovalGranted { .. } => "ApprovalGranted",
            Self::ApprovalDeclined { .. } => "ApprovalDeclined",
        }
    }
}

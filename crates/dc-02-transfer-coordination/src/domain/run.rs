//! Proposal phase machine
//!
//! One `ProposalRun` per in-flight proposal. The run owns all state for the
//! protocol instance; nothing here is shared between concurrent runs. The
//! phase order is enforced as data so an out-of-order driver is an error,
//! not silent corruption.

use crate::domain::errors::CoordinationError;
use shared_types::{
    Approval, FinalizedTransition, PartyId, Proposal, SequencePosition, SignedProposal,
};
use std::collections::BTreeSet;
use std::fmt;

/// Protocol phase of one proposal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalPhase {
    /// Proposal assembled; nothing checked yet.
    Built,
    /// Passed local validation; no messages sent so far.
    LocallyVerified,
    /// Initiator's own approval attached.
    SelfSigned,
    /// Sessions open, awaiting counterparty approvals.
    CollectingApprovals,
    /// Every required approval present; ready for the notary.
    FullyApproved,
    /// Accepted by the notary at a definite position.
    Sequenced,
    /// Broadcast to all participants. Terminal success.
    Finalized,
    /// Terminal failure; carries the audit reason.
    Rejected { reason: String },
}

impl ProposalPhase {
    /// Whether this phase ends the run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Rejected { .. })
    }

    /// Legal forward steps. `Rejected` is reachable from any pre-terminal
    /// phase and is not listed here.
    fn successor(&self) -> Option<ProposalPhase> {
        match self {
            Self::Built => Some(Self::LocallyVerified),
            Self::LocallyVerified => Some(Self::SelfSigned),
            Self::SelfSigned => Some(Self::CollectingApprovals),
            Self::CollectingApprovals => Some(Self::FullyApproved),
            Self::FullyApproved => Some(Self::Sequenced),
            Self::Sequenced => Some(Self::Finalized),
            Self::Finalized | Self::Rejected { .. } => None,
        }
    }
}

impl fmt::Display for ProposalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Built => write!(f, "Built"),
            Self::LocallyVerified => write!(f, "LocallyVerified"),
            Self::SelfSigned => write!(f, "SelfSigned"),
            Self::CollectingApprovals => write!(f, "CollectingApprovals"),
            Self::FullyApproved => write!(f, "FullyApproved"),
            Self::Sequenced => write!(f, "Sequenced"),
            Self::Finalized => write!(f, "Finalized"),
            Self::Rejected { reason } => write!(f, "Rejected({reason})"),
        }
    }
}

/// State of one proposal run, from assembly to a terminal phase.
#[derive(Debug, Clone)]
pub struct ProposalRun {
    phase: ProposalPhase,
    proposal: SignedProposal,
    required_signers: BTreeSet<PartyId>,
    counterparties: Vec<PartyId>,
}

impl ProposalRun {
    /// Start a run in `Built` with the assembled proposal.
    #[must_use]
    pub fn new(
        proposal: Proposal,
        required_signers: BTreeSet<PartyId>,
        counterparties: Vec<PartyId>,
    ) -> Self {
        Self {
            phase: ProposalPhase::Built,
            proposal: SignedProposal::new(proposal),
            required_signers,
            counterparties,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &ProposalPhase {
        &self.phase
    }

    /// The proposal with approvals collected so far.
    #[must_use]
    pub fn signed(&self) -> &SignedProposal {
        &self.proposal
    }

    /// The sessions the initiator must open: required signers minus itself.
    #[must_use]
    pub fn counterparties(&self) -> &[PartyId] {
        &self.counterparties
    }

    /// Advance to the next phase; `CollectingApprovals` may be skipped
    /// when there are no counterparties (Issue). Stepping anywhere else
    /// out of order is a protocol error.
    pub fn advance(&mut self, next: ProposalPhase) -> Result<(), CoordinationError> {
        let legal = self.phase.successor() == Some(next.clone())
            || (self.phase == ProposalPhase::SelfSigned
                && next == ProposalPhase::FullyApproved
                && self.counterparties.is_empty());
        if !legal {
            return Err(CoordinationError::Protocol(format!(
                "illegal phase transition {} -> {next}",
                self.phase
            )));
        }
        self.phase = next;
        Ok(())
    }

    /// Enter the terminal `Rejected` phase. All partial approval state
    /// stays inside this run and dies with it.
    pub fn reject(&mut self, reason: impl Into<String>) {
        self.phase = ProposalPhase::Rejected {
            reason: reason.into(),
        };
    }

    /// Attach an approval (self-signature or a counterparty's).
    pub fn attach(&mut self, approval: Approval) {
        self.proposal.attach(approval);
    }

    /// Required signers whose approvals have not arrived yet.
    #[must_use]
    pub fn missing_signers(&self) -> Vec<PartyId> {
        let approved = self.proposal.approved_by();
        self.required_signers
            .iter()
            .copied()
            .filter(|party| !approved.contains(party))
            .collect()
    }

    /// Snapshot the run after sequencing as the broadcastable finalized
    /// transition.
    #[must_use]
    pub fn finalized(&self, position: SequencePosition) -> FinalizedTransition {
        FinalizedTransition {
            proposal: self.proposal.clone(),
            position,
        }
    }
}

//! Responder role
//!
//! The counterparty side of a proposal session: receive the offer,
//! independently re-validate, and either countersign or decline with a
//! reason. The responder never trusts the initiator's local verification;
//! it re-runs the same rule engine on what actually arrived.

use crate::domain::errors::CoordinationError;
use crate::ipc::payloads::{SessionMessage, PROTOCOL_VERSION};
use crate::ports::inbound::ProposalReviewer;
use crate::ports::outbound::{IdentitySigner, PeerSession, SessionError, SessionListener};
use dc_01_transition_validation::TransitionValidator;
use shared_types::{Approval, Proposal};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default reviewer: re-run the transition validator, nothing more.
pub struct ValidatingReviewer {
    validator: TransitionValidator,
}

impl ValidatingReviewer {
    #[must_use]
    pub fn new(validator: TransitionValidator) -> Self {
        Self { validator }
    }
}

impl ProposalReviewer for ValidatingReviewer {
    fn review(&self, proposal: &Proposal) -> Result<(), String> {
        self.validator
            .validate(proposal)
            .map_err(|err| err.to_string())
    }
}

/// What a handled session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponderOutcome {
    /// Proposal approved; this approval went back to the initiator.
    Approved(Approval),
    /// Proposal declined with this reason.
    Declined(String),
}

/// Responder service: handles inbound proposal sessions.
pub struct ResponderService {
    signer: Arc<dyn IdentitySigner>,
    reviewer: Arc<dyn ProposalReviewer>,
}

impl ResponderService {
    /// Responder with an explicit review capability.
    pub fn new(signer: Arc<dyn IdentitySigner>, reviewer: Arc<dyn ProposalReviewer>) -> Self {
        Self { signer, reviewer }
    }

    /// Responder that reviews with the given validator only.
    pub fn with_validator(signer: Arc<dyn IdentitySigner>, validator: TransitionValidator) -> Self {
        Self::new(signer, Arc::new(ValidatingReviewer::new(validator)))
    }

    /// Handle one proposal session end-to-end.
    ///
    /// Protocol: receive `ProposalOffer`, review, reply with either
    /// `ApprovalGranted` or `ApprovalDeclined`. Any other opening message
    /// is a session error.
    pub async fn handle_session(
        &self,
        session: &mut dyn PeerSession,
    ) -> Result<ResponderOutcome, CoordinationError> {
        let message = session.recv().await?;
        let (version, offered) = match message {
            SessionMessage::ProposalOffer { version, proposal } => (version, proposal),
            other => {
                return Err(CoordinationError::Session(SessionError::UnexpectedMessage {
                    expected: "ProposalOffer",
                    got: other.kind(),
                }));
            }
        };

        let proposal_id = offered.proposal.proposal_id;
        debug!(%proposal_id, version, "received proposal offer");

        if version != PROTOCOL_VERSION {
            let reason = format!(
                "unsupported protocol version {version}, expected {PROTOCOL_VERSION}"
            );
            session
                .send(SessionMessage::ApprovalDeclined {
                    reason: reason.clone(),
                })
                .await?;
            return Ok(ResponderOutcome::Declined(reason));
        }

        match self.reviewer.review(&offered.proposal) {
            Ok(()) => {
                let approval = self.signer.sign(&offered.proposal);
                session
                    .send(SessionMessage::ApprovalGranted {
                        approval: approval.clone(),
                    })
                    .await?;
                info!(%proposal_id, signer = %approval.signer, "proposal approved");
                Ok(ResponderOutcome::Approved(approval))
            }
            Err(reason) => {
                warn!(%proposal_id, %reason, "proposal declined");
                session
                    .send(SessionMessage::ApprovalDeclined {
                        reason: reason.clone(),
                    })
                    .await?;
                Ok(ResponderOutcome::Declined(reason))
            }
        }
    }

    /// Accept and handle sessions until the transport shuts down.
    ///
    /// Sessions are short (one request/response pair), so they are handled
    /// one at a time; a failed session is logged and does not stop the
    /// loop.
    pub async fn serve(&self, listener: &mut dyn SessionListener) {
        while let Some(mut session) = listener.accept().await {
            if let Err(err) = self.handle_session(session.as_mut()).await {
                warn!(error = %err, "responder session failed");
            }
        }
        debug!("responder transport closed, stopping");
    }
}

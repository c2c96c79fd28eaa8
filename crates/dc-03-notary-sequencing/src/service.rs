//! Notary Service
//!
//! Accepts completed proposals exactly once per consumed input. The
//! submission path re-checks everything it relies on: the transition
//! rules, its own identity as the named notary, and every required
//! approval's signature. Only then does it take the ledger lock for the
//! atomic conflict check and commit.

use crate::ledger::ConsumptionLedger;
use crate::verify::approval_verifies;
use async_trait::async_trait;
use dc_01_transition_validation::TransitionValidator;
use dc_02_transfer_coordination::{SequencerError, SequencerGateway};
use shared_types::{Intent, NotaryId, PartyId, Proposal, RecordRef, SequencePosition, SignedProposal};
use std::collections::BTreeSet;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// The sequencing notary: a total order of accepted transitions with
/// per-record double-spend detection.
///
/// The ledger mutex is the only shared state in the whole system; every
/// submission serializes through it, so of two racing transfers consuming
/// the same record, exactly the first to take the lock wins.
pub struct NotaryService {
    notary_id: NotaryId,
    validator: TransitionValidator,
    ledger: Mutex<ConsumptionLedger>,
}

impl NotaryService {
    /// Notary with a fresh identity and the given rule set.
    #[must_use]
    pub fn new(validator: TransitionValidator) -> Self {
        Self::with_id(NotaryId::generate(), validator)
    }

    /// Notary with an explicit identity.
    #[must_use]
    pub fn with_id(notary_id: NotaryId, validator: TransitionValidator) -> Self {
        Self {
            notary_id,
            validator,
            ledger: Mutex::new(ConsumptionLedger::new()),
        }
    }

    /// This notary's instance identity.
    #[must_use]
    pub fn notary_id(&self) -> NotaryId {
        self.notary_id
    }

    /// Submit a completed proposal for sequencing.
    pub async fn sequence(
        &self,
        signed: &SignedProposal,
    ) -> Result<SequencePosition, SequencerError> {
        let proposal = &signed.proposal;

        // 1. Well-formedness: the notary re-runs the transition rules
        //    rather than trusting the initiator's local verification.
        self.validator
            .validate(proposal)
            .map_err(|err| SequencerError::Malformed(err.to_string()))?;

        // 2. Instance check: this proposal must have been built against us.
        if proposal.notary != self.notary_id {
            return Err(SequencerError::NotaryMismatch {
                proposal: proposal.notary,
                notary: self.notary_id,
            });
        }

        // 3. Every required signer must have a verifying approval.
        for party in self.required_signers(proposal) {
            let approval = signed.approval_of(party).ok_or_else(|| {
                SequencerError::Malformed(format!("missing approval from {party}"))
            })?;
            if !approval_verifies(proposal, approval) {
                return Err(SequencerError::Malformed(format!(
                    "approval from {party} does not verify"
                )));
            }
        }

        // 4. Atomic conflict check and commit.
        let mut ledger = self.ledger.lock().await;
        match ledger.check_and_commit(signed) {
            Ok(position) => {
                info!(
                    proposal_id = %proposal.proposal_id,
                    %position,
                    "transition sequenced"
                );
                Ok(position)
            }
            Err(err) => {
                warn!(proposal_id = %proposal.proposal_id, error = %err, "submission rejected");
                Err(err)
            }
        }
    }

    /// Signers whose approvals the accepted proposal must carry.
    fn required_signers(&self, proposal: &Proposal) -> BTreeSet<PartyId> {
        match (
            proposal.intent(),
            proposal.inputs.first(),
            proposal.outputs.first(),
        ) {
            (Some(Intent::Issue), _, Some(output)) => BTreeSet::from([output.builder]),
            (Some(Intent::Transfer), Some(input), Some(output)) => self
                .validator
                .policy()
                .required_transfer_signers(&input.record, output),
            // Unreachable after validation, but never panic on peer input.
            _ => BTreeSet::new(),
        }
    }

    /// Number of accepted transitions (audit).
    pub async fn accepted_count(&self) -> usize {
        self.ledger.lock().await.accepted_count()
    }

    /// Position of an accepted proposal (audit).
    pub async fn position_of(&self, proposal_id: Uuid) -> Option<SequencePosition> {
        self.ledger.lock().await.position_of(proposal_id)
    }

    /// Whether a record has been consumed by an accepted transition.
    pub async fn is_consumed(&self, record_ref: RecordRef) -> bool {
        self.ledger.lock().await.is_consumed(record_ref)
    }
}

#[async_trait]
impl SequencerGateway for NotaryService {
    async fn submit(&self, proposal: &SignedProposal) -> Result<SequencePosition, SequencerError> {
        self.sequence(proposal).await
    }
}

//! Consumption ledger and acceptance log
//!
//! The notary's only mutable state. `check_and_commit` is a single
//! synchronous step; the service serializes calls to it behind one lock,
//! which is what makes first-to-arrive-wins exact rather than best-effort.

use dc_02_transfer_coordination::SequencerError;
use shared_types::{RecordRef, SequencePosition, SignedProposal};
use std::collections::HashMap;
use uuid::Uuid;

/// One accepted transition, as recorded in the total order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTransition {
    /// Position in this notary's total order.
    pub position: SequencePosition,
    /// The proposal run that was accepted.
    pub proposal_id: Uuid,
    /// Lineage the transition belongs to.
    pub address: String,
}

/// Per-record consumption bookkeeping plus the append-only acceptance log.
#[derive(Debug, Default)]
pub struct ConsumptionLedger {
    /// Which accepted proposal consumed each record.
    consumed: HashMap<RecordRef, Uuid>,
    /// Accepted transitions in order.
    log: Vec<AcceptedTransition>,
}

impl ConsumptionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically verify no input is already consumed, then commit.
    ///
    /// All-inputs-then-commit: nothing is marked consumed unless the whole
    /// proposal is accepted, so a rejected proposal leaves no trace.
    pub fn check_and_commit(
        &mut self,
        signed: &SignedProposal,
    ) -> Result<SequencePosition, SequencerError> {
        let proposal = &signed.proposal;

        for input in &proposal.inputs {
            if self.consumed.contains_key(&input.record.record_ref) {
                return Err(SequencerError::Conflict {
                    record_ref: input.record.record_ref,
                });
            }
        }

        for input in &proposal.inputs {
            self.consumed
                .insert(input.record.record_ref, proposal.proposal_id);
        }

        let position = SequencePosition(self.log.len() as u64);
        let address = proposal
            .outputs
            .first()
            .map(|output| output.address.clone())
            .unwrap_or_default();
        self.log.push(AcceptedTransition {
            position,
            proposal_id: proposal.proposal_id,
            address,
        });

        Ok(position)
    }

    /// Number of accepted transitions.
    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.log.len()
    }

    /// Position of an accepted proposal, if any.
    #[must_use]
    pub fn position_of(&self, proposal_id: Uuid) -> Option<SequencePosition> {
        self.log
            .iter()
            .find(|entry| entry.proposal_id == proposal_id)
            .map(|entry| entry.position)
    }

    /// Whether `record_ref` has been consumed by an accepted transition.
    #[must_use]
    pub fn is_consumed(&self, record_ref: RecordRef) -> bool {
        self.consumed.contains_key(&record_ref)
    }

    /// The acceptance log, oldest first.
    #[must_use]
    pub fn log(&self) -> &[AcceptedTransition] {
        &self.log
    }
}

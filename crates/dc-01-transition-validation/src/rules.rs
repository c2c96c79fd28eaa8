//! Transition rule engine
//!
//! Stateless validation over a single proposal. Common shape rules run
//! first; intent-specific rules follow. Any failure is terminal for the
//! proposal.

use crate::errors::ValidationError;
use crate::policy::SignerPolicy;
use shared_types::{Intent, PartyId, Proposal, UnspentRecord};

/// Pure rule engine for proposed asset-state transitions.
///
/// `validate` never performs I/O and holds no mutable state: re-validating
/// an already-accepted proposal yields the same verdict. Responders re-run
/// the same engine on received proposals before approving them.
#[derive(Debug, Clone, Default)]
pub struct TransitionValidator {
    policy: SignerPolicy,
}

impl TransitionValidator {
    /// Validator with the default signer policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator with an explicit signer policy.
    #[must_use]
    pub fn with_policy(policy: SignerPolicy) -> Self {
        Self { policy }
    }

    /// The signer policy this validator enforces.
    #[must_use]
    pub fn policy(&self) -> SignerPolicy {
        self.policy
    }

    /// Validate a proposal against the transition rules.
    pub fn validate(&self, proposal: &Proposal) -> Result<(), ValidationError> {
        let intent = Self::check_shape(proposal)?;

        match intent {
            Intent::Issue => Self::check_issue(proposal),
            Intent::Transfer => self.check_transfer(proposal),
        }
    }

    /// Common preconditions: one intent, one output, consistent notary.
    fn check_shape(proposal: &Proposal) -> Result<Intent, ValidationError> {
        let intent = proposal
            .intent()
            .ok_or(ValidationError::AmbiguousIntent {
                count: proposal.intents.len(),
            })?;

        if proposal.outputs.len() != 1 {
            return Err(ValidationError::OutputShape {
                count: proposal.outputs.len(),
            });
        }

        // The input's guarding notary must be the notary the proposal will
        // be submitted to; catching this here keeps a doomed proposal off
        // the network entirely.
        if let Some(input) = proposal.inputs.first() {
            if input.notary != proposal.notary {
                return Err(ValidationError::NotaryMismatch {
                    input: input.notary,
                    proposal: proposal.notary,
                });
            }
        }

        Ok(intent)
    }

    /// Issue rules: no inputs, builder among the asserted signers.
    fn check_issue(proposal: &Proposal) -> Result<(), ValidationError> {
        if !proposal.inputs.is_empty() {
            return Err(ValidationError::IssueConsumesInputs {
                count: proposal.inputs.len(),
            });
        }

        let output = &proposal.outputs[0];
        if !proposal.signers.contains(&output.builder) {
            return Err(ValidationError::BuilderSignatureMissing {
                builder: output.builder,
            });
        }

        Ok(())
    }

    /// Transfer rules: one input, required signers asserted, facts frozen.
    fn check_transfer(&self, proposal: &Proposal) -> Result<(), ValidationError> {
        let input: &UnspentRecord = match proposal.inputs.as_slice() {
            [single] => single,
            other => {
                return Err(ValidationError::TransferInputShape { count: other.len() });
            }
        };

        let output = &proposal.outputs[0];
        let required = self
            .policy
            .required_transfer_signers(&input.record, output);
        let missing: Vec<PartyId> = required
            .into_iter()
            .filter(|party| !proposal.signers.contains(party))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::OwnerSignaturesMissing {
                missing: missing
                    .iter()
                    .map(PartyId::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        if !input.record.facts_match(output) {
            return Err(ValidationError::FactsMutated);
        }

        Ok(())
    }
}

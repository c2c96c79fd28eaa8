//! Signer policy for transfers
//!
//! Whether the builder must countersign a transfer once it no longer owns
//! the asset is a deployment decision, not a rule of the asset model, so it
//! is configuration rather than a hard-coded rule set.

use serde::{Deserialize, Serialize};
use shared_types::{AssetRecord, PartyId};
use std::collections::BTreeSet;

/// Who must sign a Transfer transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignerPolicy {
    /// Current owner and new owner sign; the builder is only notified.
    #[default]
    OwnersOnly,
    /// Current owner and new owner sign, and the builder countersigns
    /// whenever it is not itself the current owner.
    BuilderCountersigns,
}

impl SignerPolicy {
    /// The full set of parties whose signatures a transfer requires.
    ///
    /// Both owners are always required, even when they are the same
    /// identity; the set simply collapses in that case.
    #[must_use]
    pub fn required_transfer_signers(
        &self,
        input: &AssetRecord,
        output: &AssetRecord,
    ) -> BTreeSet<PartyId> {
        let mut required = BTreeSet::new();
        required.insert(input.owner);
        required.insert(output.owner);
        if matches!(self, Self::BuilderCountersigns) && input.builder != input.owner {
            required.insert(input.builder);
        }
        required
    }

    /// The counterparties an initiator must open sessions with: every
    /// required signer except the initiator itself.
    #[must_use]
    pub fn transfer_counterparties(
        &self,
        initiator: PartyId,
        input: &AssetRecord,
        output: &AssetRecord,
    ) -> Vec<PartyId> {
        self.required_transfer_signers(input, output)
            .into_iter()
            .filter(|party| *party != initiator)
            .collect()
    }
}

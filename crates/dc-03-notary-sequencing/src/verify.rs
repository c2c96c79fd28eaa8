//! Approval signature verification
//!
//! Pure Ed25519 checks over the proposal's canonical digest. The notary
//! trusts nothing it did not verify itself: an approval must name the
//! right run, and the signature must verify against the claimed signer's
//! key.

use ed25519_dalek::{Signature, VerifyingKey};
use shared_types::{Approval, Proposal};

/// Whether `approval` is a valid signature over `proposal` by the party
/// the approval claims.
#[must_use]
pub fn approval_verifies(proposal: &Proposal, approval: &Approval) -> bool {
    if approval.proposal_id != proposal.proposal_id {
        return false;
    }
    let Ok(key) = VerifyingKey::from_bytes(approval.signer.as_bytes()) else {
        return false;
    };
    let signature = Signature::from_bytes(&approval.signature);
    key.verify_strict(&proposal.digest(), &signature).is_ok()
}

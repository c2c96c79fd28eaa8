//! # Ed25519 Identity Signer
//!
//! The identity/signing capability backed by an Ed25519 keypair. The
//! party's identity *is* its verifying key, so verification needs no key
//! registry: the approval's claimed signer is checked against the claimed
//! party and the signature against that party's key.

use crate::ports::outbound::IdentitySigner;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use shared_types::{Approval, PartyId, Proposal};

/// Identity signer holding the local party's Ed25519 keypair.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Derive a keypair deterministically from a 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }
}

impl IdentitySigner for Ed25519Signer {
    fn party_id(&self) -> PartyId {
        PartyId(self.signing_key.verifying_key().to_bytes())
    }

    fn sign(&self, proposal: &Proposal) -> Approval {
        let signature = self.signing_key.sign(&proposal.digest());
        Approval {
            proposal_id: proposal.proposal_id,
            signer: self.party_id(),
            signature: signature.to_bytes(),
        }
    }

    fn verify(&self, approval: &Approval, proposal: &Proposal, party: PartyId) -> bool {
        if approval.signer != party || approval.proposal_id != proposal.proposal_id {
            return false;
        }
        let Ok(key) = VerifyingKey::from_bytes(party.as_bytes()) else {
            return false;
        };
        let signature = Signature::from_bytes(&approval.signature);
        key.verify_strict(&proposal.digest(), &signature).is_ok()
    }
}

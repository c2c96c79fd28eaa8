//! # Proposal & Approval Types
//!
//! A proposal is a candidate state transition: the records it consumes, the
//! records it produces, an intent tag, and the parties asserted to sign it.
//! Approvals are Ed25519 signatures over the proposal's canonical digest,
//! collected by the transfer coordination protocol until the proposal is
//! complete and ready for sequencing.

use crate::entities::{
    AssetRecord, Hash, NotaryId, PartyId, SequencePosition, SignatureBytes, UnspentRecord,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// The intent of a proposed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Create a new asset lineage (no inputs, one output).
    Issue,
    /// Move ownership along an existing lineage (one input, one output).
    Transfer,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue => write!(f, "Issue"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

impl Intent {
    /// Stable tag byte used in the canonical digest.
    fn tag(self) -> u8 {
        match self {
            Self::Issue => 0,
            Self::Transfer => 1,
        }
    }
}

/// A candidate state transition pending approval.
///
/// Carries a *list* of intents so the "exactly one intent" rule is checked
/// as data by the validator rather than assumed by construction; a
/// malformed peer could assert zero or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Correlates approvals and session messages for one protocol run.
    pub proposal_id: Uuid,
    /// Asserted intents; valid proposals carry exactly one.
    pub intents: Vec<Intent>,
    /// Parties asserted to sign this proposal.
    pub signers: Vec<PartyId>,
    /// Consumed records with their guarding notary (0 or 1).
    pub inputs: Vec<UnspentRecord>,
    /// Produced records (exactly 1).
    pub outputs: Vec<AssetRecord>,
    /// The notary this proposal will be submitted to.
    pub notary: NotaryId,
}

impl Proposal {
    /// Assemble a new proposal with a fresh run identifier.
    #[must_use]
    pub fn new(
        intent: Intent,
        signers: Vec<PartyId>,
        inputs: Vec<UnspentRecord>,
        outputs: Vec<AssetRecord>,
        notary: NotaryId,
    ) -> Self {
        Self {
            proposal_id: Uuid::new_v4(),
            intents: vec![intent],
            signers,
            inputs,
            outputs,
            notary,
        }
    }

    /// The single asserted intent, or `None` when zero or several are
    /// present (an invalid proposal).
    #[must_use]
    pub fn intent(&self) -> Option<Intent> {
        match self.intents.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Canonical SHA-256 digest of the proposal.
    ///
    /// Computed field by field with length prefixes for variable-size
    /// fields, so every party derives identical bytes to sign and verify.
    /// Approvals are excluded: they sign this digest.
    #[must_use]
    pub fn digest(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.proposal_id.as_bytes());
        hasher.update([self.intents.len() as u8]);
        for intent in &self.intents {
            hasher.update([intent.tag()]);
        }
        hasher.update((self.signers.len() as u32).to_le_bytes());
        for signer in &self.signers {
            hasher.update(signer.as_bytes());
        }
        hasher.update((self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            hash_record(&mut hasher, &input.record);
            hasher.update(input.notary.0.as_bytes());
        }
        hasher.update((self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            hash_record(&mut hasher, output);
        }
        hasher.update(self.notary.0.as_bytes());
        hasher.finalize().into()
    }
}

fn hash_record(hasher: &mut Sha256, record: &AssetRecord) {
    hasher.update(record.record_ref.0.as_bytes());
    hasher.update((record.address.len() as u32).to_le_bytes());
    hasher.update(record.address.as_bytes());
    hasher.update((record.build_area.len() as u32).to_le_bytes());
    hasher.update(record.build_area.as_bytes());
    hasher.update(record.bedroom_count.to_le_bytes());
    hasher.update(record.construction_year.to_le_bytes());
    hasher.update(record.builder.as_bytes());
    hasher.update(record.owner.as_bytes());
}

/// One party's signature over a proposal's canonical digest.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// The proposal run this approval belongs to.
    pub proposal_id: Uuid,
    /// The approving party.
    pub signer: PartyId,
    /// Ed25519 signature over `Proposal::digest()`.
    #[serde_as(as = "Bytes")]
    pub signature: SignatureBytes,
}

/// A proposal together with the approvals collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedProposal {
    /// The underlying proposal.
    pub proposal: Proposal,
    /// Collected approvals, at most one per signer.
    pub approvals: Vec<Approval>,
}

impl SignedProposal {
    /// Wrap a proposal with no approvals yet.
    #[must_use]
    pub fn new(proposal: Proposal) -> Self {
        Self {
            proposal,
            approvals: Vec::new(),
        }
    }

    /// Attach an approval. Attaching a second approval from the same
    /// signer is a no-op, so replayed session messages cannot inflate the
    /// approval set.
    pub fn attach(&mut self, approval: Approval) {
        if !self.is_signed_by(approval.signer) {
            self.approvals.push(approval);
        }
    }

    /// Whether `party` has an attached approval.
    #[must_use]
    pub fn is_signed_by(&self, party: PartyId) -> bool {
        self.approvals.iter().any(|a| a.signer == party)
    }

    /// The set of parties with attached approvals.
    #[must_use]
    pub fn approved_by(&self) -> BTreeSet<PartyId> {
        self.approvals.iter().map(|a| a.signer).collect()
    }

    /// The approval attached by `party`, if any.
    #[must_use]
    pub fn approval_of(&self, party: PartyId) -> Option<&Approval> {
        self.approvals.iter().find(|a| a.signer == party)
    }
}

/// A sequenced, fully-signed transition as broadcast to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedTransition {
    /// The completed proposal with every required approval attached.
    pub proposal: SignedProposal,
    /// Position assigned by the notary in its total order.
    pub position: SequencePosition,
}

impl FinalizedTransition {
    /// Every party named by the consumed and produced records, deduplicated.
    /// These are the parties the finalized transition is broadcast to.
    #[must_use]
    pub fn participants(&self) -> Vec<PartyId> {
        let mut seen = BTreeSet::new();
        let inner = &self.proposal.proposal;
        for input in &inner.inputs {
            seen.extend(input.record.participants());
        }
        for output in &inner.outputs {
            seen.extend(output.participants());
        }
        seen.into_iter().collect()
    }

    /// The single produced record, when the proposal is well-formed.
    #[must_use]
    pub fn output(&self) -> Option<&AssetRecord> {
        self.proposal.proposal.outputs.first()
    }
}

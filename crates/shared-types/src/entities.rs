//! # Core Domain Entities
//!
//! Defines the ledger's core entities.
//!
//! ## Clusters
//!
//! - **Identity**: `PartyId`, key/signature aliases
//! - **Asset**: `AssetRecord`, `AssetFacts`, `UnspentRecord`
//! - **Sequencing**: `NotaryId`, `SequencePosition`, `RecordRef`

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type SignatureBytes = [u8; 64];

/// A 32-byte Ed25519 verifying key.
pub type PublicKey = [u8; 32];

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unique identifier for a party on the ledger.
///
/// A party is identified by its Ed25519 verifying key; the coordination
/// protocol addresses sessions by `PartyId` and the validator checks signer
/// sets against it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct PartyId(pub PublicKey);

impl PartyId {
    /// The underlying verifying key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &PublicKey {
        &self.0
    }
}

impl fmt::Display for PartyId {
    /// Shortened hex form (first 8 hex digits), enough to tell parties
    /// apart in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// =============================================================================
// CLUSTER B: SEQUENCING
// =============================================================================

/// Unique reference for an asset record, assigned at creation.
///
/// Two records produced from the same facts still get distinct references;
/// the reference, not the address, is what the notary's consumption ledger
/// tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef(pub Uuid);

impl RecordRef {
    /// Generate a fresh record reference.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a notary (sequencing service) instance.
///
/// Every unspent record remembers which notary guards its lineage; a
/// proposal consuming it must be submitted to the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotaryId(pub Uuid);

impl NotaryId {
    /// Generate a fresh notary identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NotaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an accepted transition in a notary's total order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct SequencePosition(pub u64);

impl fmt::Display for SequencePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// CLUSTER C: ASSET
// =============================================================================

/// Descriptive facts of an asset, as supplied by the builder at issuance.
///
/// These facts are invariant across transfers; only the owner changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFacts {
    /// Asset identity key (e.g. a street address).
    pub address: String,
    /// Built area, free-form (e.g. "1200sqft").
    pub build_area: String,
    /// Number of bedrooms.
    pub bedroom_count: u32,
    /// Year of construction.
    pub construction_year: u16,
}

impl AssetFacts {
    pub fn new(
        address: impl Into<String>,
        build_area: impl Into<String>,
        bedroom_count: u32,
        construction_year: u16,
    ) -> Self {
        Self {
            address: address.into(),
            build_area: build_area.into(),
            bedroom_count,
            construction_year,
        }
    }
}

/// An immutable, versioned asset ownership record.
///
/// A record is never mutated in place: a transfer produces a *new* record
/// with a fresh `record_ref` and marks the input record consumed. All
/// records sharing an `address` form one lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Unique reference assigned at creation.
    pub record_ref: RecordRef,
    /// Asset identity key; constant across the lineage.
    pub address: String,
    /// Built area; constant across the lineage.
    pub build_area: String,
    /// Number of bedrooms; constant across the lineage.
    pub bedroom_count: u32,
    /// Year of construction; constant across the lineage.
    pub construction_year: u16,
    /// The party that created the asset; never changes.
    pub builder: PartyId,
    /// The current controlling party; changes only via a Transfer.
    pub owner: PartyId,
}

impl AssetRecord {
    /// Create the initial record of a lineage (the Issue output).
    #[must_use]
    pub fn issued(facts: AssetFacts, builder: PartyId, owner: PartyId) -> Self {
        Self {
            record_ref: RecordRef::generate(),
            address: facts.address,
            build_area: facts.build_area,
            bedroom_count: facts.bedroom_count,
            construction_year: facts.construction_year,
            builder,
            owner,
        }
    }

    /// Build the candidate output of a transfer: same facts and builder,
    /// new owner, fresh record reference.
    #[must_use]
    pub fn transferred_to(&self, new_owner: PartyId) -> Self {
        Self {
            record_ref: RecordRef::generate(),
            owner: new_owner,
            ..self.clone()
        }
    }

    /// The parties that must know about this record: builder and owner,
    /// deduplicated when they coincide.
    #[must_use]
    pub fn participants(&self) -> Vec<PartyId> {
        if self.builder == self.owner {
            vec![self.owner]
        } else {
            vec![self.builder, self.owner]
        }
    }

    /// True iff every transfer-invariant field matches: `address`,
    /// `build_area`, `bedroom_count`, `construction_year`, and `builder`.
    /// Owner and record reference are allowed to differ.
    #[must_use]
    pub fn facts_match(&self, other: &Self) -> bool {
        self.address == other.address
            && self.build_area == other.build_area
            && self.bedroom_count == other.bedroom_count
            && self.construction_year == other.construction_year
            && self.builder == other.builder
    }

    /// The descriptive facts of this record.
    #[must_use]
    pub fn facts(&self) -> AssetFacts {
        AssetFacts {
            address: self.address.clone(),
            build_area: self.build_area.clone(),
            bedroom_count: self.bedroom_count,
            construction_year: self.construction_year,
        }
    }
}

/// A live (unconsumed) record as held in a party's vault, together with
/// the notary guarding its lineage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentRecord {
    /// The record itself.
    pub record: AssetRecord,
    /// The notary that ordered the transition producing this record.
    pub notary: NotaryId,
}

impl UnspentRecord {
    pub fn new(record: AssetRecord, notary: NotaryId) -> Self {
        Self { record, notary }
    }
}

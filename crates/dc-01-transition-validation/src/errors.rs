//! Error types for Transition Validation

use shared_types::{NotaryId, PartyId};
use thiserror::Error;

/// All rule violations the validator can report.
///
/// Every variant's display string is the reason surfaced to the caller and
/// carried into the terminal `Rejected` state, so rejections stay auditable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Zero or several intent tags asserted.
    #[error("ambiguous intent: {count} intent tags asserted")]
    AmbiguousIntent { count: usize },

    /// Output list is not a single asset record.
    #[error("expected exactly one output of asset type, got {count}")]
    OutputShape { count: usize },

    /// Proposal notary differs from the consumed input's notary.
    #[error("notary mismatch: input guarded by {input}, proposal built against {proposal}")]
    NotaryMismatch { input: NotaryId, proposal: NotaryId },

    /// Issue proposals must not consume records.
    #[error("issue must not consume inputs, got {count}")]
    IssueConsumesInputs { count: usize },

    /// The output's builder is absent from the asserted signer set.
    #[error("builder signature required: builder {builder} absent from signers")]
    BuilderSignatureMissing { builder: PartyId },

    /// Transfer proposals must consume exactly one asset record.
    #[error("transfer requires exactly one asset input, got {count}")]
    TransferInputShape { count: usize },

    /// A required transfer signer is absent from the asserted signer set.
    #[error("current and new owner must both sign: missing {missing}")]
    OwnerSignaturesMissing { missing: String },

    /// A transfer-invariant field differs between input and output.
    #[error("transfer must preserve asset facts, only owner may change")]
    FactsMutated,
}

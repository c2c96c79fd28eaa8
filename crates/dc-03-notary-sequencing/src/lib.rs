//! # DC-03: Notary Sequencing Subsystem
//!
//! The ordering service behind the transfer protocol: accepts completed
//! proposals, assigns each a position in a total order, and guarantees
//! that any given record is consumed by at most one accepted transition
//! across the whole network. This is where double-spend prevention lives;
//! the transition validator deliberately knows nothing about it.
//!
//! ## Architecture
//!
//! - **Ledger**: per-lineage consumption bookkeeping and acceptance log
//! - **Verify**: approval signature checks over the canonical digest
//! - **Service**: `NotaryService`, implementing the coordination crate's
//!   `SequencerGateway` port

pub mod ledger;
pub mod service;
pub mod verify;

pub use ledger::AcceptedTransition;
pub use service::NotaryService;

//! # Shared Types Crate
//!
//! This crate contains the domain entities shared across subsystems: party
//! identities, asset records, and the proposal/approval types exchanged by
//! the transfer coordination protocol.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Immutable Records**: An `AssetRecord` is a value; state changes
//!   produce new records, they never mutate existing ones.
//! - **Canonical Digest**: Approvals sign the proposal's canonical SHA-256
//!   digest, computed field by field so every subsystem derives the same
//!   bytes.

pub mod entities;
pub mod proposal;

pub use entities::*;
pub use proposal::*;

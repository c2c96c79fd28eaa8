//! In-memory adapters
//!
//! Single-process implementations of the outbound ports, suitable for
//! tests and local simulation. Distributed deployments would supply their
//! own transport, vault, and notifier implementations against the same
//! ports.

pub mod memory_transport;
pub mod notifier;
pub mod signer;
pub mod vault;

pub use memory_transport::{MemoryListener, MemoryNetwork, MemorySession};
pub use notifier::MemoryNotifier;
pub use signer::Ed25519Signer;
pub use vault::InMemoryVault;

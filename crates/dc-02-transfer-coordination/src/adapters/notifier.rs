//! # In-Memory Participant Notifier
//!
//! Finality broadcast for a single-process deployment: each registered
//! party's vault is updated directly. Delivery is all-or-error; a
//! participant without a registered vault fails the broadcast rather than
//! being skipped silently.

use crate::ports::outbound::{NotifyError, ParticipantNotifier, VaultStore};
use async_trait::async_trait;
use shared_types::{FinalizedTransition, PartyId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Routes finalized transitions into each participant's vault.
#[derive(Default)]
pub struct MemoryNotifier {
    vaults: RwLock<HashMap<PartyId, Arc<dyn VaultStore>>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a party's vault as a broadcast destination.
    pub fn register(&self, party: PartyId, vault: Arc<dyn VaultStore>) {
        if let Ok(mut vaults) = self.vaults.write() {
            vaults.insert(party, vault);
        }
    }
}

#[async_trait]
impl ParticipantNotifier for MemoryNotifier {
    async fn notify(
        &self,
        participants: &[PartyId],
        finalized: &FinalizedTransition,
    ) -> Result<(), NotifyError> {
        for party in participants {
            let vault = self
                .vaults
                .read()
                .ok()
                .and_then(|vaults| vaults.get(party).cloned())
                .ok_or_else(|| NotifyError::Delivery {
                    party: *party,
                    reason: "no vault registered".to_string(),
                })?;

            vault
                .apply_finalized(finalized)
                .await
                .map_err(|err| NotifyError::Delivery {
                    party: *party,
                    reason: err.to_string(),
                })?;
            debug!(%party, position = %finalized.position, "finalized transition delivered");
        }
        Ok(())
    }
}

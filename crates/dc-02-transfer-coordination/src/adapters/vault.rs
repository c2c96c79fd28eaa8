//! # In-Memory Vault
//!
//! One party's local view of the ledger: the unspent head of each lineage
//! it participates in, plus the set of references it has seen consumed.
//! Applying the same finalized transition twice is a no-op, so repeated
//! broadcasts cannot resurrect a spent record.

use crate::ports::outbound::{StoreError, VaultStore};
use async_trait::async_trait;
use shared_types::{FinalizedTransition, RecordRef, UnspentRecord};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use tracing::debug;

/// In-memory record store keyed by lineage address.
#[derive(Default)]
pub struct InMemoryVault {
    unspent: RwLock<HashMap<String, UnspentRecord>>,
    consumed: RwLock<HashSet<RecordRef>>,
}

impl InMemoryVault {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unspent record directly (vault bootstrap in tests).
    pub fn seed(&self, unspent: UnspentRecord) {
        if let Ok(mut records) = self.unspent.write() {
            records.insert(unspent.record.address.clone(), unspent);
        }
    }

    /// Number of live records held.
    #[must_use]
    pub fn unspent_count(&self) -> usize {
        self.unspent.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether this vault has seen `record_ref` consumed.
    #[must_use]
    pub fn is_consumed(&self, record_ref: RecordRef) -> bool {
        self.consumed
            .read()
            .map(|c| c.contains(&record_ref))
            .unwrap_or(false)
    }
}

#[async_trait]
impl VaultStore for InMemoryVault {
    async fn find_unspent(&self, address: &str) -> Result<Option<UnspentRecord>, StoreError> {
        let records = self
            .unspent
            .read()
            .map_err(|_| StoreError::LookupFailed("vault lock poisoned".to_string()))?;
        Ok(records.get(address).cloned())
    }

    async fn apply_finalized(&self, finalized: &FinalizedTransition) -> Result<(), StoreError> {
        let proposal = &finalized.proposal.proposal;

        let mut records = self
            .unspent
            .write()
            .map_err(|_| StoreError::UpdateFailed("vault lock poisoned".to_string()))?;
        let mut consumed = self
            .consumed
            .write()
            .map_err(|_| StoreError::UpdateFailed("vault lock poisoned".to_string()))?;

        for input in &proposal.inputs {
            consumed.insert(input.record.record_ref);
            // Drop the lineage head only if it is the record actually
            // consumed; a newer head must not be clobbered by a stale
            // broadcast.
            if records
                .get(&input.record.address)
                .is_some_and(|head| head.record.record_ref == input.record.record_ref)
            {
                records.remove(&input.record.address);
            }
        }

        for output in &proposal.outputs {
            if consumed.contains(&output.record_ref) {
                continue;
            }
            debug!(address = %output.address, owner = %output.owner, "vault updated");
            records.insert(
                output.address.clone(),
                UnspentRecord::new(output.clone(), proposal.notary),
            );
        }

        Ok(())
    }
}

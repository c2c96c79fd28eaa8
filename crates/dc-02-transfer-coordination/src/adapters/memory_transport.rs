//! # In-Memory Session Transport
//!
//! Point-to-point sessions over paired `tokio::sync::mpsc` channels.
//! Each `open` creates one duplex session: the caller gets one end, the
//! target party's listener receives the other. Channels deliver exactly
//! once and in order, which is precisely the session contract.

use crate::config::CoordinationConfig;
use crate::ipc::payloads::SessionMessage;
use crate::ports::outbound::{PeerSession, SessionError, SessionListener, SessionTransport};
use async_trait::async_trait;
use shared_types::PartyId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// In-process network connecting registered parties.
///
/// Shared behind an `Arc`; every handle sees the same routing table.
pub struct MemoryNetwork {
    listeners: Arc<RwLock<HashMap<PartyId, mpsc::Sender<Box<dyn PeerSession>>>>>,
    timeout: Duration,
    capacity: usize,
}

impl MemoryNetwork {
    /// Network with default coordination config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&CoordinationConfig::default())
    }

    /// Network with the given session timeout and capacity.
    #[must_use]
    pub fn with_config(config: &CoordinationConfig) -> Self {
        Self {
            listeners: Arc::new(RwLock::new(HashMap::new())),
            timeout: Duration::from_millis(config.session_timeout_ms),
            capacity: config.session_capacity,
        }
    }

    /// Register a party and return its inbound session listener.
    ///
    /// Re-registering a party replaces its previous listener.
    #[must_use]
    pub fn register(&self, party: PartyId) -> MemoryListener {
        let (tx, rx) = mpsc::channel(self.capacity);
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.insert(party, tx);
        }
        debug!(%party, "party registered on memory network");
        MemoryListener { incoming: rx }
    }

    /// Number of registered parties.
    #[must_use]
    pub fn party_count(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }
}

impl Default for MemoryNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionTransport for MemoryNetwork {
    async fn open(&self, party: PartyId) -> Result<Box<dyn PeerSession>, SessionError> {
        let target = self
            .listeners
            .read()
            .ok()
            .and_then(|listeners| listeners.get(&party).cloned())
            .ok_or(SessionError::PeerUnreachable { party })?;

        let (to_peer, peer_inbox) = mpsc::channel(self.capacity);
        let (from_peer, own_inbox) = mpsc::channel(self.capacity);

        let local = MemorySession {
            outgoing: to_peer,
            incoming: own_inbox,
            timeout: self.timeout,
        };
        let remote = MemorySession {
            outgoing: from_peer,
            incoming: peer_inbox,
            timeout: self.timeout,
        };

        // The party deregistered (listener dropped) between lookup and
        // delivery; same outcome as never registered.
        target
            .send(Box::new(remote))
            .await
            .map_err(|_| SessionError::PeerUnreachable { party })?;

        Ok(Box::new(local))
    }
}

/// Inbound side of a registered party: a stream of sessions opened by
/// remote initiators.
pub struct MemoryListener {
    incoming: mpsc::Receiver<Box<dyn PeerSession>>,
}

#[async_trait]
impl SessionListener for MemoryListener {
    async fn accept(&mut self) -> Option<Box<dyn PeerSession>> {
        self.incoming.recv().await
    }
}

/// One end of a duplex in-memory session.
pub struct MemorySession {
    outgoing: mpsc::Sender<SessionMessage>,
    incoming: mpsc::Receiver<SessionMessage>,
    timeout: Duration,
}

#[async_trait]
impl PeerSession for MemorySession {
    async fn send(&mut self, message: SessionMessage) -> Result<(), SessionError> {
        self.outgoing
            .send(message)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }

    async fn recv(&mut self) -> Result<SessionMessage, SessionError> {
        match tokio::time::timeout(self.timeout, self.incoming.recv()).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(SessionError::ChannelClosed),
            Err(_) => Err(SessionError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}

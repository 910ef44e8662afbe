//! Transport collaborator interface and an in-memory implementation
//!
//! A transport connects two peers by a namespaced string identifier and
//! carries text payloads. Callbacks from the real network (open, data, close,
//! error) are queued as `TransportEvent`s and drained with `poll`, so the
//! session can apply them one at a time on the game's own thread.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Data channel to the peer is open
    Open,
    Data(String),
    /// Peer closed the connection
    Closed,
    Error(TransportError),
}

pub trait Transport {
    /// Publish `id` and wait for a peer to connect to it
    fn listen(&mut self, id: &str) -> Result<(), TransportError>;
    /// Connect to a peer listening under `id`
    fn connect(&mut self, id: &str) -> Result<(), TransportError>;
    fn send(&mut self, payload: &str) -> Result<(), TransportError>;
    /// Close the connection and withdraw any published identifier
    fn close(&mut self);
    /// Next pending event, if any
    fn poll(&mut self) -> Option<TransportEvent>;
}

/// Hub-wide identity of a `LoopbackTransport`
pub type EndpointId = u32;

#[derive(Debug, Default)]
struct HubInner {
    next_id: EndpointId,
    listeners: HashMap<String, EndpointId>,
    links: HashMap<EndpointId, EndpointId>,
    inboxes: HashMap<EndpointId, VecDeque<TransportEvent>>,
}

impl HubInner {
    fn push(&mut self, endpoint: EndpointId, event: TransportEvent) {
        self.inboxes.entry(endpoint).or_default().push_back(event);
    }

    fn unlink(&mut self, endpoint: EndpointId) -> Option<EndpointId> {
        let peer = self.links.remove(&endpoint)?;
        self.links.remove(&peer);
        Some(peer)
    }
}

/// In-process rendezvous point for `LoopbackTransport`s (single thread)
#[derive(Debug, Clone, Default)]
pub struct LoopbackHub {
    inner: Rc<RefCell<HubInner>>,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, unconnected endpoint on this hub
    pub fn endpoint(&self) -> LoopbackTransport {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.inboxes.insert(id, VecDeque::new());
        LoopbackTransport {
            hub: self.clone(),
            id,
        }
    }

    /// Deliver a transport error to an endpoint (simulates network failure)
    pub fn inject_error(&self, endpoint: EndpointId, error: TransportError) {
        self.inner
            .borrow_mut()
            .push(endpoint, TransportEvent::Error(error));
    }
}

/// One side of an in-memory connection
#[derive(Debug)]
pub struct LoopbackTransport {
    hub: LoopbackHub,
    id: EndpointId,
}

impl LoopbackTransport {
    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// Two endpoints already linked to each other, both with `Open` queued
    pub fn pair() -> (Self, Self) {
        let hub = LoopbackHub::new();
        let a = hub.endpoint();
        let b = hub.endpoint();
        {
            let mut inner = hub.inner.borrow_mut();
            inner.links.insert(a.id, b.id);
            inner.links.insert(b.id, a.id);
            inner.push(a.id, TransportEvent::Open);
            inner.push(b.id, TransportEvent::Open);
        }
        (a, b)
    }
}

impl Transport for LoopbackTransport {
    fn listen(&mut self, id: &str) -> Result<(), TransportError> {
        let mut inner = self.hub.inner.borrow_mut();
        if inner.listeners.contains_key(id) {
            return Err(TransportError::RoomUnavailable(id.to_string()));
        }
        inner.listeners.insert(id.to_string(), self.id);
        Ok(())
    }

    fn connect(&mut self, id: &str) -> Result<(), TransportError> {
        let mut inner = self.hub.inner.borrow_mut();
        let Some(&host) = inner.listeners.get(id) else {
            return Err(TransportError::PeerUnavailable(id.to_string()));
        };
        if inner.links.contains_key(&host) {
            // Room already has its guest
            return Err(TransportError::PeerUnavailable(id.to_string()));
        }
        inner.links.insert(host, self.id);
        inner.links.insert(self.id, host);
        inner.push(host, TransportEvent::Open);
        inner.push(self.id, TransportEvent::Open);
        Ok(())
    }

    fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        let mut inner = self.hub.inner.borrow_mut();
        let Some(&peer) = inner.links.get(&self.id) else {
            return Err(TransportError::Closed);
        };
        inner.push(peer, TransportEvent::Data(payload.to_string()));
        Ok(())
    }

    fn close(&mut self) {
        let mut inner = self.hub.inner.borrow_mut();
        let me = self.id;
        inner.listeners.retain(|_, owner| *owner != me);
        if let Some(peer) = inner.unlink(me) {
            inner.push(peer, TransportEvent::Closed);
        }
    }

    fn poll(&mut self) -> Option<TransportEvent> {
        self.hub
            .inner
            .borrow_mut()
            .inboxes
            .get_mut(&self.id)
            .and_then(VecDeque::pop_front)
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        self.close();
        self.hub.inner.borrow_mut().inboxes.remove(&self.id);
    }
}

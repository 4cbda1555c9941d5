use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

use actionsock_core::error::{ActionSockError, Result};
use actionsock_core::protocol::Envelope;

use crate::auth::User;
use crate::realtime::Zones;
use crate::transport::codec::encode;

/// Handle to one socket's outbound queue. Cheap to clone; handed to every
/// handler invocation.
#[derive(Debug, Clone)]
pub struct Connection {
    id: u64,
    tx: mpsc::Sender<Message>,
}

impl Connection {
    pub fn new(id: u64, tx: mpsc::Sender<Message>) -> Self {
        Self { id, tx }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Queue an envelope for this socket. Lossy: fails instead of waiting when
    /// the queue is full or the socket is gone.
    pub fn send(&self, env: &Envelope) -> Result<()> {
        self.tx
            .try_send(encode(env)?)
            .map_err(|e| ActionSockError::Internal(format!("connection {} send failed: {e}", self.id)))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Live connections, the user each one authenticated as, and zone membership.
pub struct ConnectionRegistry {
    conns: DashMap<u64, Connection>,
    users: DashMap<u64, User>,
    zones: Zones,
    seq: AtomicU64,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            users: DashMap::new(),
            zones: Zones::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Register a new socket's outbound queue and return its handle.
    pub fn connect(&self, tx: mpsc::Sender<Message>) -> Connection {
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        let conn = Connection::new(id, tx);
        self.conns.insert(id, conn.clone());
        conn
    }

    /// Forget the connection, its user, and every zone it joined.
    pub fn disconnect(&self, id: u64) -> Option<Connection> {
        self.users.remove(&id);
        self.zones.cleanup_connection(id);
        self.conns.remove(&id).map(|(_, conn)| conn)
    }

    pub fn get(&self, id: u64) -> Option<Connection> {
        self.conns.get(&id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn set_user(&self, id: u64, user: User) {
        if self.conns.contains_key(&id) {
            self.users.insert(id, user);
        }
    }

    pub fn user(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|r| r.value().clone())
    }

    /// Authenticated users, ordered by connection id.
    pub fn users(&self) -> Vec<User> {
        let mut entries: Vec<(u64, User)> = self
            .users
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, u)| u).collect()
    }

    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    /// Send to every member of `zone` except `except`. Returns how many
    /// queues accepted the envelope; full or closed queues are skipped.
    pub fn broadcast_zone(&self, zone: &str, env: &Envelope, except: Option<u64>) -> usize {
        let mut delivered = 0;
        for id in self.zones.members(zone) {
            if Some(id) == except {
                continue;
            }
            let Some(conn) = self.get(id) else { continue };
            match conn.send(env) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::debug!(conn = id, zone, error = %e, "zone broadcast dropped"),
            }
        }
        delivered
    }
}

//! Session storage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

/// A one-shot message for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: String,
    pub text: String,
}

#[derive(Debug)]
struct SessionData {
    user_id: Option<Uuid>,
    flash: Vec<Flash>,
    last_seen: Instant,
}

impl SessionData {
    fn new() -> Self {
        Self {
            user_id: None,
            flash: Vec::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Concurrent in-memory session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SessionData>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Resume the session `id` if it is live, otherwise start a new one.
    pub fn load(&self, id: Option<Uuid>) -> Session {
        if let Some(id) = id {
            if let Some(mut data) = self.sessions.get_mut(&id) {
                if data.last_seen.elapsed() <= self.ttl {
                    data.last_seen = Instant::now();
                    return Session::new(id, false, self.clone());
                }
            }
            if self.sessions.remove(&id).is_some() {
                tracing::debug!(session_id = %id, "Session expired");
            }
        }

        let id = Uuid::new_v4();
        self.sessions.insert(id, SessionData::new());
        Session::new(id, true, self.clone())
    }

    /// Move the data of session `old` under a new id.
    fn rekey(&self, old: Uuid, update: impl FnOnce(&mut SessionData)) -> Uuid {
        let mut data = self
            .sessions
            .remove(&old)
            .map(|(_, data)| data)
            .unwrap_or_else(SessionData::new);
        update(&mut data);
        data.last_seen = Instant::now();

        let id = Uuid::new_v4();
        self.sessions.insert(id, data);
        id
    }

    /// Drop sessions idle for longer than the ttl. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions.retain(|_, data| data.last_seen.elapsed() <= ttl);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn with<T>(&self, id: Uuid, f: impl FnOnce(&mut SessionData) -> T) -> T {
        let mut data = self.sessions.entry(id).or_insert_with(SessionData::new);
        f(&mut data)
    }
}

#[derive(Debug)]
struct Handle {
    id: Uuid,
    send_cookie: bool,
}

/// Handle to one session for the duration of a request. Clones share the
/// same id, so a rotation made by a handler is seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct Session {
    handle: Arc<Mutex<Handle>>,
    store: SessionStore,
}

impl Session {
    fn new(id: Uuid, send_cookie: bool, store: SessionStore) -> Self {
        Self {
            handle: Arc::new(Mutex::new(Handle { id, send_cookie })),
            store,
        }
    }

    fn handle(&self) -> MutexGuard<'_, Handle> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> Uuid {
        self.handle().id
    }

    /// Whether the session was created or re-keyed by this request, so the
    /// cookie must be sent.
    pub fn needs_cookie(&self) -> bool {
        self.handle().send_cookie
    }

    /// Queue a flash message.
    pub fn flash(&self, kind: &str, text: impl Into<String>) {
        let flash = Flash {
            kind: kind.to_string(),
            text: text.into(),
        };
        self.store.with(self.id(), |data| data.flash.push(flash));
    }

    /// Take every queued flash message.
    pub fn take_flashes(&self) -> Vec<Flash> {
        self.store.with(self.id(), |data| std::mem::take(&mut data.flash))
    }

    /// Mark the session as logged in as `user_id`. The session gets a new id
    /// and the id it arrived with stops working.
    pub fn login(&self, user_id: Uuid) {
        let mut handle = self.handle();
        let previous = handle.id;
        handle.id = self.store.rekey(previous, |data| data.user_id = Some(user_id));
        handle.send_cookie = true;
        tracing::debug!(session_id = %handle.id, user_id = %user_id, "Session logged in");
    }

    pub fn logout(&self) {
        self.store.with(self.id(), |data| data.user_id = None);
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.store.with(self.id(), |data| data.user_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}

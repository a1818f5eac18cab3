use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

/// Server-side session storage keyed by an opaque token.
///
/// The in-memory store below is fine for a single instance; a multi-instance
/// deployment would swap in a shared backend behind the same trait.
pub trait SessionStore: Send + Sync {
    /// Create a new logged-in session and return its token
    fn create(&self) -> String;
    /// True if the token names a live, unexpired session
    fn validate(&self, token: &str) -> bool;
    /// Drop the session unconditionally
    fn destroy(&self, token: &str);
}

/// Process-bound session store with a fixed lifetime per session
pub struct MemorySessionStore {
    lifetime: Duration,
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, Instant>>,
}

impl MemorySessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self::with_clock(lifetime, Arc::new(SystemClock))
    }

    pub fn with_clock(lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            lifetime,
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let expires_at = self.clock.now() + self.lifetime;
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .insert(token.clone(), expires_at);
        token
    }

    fn validate(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        match sessions.get(token) {
            Some(expires_at) if self.clock.now() < *expires_at => true,
            Some(_) => {
                // expired; reap it lazily
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    fn destroy(&self, token: &str) {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .remove(token);
    }
}

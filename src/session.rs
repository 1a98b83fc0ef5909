/// Session State
///
/// A session holds the connection set and the query log for one client. The
/// router never owns either; sessions pass their connections in and record
/// what comes back.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::catalog::ConnectionSet;
use crate::router::QueryRouter;

/// One answered query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryLogEntry {
    pub query: String,
    pub report: String,
    pub timestamp: DateTime<Local>,
}

impl QueryLogEntry {
    /// Wall-clock time as shown in the history listing
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Append-only log of answered queries in arrival order.
///
/// With a limit set, the oldest entries are dropped once it is exceeded.
#[derive(Debug, Clone, Default)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    limit: Option<usize>,
    total: usize,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn push(&mut self, entry: QueryLogEntry) {
        self.entries.push_back(entry);
        self.total += 1;
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
    }

    /// Up to `n` most recent entries, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter().rev().take(n)
    }

    pub fn latest(&self) -> Option<&QueryLogEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queries ever logged, including dropped ones
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Connection set and query log of one client
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub connections: ConnectionSet,
    pub history: QueryLog,
}

impl Session {
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            connections: ConnectionSet::new(),
            history: QueryLog::with_limit(history_limit),
        }
    }

    /// Route a query against this session's connections and log the result
    pub fn ask(&mut self, router: &QueryRouter, query: &str) -> QueryLogEntry {
        let entry = QueryLogEntry {
            query: query.to_string(),
            report: router.route(query, &self.connections),
            timestamp: Local::now(),
        };
        self.history.push(entry.clone());
        entry
    }
}

/// Sessions kept when no cap is configured
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug)]
struct Slot {
    session: Session,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Slots {
    by_key: HashMap<String, Slot>,
    clock: u64,
}

/// Independent sessions keyed by client identifier.
///
/// The store holds at most `max_sessions` sessions. Creating one more evicts
/// the session that was used least recently, so clients that invent a new
/// session id per request cannot grow the map.
#[derive(Debug)]
pub struct SessionStore {
    slots: Mutex<Slots>,
    history_limit: Option<usize>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionStore {
    /// Create a store with the default session cap.
    ///
    /// # Arguments
    /// * `history_limit` - Query log entries kept per session; unbounded when `None`
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            history_limit,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Replace the session cap. A cap of zero is treated as one.
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Run a closure with exclusive access to one session.
    ///
    /// The session is created on first use. When that pushes the store past
    /// its cap, the least recently used other session is dropped first.
    ///
    /// # Arguments
    /// * `key` - Client identifier (`stdio`, `http` or an `Mcp-Session-Id` value)
    /// * `f` - Closure run while the store lock is held
    ///
    /// # Returns
    /// Whatever `f` returns
    pub fn with_session<R>(&self, key: &str, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.clock += 1;
        let now = slots.clock;

        if !slots.by_key.contains_key(key) {
            while slots.by_key.len() >= self.max_sessions {
                let Some(oldest) = slots
                    .by_key
                    .iter()
                    .min_by_key(|(_, slot)| slot.last_used)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                slots.by_key.remove(&oldest);
                tracing::info!(session = %oldest, "Evicting least recently used session");
            }
            tracing::info!(session = key, "Creating session");
            slots.by_key.insert(
                key.to_string(),
                Slot {
                    session: Session::new(self.history_limit),
                    last_used: now,
                },
            );
        }

        match slots.by_key.get_mut(key) {
            Some(slot) => {
                slot.last_used = now;
                f(&mut slot.session)
            }
            None => f(&mut Session::new(self.history_limit)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots
            .lock()
            .map(|s| s.by_key.contains_key(key))
            .unwrap_or_else(|poisoned| poisoned.into_inner().by_key.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .map(|s| s.by_key.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().by_key.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

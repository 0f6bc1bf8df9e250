//! Shared store of real responses and mock overrides.
//!
//! `CacheRepository` is constructed once and shared as `Arc<CacheRepository>`
//! between every adapter, strategy and presentation consumer, so a mock set
//! through one HTTP client is observed by all of them.

use crate::types::identity::RequestIdentity;
use crate::types::response::{MockResponse, RealResponse, ResponseRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Map of identities to records, with presentation order.
#[derive(Debug, Clone, Default)]
struct CacheState {
    order: Vec<RequestIdentity>,
    records: HashMap<RequestIdentity, ResponseRecord>,
}

/// Immutable view of the cache at one point in time.
///
/// Cloning is cheap. Later writes to the repository never change a snapshot
/// that has already been taken.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot(Arc<CacheState>);

impl CacheSnapshot {
    /// Number of records
    pub fn len(&self) -> usize {
        self.0.order.len()
    }

    /// `true` if the snapshot holds no record
    pub fn is_empty(&self) -> bool {
        self.0.order.is_empty()
    }

    /// Record for `identity`
    pub fn get(&self, identity: &RequestIdentity) -> Option<&ResponseRecord> {
        self.0.records.get(identity)
    }

    /// Records in the order their identities were first cached.
    pub fn iter(&self) -> impl Iterator<Item = (&RequestIdentity, &ResponseRecord)> {
        self.0
            .order
            .iter()
            .filter_map(|identity| self.0.records.get(identity).map(|r| (identity, r)))
    }
}

/// Thread-safe cache of responses keyed by [`RequestIdentity`].
///
/// Writes (`cache`, `mock`, `unmock`, `clear_cache`) run under the write lock
/// of a `watch` channel and are serialized against each other. The state
/// behind the lock is copy-on-write, so readers only hold the read lock long
/// enough to clone an `Arc`.
#[derive(Debug)]
pub struct CacheRepository {
    state: watch::Sender<CacheSnapshot>,
}

impl CacheRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        let (state, _) = watch::channel(CacheSnapshot::default());
        Self { state }
    }

    /// Store the real response for `identity`, keeping any existing override.
    pub fn cache(&self, identity: RequestIdentity, response: RealResponse) {
        debug!(
            method = identity.method(),
            path = identity.path(),
            status = response.code.as_u16(),
            "Caching real response"
        );

        self.state.send_modify(|snapshot| {
            let state = Arc::make_mut(&mut snapshot.0);
            match state.records.get_mut(&identity) {
                Some(record) => record.real = response,
                None => {
                    state.order.push(identity.clone());
                    state.records.insert(identity, ResponseRecord::new(response));
                }
            }
        });
    }

    /// The override for `identity`, if one is set.
    ///
    /// Returns `None` both when nothing is cached and when a real response is
    /// cached without an override.
    pub fn get_mock(&self, identity: &RequestIdentity) -> Option<MockResponse> {
        self.state
            .borrow()
            .get(identity)
            .and_then(|record| record.mock.clone())
    }

    /// The full record for `identity`.
    pub fn get(&self, identity: &RequestIdentity) -> Option<ResponseRecord> {
        self.state.borrow().get(identity).cloned()
    }

    /// Attach an override to an already cached identity.
    ///
    /// Returns `false` and leaves the repository unchanged when `identity`
    /// has never been cached.
    pub fn mock(&self, identity: &RequestIdentity, response: MockResponse) -> bool {
        let delay_ms = response.delay().as_millis() as u64;
        let status = response.code().as_u16();

        let updated = self.state.send_if_modified(|snapshot| {
            if !snapshot.0.records.contains_key(identity) {
                return false;
            }
            let state = Arc::make_mut(&mut snapshot.0);
            match state.records.get_mut(identity) {
                Some(record) => {
                    record.mock = Some(response);
                    true
                }
                None => false,
            }
        });

        if updated {
            info!(
                method = identity.method(),
                path = identity.path(),
                status,
                delay_ms,
                "Mock set"
            );
        } else {
            debug!(
                method = identity.method(),
                path = identity.path(),
                "Mock rejected: identity not cached"
            );
        }
        updated
    }

    /// Remove the override for `identity`, reverting to the real response.
    ///
    /// Returns `false` when `identity` has never been cached.
    pub fn unmock(&self, identity: &RequestIdentity) -> bool {
        let mut found = false;

        self.state.send_if_modified(|snapshot| {
            let Some(record) = snapshot.0.records.get(identity) else {
                return false;
            };
            found = true;
            if record.mock.is_none() {
                return false;
            }
            let state = Arc::make_mut(&mut snapshot.0);
            if let Some(record) = state.records.get_mut(identity) {
                record.mock = None;
            }
            true
        });

        if found {
            info!(method = identity.method(), path = identity.path(), "Mock removed");
        } else {
            debug!(
                method = identity.method(),
                path = identity.path(),
                "Unmock ignored: identity not cached"
            );
        }
        found
    }

    /// Drop every record.
    pub fn clear_cache(&self) {
        let cleared = self.state.send_if_modified(|snapshot| {
            if snapshot.is_empty() {
                return false;
            }
            *snapshot = CacheSnapshot::default();
            true
        });

        if cleared {
            info!("Cache cleared");
        }
    }

    /// Current contents of the cache.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.state.borrow().clone()
    }

    /// Change feed: the receiver is notified after every effective write.
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.state.subscribe()
    }

    /// Number of cached identities
    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    /// `true` if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }
}

impl Default for CacheRepository {
    fn default() -> Self {
        Self::new()
    }
}

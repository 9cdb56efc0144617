//! Seen-state gate: has this user started this tour before?
//!
//! The gate sits between the controller (and entry-point badges) and a
//! [`SeenStore`]. It absorbs everything that can go wrong: an unknown user
//! reads as "not seen" and writes nothing, and store failures are logged
//! and swallowed. A tour must run the same whether or not the store works.

use jiff::Timestamp;
use tracing::{debug, warn};

use crate::storage::Result;

/// Durable keyed storage for seen flags.
pub trait SeenStore {
    fn get(&self, tour_id: &str, user_id: &str) -> Result<bool>;

    /// Records `true`. There is no way to write `false`.
    fn set(&self, tour_id: &str, user_id: &str) -> Result<()>;

    /// When the flag was first set, for stores that keep it.
    fn seen_at(&self, _tour_id: &str, _user_id: &str) -> Result<Option<Timestamp>> {
        Ok(None)
    }
}

/// Failure-absorbing front for a [`SeenStore`].
pub struct SeenGate {
    store: Option<Box<dyn SeenStore>>,
}

impl SeenGate {
    pub fn new(store: impl SeenStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    /// A gate with no store at all, for when storage could not be opened.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Whether to hide the "new" badge for `tour_id`.
    pub fn has_seen(&self, tour_id: &str, user_id: Option<&str>) -> bool {
        let (Some(store), Some(user_id)) = (&self.store, user_id) else {
            return false;
        };
        match store.get(tour_id, user_id) {
            Ok(seen) => seen,
            Err(e) => {
                warn!(tour_id, user_id, error = %e, "seen-state read failed, treating as unseen");
                false
            }
        }
    }

    /// Records that the tour was started. Never fails.
    pub fn mark_seen(&self, tour_id: &str, user_id: Option<&str>) {
        let Some(user_id) = user_id else {
            debug!(tour_id, "no user identity, seen-state not recorded");
            return;
        };
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.set(tour_id, user_id) {
            warn!(tour_id, user_id, error = %e, "seen-state write failed");
        }
    }

    /// When the user first started the tour. `None` when unknown, including
    /// when the store cannot say.
    pub fn first_seen(&self, tour_id: &str, user_id: Option<&str>) -> Option<Timestamp> {
        let (Some(store), Some(user_id)) = (&self.store, user_id) else {
            return None;
        };
        match store.seen_at(tour_id, user_id) {
            Ok(at) => at,
            Err(e) => {
                warn!(tour_id, user_id, error = %e, "seen-state timestamp unreadable");
                None
            }
        }
    }
}

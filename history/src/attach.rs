//! Deferred attachment callbacks.
//!
//! A rebuilt entity sometimes needs follow-up work that can only run
//! once the entity is linked to its owner. Callers queue that work
//! here; restore and load run it immediately after each entity is
//! attached, so nothing ever has to poll for attachment.

use std::collections::BTreeMap;
use std::fmt;

use crate::host::ProjectHost;

/// Work to run once a keyed entity is attached.
pub type AttachCallback = Box<dyn FnOnce(&mut dyn ProjectHost)>;

/// Queue of per-key attachment callbacks.
#[derive(Default)]
pub struct AttachHooks {
    deferred: BTreeMap<String, Vec<AttachCallback>>,
}

impl AttachHooks {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `callback` to run the next time `key` is attached.
    pub fn defer(&mut self, key: impl Into<String>, callback: AttachCallback) {
        self.deferred.entry(key.into()).or_default().push(callback);
    }

    /// Runs and drops every callback queued for `key`, in queue order.
    pub fn notify_attached(&mut self, key: &str, host: &mut dyn ProjectHost) {
        let Some(callbacks) = self.deferred.remove(key) else {
            return;
        };
        for callback in callbacks {
            callback(host);
        }
    }

    /// Number of keys with pending callbacks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.deferred.len()
    }
}

impl fmt::Debug for AttachHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachHooks")
            .field("pending_keys", &self.deferred.keys().collect::<Vec<_>>())
            .finish()
    }
}

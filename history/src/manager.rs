//! The history manager itself.

use std::collections::BTreeSet;

use graph::{deserialize_node, DecodeLimits, IdentityTable};
use registry::registry_fingerprint;

use crate::attach::AttachHooks;
use crate::error::{HistoryError, HistoryResult, ProjectResult};
use crate::host::ProjectHost;
use crate::snapshot::{decode_project, encode_project, ProjectSnapshot};

const RESTORE_OPERATION: &str = "history.restore";
const LOAD_OPERATION: &str = "history.load";

/// Outcome of loading project text into a host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entities rebuilt and attached.
    pub entities_restored: usize,
    /// Keys listed in the order but skipped (missing or unbuildable).
    pub entities_skipped: usize,
    /// The file was saved against a differently populated registry.
    /// Unrecognized types come back as inert data rather than failing.
    pub fingerprint_mismatch: bool,
}

#[derive(Default)]
struct ApplyStats {
    restored: usize,
    skipped: usize,
}

/// Linear, bounded undo/redo history over full-state snapshots.
#[derive(Debug)]
pub struct History {
    stack: Vec<ProjectSnapshot>,
    current: usize,
    max_size: usize,
    in_flight: BTreeSet<String>,
    enabled: bool,
    hooks: AttachHooks,
    limits: DecodeLimits,
}

impl History {
    /// Creates a history bounded to `max_size` snapshots (0 = unbounded).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            stack: Vec::new(),
            current: 0,
            max_size,
            in_flight: BTreeSet::new(),
            enabled: true,
            hooks: AttachHooks::new(),
            limits: DecodeLimits::default(),
        }
    }

    /// Replaces the decode limits applied on the load path.
    #[must_use]
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of snapshots on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns `true` when no snapshot has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Index of the snapshot the live state currently corresponds to.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The configured bound (0 = unbounded).
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Read access to a stored snapshot.
    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<&ProjectSnapshot> {
        self.stack.get(index)
    }

    /// Whether recording is enabled at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns recording on or off. Undo/redo are suspended while off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The attachment callback queue.
    pub fn hooks_mut(&mut self) -> &mut AttachHooks {
        &mut self.hooks
    }

    /// Marks a named compound operation as in flight.
    ///
    /// While any operation is in flight, `record_snapshot` is a no-op.
    /// The same name cannot be begun twice.
    pub fn begin_operation(&mut self, name: &str) -> HistoryResult<()> {
        if !self.in_flight.insert(name.to_owned()) {
            return Err(HistoryError::OperationAlreadyActive {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    /// Ends a previously begun operation.
    pub fn end_operation(&mut self, name: &str) -> HistoryResult<()> {
        if !self.in_flight.remove(name) {
            return Err(HistoryError::OperationNotActive {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    /// Writes are only permitted while no named operation is in flight.
    #[must_use]
    pub fn can_write(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Captures the host's state onto the stack.
    ///
    /// Entries past the current index are stale futures left by earlier
    /// undos and are discarded first. Past `max_size` the oldest entry
    /// falls off the front.
    pub fn record_snapshot(&mut self, host: &dyn ProjectHost) {
        if !self.enabled || !self.can_write() {
            return;
        }
        if !self.stack.is_empty() {
            self.stack.truncate(self.current + 1);
        }
        self.stack.push(ProjectSnapshot::capture(host));
        self.current = self.stack.len() - 1;
        if self.max_size > 0 && self.stack.len() > self.max_size {
            self.stack.remove(0);
            self.current -= 1;
        }
    }

    /// Steps back one snapshot. No-op at the oldest entry or while
    /// disabled.
    pub fn undo(&mut self, host: &mut dyn ProjectHost) -> HistoryResult<()> {
        if !self.enabled || self.stack.is_empty() || self.current == 0 {
            return Ok(());
        }
        self.current -= 1;
        self.restore(host, self.current)
    }

    /// Steps forward one snapshot. No-op at the newest entry or while
    /// disabled.
    pub fn redo(&mut self, host: &mut dyn ProjectHost) -> HistoryResult<()> {
        if !self.enabled || self.stack.is_empty() || self.current + 1 >= self.stack.len() {
            return Ok(());
        }
        self.current += 1;
        self.restore(host, self.current)
    }

    /// Rebuilds the host from `stack[index]`.
    ///
    /// Reconstruction may normalize fields the serializer treats as
    /// transient, so the freshly restored state is serialized back into
    /// the same slot; an undo or redo taken from here then replays
    /// exactly what is live.
    pub fn restore(&mut self, host: &mut dyn ProjectHost, index: usize) -> HistoryResult<()> {
        if index >= self.stack.len() {
            return Ok(());
        }
        self.begin_operation(RESTORE_OPERATION)?;
        let snapshot = self.stack[index].clone();
        self.apply(host, &snapshot);
        self.stack[index] = ProjectSnapshot::capture(host);
        self.end_operation(RESTORE_OPERATION)
    }

    /// Renders the host's current state as project text.
    pub fn save_project(&self, host: &dyn ProjectHost) -> ProjectResult<String> {
        encode_project(&ProjectSnapshot::capture(host))
    }

    /// Parses, validates, and applies project text.
    ///
    /// The text is validated in full before any live entity is dropped,
    /// so a bad file never leaves the host half-cleared. The loaded
    /// state is then recorded as the newest history entry.
    pub fn load_project(
        &mut self,
        host: &mut dyn ProjectHost,
        text: &str,
    ) -> ProjectResult<LoadReport> {
        let snapshot = decode_project(text, &self.limits)?;
        let fingerprint_mismatch =
            snapshot.registry_fingerprint != registry_fingerprint(host.registry());

        self.begin_operation(LOAD_OPERATION)
            .map_err(|_| crate::error::ProjectError::Busy {
                operation: LOAD_OPERATION.to_owned(),
            })?;
        let stats = self.apply(host, &snapshot);
        self.end_operation(LOAD_OPERATION)
            .map_err(|_| crate::error::ProjectError::Busy {
                operation: LOAD_OPERATION.to_owned(),
            })?;
        self.record_snapshot(host);

        Ok(LoadReport {
            entities_restored: stats.restored,
            entities_skipped: stats.skipped,
            fingerprint_mismatch,
        })
    }

    fn apply(&mut self, host: &mut dyn ProjectHost, snapshot: &ProjectSnapshot) -> ApplyStats {
        host.clear_entities();
        let mut stats = ApplyStats::default();
        // One table spans the whole apply, mirroring capture: a reference
        // from one entity tree into another resolves to the instance the
        // earlier tree materialized.
        let mut table = IdentityTable::new();
        for key in &snapshot.entity_order {
            let Some(node) = snapshot.entities.get(key) else {
                stats.skipped += 1;
                continue;
            };
            let mut externals = host.external_args();
            let rebuilt = deserialize_node(node, &mut table, host.registry(), externals.as_mut());
            match rebuilt {
                Some(entity) => {
                    host.attach_entity(key, entity);
                    self.hooks.notify_attached(key, host);
                    stats.restored += 1;
                }
                None => stats.skipped += 1,
            }
        }
        host.set_viewport(snapshot.viewport.clone());
        stats
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_guard_rejects_duplicates() {
        let mut history = History::new(0);
        history.begin_operation("edit").unwrap();
        let err = history.begin_operation("edit").unwrap_err();
        assert_eq!(
            err,
            HistoryError::OperationAlreadyActive {
                name: "edit".into()
            }
        );
        history.end_operation("edit").unwrap();
    }

    #[test]
    fn ending_an_unknown_operation_is_an_error() {
        let mut history = History::new(0);
        let err = history.end_operation("never-begun").unwrap_err();
        assert_eq!(
            err,
            HistoryError::OperationNotActive {
                name: "never-begun".into()
            }
        );
    }

    #[test]
    fn can_write_tracks_in_flight_operations() {
        let mut history = History::new(0);
        assert!(history.can_write());
        history.begin_operation("a").unwrap();
        history.begin_operation("b").unwrap();
        assert!(!history.can_write());
        history.end_operation("a").unwrap();
        assert!(!history.can_write());
        history.end_operation("b").unwrap();
        assert!(history.can_write());
    }
}

//! Linear undo/redo history over whole-state snapshots.
//!
//! The history manager sits between a host application and the graph
//! serializer. The host calls [`History::record_snapshot`] after each
//! mutation it considers undoable; the manager captures the host's full
//! live state through the [`ProjectHost`] boundary and keeps a bounded,
//! linear stack of those captures. `undo` and `redo` rebuild the live
//! state from a stored capture.
//!
//! Compound actions bracket themselves with
//! [`History::begin_operation`]/[`History::end_operation`] so that
//! snapshot calls fired by their internal side effects collapse into
//! zero writes, leaving the outer caller to record exactly one.
//!
//! The same snapshot shape doubles as the saved-project file format, see
//! [`History::save_project`] and [`History::load_project`].

mod attach;
mod error;
mod host;
mod manager;
mod snapshot;

pub use attach::{AttachCallback, AttachHooks};
pub use error::{HistoryError, HistoryResult, ProjectError, ProjectResult};
pub use host::{ProjectHost, Viewport};
pub use manager::{History, LoadReport};
pub use snapshot::{
    decode_project, encode_project, ProjectSnapshot, FORMAT_MARKER, FORMAT_VERSION,
};

//! The boundary between the history manager and the host application.

use graph::{ExternalArgs, ObjectRegistry, Value};
use serde::{Deserialize, Serialize};

/// Auxiliary view state captured alongside the entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Horizontal center of the view.
    pub center_x: f64,
    /// Vertical center of the view.
    pub center_y: f64,
    /// Zoom level.
    pub zoom: u32,
    /// Key of the selected entity, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

/// Adapter over the application that owns the live entities.
///
/// The history manager drives whole-state captures and restores through
/// this boundary and never holds entity state of its own. Entities are
/// exchanged as [`Value`] so that inert data from unrecognized types
/// flows through a restore unchanged.
pub trait ProjectHost {
    /// Stable entity keys, in presentation order.
    fn entity_order(&self) -> Vec<String>;

    /// Resolves one key to its live entity.
    fn entity(&self, key: &str) -> Option<Value>;

    /// The registry used to rebuild entities on restore.
    fn registry(&self) -> &ObjectRegistry;

    /// An owned provider for constructor arguments marked external.
    ///
    /// Requested once per restored entity; arguments are consumed in
    /// constructor order.
    fn external_args(&self) -> Box<dyn ExternalArgs>;

    /// The current auxiliary view state.
    fn viewport(&self) -> Viewport;

    /// Replaces the auxiliary view state.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Drops all live entities ahead of a restore.
    fn clear_entities(&mut self);

    /// Reattaches one rebuilt entity under its key.
    fn attach_entity(&mut self, key: &str, entity: Value);
}

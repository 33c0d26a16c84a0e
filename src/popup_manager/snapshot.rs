use super::{PopupManager, StackEntry};
use crate::surface::SurfaceHost;

/// Point-in-time view of a [`PopupManager`], for diagnostics and test assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StackSnapshot {
    /// Open popups, bottom to top.
    pub entries: Vec<StackEntry>,

    /// The backdrop exists and is attached to a parent.
    pub backdrop_attached: bool,

    pub backdrop_z_index: Option<i64>,

    /// Deferred transition tasks not yet run.
    pub pending_tasks: usize,

    /// Last value handed out by the z-index counter (`None` until first used).
    pub z_index: Option<i64>,
}

impl<H: SurfaceHost> PopupManager<H> {
    pub fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            entries: self.stack.clone(),
            backdrop_attached: self
                .backdrop
                .as_ref()
                .is_some_and(|b| self.host.parent(b).is_some()),
            backdrop_z_index: self.backdrop_z_index(),
            pending_tasks: self.timers.len(),
            z_index: self.z_index,
        }
    }
}

use std::time::Duration;

/// Options for [`super::PopupManager`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopupManagerOptions {
    /// Value the z-index counter starts from. The first [`super::PopupManager::next_z_index`]
    /// call returns `base_z_index + 1`.
    pub base_z_index: i64,

    /// Length of the backdrop enter/leave transition window.
    ///
    /// The enter marker is removed, and an emptied stack tears the backdrop down, only after this
    /// delay has elapsed on the manager's clock.
    pub transition_delay: Duration,

    /// Class every freshly created backdrop carries.
    pub backdrop_class: String,

    /// Transient class applied while a freshly created backdrop fades in.
    pub enter_class: String,

    /// Transient class applied while an emptied backdrop fades out.
    pub leave_class: String,

    /// Fade setting in effect before the first `open_modal` call overrides it.
    pub modal_fade: bool,

    /// If true, record stack events in a small ring buffer readable through
    /// [`super::PopupManager::debug_log_text`].
    pub debug_event_log: bool,

    /// Maximum number of debug log lines to keep (ring buffer).
    pub debug_event_log_capacity: usize,
}

impl Default for PopupManagerOptions {
    fn default() -> Self {
        Self {
            base_z_index: 2000,
            transition_delay: Duration::from_millis(200),
            backdrop_class: "v-modal".to_owned(),
            enter_class: "v-modal-enter".to_owned(),
            leave_class: "v-modal-leave".to_owned(),
            modal_fade: true,
            debug_event_log: false,
            debug_event_log_capacity: 200,
        }
    }
}

impl PopupManagerOptions {
    pub(crate) fn debug_log_capacity(&self) -> usize {
        self.debug_event_log_capacity.clamp(1, 10_000)
    }
}

use std::time::Duration;

/// Identifier a popup registers and opens itself under. The empty string means "no id".
pub type PopupId = String;

/// One open popup in the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StackEntry {
    pub id: PopupId,
    pub z_index: i64,
    /// Extra backdrop classes requested by this popup, in first-seen order without duplicates.
    pub modal_classes: Vec<String>,
}

/// Was the backdrop already there when it was acquired?
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum BackdropAcquire {
    Created,
    Reused,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum DeferredTask<E> {
    /// Drop the enter marker once the enter transition window is over.
    ClearEnterMarker { backdrop: E },

    /// Detach the backdrop if the stack is still empty, then drop the leave marker.
    Teardown { backdrop: E },
}

#[derive(Clone, Debug)]
pub(super) struct ScheduledTask<E> {
    pub(super) due: Duration,
    pub(super) seq: u64,
    pub(super) task: DeferredTask<E>,
}

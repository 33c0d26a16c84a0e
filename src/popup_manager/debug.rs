use itertools::Itertools as _;

use super::PopupManager;
use crate::surface::SurfaceHost;

impl<H: SurfaceHost> PopupManager<H> {
    pub(super) fn debug_log_event(&mut self, message: impl Into<String>) {
        if !self.options.debug_event_log {
            return;
        }
        let cap = self.options.debug_log_capacity();
        while self.debug_log.len() >= cap {
            self.debug_log.pop_front();
        }
        self.debug_log
            .push_back(format!("[{}ms] {}", self.now.as_millis(), message.into()));
    }

    /// The recorded debug events, one per line (empty unless `options.debug_event_log` is set).
    pub fn debug_log_text(&self) -> String {
        self.debug_log.iter().join("\n")
    }

    pub fn debug_log_clear(&mut self) {
        self.debug_log.clear();
    }

    /// One-line description of the stack, e.g. `dialog@2001 [wide] > drawer@2003`.
    pub fn debug_stack_summary(&self) -> String {
        if self.stack.is_empty() {
            return "(empty)".to_owned();
        }
        self.stack
            .iter()
            .map(|entry| {
                if entry.modal_classes.is_empty() {
                    format!("{}@{}", entry.id, entry.z_index)
                } else {
                    format!(
                        "{}@{} [{}]",
                        entry.id,
                        entry.z_index,
                        entry.modal_classes.join(" ")
                    )
                }
            })
            .join(" > ")
    }
}

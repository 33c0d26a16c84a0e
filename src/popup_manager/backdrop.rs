use super::PopupManager;
use super::types::{BackdropAcquire, DeferredTask};
use crate::surface::{self, SurfaceHost};

/// Input targeting the shared backdrop, as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackdropEvent {
    /// A touch drag across the backdrop.
    TouchMove,

    /// A completed click on the backdrop.
    Click(egui::PointerButton),
}

impl BackdropEvent {
    /// Map an egui event that the host has already hit-tested against the backdrop.
    ///
    /// Touch moves map to [`Self::TouchMove`], pointer releases to [`Self::Click`].
    pub fn from_egui(event: &egui::Event) -> Option<Self> {
        match event {
            egui::Event::Touch {
                phase: egui::TouchPhase::Move,
                ..
            } => Some(Self::TouchMove),
            egui::Event::PointerButton {
                button,
                pressed: false,
                ..
            } => Some(Self::Click(*button)),
            _ => None,
        }
    }
}

/// What the host should do with an event after the manager has seen it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDisposition {
    /// Stop propagation and suppress the default action (e.g. scrolling the page behind).
    Consumed,

    /// Let the event continue.
    Ignored,
}

impl<H: SurfaceHost> PopupManager<H> {
    /// The shared backdrop element, while it exists.
    pub fn backdrop(&self) -> Option<&H::Element> {
        self.backdrop.as_ref()
    }

    /// The backdrop's current stacking position, read back from the host.
    pub fn backdrop_z_index(&self) -> Option<i64> {
        let backdrop = self.backdrop.as_ref()?;
        surface::computed_style(&self.host, Some(backdrop), "z-index")?
            .parse()
            .ok()
    }

    /// Handle input that landed on the backdrop.
    ///
    /// Touch drags are swallowed so the content behind does not scroll; a primary click is routed
    /// to the topmost popup (see [`Self::handle_backdrop_click`]).
    pub fn handle_backdrop_event(&mut self, event: BackdropEvent) -> EventDisposition {
        if self.backdrop.is_none() {
            return EventDisposition::Ignored;
        }
        match event {
            BackdropEvent::TouchMove => EventDisposition::Consumed,
            BackdropEvent::Click(egui::PointerButton::Primary) => {
                self.handle_backdrop_click();
                EventDisposition::Consumed
            }
            BackdropEvent::Click(_) => EventDisposition::Ignored,
        }
    }

    pub(super) fn acquire_backdrop(&mut self) -> (H::Element, BackdropAcquire) {
        if let Some(backdrop) = &self.backdrop {
            return (backdrop.clone(), BackdropAcquire::Reused);
        }

        let backdrop = self.host.create_element();
        let backdrop_class = self.options.backdrop_class.clone();
        surface::add_marker(&mut self.host, Some(&backdrop), &backdrop_class);
        log::debug!("created backdrop {backdrop:?}");
        self.backdrop = Some(backdrop.clone());
        (backdrop, BackdropAcquire::Created)
    }

    pub(super) fn attach_backdrop(
        &mut self,
        backdrop: &H::Element,
        host_element: Option<&H::Element>,
    ) {
        let parent = host_element
            .and_then(|el| self.host.parent(el))
            .filter(|parent| !self.host.is_fragment(parent))
            .unwrap_or_else(|| self.host.body());
        self.host.append_child(&parent, backdrop);
    }

    /// The stack just drained: start the leave transition and schedule the teardown.
    pub(super) fn begin_backdrop_leave(&mut self) {
        let Some(backdrop) = self.backdrop.clone() else {
            return;
        };
        if self.modal_fade {
            let leave_class = self.options.leave_class.clone();
            surface::add_marker(&mut self.host, Some(&backdrop), &leave_class);
        }
        self.debug_log_event(format!("teardown scheduled backdrop={backdrop:?}"));
        self.schedule(DeferredTask::Teardown { backdrop });
    }

    pub(super) fn run_deferred(&mut self, task: DeferredTask<H::Element>) {
        match task {
            DeferredTask::ClearEnterMarker { backdrop } => {
                let enter_class = self.options.enter_class.clone();
                surface::remove_marker(&mut self.host, Some(&backdrop), &enter_class);
            }
            DeferredTask::Teardown { backdrop } => {
                if self.stack.is_empty() {
                    // An older teardown must not touch a backdrop created after it was scheduled.
                    if self.backdrop.as_ref() == Some(&backdrop) {
                        self.backdrop = None;
                    }
                    if let Some(parent) = self.host.parent(&backdrop) {
                        self.host.remove_child(&parent, &backdrop);
                    }
                    self.host.destroy_element(&backdrop);
                    log::debug!("backdrop {backdrop:?} torn down");
                    self.debug_log_event(format!("teardown backdrop={backdrop:?}"));
                } else {
                    log::trace!(
                        "teardown of {backdrop:?} skipped: {} popup(s) open",
                        self.stack.len()
                    );
                    self.debug_log_event(format!(
                        "teardown skipped backdrop={backdrop:?} depth={}",
                        self.stack.len()
                    ));
                }
                let leave_class = self.options.leave_class.clone();
                surface::remove_marker(&mut self.host, Some(&backdrop), &leave_class);
            }
        }
    }
}

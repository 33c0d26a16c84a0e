use std::time::Duration;

use super::{DismissRoute, PopupManager};
use crate::surface::SurfaceHost;

pub(super) fn is_escape_press(event: &egui::Event) -> bool {
    matches!(
        event,
        egui::Event::Key {
            key: egui::Key::Escape,
            pressed: true,
            ..
        }
    )
}

impl<H: SurfaceHost> PopupManager<H> {
    /// Global keyboard handling: every Escape press goes to the topmost popup.
    ///
    /// Returns the dismissal route if a popup reacted.
    pub fn handle_event(&mut self, event: &egui::Event) -> Option<DismissRoute> {
        if is_escape_press(event) {
            self.handle_escape()
        } else {
            None
        }
    }

    /// Per-frame hook for egui hosts.
    ///
    /// Advances the clock to the frame time, runs due transition tasks, routes Escape presses,
    /// and asks for a repaint when the next transition task is due.
    pub fn ui_frame(&mut self, ctx: &egui::Context) {
        let (time, events) = ctx.input(|i| (i.time, i.events.clone()));
        self.advance(Duration::from_secs_f64(time.max(0.0)));

        for event in &events {
            self.handle_event(event);
        }

        if let Some(due) = self.next_deadline() {
            ctx.request_repaint_after(due.saturating_sub(self.now));
        }
    }
}

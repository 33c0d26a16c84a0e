use std::rc::Rc;

use super::PopupManager;
use crate::surface::SurfaceHost;

/// Action passed to [`Popup::handle_action`] when Escape dismisses a popup.
pub const CANCEL_ACTION: &str = "cancel";

/// Which optional dismissal overrides a popup implements.
///
/// Escape dismissal honors these in order: `handle_close`, then `handle_action`, then the plain
/// [`Popup::close`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DismissHooks {
    pub handle_close: bool,
    pub handle_action: bool,
}

impl DismissHooks {
    pub const NONE: Self = Self {
        handle_close: false,
        handle_action: false,
    };
}

/// A popup taking part in the shared stack.
///
/// The manager only keeps a weak reference; the popup's owner decides its lifetime.
/// Methods take `&self` and receive the manager so that a popup can close itself
/// (typically by calling [`PopupManager::close_modal`] with its own id).
pub trait Popup<H: SurfaceHost> {
    /// Close when the shared backdrop is clicked while this popup is topmost.
    fn close_on_click_modal(&self) -> bool {
        false
    }

    /// Close when Escape is pressed while this popup is topmost.
    fn close_on_press_escape(&self) -> bool {
        false
    }

    /// Advertise the optional overrides below.
    fn dismiss_hooks(&self) -> DismissHooks {
        DismissHooks::NONE
    }

    fn close(&self, manager: &mut PopupManager<H>);

    /// Called instead of [`Self::close`] on Escape when `dismiss_hooks().handle_close` is set.
    fn handle_close(&self, manager: &mut PopupManager<H>) {
        self.close(manager);
    }

    /// Called with [`CANCEL_ACTION`] on Escape when `dismiss_hooks().handle_action` is set
    /// (and `handle_close` is not).
    fn handle_action(&self, _action: &str, manager: &mut PopupManager<H>) {
        self.close(manager);
    }
}

/// How a dismissal gesture reached the topmost popup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissRoute {
    HandleClose,
    HandleAction,
    Close,
}

impl<H: SurfaceHost> PopupManager<H> {
    fn top_popup(&self) -> Option<(String, Rc<dyn Popup<H>>)> {
        let top = self.stack.last()?;
        let popup = self.get_instance(&top.id)?;
        Some((top.id.clone(), popup))
    }

    /// Route an Escape press to the topmost popup.
    ///
    /// Returns the route taken, or `None` if the stack is empty, the topmost id is not registered,
    /// or the popup ignores Escape.
    pub fn handle_escape(&mut self) -> Option<DismissRoute> {
        let Some((id, popup)) = self.top_popup() else {
            log::trace!("escape ignored: no registered topmost popup");
            return None;
        };
        if !popup.close_on_press_escape() {
            log::trace!("escape ignored: popup {id:?} does not close on escape");
            return None;
        }

        let hooks = popup.dismiss_hooks();
        let route = if hooks.handle_close {
            DismissRoute::HandleClose
        } else if hooks.handle_action {
            DismissRoute::HandleAction
        } else {
            DismissRoute::Close
        };

        log::debug!("escape dismisses popup {id:?} via {route:?}");
        self.debug_log_event(format!("escape id={id:?} route={route:?}"));

        match route {
            DismissRoute::HandleClose => popup.handle_close(self),
            DismissRoute::HandleAction => popup.handle_action(CANCEL_ACTION, self),
            DismissRoute::Close => popup.close(self),
        }
        Some(route)
    }

    /// Route a primary click on the backdrop to the topmost popup.
    ///
    /// Only the plain [`Popup::close`] is used here. Returns whether a popup was closed.
    pub fn handle_backdrop_click(&mut self) -> bool {
        let Some((id, popup)) = self.top_popup() else {
            return false;
        };
        if !popup.close_on_click_modal() {
            log::trace!("backdrop click ignored: popup {id:?} does not close on click");
            return false;
        }

        log::debug!("backdrop click closes popup {id:?}");
        self.debug_log_event(format!("backdrop_click id={id:?}"));
        popup.close(self);
        true
    }
}

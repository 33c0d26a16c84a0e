//! Shared-backdrop popup stack.
//!
//! Dialogs, drawers, message boxes and dropdowns that overlap share a single dimming backdrop.
//! [`PopupManager`] keeps them in a stack (last opened = topmost), hands out z-indices, moves the
//! backdrop under whichever popup is on top, and routes Escape presses and backdrop clicks to the
//! topmost popup. The backdrop itself lives in a [`SurfaceHost`]: a DOM-like element tree the
//! manager drives through class markers and inline styles. [`MemorySurface`] is a headless host.
//!
//! ```
//! use std::rc::Rc;
//! use egui_popup_stack::{MemorySurface, Popup, PopupManager};
//!
//! struct Dialog;
//!
//! impl Popup<MemorySurface> for Dialog {
//!     fn close_on_press_escape(&self) -> bool {
//!         true
//!     }
//!
//!     fn close(&self, manager: &mut PopupManager<MemorySurface>) {
//!         manager.close_modal("dialog");
//!     }
//! }
//!
//! let mut manager = PopupManager::new(MemorySurface::new());
//! let dialog = Rc::new(Dialog);
//! manager.register("dialog", Rc::downgrade(&dialog));
//!
//! let z_index = manager.next_z_index();
//! manager.open_modal("dialog", Some(z_index), None, "", true);
//! assert_eq!(manager.backdrop_z_index(), Some(z_index));
//!
//! manager.handle_escape();
//! assert!(manager.stack().is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod memory_surface;
pub mod popup_manager;
pub mod surface;

pub use memory_surface::{ElementId, MemorySurface};
pub use popup_manager::{
    BackdropEvent, CANCEL_ACTION, DismissHooks, DismissRoute, EventDisposition, Popup, PopupId,
    PopupManager, PopupManagerOptions, StackEntry, StackSnapshot,
};
pub use surface::{MarkerError, ScrollbarWidth, SurfaceHost};

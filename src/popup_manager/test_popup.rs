use std::cell::RefCell;
use std::rc::Rc;

use super::{DismissHooks, Popup, PopupManager, PopupManagerOptions};
use crate::MemorySurface;

pub(super) fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

pub(super) fn new_manager() -> PopupManager<MemorySurface> {
    init_logging();
    PopupManager::new_with_options(
        MemorySurface::new(),
        PopupManagerOptions {
            debug_event_log: true,
            ..Default::default()
        },
    )
}

/// A popup that records which dismissal entry point was used and then closes itself.
#[derive(Default)]
pub(super) struct TestPopup {
    pub(super) id: String,
    pub(super) close_on_click_modal: bool,
    pub(super) close_on_press_escape: bool,
    pub(super) hooks: DismissHooks,
    pub(super) calls: RefCell<Vec<String>>,
}

impl TestPopup {
    pub(super) fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            close_on_click_modal: true,
            close_on_press_escape: true,
            ..Default::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl Popup<MemorySurface> for TestPopup {
    fn close_on_click_modal(&self) -> bool {
        self.close_on_click_modal
    }

    fn close_on_press_escape(&self) -> bool {
        self.close_on_press_escape
    }

    fn dismiss_hooks(&self) -> DismissHooks {
        self.hooks
    }

    fn close(&self, manager: &mut PopupManager<MemorySurface>) {
        self.record("close");
        manager.close_modal(&self.id);
    }

    fn handle_close(&self, manager: &mut PopupManager<MemorySurface>) {
        self.record("handle_close");
        manager.close_modal(&self.id);
    }

    fn handle_action(&self, action: &str, manager: &mut PopupManager<MemorySurface>) {
        self.record(format!("handle_action:{action}"));
        manager.close_modal(&self.id);
    }
}

/// Register a default [`TestPopup`] under `id` and return the owning handle.
pub(super) fn register(manager: &mut PopupManager<MemorySurface>, id: &str) -> Rc<TestPopup> {
    let popup = Rc::new(TestPopup::new(id));
    manager.register(id, Rc::downgrade(&popup));
    popup
}

use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

use itertools::Itertools as _;

use crate::surface::{self, ScrollbarWidth, SurfaceHost};

mod backdrop;
mod debug;
mod dismiss;
mod input;
mod options;
mod snapshot;
mod timers;
mod types;

#[cfg(test)]
mod input_tests;
#[cfg(test)]
mod test_popup;

pub use backdrop::{BackdropEvent, EventDisposition};
pub use dismiss::{CANCEL_ACTION, DismissHooks, DismissRoute, Popup};
pub use options::PopupManagerOptions;
pub use snapshot::StackSnapshot;
pub use types::{PopupId, StackEntry};

use timers::DeferredQueue;
use types::DeferredTask;

/// Coordinates popups that share one backdrop.
///
/// Owns:
/// - a registry from popup id to a weak reference to the popup,
/// - the stack of open popups (last = topmost), which decides backdrop z-index and which popup
///   Escape and backdrop clicks go to,
/// - the single backdrop element, created on the first open and torn down after the stack drains,
/// - a z-index counter handing out ever increasing values,
/// - a clock and a queue of fixed-delay tasks for the backdrop enter/leave transitions.
///
/// The manager is single-threaded: construct one per UI session and pass it to whatever opens
/// popups. Time only moves when the host calls [`Self::advance`] (or [`Self::ui_frame`]).
pub struct PopupManager<H: SurfaceHost> {
    pub options: PopupManagerOptions,

    host: H,
    instances: ahash::HashMap<PopupId, Weak<dyn Popup<H>>>,
    stack: Vec<StackEntry>,
    backdrop: Option<H::Element>,
    z_index: Option<i64>,
    modal_fade: bool,

    now: Duration,
    timers: DeferredQueue<H::Element>,

    scrollbar_width: ScrollbarWidth,

    debug_log: VecDeque<String>,
}

impl<H: SurfaceHost> std::fmt::Debug for PopupManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopupManager")
            .field("options", &self.options)
            .field("registered", &self.instances.keys().sorted().collect_vec())
            .field("stack", &self.stack)
            .field("backdrop", &self.backdrop)
            .field("z_index", &self.z_index)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl<H: SurfaceHost> PopupManager<H> {
    pub fn new(host: H) -> Self {
        Self::new_with_options(host, PopupManagerOptions::default())
    }

    pub fn new_with_options(host: H, options: PopupManagerOptions) -> Self {
        let modal_fade = options.modal_fade;
        Self {
            options,
            host,
            instances: Default::default(),
            stack: Vec::new(),
            backdrop: None,
            z_index: None,
            modal_fade,
            now: Duration::ZERO,
            timers: DeferredQueue::default(),
            scrollbar_width: ScrollbarWidth::new(),
            debug_log: VecDeque::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Registry ---

    /// Register `instance` under `id`, replacing any previous registration.
    ///
    /// Ignored if `id` is empty or the popup has already been dropped.
    /// Entries of popups dropped without [`Self::deregister`] are pruned here.
    pub fn register<P>(&mut self, id: &str, instance: Weak<P>)
    where
        P: Popup<H> + 'static,
        H: 'static,
    {
        self.instances.retain(|_, popup| popup.strong_count() > 0);
        if id.is_empty() || instance.strong_count() == 0 {
            return;
        }
        let instance: Weak<dyn Popup<H>> = instance;
        self.instances.insert(id.to_owned(), instance);
    }

    /// Forget the popup registered under `id`. Unknown ids are ignored.
    pub fn deregister(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }
        self.instances.remove(id);
    }

    /// The popup registered under `id`, if it is still alive.
    pub fn get_instance(&self, id: &str) -> Option<Rc<dyn Popup<H>>> {
        self.instances.get(id)?.upgrade()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.get_instance(id).is_some()
    }

    /// Number of registered popups that are still alive.
    pub fn registered_count(&self) -> usize {
        self.instances
            .values()
            .filter(|popup| popup.strong_count() > 0)
            .count()
    }

    // --- Z-index counter ---

    /// Current value of the z-index counter.
    pub fn z_index(&mut self) -> i64 {
        *self.z_index.get_or_insert(self.options.base_z_index)
    }

    /// Reserve a fresh z-index above every value handed out so far.
    pub fn next_z_index(&mut self) -> i64 {
        let next = self.z_index() + 1;
        self.z_index = Some(next);
        next
    }

    // --- Stack ---

    /// Push popup `id` onto the stack and show the shared backdrop beneath it.
    ///
    /// * `z_index`: stacking position of the backdrop while this popup is topmost. `None` makes
    ///   the call a no-op; `Some(0)` pushes the popup without touching the backdrop's z-index.
    /// * `host_element`: the popup's own element. The backdrop is attached next to it (to its
    ///   parent) unless it has no parent or the parent is a fragment, in which case the body is
    ///   used.
    /// * `modal_class`: space-separated extra classes for the backdrop.
    /// * `modal_fade`: whether backdrop transitions are enabled from now on.
    ///
    /// Opening an id that is already in the stack does nothing.
    pub fn open_modal(
        &mut self,
        id: &str,
        z_index: Option<i64>,
        host_element: Option<&H::Element>,
        modal_class: &str,
        modal_fade: bool,
    ) {
        let Some(z_index) = z_index else {
            log::trace!("open_modal ignored: no z-index for {id:?}");
            return;
        };
        if id.is_empty() {
            log::trace!("open_modal ignored: empty id");
            return;
        }
        if self.contains(id) {
            log::trace!("open_modal ignored: {id:?} is already open");
            return;
        }

        self.modal_fade = modal_fade;

        let (backdrop, acquired) = self.acquire_backdrop();
        if self.modal_fade && acquired == types::BackdropAcquire::Created {
            let enter_class = self.options.enter_class.clone();
            surface::add_marker(&mut self.host, Some(&backdrop), &enter_class);
        }

        let modal_classes = modal_class
            .split_whitespace()
            .unique()
            .map(str::to_owned)
            .collect_vec();
        for class in &modal_classes {
            surface::add_marker(&mut self.host, Some(&backdrop), class);
        }

        self.schedule(DeferredTask::ClearEnterMarker {
            backdrop: backdrop.clone(),
        });

        self.attach_backdrop(&backdrop, host_element);

        if z_index != 0 {
            self.host.set_style(&backdrop, "zIndex", &z_index.to_string());
        }
        self.host.set_tab_index(&backdrop, 0);
        self.host.set_style(&backdrop, "display", "");

        log::debug!(
            "open_modal {id:?} z_index={z_index} depth={} backdrop={acquired:?}",
            self.stack.len() + 1
        );
        self.debug_log_event(format!(
            "open id={id:?} z_index={z_index} classes={modal_classes:?} backdrop={acquired:?}"
        ));

        self.stack.push(StackEntry {
            id: id.to_owned(),
            z_index,
            modal_classes,
        });
    }

    /// Remove popup `id` from the stack.
    ///
    /// Closing the topmost popup strips its classes from the backdrop and hands the backdrop's
    /// z-index to the new topmost popup. Closing a popup further down only removes its entry:
    /// the backdrop keeps its classes and z-index. Unknown ids are ignored.
    ///
    /// Once the stack is empty the backdrop gets the leave marker (when fading) and is torn down
    /// after the transition delay, unless a popup opens again in the meantime.
    pub fn close_modal(&mut self, id: &str) {
        let Some(top) = self.stack.last() else {
            log::trace!("close_modal ignored: stack is empty");
            return;
        };

        if top.id == id {
            let Some(entry) = self.stack.pop() else {
                return;
            };
            if let Some(backdrop) = self.backdrop.clone() {
                for class in &entry.modal_classes {
                    surface::remove_marker(&mut self.host, Some(&backdrop), class);
                }
                if let Some(new_top) = self.stack.last() {
                    let z_index = new_top.z_index.to_string();
                    self.host.set_style(&backdrop, "zIndex", &z_index);
                }
            }
            log::debug!("close_modal {id:?} (topmost) depth={}", self.stack.len());
            self.debug_log_event(format!("close id={id:?} topmost"));
        } else if let Some(index) = self.stack.iter().rposition(|e| e.id == id) {
            self.stack.remove(index);
            log::debug!("close_modal {id:?} (out of order) depth={}", self.stack.len());
            self.debug_log_event(format!("close id={id:?} index={index}"));
        } else {
            log::trace!("close_modal ignored: {id:?} is not open");
            return;
        }

        if self.stack.is_empty() {
            self.begin_backdrop_leave();
        }
    }

    /// The open popups, bottom to top.
    pub fn stack(&self) -> &[StackEntry] {
        &self.stack
    }

    pub fn top(&self) -> Option<&StackEntry> {
        self.stack.last()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.stack.iter().any(|e| e.id == id)
    }

    /// Fade setting recorded by the last successful `open_modal`.
    pub fn modal_fade(&self) -> bool {
        self.modal_fade
    }

    /// Width of a native scrollbar on this host, measured on first use.
    pub fn scrollbar_width(&mut self) -> u32 {
        self.scrollbar_width.get_or_measure(&mut self.host)
    }

    // --- Clock ---

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock to `now` and run every deferred task that became due.
    ///
    /// The clock never goes backwards; an earlier `now` only runs tasks that are already due.
    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
        for task in self.timers.take_due(self.now) {
            self.run_deferred(task);
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance_by(&mut self, delta: Duration) {
        self.advance(self.now.saturating_add(delta));
    }

    /// When the next deferred task becomes due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn pending_tasks(&self) -> usize {
        self.timers.len()
    }

    fn schedule(&mut self, task: DeferredTask<H::Element>) {
        let due = self.now.saturating_add(self.options.transition_delay);
        self.timers.schedule(due, task);
    }
}

use std::collections::BTreeMap;

use crate::surface::SurfaceHost;

/// Handle to an element inside a [`MemorySurface`].
///
/// Slots are reused after [`SurfaceHost::destroy_element`]; the generation keeps a stale handle
/// from resolving to the element that took its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId {
    index: usize,
    generation: u32,
}

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeKind {
    Body,
    Element,
    Fragment,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    class_name: String,
    style: BTreeMap<String, String>,
    tab_index: Option<i32>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            class_name: String::new(),
            style: BTreeMap::new(),
            tab_index: None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A headless element tree implementing [`SurfaceHost`].
///
/// Useful for tests, and for hosts that paint the backdrop themselves: the manager writes class
/// names and styles here, the renderer reads them back with [`Self::style`] and friends.
///
/// Layout is minimal: `width` in `px` is taken literally, `100%` resolves to the parent
/// width minus the scrollbar gutter when the parent has `overflow: scroll`, and the body is
/// [`Self::DEFAULT_BODY_WIDTH`] wide.
#[derive(Debug)]
pub struct MemorySurface {
    slots: Vec<Slot>,
    free: Vec<usize>,
    scrollbar_gutter: u32,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub const DEFAULT_BODY_WIDTH: u32 = 1024;
    pub const DEFAULT_SCROLLBAR_GUTTER: u32 = 17;

    const BODY: ElementId = ElementId {
        index: 0,
        generation: 0,
    };

    pub fn new() -> Self {
        Self::with_scrollbar_gutter(Self::DEFAULT_SCROLLBAR_GUTTER)
    }

    pub fn with_scrollbar_gutter(scrollbar_gutter: u32) -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(NodeKind::Body)),
            }],
            free: Vec::new(),
            scrollbar_gutter,
        }
    }

    /// Create a detached fragment container.
    pub fn create_fragment(&mut self) -> ElementId {
        self.push_node(NodeKind::Fragment)
    }

    pub fn children(&self, element: &ElementId) -> &[ElementId] {
        self.node(element)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Number of live elements, the body included.
    pub fn element_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Does `element` still refer to a live (not destroyed) element?
    pub fn contains(&self, element: &ElementId) -> bool {
        self.node(element).is_some()
    }

    /// Is the element connected to the body?
    pub fn is_attached(&self, element: &ElementId) -> bool {
        self.is_inclusive_ancestor(&Self::BODY, element)
    }

    /// The inline style value, if set.
    pub fn style(&self, element: &ElementId, name: &str) -> Option<&str> {
        self.node(element)?.style.get(name).map(String::as_str)
    }

    pub fn tab_index(&self, element: &ElementId) -> Option<i32> {
        self.node(element)?.tab_index
    }

    fn push_node(&mut self, kind: NodeKind) -> ElementId {
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.node = Some(Node::new(kind));
            return ElementId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(kind)),
        });
        ElementId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn node(&self, element: &ElementId) -> Option<&Node> {
        let slot = self.slots.get(element.index)?;
        if slot.generation != element.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, element: &ElementId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(element.index)?;
        if slot.generation != element.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Is `ancestor` the same element as `element`, or on its parent chain?
    fn is_inclusive_ancestor(&self, ancestor: &ElementId, element: &ElementId) -> bool {
        let mut current = Some(*element);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.node(&id).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: ElementId) {
        let Some(parent) = self.node(&child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(&parent) {
            parent_node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.node_mut(&child) {
            node.parent = None;
        }
    }

    /// Free `element` and its whole subtree. The element must already be detached.
    fn free_subtree(&mut self, element: ElementId) {
        let mut pending = vec![element];
        while let Some(id) = pending.pop() {
            let Some(slot) = self.slots.get_mut(id.index) else {
                continue;
            };
            if slot.generation != id.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            pending.extend(node.children);
        }
    }

    fn width_px(&self, element: &ElementId) -> u32 {
        let Some(node) = self.node(element) else {
            return 0;
        };
        if node.kind == NodeKind::Body {
            return Self::DEFAULT_BODY_WIDTH;
        }
        match node.style.get("width").map(String::as_str) {
            Some(width) if width.ends_with("px") => width
                .trim_end_matches("px")
                .trim()
                .parse::<f32>()
                .map_or(0, |w| w.max(0.0).round() as u32),
            Some("100%") => node.parent.map_or(0, |parent| self.content_width(&parent)),
            _ => 0,
        }
    }

    fn content_width(&self, element: &ElementId) -> u32 {
        let width = self.width_px(element);
        let scrolls = self
            .node(element)
            .and_then(|n| n.style.get("overflow"))
            .is_some_and(|overflow| overflow == "scroll");
        if scrolls {
            width.saturating_sub(self.scrollbar_gutter)
        } else {
            width
        }
    }
}

impl SurfaceHost for MemorySurface {
    type Element = ElementId;

    fn create_element(&mut self) -> ElementId {
        self.push_node(NodeKind::Element)
    }

    fn body(&self) -> ElementId {
        Self::BODY
    }

    fn parent(&self, element: &ElementId) -> Option<ElementId> {
        self.node(element)?.parent
    }

    fn is_fragment(&self, element: &ElementId) -> bool {
        self.node(element)
            .is_some_and(|n| n.kind == NodeKind::Fragment)
    }

    fn append_child(&mut self, parent: &ElementId, child: &ElementId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // An element cannot become its own descendant.
        if self.is_inclusive_ancestor(child, parent) {
            log::warn!("append_child rejected: {child:?} is an ancestor of {parent:?}");
            return;
        }
        self.detach(*child);
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(*child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(*parent);
        }
    }

    fn remove_child(&mut self, parent: &ElementId, child: &ElementId) {
        if self.parent(child) == Some(*parent) {
            self.detach(*child);
        }
    }

    fn destroy_element(&mut self, element: &ElementId) {
        if *element == Self::BODY || !self.contains(element) {
            return;
        }
        self.detach(*element);
        self.free_subtree(*element);
    }

    fn class_name(&self, element: &ElementId) -> String {
        self.node(element)
            .map(|n| n.class_name.clone())
            .unwrap_or_default()
    }

    fn set_class_name(&mut self, element: &ElementId, class_name: String) {
        if let Some(node) = self.node_mut(element) {
            node.class_name = class_name;
        }
    }

    fn set_style(&mut self, element: &ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if value.is_empty() {
            node.style.remove(name);
        } else {
            node.style.insert(name.to_owned(), value.to_owned());
        }
    }

    fn computed_style(&self, element: &ElementId, name: &str) -> Option<String> {
        let node = self.node(element)?;
        if let Some(value) = node.style.get(name) {
            return Some(value.clone());
        }
        // A handful of initial values, enough for hosts that query visibility state.
        let initial = match name {
            "display" => "block",
            "visibility" => "visible",
            "position" => "static",
            "overflow" => "visible",
            "zIndex" => "auto",
            _ => return None,
        };
        Some(initial.to_owned())
    }

    fn offset_width(&self, element: &ElementId) -> u32 {
        self.width_px(element)
    }

    fn set_tab_index(&mut self, element: &ElementId, tab_index: i32) {
        if let Some(node) = self.node_mut(element) {
            node.tab_index = Some(tab_index);
        }
    }
}

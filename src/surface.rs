//! The surface capability the popup manager is built on, plus small stateless helpers.
//!
//! A [`SurfaceHost`] is anything that owns a tree of elements carrying a class name and inline
//! styles: a DOM, a retained-mode scene graph, or the headless [`crate::MemorySurface`].
//! The marker helpers only ever go through [`SurfaceHost::class_name`] and
//! [`SurfaceHost::set_class_name`], so a host does not need any class-list support of its own.

use std::cell::Cell;
use std::fmt;

/// Tree and style primitives the popup manager needs from its host.
pub trait SurfaceHost {
    /// Cheap handle to an element owned by the host.
    type Element: Clone + PartialEq + fmt::Debug;

    /// Create a new, detached element.
    fn create_element(&mut self) -> Self::Element;

    /// The document body: the fallback parent for backdrops.
    fn body(&self) -> Self::Element;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Fragments are transient containers; a backdrop must never be attached to one.
    fn is_fragment(&self, element: &Self::Element) -> bool;

    /// Append `child` as the last child of `parent`, moving it if it is attached elsewhere.
    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element);

    fn remove_child(&mut self, parent: &Self::Element, child: &Self::Element);

    /// Release a detached element (and its subtree) that will not be used again.
    ///
    /// Hosts whose elements are garbage collected can keep the default, which does nothing.
    fn destroy_element(&mut self, _element: &Self::Element) {}

    fn class_name(&self, element: &Self::Element) -> String;

    fn set_class_name(&mut self, element: &Self::Element, class_name: String);

    /// Set an inline style property (camel-cased name). An empty value clears the property.
    fn set_style(&mut self, element: &Self::Element, name: &str, value: &str);

    /// The resolved value of a style property (camel-cased name).
    fn computed_style(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Rendered width of the element, including its scrollbar gutter.
    fn offset_width(&self, element: &Self::Element) -> u32;

    fn set_tab_index(&mut self, element: &Self::Element, tab_index: i32);
}

/// Misuse of the marker helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// A single class token was expected, but the name contains a space.
    CompoundClassName(String),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompoundClassName(name) => {
                write!(f, "class name should not contain space: {name:?}")
            }
        }
    }
}

impl std::error::Error for MarkerError {}

/// Trim ASCII/Unicode whitespace and the byte-order mark from both ends.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Does `element` carry the single class token `class`?
///
/// Absent element or empty class yields `Ok(false)`.
///
/// # Errors
/// [`MarkerError::CompoundClassName`] if `class` contains a space.
pub fn has_marker<H: SurfaceHost + ?Sized>(
    host: &H,
    element: Option<&H::Element>,
    class: &str,
) -> Result<bool, MarkerError> {
    let Some(element) = element else {
        return Ok(false);
    };
    if class.is_empty() {
        return Ok(false);
    }
    if class.contains(' ') {
        return Err(MarkerError::CompoundClassName(class.to_owned()));
    }
    Ok(class_name_contains(&host.class_name(element), class))
}

/// Add every space-separated token of `classes` that the element does not carry yet.
pub fn add_marker<H: SurfaceHost + ?Sized>(
    host: &mut H,
    element: Option<&H::Element>,
    classes: &str,
) {
    let Some(element) = element else {
        return;
    };
    let mut current = host.class_name(element);
    let before = current.len();
    for token in classes.split(' ').filter(|t| !t.is_empty()) {
        if !class_name_contains(&current, token) {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(token);
        }
    }
    if current.len() != before {
        host.set_class_name(element, current);
    }
}

/// Remove every space-separated token of `classes` from the element.
pub fn remove_marker<H: SurfaceHost + ?Sized>(
    host: &mut H,
    element: Option<&H::Element>,
    classes: &str,
) {
    let Some(element) = element else {
        return;
    };
    if classes.is_empty() {
        return;
    }
    let original = host.class_name(element);
    let mut padded = format!(" {original} ");
    for token in classes.split(' ').filter(|t| !t.is_empty()) {
        let needle = format!(" {token} ");
        while padded.contains(&needle) {
            padded = padded.replacen(&needle, " ", 1);
        }
    }
    let next = trim(&padded);
    if next != original {
        host.set_class_name(element, next.to_owned());
    }
}

fn class_name_contains(class_name: &str, token: &str) -> bool {
    class_name.split_whitespace().any(|t| t == token)
}

/// Convert a style property name to its camel-cased form.
///
/// `-`, `_` and `:` runs act as separators: the character after them is upper-cased, except at
/// the very start of the name where it is kept as is. A leading `moz` vendor prefix becomes `Moz`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut at_start = true;
    while let Some(c) = chars.next() {
        if matches!(c, '-' | '_' | ':') {
            let mut separators = String::from(c);
            while let Some(&next) = chars.peek() {
                if matches!(next, '-' | '_' | ':') {
                    separators.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.next() {
                Some(letter) if at_start => out.push(letter),
                Some(letter) => out.extend(letter.to_uppercase()),
                // Trailing separators are left untouched.
                None => out.push_str(&separators),
            }
        } else {
            out.push(c);
        }
        at_start = false;
    }

    if let Some(rest) = out.strip_prefix("moz")
        && rest.starts_with(|c: char| c.is_ascii_uppercase())
    {
        return format!("Moz{rest}");
    }
    out
}

/// Look up the resolved value of a style property.
///
/// Returns `None` for an absent element or an empty name.
pub fn computed_style<H: SurfaceHost + ?Sized>(
    host: &H,
    element: Option<&H::Element>,
    name: &str,
) -> Option<String> {
    let element = element?;
    if name.is_empty() {
        return None;
    }
    let mut name = camel_case(name);
    if name == "float" {
        name = "cssFloat".to_owned();
    }
    host.computed_style(element, &name)
}

/// Width of a native scrollbar, measured once and cached.
#[derive(Debug, Default)]
pub struct ScrollbarWidth {
    cached: Cell<Option<u32>>,
}

impl ScrollbarWidth {
    pub const PROBE_CLASS: &'static str = "scrollbar__wrap";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self) -> Option<u32> {
        self.cached.get()
    }

    /// Return the cached width, or measure it with a hidden probe element attached to the body.
    pub fn get_or_measure<H: SurfaceHost + ?Sized>(&self, host: &mut H) -> u32 {
        if let Some(width) = self.cached.get() {
            return width;
        }

        let body = host.body();
        let outer = host.create_element();
        host.set_class_name(&outer, Self::PROBE_CLASS.to_owned());
        host.set_style(&outer, "visibility", "hidden");
        host.set_style(&outer, "width", "100px");
        host.set_style(&outer, "position", "absolute");
        host.set_style(&outer, "top", "-9999px");
        host.append_child(&body, &outer);

        let width_no_scroll = host.offset_width(&outer);
        host.set_style(&outer, "overflow", "scroll");

        let inner = host.create_element();
        host.set_style(&inner, "width", "100%");
        host.append_child(&outer, &inner);

        let width_with_scroll = host.offset_width(&inner);
        if let Some(parent) = host.parent(&outer) {
            host.remove_child(&parent, &outer);
        }
        host.destroy_element(&outer);

        let width = width_no_scroll.saturating_sub(width_with_scroll);
        log::trace!("measured scrollbar width: {width}px");
        self.cached.set(Some(width));
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySurface;

    #[test]
    fn camel_case_matches_style_property_names() {
        assert_eq!(camel_case("background-color"), "backgroundColor");
        assert_eq!(camel_case("z_index"), "zIndex");
        assert_eq!(camel_case("border--top-width"), "borderTopWidth");
        assert_eq!(camel_case("-webkit-transition"), "webkitTransition");
        assert_eq!(camel_case("-moz-box-sizing"), "MozBoxSizing");
        assert_eq!(camel_case("display"), "display");
        assert_eq!(camel_case("trailing-"), "trailing-");
    }

    #[test]
    fn trim_strips_bom_and_whitespace() {
        assert_eq!(trim("\u{FEFF}  a b \t"), "a b");
        assert_eq!(trim(""), "");
    }

    #[test]
    fn add_marker_skips_existing_and_empty_tokens() {
        let mut surface = MemorySurface::new();
        let el = surface.create_element();
        surface.set_class_name(&el, "a".to_owned());

        add_marker(&mut surface, Some(&el), "a  b b c");
        assert_eq!(surface.class_name(&el), "a b c");

        add_marker(&mut surface, None, "d");
        assert_eq!(surface.class_name(&el), "a b c");
    }

    #[test]
    fn remove_marker_removes_every_occurrence() {
        let mut surface = MemorySurface::new();
        let el = surface.create_element();
        surface.set_class_name(&el, "a b a c".to_owned());

        remove_marker(&mut surface, Some(&el), "a c");
        assert_eq!(surface.class_name(&el), "b");

        remove_marker(&mut surface, Some(&el), "");
        assert_eq!(surface.class_name(&el), "b");

        remove_marker(&mut surface, Some(&el), "missing");
        assert_eq!(surface.class_name(&el), "b");
    }

    #[test]
    fn has_marker_rejects_compound_names() {
        let mut surface = MemorySurface::new();
        let el = surface.create_element();
        add_marker(&mut surface, Some(&el), "v-modal");

        assert_eq!(has_marker(&surface, Some(&el), "v-modal"), Ok(true));
        assert_eq!(has_marker(&surface, Some(&el), "v-modal-enter"), Ok(false));
        assert_eq!(has_marker(&surface, None, "v-modal"), Ok(false));
        assert_eq!(has_marker(&surface, Some(&el), ""), Ok(false));
        assert_eq!(
            has_marker(&surface, Some(&el), "v-modal extra"),
            Err(MarkerError::CompoundClassName("v-modal extra".to_owned()))
        );
    }

    #[test]
    fn computed_style_normalizes_names() {
        let mut surface = MemorySurface::new();
        let el = surface.create_element();
        surface.set_style(&el, "zIndex", "2001");
        surface.set_style(&el, "cssFloat", "left");

        assert_eq!(
            computed_style(&surface, Some(&el), "z-index").as_deref(),
            Some("2001")
        );
        assert_eq!(
            computed_style(&surface, Some(&el), "float").as_deref(),
            Some("left")
        );
        assert_eq!(computed_style(&surface, Some(&el), ""), None);
        assert_eq!(computed_style(&surface, None, "display"), None);
    }

    #[test]
    fn scrollbar_width_is_measured_once() {
        let mut surface = MemorySurface::with_scrollbar_gutter(15);
        let width = ScrollbarWidth::new();
        assert_eq!(width.cached(), None);

        assert_eq!(width.get_or_measure(&mut surface), 15);
        assert_eq!(width.cached(), Some(15));
        // The probe does not stay attached.
        assert!(surface.children(&surface.body()).is_empty());
        assert_eq!(surface.element_count(), 1);

        let mut other = MemorySurface::with_scrollbar_gutter(20);
        assert_eq!(width.get_or_measure(&mut other), 15);
    }
}

//! In-memory document model
//!
//! `Page` keeps a flat list of elements in document order. Element boxes are
//! stored in document coordinates and projected into the viewport on read,
//! so scrolling only changes the viewport.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::document::Document;
use crate::geometry::{Position, Rect, Viewport};

/// Handle to an element of a [`Page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// One element of the page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    /// The element's `id` attribute
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default = "default_tag")]
    pub tag: String,

    /// Remaining attributes, such as the trigger marker
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Layout box in document coordinates
    pub rect: Rect,

    /// Unmounted elements are invisible to queries
    #[serde(default = "default_mounted")]
    pub mounted: bool,

    /// Last position applied by the resolver
    #[serde(skip)]
    pub position: Option<Position>,
}

fn default_tag() -> String {
    "div".to_string()
}

fn default_mounted() -> bool {
    true
}

impl Element {
    pub fn new(tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            attributes: BTreeMap::new(),
            rect,
            mounted: true,
            position: None,
        }
    }

    /// A `button` carrying `data-modal = overlay`
    pub fn trigger(overlay: impl Into<String>, rect: Rect) -> Self {
        Self::new("button", rect).with_attribute("data-modal", overlay)
    }

    /// An overlay panel of the given size, initially at the document origin
    pub fn overlay(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new("div", Rect::new(0.0, 0.0, width, height)).with_id(id)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Start out unmounted
    pub fn unmounted(mut self) -> Self {
        self.mounted = false;
        self
    }
}

/// A scrollable in-memory document
#[derive(Debug, Clone, Default)]
pub struct Page {
    viewport: Viewport,
    elements: Vec<Element>,
}

impl Page {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            elements: Vec::new(),
        }
    }

    /// Append an element at the end of the document
    pub fn push(&mut self, element: Element) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    /// Every element in document order, mounted or not
    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (NodeId(index), element))
    }

    /// Mount an element; returns false for an unknown handle
    pub fn mount(&mut self, node: NodeId) -> bool {
        self.set_mounted(node, true)
    }

    /// Unmount an element; returns false for an unknown handle
    pub fn unmount(&mut self, node: NodeId) -> bool {
        self.set_mounted(node, false)
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// The position last applied to the element with id `id`
    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.find(id)
            .and_then(|node| self.element(node))
            .and_then(|element| element.position)
    }

    /// Look up an element by id regardless of mount state
    pub fn find(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .find(|(_, element)| element.id.as_deref() == Some(id))
            .map(|(node, _)| node)
    }

    fn set_mounted(&mut self, node: NodeId, mounted: bool) -> bool {
        match self.elements.get_mut(node.0) {
            Some(element) => {
                element.mounted = mounted;
                true
            }
            None => false,
        }
    }

    fn mounted(&self, node: NodeId) -> Option<&Element> {
        self.element(node).filter(|element| element.mounted)
    }
}

impl Document for Page {
    type Node = NodeId;

    fn query_triggers(&self, marker: &str, tag: Option<&str>) -> Vec<NodeId> {
        self.elements()
            .filter(|(_, element)| element.mounted && element.attributes.contains_key(marker))
            .filter(|(_, element)| tag.map_or(true, |tag| element.tag.eq_ignore_ascii_case(tag)))
            .map(|(node, _)| node)
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let element = self.mounted(*node)?;
        if name == "id" {
            return element.id.clone();
        }
        element.attributes.get(name).cloned()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .find(|(_, element)| element.mounted && element.id.as_deref() == Some(id))
            .map(|(node, _)| node)
    }

    fn bounding_client_rect(&self, node: &NodeId) -> Option<Rect> {
        self.mounted(*node)
            .map(|element| element.rect.translate(-self.viewport.scroll_x, -self.viewport.scroll_y))
    }

    fn offset_width(&self, node: &NodeId) -> f64 {
        self.mounted(*node).map_or(0.0, |element| element.rect.width)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_position(&mut self, node: &NodeId, position: Position) {
        if let Some(element) = self.elements.get_mut(node.0) {
            element.rect.x = position.left;
            element.rect.y = position.top;
            element.position = Some(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page() -> Page {
        let mut page = Page::new(Viewport::new(900.0, 600.0));
        page.push(Element::new("p", Rect::new(0.0, 0.0, 900.0, 40.0)));
        page.push(Element::trigger("modal-time", Rect::new(50.0, 100.0, 80.0, 20.0)));
        page.push(
            Element::new("a", Rect::new(300.0, 400.0, 60.0, 20.0))
                .with_attribute("data-modal", "modal-third"),
        );
        page.push(Element::overlay("modal-time", 400.0, 400.0));
        page
    }

    #[test]
    fn test_query_triggers_in_document_order() {
        let page = page();
        assert_eq!(page.query_triggers("data-modal", None), vec![NodeId(1), NodeId(2)]);
        assert_eq!(
            page.query_triggers("data-modal", Some("BUTTON")),
            vec![NodeId(1)]
        );
        assert!(page.query_triggers("data-tooltip", None).is_empty());
    }

    #[test]
    fn test_query_skips_unmounted() {
        let mut page = page();
        assert!(page.unmount(NodeId(1)));
        assert_eq!(page.query_triggers("data-modal", None), vec![NodeId(2)]);
        assert!(page.mount(NodeId(1)));
        assert_eq!(page.query_triggers("data-modal", None).len(), 2);
        assert!(!page.mount(NodeId(42)));
    }

    #[test]
    fn test_bounding_rect_follows_scroll() {
        let mut page = page();
        page.scroll_to(0.0, 60.0);
        assert_eq!(
            page.bounding_client_rect(&NodeId(1)),
            Some(Rect::new(50.0, 40.0, 80.0, 20.0))
        );
        page.unmount(NodeId(1));
        assert_eq!(page.bounding_client_rect(&NodeId(1)), None);
    }

    #[test]
    fn test_element_by_id_requires_mount() {
        let mut page = page();
        assert_eq!(page.element_by_id("modal-time"), Some(NodeId(3)));
        page.unmount(NodeId(3));
        assert_eq!(page.element_by_id("modal-time"), None);
        assert_eq!(page.find("modal-time"), Some(NodeId(3)));
    }

    #[test]
    fn test_set_position_moves_element() {
        let mut page = page();
        page.set_position(&NodeId(3), Position::new(120.0, 50.0));
        assert_eq!(page.position_of("modal-time"), Some(Position::new(120.0, 50.0)));
        assert_eq!(
            page.element(NodeId(3)).map(|e| e.rect),
            Some(Rect::new(50.0, 120.0, 400.0, 400.0))
        );
        assert_eq!(page.offset_width(&NodeId(3)), 400.0);
    }

    #[test]
    fn test_attribute_reads_id() {
        let page = page();
        assert_eq!(page.attribute(&NodeId(1), "data-modal").as_deref(), Some("modal-time"));
        assert_eq!(page.attribute(&NodeId(3), "id").as_deref(), Some("modal-time"));
        assert_eq!(page.attribute(&NodeId(0), "data-modal"), None);
    }

    #[test]
    fn test_attribute_hidden_once_unmounted() {
        let mut page = page();
        page.unmount(NodeId(1));
        assert_eq!(page.attribute(&NodeId(1), "data-modal"), None);
        page.mount(NodeId(1));
        assert_eq!(page.attribute(&NodeId(1), "data-modal").as_deref(), Some("modal-time"));
    }
}

//! The host document boundary
//!
//! The controller never holds on to elements between passes. Every
//! positioning pass re-queries the document for triggers, so content that
//! mounts or unmounts between passes is picked up without registration.

use crate::geometry::{Position, Rect, Viewport};

/// Read and write access to the document the overlays live in
///
/// A browser binding implements this over the DOM; [`crate::page::Page`] is
/// the in-memory implementation.
pub trait Document {
    /// A handle to one element
    type Node: Clone + std::fmt::Debug;

    /// All mounted elements carrying the `marker` attribute, in document order
    ///
    /// When `tag` is set only elements with that tag name are returned.
    fn query_triggers(&self, marker: &str, tag: Option<&str>) -> Vec<Self::Node>;

    /// The value of attribute `name` on `node`, `None` once it is detached
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// The mounted element whose id is `id`
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// The element's box in viewport coordinates, `None` once it is detached
    fn bounding_client_rect(&self, node: &Self::Node) -> Option<Rect>;

    /// The element's rendered width
    fn offset_width(&self, node: &Self::Node) -> f64;

    /// Current viewport size and scroll offsets
    fn viewport(&self) -> Viewport;

    /// Place an absolutely positioned element at `position`
    fn set_position(&mut self, node: &Self::Node, position: Position);
}

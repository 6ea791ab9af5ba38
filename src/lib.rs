//! Overlay Anchor - anchored overlay controller
//!
//! Shows, hides and positions panels ("overlays") next to the element that
//! triggered them, inside a scrollable document whose layout is unknown in
//! advance. The crate has two parts:
//!
//! - a visibility store owning the `overlay id -> visible` mapping, mutated
//!   copy-on-write so that snapshots held by the rendering layer never change;
//! - an anchor resolver that pins each overlay below its trigger and keeps it
//!   off the right edge of the viewport.
//!
//! The host document is reached through the [`Document`] trait. [`Page`] is an
//! in-memory implementation.
//!
//! # Example
//!
//! ```rust
//! use overlay_anchor::{ControllerConfig, Element, OverlayController, Page, Rect, Viewport};
//!
//! let mut controller =
//!     OverlayController::new(ControllerConfig::new(["modal-time"])).unwrap();
//!
//! let mut page = Page::new(Viewport::new(900.0, 600.0));
//! let trigger = page.push(Element::trigger("modal-time", Rect::new(850.0, 280.0, 40.0, 20.0)));
//! page.push(Element::overlay("modal-time", 400.0, 400.0));
//!
//! controller.mounted(&mut page).into_result().unwrap();
//! controller.activate(&mut page, &trigger).unwrap();
//!
//! assert!(controller.is_visible("modal-time"));
//! let position = page.position_of("modal-time").unwrap();
//! assert_eq!((position.top, position.left), (300.0, 480.0));
//! ```

pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod geometry;
pub mod page;
pub mod resolver;
pub mod scenario;
pub mod store;

pub use config::ControllerConfig;
pub use controller::{MountOutcome, OverlayController};
pub use document::Document;
pub use error::{ConfigError, OverlayError};
pub use geometry::{Position, Rect, Viewport};
pub use page::{Element, NodeId, Page};
pub use resolver::{
    resolve_position, AnchorResolver, Placement, ResolveReport, ResolverConfig, SkipReason,
    Skipped,
};
pub use scenario::{Scenario, ScenarioError, ScenarioOutcome, Step};
pub use store::{Visibility, VisibilityState, VisibilityStore};

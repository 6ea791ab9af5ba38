//! Anchor resolver
//!
//! Pins each overlay below the trigger that references it. The vertical
//! position is taken in document coordinates so the overlay stays attached
//! to its trigger while the page scrolls. Horizontally the overlay starts at
//! the trigger's left edge and is pulled back inside the viewport when it
//! would overflow the right edge.

use serde::Deserialize;

use crate::document::Document;
use crate::geometry::{Position, Rect, Viewport};

/// Attribute that marks an element as a trigger
pub const DEFAULT_MARKER: &str = "data-modal";

/// Inset kept between a clamped overlay and the viewport edge
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Configuration options for the positioning pass
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Attribute whose value names the target overlay
    pub marker: String,

    /// Restrict triggers to one tag name (e.g. `button`)
    pub trigger_tag: Option<String>,

    /// Inset used when clamping against a viewport edge
    pub margin: f64,

    /// Also keep overlays off the left edge of the viewport.
    ///
    /// Off by default: only the right edge is guarded.
    pub clamp_left_edge: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            trigger_tag: None,
            margin: DEFAULT_MARGIN,
            clamp_left_edge: false,
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trigger marker attribute
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Only treat elements with this tag as triggers
    pub fn with_trigger_tag(mut self, tag: impl Into<String>) -> Self {
        self.trigger_tag = Some(tag.into());
        self
    }

    /// Set the clamping margin
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable the left-edge clamp
    pub fn with_left_edge_clamp(mut self, clamp: bool) -> Self {
        self.clamp_left_edge = clamp;
        self
    }
}

/// Compute where an overlay of `overlay_width` belongs for a trigger at `trigger`
///
/// `trigger` is in viewport coordinates. The result is in document
/// coordinates vertically (scroll offset added) and viewport coordinates
/// horizontally.
pub fn resolve_position(
    trigger: Rect,
    overlay_width: f64,
    viewport: &Viewport,
    config: &ResolverConfig,
) -> Position {
    let top = trigger.bottom() + viewport.scroll_y;

    let mut left = trigger.left();
    if left + overlay_width > viewport.width {
        left = viewport.width - overlay_width - config.margin;
    }
    if config.clamp_left_edge && left < 0.0 {
        left = config.margin;
    }

    Position { top, left }
}

/// Why a trigger was left out of a positioning pass
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The marker attribute is missing or empty
    MissingMarker,
    /// No mounted element carries the referenced overlay id
    MissingOverlay { overlay: String },
    /// The trigger left the document before it could be measured
    Detached,
}

/// A trigger that was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped<N> {
    pub trigger: N,
    pub reason: SkipReason,
}

/// A position applied to an overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<N> {
    pub overlay: String,
    pub trigger: N,
    pub position: Position,
}

/// Outcome of one positioning pass, keyed by the document's element handles
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveReport<N> {
    pub placements: Vec<Placement<N>>,
    pub skipped: Vec<Skipped<N>>,
}

impl<N> Default for ResolveReport<N> {
    fn default() -> Self {
        Self {
            placements: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<N> ResolveReport<N> {
    /// The final position given to `overlay` during this pass
    ///
    /// With several triggers for the same overlay the last one wins.
    pub fn position_of(&self, overlay: &str) -> Option<Position> {
        self.placements
            .iter()
            .rev()
            .find(|placement| placement.overlay == overlay)
            .map(|placement| placement.position)
    }
}

/// Positions every overlay whose trigger is present in a document
#[derive(Debug, Clone, Default)]
pub struct AnchorResolver {
    config: ResolverConfig,
}

impl AnchorResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Re-query the document for triggers and the overlay id each one names
    ///
    /// Triggers whose marker is empty are reported with `None`.
    pub fn triggers<D: Document>(&self, doc: &D) -> Vec<(D::Node, Option<String>)> {
        doc.query_triggers(&self.config.marker, self.config.trigger_tag.as_deref())
            .into_iter()
            .map(|node| {
                let overlay = doc
                    .attribute(&node, &self.config.marker)
                    .filter(|value| !value.is_empty());
                (node, overlay)
            })
            .collect()
    }

    /// Position the overlay of every trigger currently in `doc`
    ///
    /// A trigger that cannot be resolved is skipped; the rest of the pass
    /// carries on.
    #[tracing::instrument(skip_all, fields(marker = %self.config.marker))]
    pub fn resolve_positions<D: Document>(&self, doc: &mut D) -> ResolveReport<D::Node> {
        let viewport = doc.viewport();
        let mut report = ResolveReport::default();

        for (node, overlay) in self.triggers(doc) {
            let Some(overlay) = overlay else {
                tracing::debug!(trigger = ?node, "skipping trigger without overlay id");
                report.skipped.push(Skipped {
                    trigger: node,
                    reason: SkipReason::MissingMarker,
                });
                continue;
            };

            let Some(target) = doc.element_by_id(&overlay) else {
                tracing::debug!(trigger = ?node, %overlay, "overlay not mounted, skipping");
                report.skipped.push(Skipped {
                    trigger: node,
                    reason: SkipReason::MissingOverlay { overlay },
                });
                continue;
            };

            let Some(anchor) = doc.bounding_client_rect(&node) else {
                tracing::debug!(trigger = ?node, %overlay, "trigger detached, skipping");
                report.skipped.push(Skipped {
                    trigger: node,
                    reason: SkipReason::Detached,
                });
                continue;
            };

            let position = resolve_position(anchor, doc.offset_width(&target), &viewport, &self.config);
            doc.set_position(&target, position);
            tracing::debug!(
                trigger = ?node,
                %overlay,
                top = position.top,
                left = position.left,
                "positioned overlay"
            );
            report.placements.push(Placement {
                overlay,
                trigger: node,
                position,
            });
        }

        report
    }
}

//! The integration surface used by the rendering layer
//!
//! The rendering layer reads visibility from snapshots, calls
//! [`OverlayController::activate`] from trigger clicks,
//! [`OverlayController::dismiss`] from an overlay's close affordance and
//! [`OverlayController::mounted`] once after its triggers are in place.

use crate::config::ControllerConfig;
use crate::document::Document;
use crate::error::OverlayError;
use crate::resolver::{AnchorResolver, ResolveReport};
use crate::store::{Visibility, VisibilityState, VisibilityStore};

/// Result of [`OverlayController::mounted`]
#[derive(Debug, Clone, PartialEq)]
pub struct MountOutcome<N> {
    /// The initial positioning pass
    pub report: ResolveReport<N>,
    /// First configuration error found among the triggers
    pub error: Option<OverlayError>,
}

impl<N> MountOutcome<N> {
    /// The pass report, or the configuration error if there was one
    pub fn into_result(self) -> Result<ResolveReport<N>, OverlayError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.report),
        }
    }
}

/// Owns the visibility store and the anchor resolver for one page
///
/// All mutation goes through `&mut self`. A host that shares the controller
/// across threads wraps it in a `Mutex`.
#[derive(Debug, Clone)]
pub struct OverlayController {
    store: VisibilityStore,
    resolver: AnchorResolver,
}

impl OverlayController {
    /// Seed every declared overlay as hidden
    pub fn new(config: ControllerConfig) -> Result<Self, OverlayError> {
        let store = VisibilityStore::new(config.overlays)?;
        Ok(Self {
            store,
            resolver: AnchorResolver::new(config.resolver),
        })
    }

    pub fn toggle(&mut self, id: &str) -> Result<VisibilityState, OverlayError> {
        self.store.toggle(id)
    }

    pub fn close(&mut self, id: &str) -> Result<VisibilityState, OverlayError> {
        self.store.close(id)
    }

    /// Close `id` in response to the overlay's own dismissal affordance
    pub fn dismiss(&mut self, id: &str) -> Result<VisibilityState, OverlayError> {
        self.close(id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.store.is_visible(id)
    }

    pub fn visibility(&self, id: &str) -> Result<Visibility, OverlayError> {
        self.store.visibility(id)
    }

    pub fn snapshot(&self) -> VisibilityState {
        self.store.snapshot()
    }

    pub fn resolver(&self) -> &AnchorResolver {
        &self.resolver
    }

    /// Run one positioning pass over the triggers currently in `doc`
    pub fn resolve_positions<D: Document>(&self, doc: &mut D) -> ResolveReport<D::Node> {
        self.resolver.resolve_positions(doc)
    }

    /// Check that every trigger in `doc` names a declared overlay
    ///
    /// Triggers with an empty marker are ignored here; the positioning pass
    /// skips them.
    pub fn validate_triggers<D: Document>(&self, doc: &D) -> Result<(), OverlayError> {
        let snapshot = self.store.snapshot();
        for (_, overlay) in self.resolver.triggers(doc) {
            match overlay {
                Some(id) if !snapshot.contains(&id) => {
                    return Err(OverlayError::dangling(id, snapshot.ids()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Lifecycle hook for when the page's triggers have mounted
    ///
    /// Positions every overlay once, then checks trigger references. A
    /// dangling reference is reported alongside the pass and never stops it.
    pub fn mounted<D: Document>(&self, doc: &mut D) -> MountOutcome<D::Node> {
        let report = self.resolve_positions(doc);
        let error = self.validate_triggers(doc).err();
        if let Some(error) = &error {
            tracing::warn!(%error, "trigger configuration error");
        }
        MountOutcome { report, error }
    }

    /// Handle activation of `trigger`: toggle its overlay, then reposition
    pub fn activate<D: Document>(
        &mut self,
        doc: &mut D,
        trigger: &D::Node,
    ) -> Result<VisibilityState, OverlayError> {
        let marker = &self.resolver.config().marker;
        let id = doc
            .attribute(trigger, marker)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| OverlayError::NotATrigger {
                marker: marker.clone(),
            })?;

        let state = self.store.toggle(&id)?;
        self.resolve_positions(doc);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, Rect, Viewport};
    use crate::page::{Element, NodeId, Page};
    use pretty_assertions::assert_eq;

    fn controller() -> OverlayController {
        OverlayController::new(ControllerConfig::new(["modal-time", "modal-third"])).unwrap()
    }

    fn page() -> (Page, NodeId) {
        let mut page = Page::new(Viewport::new(900.0, 600.0));
        let trigger = page.push(Element::trigger("modal-time", Rect::new(850.0, 280.0, 40.0, 20.0)));
        page.push(Element::overlay("modal-time", 400.0, 400.0));
        (page, trigger)
    }

    #[test]
    fn test_activate_toggles_and_positions() {
        let mut controller = controller();
        let (mut page, trigger) = page();

        let state = controller.activate(&mut page, &trigger).unwrap();

        assert!(state.is_visible("modal-time"));
        assert!(controller.is_visible("modal-time"));
        assert_eq!(page.position_of("modal-time"), Some(Position::new(300.0, 480.0)));

        let state = controller.activate(&mut page, &trigger).unwrap();
        assert!(!state.is_visible("modal-time"));
    }

    #[test]
    fn test_activate_non_trigger() {
        let mut controller = controller();
        let (mut page, _) = page();
        let overlay = page.find("modal-time").unwrap();

        let err = controller.activate(&mut page, &overlay).unwrap_err();
        assert_eq!(
            err,
            OverlayError::NotATrigger {
                marker: "data-modal".to_string()
            }
        );
    }

    #[test]
    fn test_dismiss_closes() {
        let mut controller = controller();
        controller.toggle("modal-third").unwrap();
        assert_eq!(controller.visibility("modal-third"), Ok(Visibility::Visible));
        controller.dismiss("modal-third").unwrap();
        assert_eq!(controller.visibility("modal-third"), Ok(Visibility::Hidden));
    }

    #[test]
    fn test_mounted_reports_dangling_trigger_and_still_positions() {
        let controller = controller();
        let mut page = Page::new(Viewport::new(900.0, 600.0));
        let typo = page.push(Element::trigger("modal-thrid", Rect::new(0.0, 0.0, 10.0, 10.0)));
        page.push(Element::trigger("modal-time", Rect::new(850.0, 280.0, 40.0, 20.0)));
        page.push(Element::overlay("modal-time", 400.0, 400.0));

        let outcome = controller.mounted(&mut page);

        assert_eq!(
            outcome.error,
            Some(OverlayError::DanglingTrigger {
                id: "modal-thrid".to_string(),
                suggestions: vec!["modal-third".to_string()],
            })
        );
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.report.skipped[0].trigger, typo);
        assert_eq!(page.position_of("modal-time"), Some(Position::new(300.0, 480.0)));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_activate_unmounted_trigger_is_ignored() {
        let mut controller = controller();
        let (mut page, trigger) = page();
        page.unmount(trigger);

        let err = controller.activate(&mut page, &trigger).unwrap_err();

        assert!(matches!(err, OverlayError::NotATrigger { .. }));
        assert!(!controller.is_visible("modal-time"));
    }

    #[test]
    fn test_mounted_positions_all_overlays() {
        let controller = controller();
        let (mut page, _) = page();

        let report = controller.mounted(&mut page).into_result().unwrap();

        assert_eq!(report.placements.len(), 1);
        assert!(!controller.is_visible("modal-time"));
    }
}

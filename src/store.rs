//! Overlay visibility store
//!
//! The store is the single owner of the `overlay id -> visible` mapping. The
//! key set is fixed when the store is seeded; afterwards only flags change.
//!
//! Every mutation is copy-on-write: readers hold [`VisibilityState`]
//! snapshots, and a snapshot never changes after it has been handed out.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::OverlayError;

/// CSS-visibility equivalent of an overlay's flag
///
/// Hidden overlays stay in the document so the resolver can still measure them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn as_css(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// An immutable snapshot of every overlay's visibility
///
/// Clones share storage. Two snapshots for which [`VisibilityState::same_as`]
/// returns true are guaranteed equal without comparing entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityState {
    entries: Arc<BTreeMap<String, bool>>,
}

impl VisibilityState {
    /// Seed a state with every id hidden
    pub fn seeded<I, S>(ids: I) -> Result<Self, OverlayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for id in ids {
            let id = id.into();
            if id.is_empty() {
                return Err(OverlayError::EmptyId);
            }
            if entries.insert(id.clone(), false).is_some() {
                return Err(OverlayError::DuplicateOverlay(id));
            }
        }
        Ok(Self {
            entries: Arc::new(entries),
        })
    }

    /// Pure read; undeclared ids read as hidden
    pub fn is_visible(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    /// Whether `id` belongs to the declared set
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The visibility of a declared overlay
    pub fn visibility(&self, id: &str) -> Result<Visibility, OverlayError> {
        self.entries
            .get(id)
            .map(|visible| Visibility::from(*visible))
            .ok_or_else(|| self.undefined(id))
    }

    /// A new state with `id` flipped
    pub fn toggled(&self, id: &str) -> Result<Self, OverlayError> {
        let current = self.entries.get(id).copied().ok_or_else(|| self.undefined(id))?;
        Ok(self.with_flag(id, !current))
    }

    /// A new state with `id` hidden, or this same state if it already was
    pub fn closed(&self, id: &str) -> Result<Self, OverlayError> {
        match self.entries.get(id) {
            None => Err(self.undefined(id)),
            Some(false) => Ok(self.clone()),
            Some(true) => Ok(self.with_flag(id, false)),
        }
    }

    /// Shallow change check: true when both snapshots share storage
    pub fn same_as(&self, other: &VisibilityState) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// All declared ids, sorted
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Ids of the overlays currently shown, sorted
    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(id, _)| id.as_str())
    }

    /// `(id, visible)` pairs, sorted by id
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, visible)| (id.as_str(), *visible))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_flag(&self, id: &str, visible: bool) -> Self {
        let mut entries = BTreeMap::clone(&self.entries);
        if let Some(flag) = entries.get_mut(id) {
            *flag = visible;
        }
        Self {
            entries: Arc::new(entries),
        }
    }

    fn undefined(&self, id: &str) -> OverlayError {
        OverlayError::undefined(id, self.ids())
    }
}

/// The process-wide owner of the current [`VisibilityState`]
#[derive(Debug, Clone)]
pub struct VisibilityStore {
    current: VisibilityState,
}

impl VisibilityStore {
    /// Seed the store with `visible = false` for every declared id
    pub fn new<I, S>(ids: I) -> Result<Self, OverlayError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = VisibilityState::seeded(ids)?;
        tracing::trace!(overlays = current.len(), "seeded visibility store");
        Ok(Self { current })
    }

    /// Flip the flag for `id` and return the new state
    pub fn toggle(&mut self, id: &str) -> Result<VisibilityState, OverlayError> {
        let next = self.current.toggled(id)?;
        tracing::trace!(id, visible = next.is_visible(id), "toggled overlay");
        self.current = next;
        Ok(self.snapshot())
    }

    /// Hide `id`; closing a hidden overlay leaves the state untouched
    pub fn close(&mut self, id: &str) -> Result<VisibilityState, OverlayError> {
        let next = self.current.closed(id)?;
        if !next.same_as(&self.current) {
            tracing::trace!(id, "closed overlay");
        }
        self.current = next;
        Ok(self.snapshot())
    }

    pub fn is_visible(&self, id: &str) -> bool {
        if !self.current.contains(id) {
            tracing::warn!(id, "visibility read for undeclared overlay");
        }
        self.current.is_visible(id)
    }

    pub fn visibility(&self, id: &str) -> Result<Visibility, OverlayError> {
        self.current.visibility(id)
    }

    /// A read-only snapshot for the rendering layer
    pub fn snapshot(&self) -> VisibilityState {
        self.current.clone()
    }

    /// Whether `id` belongs to the declared set
    pub fn contains(&self, id: &str) -> bool {
        self.current.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const IDS: [&str; 4] = ["modal-germinator", "modal-time", "modal-third", "modal-spirit"];

    fn store() -> VisibilityStore {
        VisibilityStore::new(IDS).unwrap()
    }

    #[test]
    fn test_seeded_all_hidden() {
        let store = store();
        for id in IDS {
            assert!(!store.is_visible(id));
            assert_eq!(store.visibility(id), Ok(Visibility::Hidden));
        }
        assert_eq!(store.snapshot().len(), 4);
    }

    #[test]
    fn test_seed_rejects_duplicates() {
        let err = VisibilityStore::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, OverlayError::DuplicateOverlay("a".to_string()));
    }

    #[test]
    fn test_seed_rejects_empty_id() {
        assert_eq!(
            VisibilityStore::new(["a", ""]).unwrap_err(),
            OverlayError::EmptyId
        );
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut store = store();
        let before = store.snapshot();
        store.toggle("modal-time").unwrap();
        let after = store.toggle("modal-time").unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_leaves_others_untouched() {
        let mut store = store();
        store.toggle("modal-third").unwrap();
        let state = store.toggle("modal-time").unwrap();
        assert_eq!(
            state.visible_ids().collect::<Vec<_>>(),
            vec!["modal-third", "modal-time"]
        );
        assert!(!state.is_visible("modal-germinator"));
        assert!(!state.is_visible("modal-spirit"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut store = store();
        store.toggle("modal-spirit").unwrap();
        let once = store.close("modal-spirit").unwrap();
        let twice = store.close("modal-spirit").unwrap();
        assert_eq!(once, twice);
        assert!(once.same_as(&twice));
        assert!(!store.is_visible("modal-spirit"));
    }

    #[test]
    fn test_snapshot_is_not_mutated_by_later_writes() {
        let mut store = store();
        let held = store.snapshot();
        store.toggle("modal-germinator").unwrap();
        assert!(!held.is_visible("modal-germinator"));
        assert!(store.is_visible("modal-germinator"));
        assert!(!held.same_as(&store.snapshot()));
    }

    #[test]
    fn test_undefined_overlay_is_an_error() {
        let mut store = store();
        let err = store.toggle("modal-tme").unwrap_err();
        assert_eq!(
            err,
            OverlayError::UndefinedOverlay {
                id: "modal-tme".to_string(),
                suggestions: vec!["modal-time".to_string()],
            }
        );
        assert!(store.close("nope").is_err());
        assert!(store.visibility("nope").is_err());
        assert!(!store.is_visible("nope"));
    }

    #[test]
    fn test_visibility_css() {
        assert_eq!(Visibility::from(true).as_css(), "visible");
        assert_eq!(Visibility::from(false).as_css(), "hidden");
    }
}

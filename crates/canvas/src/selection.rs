//! Selection state and its two-way sync with the surface.

use crate::adapter::RenderAdapter;
use crate::surface::RenderSurface;
use node::{CanvasObject, ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of selected object ids.
///
/// Ordered so that [`Selection::key`] is stable regardless of the order
/// ids were selected in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<ObjectId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(id: ObjectId) -> Self {
        Self(BTreeSet::from([id]))
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: ObjectId) -> bool {
        self.0.insert(id)
    }

    pub fn remove(&mut self, id: &ObjectId) -> bool {
        self.0.remove(id)
    }

    /// Add `id` if absent, otherwise remove it.
    pub fn toggle(&mut self, id: ObjectId) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.0.iter()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.0.iter().copied().collect()
    }

    /// Order-independent identity of the set, used to skip redundant pushes.
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(ObjectId::to_uuid_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Drop ids that no longer name an object. Returns whether anything was dropped.
    pub fn retain_existing(&mut self, objects: &[CanvasObject]) -> bool {
        let before = self.0.len();
        self.0.retain(|id| objects.iter().any(|o| o.id == *id));
        self.0.len() != before
    }

    /// Selected objects in collection order.
    pub fn objects<'a>(&'a self, objects: &'a [CanvasObject]) -> impl Iterator<Item = &'a CanvasObject> {
        objects.iter().filter(move |o| self.contains(&o.id))
    }

    /// The selection after clicking `id` in a list, extending it when `additive`.
    pub fn clicked(&self, id: ObjectId, additive: bool) -> Selection {
        if additive {
            let mut next = self.clone();
            next.toggle(id);
            next
        } else {
            Selection::single(id)
        }
    }
}

impl FromIterator<ObjectId> for Selection {
    fn from_iter<T: IntoIterator<Item = ObjectId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Pushes the model selection onto the surface, but only when they disagree.
///
/// The surface reports its own selection changes as events, including ones
/// caused by a push. Comparing keys first stops that echo from looping, and
/// [`SelectionReconciler::is_current`] drops echoes the surface has since
/// moved past.
#[derive(Debug, Default)]
pub struct SelectionReconciler {
    pushed: usize,
    skipped: usize,
    stale: usize,
}

impl SelectionReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the surface's active objects match `selection`. Returns whether it pushed.
    pub fn push<S: RenderSurface>(&mut self, adapter: &mut RenderAdapter<S>, selection: &Selection) -> bool {
        // Ids without a primitive cannot be shown as selected.
        let reachable: Selection = selection
            .iter()
            .copied()
            .filter(|id| adapter.handle_of(*id).is_some())
            .collect();
        let native = adapter.native_selection();
        if native.key() == reachable.key() {
            self.skipped += 1;
            return false;
        }

        log::debug!(
            "pushing selection of {} object(s) to surface (was {})",
            reachable.len(),
            native.len()
        );
        let handles: Vec<S::Handle> = reachable.iter().filter_map(|id| adapter.handle_of(*id)).collect();
        let surface = adapter.surface_mut();
        if handles.is_empty() {
            surface.discard_active_objects();
        } else {
            surface.set_active_objects(&handles);
        }
        surface.request_render();
        self.pushed += 1;
        true
    }

    /// Whether a selection the surface reported still matches its active objects.
    ///
    /// Events are delivered after the fact, so when several pushes are queued
    /// only the last echo describes the surface. Earlier ones must not
    /// overwrite the model.
    pub fn is_current<S: RenderSurface>(&mut self, adapter: &RenderAdapter<S>, reported: &Selection) -> bool {
        if adapter.native_selection().key() == reported.key() {
            return true;
        }
        log::trace!("dropping stale selection event of {} object(s)", reported.len());
        self.stale += 1;
        false
    }

    pub fn pushed(&self) -> usize {
        self.pushed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn stale(&self) -> usize {
        self.stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> ObjectId {
        ObjectId::from_u128(n)
    }

    #[test]
    fn key_ignores_insertion_order() {
        let a: Selection = [id(2), id(1), id(3)].into_iter().collect();
        let b: Selection = [id(3), id(2), id(1)].into_iter().collect();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Selection::single(id(1)).key());
        assert_eq!(Selection::new().key(), "");
    }

    #[test]
    fn click_replaces_and_shift_click_toggles() {
        let selection: Selection = [id(1), id(2)].into_iter().collect();

        assert_eq!(selection.clicked(id(3), false), Selection::single(id(3)));

        let extended = selection.clicked(id(3), true);
        assert_eq!(extended.len(), 3);

        let reduced = extended.clicked(id(1), true);
        assert!(!reduced.contains(&id(1)));
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn retain_existing_prunes_deleted_ids() {
        let object = CanvasObject::new(node::ObjectKind::Note, node::CanvasPoint::new(0.0, 0.0));
        let mut selection: Selection = [object.id, id(99)].into_iter().collect();
        assert!(selection.retain_existing(std::slice::from_ref(&object)));
        assert_eq!(selection, Selection::single(object.id));
        assert!(!selection.retain_existing(std::slice::from_ref(&object)));
    }
}

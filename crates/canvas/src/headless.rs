//! An in-memory [`RenderSurface`] that draws nothing.
//!
//! Used by tests and the command-line driver. Like an interactive surface it
//! reports programmatic selection changes back as events, which lets callers
//! exercise the selection echo path.

use crate::image::ImageData;
use crate::surface::{Primitive, PrimitiveAttrs, RenderSurface, SurfaceEvent, Visual};
use crate::tools::Cursor;
use glam::Vec2;
use node::{CanvasPoint, CanvasSize, ObjectId, Rect, ScreenPoint};
use slotmap::{new_key_type, SlotMap};
use std::collections::VecDeque;

new_key_type! {
    pub struct PrimitiveKey;
}

#[derive(Clone, Debug, PartialEq)]
pub struct NativePrimitive {
    pub tag: ObjectId,
    pub visual: Visual,
    pub attrs: PrimitiveAttrs,
    pub image: Option<ImageData>,
    seq: u64,
}

#[derive(Debug)]
pub struct HeadlessSurface {
    primitives: SlotMap<PrimitiveKey, NativePrimitive>,
    active: Vec<PrimitiveKey>,
    scale: f32,
    translation: Vec2,
    interaction_enabled: bool,
    cursor: Cursor,
    next_seq: u64,
    inserts: usize,
    removals: usize,
    renders: usize,
    outbox: VecDeque<SurfaceEvent<PrimitiveKey>>,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self {
            primitives: SlotMap::with_key(),
            active: Vec::new(),
            scale: 1.0,
            translation: Vec2::ZERO,
            interaction_enabled: true,
            cursor: Cursor::Default,
            next_seq: 0,
            inserts: 0,
            removals: 0,
            renders: 0,
            outbox: VecDeque::new(),
        }
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitive(&self, key: PrimitiveKey) -> Option<&NativePrimitive> {
        self.primitives.get(key)
    }

    pub fn find(&self, tag: ObjectId) -> Option<PrimitiveKey> {
        self.primitives
            .iter()
            .find(|(_, p)| p.tag == tag)
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Keys bottom to top.
    pub fn paint_order(&self) -> Vec<PrimitiveKey> {
        let mut keys: Vec<(PrimitiveKey, i32, u64)> = self
            .primitives
            .iter()
            .map(|(key, p)| (key, p.attrs.z_index, p.seq))
            .collect();
        keys.sort_by_key(|(_, z, seq)| (*z, *seq));
        keys.into_iter().map(|(key, _, _)| key).collect()
    }

    /// Topmost visible, interactive primitive under a screen point.
    pub fn hit_test(&self, point: ScreenPoint) -> Option<PrimitiveKey> {
        let world = (point.0 - self.translation) / self.scale;
        self.paint_order().into_iter().rev().find(|key| {
            self.primitives.get(*key).is_some_and(|p| {
                p.attrs.visible
                    && p.attrs.interactive
                    && Rect::from_origin_size(p.attrs.position, p.attrs.size).contains(world)
            })
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn inserts(&self) -> usize {
        self.inserts
    }

    pub fn removals(&self) -> usize {
        self.removals
    }

    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn active_tags(&self) -> Vec<ObjectId> {
        self.active
            .iter()
            .filter_map(|key| self.primitives.get(*key).map(|p| p.tag))
            .collect()
    }

    /// Events the surface raised on its own since the last call.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent<PrimitiveKey>> {
        self.outbox.drain(..).collect()
    }

    /// A press at `point`, targeting whatever is under it.
    pub fn press(&self, point: ScreenPoint) -> SurfaceEvent<PrimitiveKey> {
        SurfaceEvent::PointerDown {
            position: point,
            target: self.hit_test(point),
        }
    }

    /// The user clicks or marquees `keys`. Hidden and locked primitives are
    /// skipped. None while native interaction is off.
    pub fn user_select(&mut self, keys: &[PrimitiveKey]) -> Option<SurfaceEvent<PrimitiveKey>> {
        if !self.interaction_enabled {
            return None;
        }
        let keys: Vec<PrimitiveKey> = keys
            .iter()
            .copied()
            .filter(|key| {
                self.primitives
                    .get(*key)
                    .is_some_and(|p| p.attrs.visible && p.attrs.interactive)
            })
            .collect();
        Some(self.replace_active(keys))
    }

    /// The user drags a primitive to a new world position.
    pub fn user_move(&mut self, key: PrimitiveKey, position: CanvasPoint) -> Option<SurfaceEvent<PrimitiveKey>> {
        let size = self.primitives.get(key)?.attrs.size;
        self.user_transform(key, position, size)
    }

    /// The user drags a resize handle. The surface itself applies no minimum.
    pub fn user_resize(&mut self, key: PrimitiveKey, size: CanvasSize) -> Option<SurfaceEvent<PrimitiveKey>> {
        let position = self.primitives.get(key)?.attrs.position;
        self.user_transform(key, position, size)
    }

    fn user_transform(
        &mut self,
        key: PrimitiveKey,
        position: CanvasPoint,
        size: CanvasSize,
    ) -> Option<SurfaceEvent<PrimitiveKey>> {
        if !self.interaction_enabled {
            return None;
        }
        let primitive = self.primitives.get_mut(key).filter(|p| p.attrs.interactive)?;
        primitive.attrs.position = position;
        primitive.attrs.size = size;
        Some(SurfaceEvent::ObjectModified {
            target: key,
            position,
            size,
        })
    }

    fn replace_active(&mut self, keys: Vec<PrimitiveKey>) -> SurfaceEvent<PrimitiveKey> {
        let was_empty = self.active.is_empty();
        self.active = keys;
        if self.active.is_empty() {
            SurfaceEvent::SelectionCleared
        } else if was_empty {
            SurfaceEvent::SelectionCreated {
                selected: self.active.clone(),
            }
        } else {
            SurfaceEvent::SelectionUpdated {
                selected: self.active.clone(),
            }
        }
    }
}

impl RenderSurface for HeadlessSurface {
    type Handle = PrimitiveKey;

    fn insert(&mut self, primitive: Primitive) -> PrimitiveKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.inserts += 1;
        self.primitives.insert(NativePrimitive {
            tag: primitive.tag,
            visual: primitive.visual,
            attrs: primitive.attrs,
            image: None,
            seq,
        })
    }

    fn remove(&mut self, handle: PrimitiveKey) {
        if self.primitives.remove(handle).is_some() {
            self.removals += 1;
            self.active.retain(|key| *key != handle);
        }
    }

    fn set_attrs(&mut self, handle: PrimitiveKey, attrs: &PrimitiveAttrs) {
        if let Some(primitive) = self.primitives.get_mut(handle) {
            primitive.attrs = attrs.clone();
        }
    }

    fn set_visual(&mut self, handle: PrimitiveKey, visual: &Visual) {
        if let Some(primitive) = self.primitives.get_mut(handle) {
            if primitive.visual.image_src() != visual.image_src() {
                primitive.image = None;
            }
            primitive.visual = visual.clone();
        }
    }

    fn set_image(&mut self, handle: PrimitiveKey, image: &ImageData) {
        if let Some(primitive) = self.primitives.get_mut(handle) {
            primitive.image = Some(image.clone());
        }
    }

    fn tag(&self, handle: PrimitiveKey) -> Option<ObjectId> {
        self.primitives.get(handle).map(|p| p.tag)
    }

    fn set_transform(&mut self, scale: f32, translation: Vec2) {
        self.scale = scale;
        self.translation = translation;
    }

    fn active_objects(&self) -> Vec<PrimitiveKey> {
        self.active.clone()
    }

    fn set_active_objects(&mut self, handles: &[PrimitiveKey]) {
        let keys: Vec<PrimitiveKey> = handles
            .iter()
            .copied()
            .filter(|key| self.primitives.contains_key(*key))
            .collect();
        let event = self.replace_active(keys);
        self.outbox.push_back(event);
    }

    fn discard_active_objects(&mut self) {
        if !self.active.is_empty() {
            self.active.clear();
            self.outbox.push_back(SurfaceEvent::SelectionCleared);
        }
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn request_render(&mut self) {
        self.renders += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasObject, ObjectKind};

    fn insert_note(surface: &mut HeadlessSurface, x: f32, z: i32) -> PrimitiveKey {
        let object = CanvasObject::new(ObjectKind::Note, CanvasPoint::new(x, 0.0)).with_z_index(z);
        surface.insert(Primitive::for_object(&object))
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut surface = HeadlessSurface::new();
        let low = insert_note(&mut surface, 0.0, 5);
        let high = insert_note(&mut surface, 100.0, 9);
        assert_eq!(surface.paint_order(), vec![low, high]);
        assert_eq!(surface.hit_test(ScreenPoint::new(150.0, 50.0)), Some(high));
        assert_eq!(surface.hit_test(ScreenPoint::new(50.0, 50.0)), Some(low));
        assert_eq!(surface.hit_test(ScreenPoint::new(900.0, 900.0)), None);
    }

    #[test]
    fn hit_test_respects_transform() {
        let mut surface = HeadlessSurface::new();
        let key = insert_note(&mut surface, 0.0, 0);
        surface.set_transform(0.5, Vec2::new(1000.0, 0.0));
        assert_eq!(surface.hit_test(ScreenPoint::new(50.0, 50.0)), None);
        assert_eq!(surface.hit_test(ScreenPoint::new(1050.0, 50.0)), Some(key));
    }

    #[test]
    fn programmatic_selection_echoes_events() {
        let mut surface = HeadlessSurface::new();
        let key = insert_note(&mut surface, 0.0, 0);
        surface.set_active_objects(&[key]);
        assert_eq!(
            surface.take_events(),
            vec![SurfaceEvent::SelectionCreated { selected: vec![key] }]
        );

        surface.discard_active_objects();
        surface.discard_active_objects();
        assert_eq!(surface.take_events(), vec![SurfaceEvent::SelectionCleared]);
    }

    #[test]
    fn removing_drops_from_selection() {
        let mut surface = HeadlessSurface::new();
        let key = insert_note(&mut surface, 0.0, 0);
        surface.set_active_objects(&[key]);
        surface.remove(key);
        assert!(surface.active_objects().is_empty());
        assert_eq!(surface.removals(), 1);
    }

    #[test]
    fn user_select_skips_hidden_and_locked_primitives() {
        let mut surface = HeadlessSurface::new();
        let shown = insert_note(&mut surface, 0.0, 0);
        let mut hidden = CanvasObject::new(ObjectKind::Note, CanvasPoint::new(100.0, 0.0));
        hidden.visible = false;
        let hidden = surface.insert(Primitive::for_object(&hidden));
        let mut locked = CanvasObject::new(ObjectKind::Note, CanvasPoint::new(200.0, 0.0));
        locked.locked = true;
        let locked = surface.insert(Primitive::for_object(&locked));

        assert_eq!(
            surface.user_select(&[shown, hidden, locked]),
            Some(SurfaceEvent::SelectionCreated { selected: vec![shown] })
        );
        assert_eq!(surface.active_objects(), vec![shown]);
    }

    #[test]
    fn user_input_is_blocked_while_panning() {
        let mut surface = HeadlessSurface::new();
        let key = insert_note(&mut surface, 0.0, 0);
        surface.set_interaction_enabled(false);
        assert!(surface.user_select(&[key]).is_none());
        assert!(surface.user_move(key, CanvasPoint::new(5.0, 5.0)).is_none());
    }
}

//! Keeps a [`RenderSurface`] in step with the object model.
//!
//! The adapter owns the id-to-primitive map. `reconcile` diffs the model
//! against it: primitives for vanished ids are removed, new ids get a
//! primitive, and tracked ones receive only the attributes that changed.
//! Surface events come back out as [`CanvasEvent`]s in model terms.

use crate::gesture::{Gesture, GestureState, PointerDown};
use crate::image::{ImageData, ImageError, ImageLoader};
use crate::selection::Selection;
use crate::surface::{Primitive, PrimitiveAttrs, RenderSurface, SurfaceEvent, Visual};
use crate::tools::Tool;
use crate::viewport::Viewport;
use glam::Vec2;
use node::{clamp_size, CanvasObject, CanvasPoint, CanvasSize, ObjectId, ObjectKind, ObjectPatch};
use std::collections::{HashMap, HashSet};

/// Interaction translated into model terms, for the orchestrator to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    /// A native move or resize finished. The patch holds only what changed.
    GeometryChanged { id: ObjectId, patch: ObjectPatch },
    SelectionReplaced(Selection),
    SelectionCleared,
    /// The pan gesture moved the camera; the surface already shows it.
    PanChanged(Vec2),
    WheelZoom { delta_y: f32 },
    /// A placement tool was clicked on the canvas.
    PlacementRequested { kind: ObjectKind, at: CanvasPoint },
}

/// What a reconcile pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub removed: usize,
    pub updated: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

struct Tracked<H> {
    handle: H,
    attrs: PrimitiveAttrs,
    visual: Visual,
}

pub struct RenderAdapter<S: RenderSurface> {
    surface: S,
    tracked: HashMap<ObjectId, Tracked<S::Handle>>,
    ids: HashMap<S::Handle, ObjectId>,
    /// Image loads in flight, keyed by object, holding the requested source.
    pending_images: HashMap<ObjectId, String>,
    applied_viewport: Option<Viewport>,
    gestures: GestureState,
}

impl<S: RenderSurface> RenderAdapter<S> {
    pub fn new(surface: S) -> Self {
        let mut adapter = Self {
            surface,
            tracked: HashMap::new(),
            ids: HashMap::new(),
            pending_images: HashMap::new(),
            applied_viewport: None,
            gestures: GestureState::new(),
        };
        adapter.sync_interaction();
        adapter
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn handle_of(&self, id: ObjectId) -> Option<S::Handle> {
        self.tracked.get(&id).map(|t| t.handle)
    }

    pub fn id_of(&self, handle: S::Handle) -> Option<ObjectId> {
        self.ids.get(&handle).copied()
    }

    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_loading_image(&self, id: ObjectId) -> bool {
        self.pending_images.contains_key(&id)
    }

    /// Bring the surface in line with `objects`.
    pub fn reconcile(&mut self, objects: &[CanvasObject], images: &mut dyn ImageLoader) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let live: HashSet<ObjectId> = objects.iter().map(|o| o.id).collect();
        let stale: Vec<ObjectId> = self
            .tracked
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(tracked) = self.tracked.remove(&id) {
                self.ids.remove(&tracked.handle);
                self.surface.remove(tracked.handle);
                report.removed += 1;
            }
            self.pending_images.remove(&id);
        }

        // Paint order: z-index, ties by collection order.
        let mut ordered: Vec<&CanvasObject> = objects.iter().collect();
        ordered.sort_by_key(|o| o.z_index);

        for object in ordered {
            let attrs = PrimitiveAttrs::for_object(object);
            let visual = Visual::for_object(object);

            match self.tracked.get_mut(&object.id) {
                Some(tracked) => {
                    let mut changed = false;
                    if tracked.attrs != attrs {
                        self.surface.set_attrs(tracked.handle, &attrs);
                        tracked.attrs = attrs;
                        changed = true;
                    }
                    if tracked.visual != visual {
                        let src_changed = tracked.visual.image_src() != visual.image_src();
                        self.surface.set_visual(tracked.handle, &visual);
                        if src_changed {
                            match visual.image_src() {
                                Some(src) => {
                                    self.pending_images.insert(object.id, src.to_string());
                                    images.request(object.id, src);
                                }
                                None => {
                                    self.pending_images.remove(&object.id);
                                }
                            }
                        }
                        tracked.visual = visual;
                        changed = true;
                    }
                    if changed {
                        report.updated += 1;
                    }
                }
                None => {
                    let handle = self.surface.insert(Primitive {
                        tag: object.id,
                        visual: visual.clone(),
                        attrs: attrs.clone(),
                    });
                    if let Some(src) = visual.image_src() {
                        self.pending_images.insert(object.id, src.to_string());
                        images.request(object.id, src);
                    }
                    self.ids.insert(handle, object.id);
                    self.tracked.insert(object.id, Tracked { handle, attrs, visual });
                    report.created += 1;
                }
            }
        }

        if !report.is_noop() {
            log::debug!(
                "reconciled surface: {} created, {} updated, {} removed",
                report.created,
                report.updated,
                report.removed
            );
            self.surface.request_render();
        }
        report
    }

    /// Hand a finished image load to the surface.
    ///
    /// Results for objects that were removed, or whose source changed while
    /// the load was in flight, are dropped. Returns whether the image was applied.
    pub fn complete_image_load(
        &mut self,
        id: ObjectId,
        src: &str,
        result: Result<ImageData, ImageError>,
    ) -> bool {
        if self.pending_images.get(&id).map(String::as_str) != Some(src) {
            log::debug!("dropping stale image load for {id:?} ({src})");
            return false;
        }
        self.pending_images.remove(&id);

        let Some(tracked) = self.tracked.get(&id) else {
            return false;
        };
        match result {
            Ok(image) => {
                self.surface.set_image(tracked.handle, &image);
                self.surface.request_render();
                true
            }
            Err(err) => {
                log::warn!("image for {id:?} failed to load, keeping placeholder: {err}");
                false
            }
        }
    }

    /// Push the camera to the surface if it changed since the last push.
    pub fn apply_viewport(&mut self, viewport: &Viewport) -> bool {
        if self.applied_viewport.as_ref() == Some(viewport) {
            return false;
        }
        self.surface.set_transform(viewport.scale(), viewport.pan);
        self.applied_viewport = Some(*viewport);
        self.surface.request_render();
        true
    }

    /// The camera the surface currently shows.
    pub fn applied_viewport(&self) -> Viewport {
        self.applied_viewport.unwrap_or_default()
    }

    pub fn tool(&self) -> Tool {
        self.gestures.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.gestures.set_tool(tool);
        self.sync_interaction();
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gestures.active()
    }

    /// The surface's selection, in object ids.
    pub fn native_selection(&self) -> Selection {
        self.selection_of(&self.surface.active_objects())
    }

    pub fn handle_event(&mut self, event: SurfaceEvent<S::Handle>) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        match event {
            SurfaceEvent::PointerDown { position, target } => {
                let target = target.and_then(|handle| self.interactive_id(handle));
                if let PointerDown::Place(kind) = self.gestures.pointer_down(position, target) {
                    let at = self.applied_viewport().screen_to_world(position);
                    events.push(CanvasEvent::PlacementRequested { kind, at });
                }
                self.sync_interaction();
            }
            SurfaceEvent::PointerMove { position } => {
                if let Some(delta) = self.gestures.pointer_move(position) {
                    let mut viewport = self.applied_viewport();
                    viewport.pan_by(delta);
                    self.apply_viewport(&viewport);
                    events.push(CanvasEvent::PanChanged(viewport.pan));
                }
            }
            SurfaceEvent::PointerUp { .. } | SurfaceEvent::PointerLeave => {
                self.gestures.end();
                self.sync_interaction();
            }
            SurfaceEvent::Wheel { delta_y } => {
                if delta_y != 0.0 {
                    events.push(CanvasEvent::WheelZoom { delta_y });
                }
            }
            SurfaceEvent::SpaceDown => {
                if !self.gestures.space_held() {
                    self.gestures.set_space_held(true);
                    self.sync_interaction();
                }
            }
            SurfaceEvent::SpaceUp => {
                self.gestures.set_space_held(false);
                self.sync_interaction();
            }
            SurfaceEvent::ObjectModified {
                target,
                position,
                size,
            } => {
                if let Some(event) = self.object_modified(target, position, size) {
                    events.push(event);
                }
            }
            SurfaceEvent::SelectionCreated { selected } | SurfaceEvent::SelectionUpdated { selected } => {
                events.push(CanvasEvent::SelectionReplaced(self.selection_of(&selected)));
            }
            SurfaceEvent::SelectionCleared => events.push(CanvasEvent::SelectionCleared),
        }
        events
    }

    fn object_modified(
        &mut self,
        handle: S::Handle,
        position: CanvasPoint,
        size: CanvasSize,
    ) -> Option<CanvasEvent> {
        let Some(id) = self.id_of(handle) else {
            log::debug!("ignoring modification of untracked primitive {handle:?}");
            return None;
        };
        let tracked = self.tracked.get_mut(&id)?;

        if !tracked.attrs.interactive {
            log::debug!("snapping locked object {id:?} back");
            self.surface.set_attrs(tracked.handle, &tracked.attrs);
            return None;
        }

        let (width, height) = clamp_size(size.width(), size.height());
        let clamped = CanvasSize::new(width, height);

        let mut patch = ObjectPatch::default();
        if position != tracked.attrs.position {
            patch.x = Some(position.x());
            patch.y = Some(position.y());
        }
        if clamped != tracked.attrs.size {
            patch.width = Some(width);
            patch.height = Some(height);
        }

        tracked.attrs.position = position;
        tracked.attrs.size = clamped;
        if clamped != size {
            self.surface.set_attrs(tracked.handle, &tracked.attrs);
        }

        if patch.is_empty() {
            None
        } else {
            Some(CanvasEvent::GeometryChanged { id, patch })
        }
    }

    fn interactive_id(&self, handle: S::Handle) -> Option<ObjectId> {
        let id = self.id_of(handle)?;
        self.tracked
            .get(&id)
            .filter(|t| t.attrs.interactive)
            .map(|_| id)
    }

    fn selection_of(&self, handles: &[S::Handle]) -> Selection {
        handles.iter().filter_map(|h| self.id_of(*h)).collect()
    }

    fn sync_interaction(&mut self) {
        self.surface
            .set_interaction_enabled(self.gestures.native_interaction());
        self.surface.set_cursor(self.gestures.cursor());
    }
}

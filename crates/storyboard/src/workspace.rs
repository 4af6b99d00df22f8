//! The workspace orchestrator.
//!
//! [`Workspace`] owns the selection, camera, tool and panel state, and reads
//! objects from an [`ObjectStore`]. Every change funnels through a named
//! operation that writes to the store and then calls [`Workspace::sync`],
//! which reconciles the surface, prunes the selection and pushes the camera
//! and selection down.

use crate::config::{ConfigError, WorkspaceConfig};
use crate::keymap::{Action, KeyMap, KeystrokeError};
use api::{ObjectStore, StoreError};
use canvas::{
    CanvasEvent, ImageData, ImageError, ImageRequest, QueuedImageLoader, ReconcileReport, RenderAdapter,
    RenderSurface, Selection, SelectionReconciler, SurfaceEvent, Tool, Viewport,
};
use glam::Vec2;
use node::{CanvasObject, CanvasPoint, ObjectDraft, ObjectId, ObjectKind, ObjectPatch, ParentChange};
use ui::{Field, InspectorView, LayerIntent, LayerRow, LayersPanel, Minimap};

pub struct Workspace<S: RenderSurface, St: ObjectStore> {
    store: St,
    adapter: RenderAdapter<S>,
    reconciler: SelectionReconciler,
    images: QueuedImageLoader,
    selection: Selection,
    viewport: Viewport,
    layers: LayersPanel,
    minimap: Minimap,
    keymap: KeyMap,
    config: WorkspaceConfig,
}

impl<S: RenderSurface, St: ObjectStore> Workspace<S, St> {
    pub fn new(surface: S, store: St, config: WorkspaceConfig) -> Result<Self, ConfigError> {
        let keymap = config.keymap()?;
        let mut workspace = Self {
            store,
            adapter: RenderAdapter::new(surface),
            reconciler: SelectionReconciler::new(),
            images: QueuedImageLoader::new(),
            selection: Selection::new(),
            viewport: Viewport::new(),
            layers: LayersPanel::new(),
            minimap: Minimap::new(config.minimap),
            keymap,
            config,
        };
        workspace.sync();
        Ok(workspace)
    }

    // === Accessors ===

    pub fn objects(&self) -> &[CanvasObject] {
        self.store.objects()
    }

    pub fn object(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects().iter().find(|o| o.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Direct store access. Call [`Workspace::sync`] after changing it.
    pub fn store_mut(&mut self) -> &mut St {
        &mut self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_objects(&self) -> Vec<&CanvasObject> {
        self.selection.objects(self.store.objects()).collect()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Size of the visible canvas in pixels.
    pub fn viewport_size(&self) -> Vec2 {
        self.config.viewport_size()
    }

    pub fn tool(&self) -> Tool {
        self.adapter.tool()
    }

    pub fn adapter(&self) -> &RenderAdapter<S> {
        &self.adapter
    }

    pub fn surface(&self) -> &S {
        self.adapter.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.adapter.surface_mut()
    }

    pub fn reconciler(&self) -> &SelectionReconciler {
        &self.reconciler
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn layers(&self) -> &LayersPanel {
        &self.layers
    }

    // === Sync ===

    /// Bring the surface in line with the store and the workspace state.
    pub fn sync(&mut self) -> ReconcileReport {
        let report = self.adapter.reconcile(self.store.objects(), &mut self.images);
        if self.selection.retain_existing(self.store.objects()) {
            log::debug!("dropped deleted objects from the selection");
        }
        self.adapter.apply_viewport(&self.viewport);
        self.reconciler.push(&mut self.adapter, &self.selection);
        report
    }

    /// Feed an event from the surface through the adapter and act on it.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent<S::Handle>) {
        for event in self.adapter.handle_event(event) {
            match event {
                CanvasEvent::GeometryChanged { id, patch } => {
                    log::trace!("surface moved {id:?}: {patch:?}");
                    self.write_patch(id, &patch);
                }
                CanvasEvent::SelectionReplaced(selection) => {
                    if self.reconciler.is_current(&self.adapter, &selection) {
                        self.selection = selection;
                    }
                }
                CanvasEvent::SelectionCleared => {
                    if self.reconciler.is_current(&self.adapter, &Selection::new()) {
                        self.selection.clear();
                    }
                }
                CanvasEvent::PanChanged(pan) => self.viewport.set_pan(pan),
                CanvasEvent::WheelZoom { delta_y } => self.viewport.zoom_by_wheel(delta_y),
                CanvasEvent::PlacementRequested { kind, at } => self.place(kind, at),
            }
        }
        self.sync();
    }

    fn place(&mut self, kind: ObjectKind, at: CanvasPoint) {
        if !self.config.place_on_click {
            log::debug!("ignoring {kind} placement at {at:?}; click placement is off");
            return;
        }
        let mut draft = ObjectDraft::new(kind, at);
        draft.z_index = self.next_z_index();
        if let Some(id) = self.write_add(draft) {
            self.selection = Selection::single(id);
        }
        self.adapter.set_tool(Tool::Select);
    }

    // === Objects ===

    /// Create an object of `kind` centered in the visible viewport, on top of
    /// everything else.
    pub fn create_object(&mut self, kind: ObjectKind) -> Option<ObjectId> {
        let center = self.viewport.screen_to_world(node::ScreenPoint(self.viewport_size() * 0.5));
        let size = kind.default_size();
        let mut draft = ObjectDraft::new(kind, CanvasPoint(center.0 - size.half().0));
        draft.z_index = self.next_z_index();
        self.add_object(draft)
    }

    /// Add a fully specified draft.
    pub fn add_object(&mut self, draft: ObjectDraft) -> Option<ObjectId> {
        let id = self.write_add(draft);
        self.sync();
        id
    }

    /// Apply a partial update. Geometry changes to locked objects are refused.
    pub fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> bool {
        let written = self.write_patch(id, patch);
        self.sync();
        written
    }

    /// Copy each target, shifted by `offset`, painted above everything that
    /// existed before. The copies become the selection.
    pub fn duplicate(&mut self, ids: &[ObjectId], offset: Vec2) -> Vec<ObjectId> {
        let z_index = self.next_z_index();
        let drafts: Vec<ObjectDraft> = self
            .objects()
            .iter()
            .filter(|o| ids.contains(&o.id))
            .map(|o| {
                let mut draft = o.to_draft();
                draft.position = CanvasPoint(o.position.0 + offset);
                draft.z_index = z_index;
                draft
            })
            .collect();

        let created: Vec<ObjectId> = drafts.into_iter().filter_map(|d| self.write_add(d)).collect();
        if !created.is_empty() {
            self.selection = created.iter().copied().collect();
        }
        self.sync();
        created
    }

    pub fn duplicate_selection(&mut self) -> Vec<ObjectId> {
        let offset = Vec2::splat(self.config.duplicate_offset);
        let ids = self.selection.ids();
        self.duplicate(&ids, offset)
    }

    /// Delete the given objects, skipping locked ones. Returns what was deleted.
    pub fn delete(&mut self, ids: &[ObjectId]) -> Vec<ObjectId> {
        let mut deleted = Vec::new();
        for id in ids {
            let Some(object) = self.object(*id) else {
                log::debug!("skipping delete of missing object {id:?}");
                continue;
            };
            if object.locked {
                log::debug!("skipping delete of locked object {id:?}");
                continue;
            }
            match self.store.delete_object(*id) {
                Ok(()) => deleted.push(*id),
                Err(err) => log_store_error("delete", *id, &err),
            }
        }
        for id in &deleted {
            self.selection.remove(id);
        }
        self.sync();
        deleted
    }

    /// Delete everything selected and clear the selection.
    pub fn delete_selection(&mut self) -> Vec<ObjectId> {
        let ids = self.selection.ids();
        self.selection.clear();
        self.delete(&ids)
    }

    /// Flip one object's visibility. Children are left alone.
    pub fn toggle_visibility(&mut self, id: ObjectId) -> bool {
        match self.object(id).map(|o| o.visible) {
            Some(visible) => self.update_object(id, &ObjectPatch::visible(!visible)),
            None => false,
        }
    }

    /// Flip one object's lock. Children are left alone.
    pub fn toggle_lock(&mut self, id: ObjectId) -> bool {
        match self.object(id).map(|o| o.locked) {
            Some(locked) => self.update_object(id, &ObjectPatch::locked(!locked)),
            None => false,
        }
    }

    /// Shift each object by `delta`. Locked objects stay put.
    pub fn move_by(&mut self, ids: &[ObjectId], delta: Vec2) -> Vec<ObjectId> {
        let patches: Vec<(ObjectId, ObjectPatch)> = self
            .objects()
            .iter()
            .filter(|o| ids.contains(&o.id))
            .map(|o| {
                let to = o.position.0 + delta;
                (o.id, ObjectPatch::position(to.x, to.y))
            })
            .collect();
        self.write_patches(patches)
    }

    pub fn set_position(&mut self, ids: &[ObjectId], position: CanvasPoint) -> Vec<ObjectId> {
        let patch = ObjectPatch::position(position.x(), position.y());
        self.write_patches(ids.iter().map(|id| (*id, patch.clone())).collect())
    }

    /// Resize each object, clamped to the minimum object size.
    pub fn set_size(&mut self, ids: &[ObjectId], size: Vec2) -> Vec<ObjectId> {
        let patch = ObjectPatch::size(size.x, size.y);
        self.write_patches(ids.iter().map(|id| (*id, patch.clone())).collect())
    }

    pub fn set_parent(&mut self, ids: &[ObjectId], parent: Option<ObjectId>) -> Vec<ObjectId> {
        let change = match parent {
            Some(parent) => ParentChange::Attach(parent),
            None => ParentChange::Detach,
        };
        let patch = ObjectPatch {
            parent: Some(change),
            ..Default::default()
        };
        let modified = ids
            .iter()
            .copied()
            .filter(|id| Some(*id) != parent && self.write_patch(*id, &patch))
            .collect();
        self.sync();
        modified
    }

    // === Selection ===

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.sync();
    }

    pub fn select(&mut self, ids: &[ObjectId], additive: bool) {
        let mut selection = if additive {
            self.selection.clone()
        } else {
            Selection::new()
        };
        for id in ids {
            selection.insert(*id);
        }
        self.set_selection(selection);
    }

    pub fn select_all(&mut self) {
        let all = self.objects().iter().map(|o| o.id).collect();
        self.set_selection(all);
    }

    pub fn deselect(&mut self) {
        self.set_selection(Selection::new());
    }

    /// Plain click replaces the selection; shift-click toggles the one row.
    pub fn layer_click(&mut self, id: ObjectId, shift: bool) {
        let next = self.selection.clicked(id, shift);
        self.set_selection(next);
    }

    // === Layers panel ===

    pub fn layer_rows(&self) -> Vec<LayerRow> {
        self.layers.rows(self.store.objects(), &self.selection)
    }

    pub fn set_layer_query(&mut self, query: impl Into<String>) {
        self.layers.set_query(query);
    }

    pub fn toggle_layer_expanded(&mut self, id: ObjectId) {
        self.layers.toggle_expanded(id);
    }

    pub fn apply_layer_intent(&mut self, intent: LayerIntent) {
        match intent {
            LayerIntent::Select { id, additive } => self.layer_click(id, additive),
            LayerIntent::ToggleVisibility(id) => {
                self.toggle_visibility(id);
            }
            LayerIntent::ToggleLock(id) => {
                self.toggle_lock(id);
            }
        }
    }

    // === Properties inspector ===

    pub fn inspector(&self) -> Option<InspectorView> {
        ui::properties::inspect(self.store.objects(), &self.selection)
    }

    /// Apply raw panel input to the first selected object.
    pub fn edit_field(&mut self, field: Field, input: &str) -> Option<ObjectId> {
        let (id, patch) = ui::properties::edit(self.store.objects(), &self.selection, field, input)?;
        self.update_object(id, &patch).then_some(id)
    }

    // === Viewport ===

    pub fn set_tool(&mut self, tool: Tool) {
        self.adapter.set_tool(tool);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.sync();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.sync();
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom);
        self.sync();
    }

    pub fn zoom_to_fit(&mut self) {
        let size = self.viewport_size();
        self.viewport
            .zoom_to_fit(self.store.objects(), size, &self.config.fit);
        self.sync();
    }

    pub fn zoom_to_100(&mut self) {
        self.viewport.zoom_to_100();
        self.sync();
    }

    pub fn zoom_to_selection(&mut self) {
        let size = self.viewport_size();
        let selected = self.selection.objects(self.store.objects());
        self.viewport.zoom_to_selection(selected, size, &self.config.fit);
        self.sync();
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.viewport.set_pan(pan);
        self.sync();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
        self.sync();
    }

    pub fn center_on(&mut self, point: CanvasPoint) {
        let size = self.viewport_size();
        self.viewport.center_on(point, size);
        self.sync();
    }

    // === Minimap ===

    /// Press on the minimap: jump the camera to the world point under the pointer.
    pub fn minimap_pointer_down(&mut self, pixel: Vec2) -> CanvasPoint {
        let target = self.minimap.pointer_down(self.store.objects(), pixel);
        self.center_on(target);
        target
    }

    pub fn minimap_pointer_move(&mut self, pixel: Vec2) -> Option<CanvasPoint> {
        let target = self.minimap.pointer_move(self.store.objects(), pixel)?;
        self.center_on(target);
        Some(target)
    }

    pub fn minimap_pointer_up(&mut self) {
        self.minimap.pointer_up();
    }

    // === Keyboard ===

    pub fn dispatch(&mut self, action: Action) {
        log::trace!("dispatching {action}");
        match action {
            Action::ZoomToFit => self.zoom_to_fit(),
            Action::ZoomTo100 => self.zoom_to_100(),
            Action::ZoomToSelection => self.zoom_to_selection(),
            Action::ZoomIn => self.zoom_in(),
            Action::ZoomOut => self.zoom_out(),
            Action::SelectAll => self.select_all(),
            Action::Deselect => self.deselect(),
            Action::Duplicate => {
                self.duplicate_selection();
            }
            Action::Delete => {
                self.delete_selection();
            }
            Action::SelectTool => self.set_tool(Tool::Select),
            Action::HandTool => self.set_tool(Tool::Hand),
            Action::ZoomTool => self.set_tool(Tool::Zoom),
            Action::TextTool => self.set_tool(Tool::Text),
            Action::FrameTool => self.set_tool(Tool::Frame),
        }
    }

    /// Look up a keystroke such as `"cmd-d"` and run its action, if bound.
    pub fn handle_keystroke(&mut self, keystroke: &str) -> Result<Option<Action>, KeystrokeError> {
        let action = self.keymap.resolve(keystroke)?;
        if let Some(action) = action {
            self.dispatch(action);
        }
        Ok(action)
    }

    // === Images ===

    /// Image loads the surface is waiting on.
    pub fn take_image_requests(&mut self) -> Vec<ImageRequest> {
        self.images.drain()
    }

    pub fn complete_image_load(&mut self, id: ObjectId, src: &str, result: Result<ImageData, ImageError>) -> bool {
        self.adapter.complete_image_load(id, src, result)
    }

    // === Store writes ===

    pub(crate) fn next_z_index(&self) -> i32 {
        i32::try_from(self.objects().len()).unwrap_or(i32::MAX)
    }

    fn write_add(&mut self, draft: ObjectDraft) -> Option<ObjectId> {
        let kind = draft.kind();
        match self.store.add_object(draft) {
            Ok(id) => {
                log::debug!("created {kind} {id:?}");
                Some(id)
            }
            Err(err) => {
                log::warn!("failed to create {kind}: {err}");
                None
            }
        }
    }

    fn write_patches(&mut self, patches: Vec<(ObjectId, ObjectPatch)>) -> Vec<ObjectId> {
        let modified = patches
            .into_iter()
            .filter(|(id, patch)| self.write_patch(*id, patch))
            .map(|(id, _)| id)
            .collect();
        self.sync();
        modified
    }

    fn write_patch(&mut self, id: ObjectId, patch: &ObjectPatch) -> bool {
        let Some(object) = self.object(id) else {
            log::debug!("dropping update for missing object {id:?}");
            return false;
        };
        let touches_geometry =
            patch.x.is_some() || patch.y.is_some() || patch.width.is_some() || patch.height.is_some();
        if object.locked && touches_geometry {
            log::debug!("refusing to move or resize locked object {id:?}");
            return false;
        }
        match self.store.update_object(id, patch) {
            Ok(()) => true,
            Err(err) => {
                log_store_error("update", id, &err);
                false
            }
        }
    }
}

fn log_store_error(operation: &str, id: ObjectId, err: &StoreError) {
    match err {
        StoreError::NotFound(_) => log::debug!("{operation} of {id:?} dropped: {err}"),
        StoreError::Unavailable(_) => log::warn!("{operation} of {id:?} failed: {err}"),
    }
}

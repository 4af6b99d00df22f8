//! The persistence contract the workspace writes through.
//!
//! The store owns the authoritative object collection. The workspace reads
//! snapshots with [`ObjectStore::objects`] and requests every change through
//! `add_object` / `update_object` / `delete_object`.

use node::{CanvasObject, ObjectDraft, ObjectId, ObjectPatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {0:?} not found")]
    NotFound(ObjectId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait ObjectStore {
    /// Current snapshot, in insertion order.
    fn objects(&self) -> &[CanvasObject];

    /// Whether the initial load is still running.
    fn is_loading(&self) -> bool {
        false
    }

    /// Create an object from a draft. The store assigns the id.
    fn add_object(&mut self, draft: ObjectDraft) -> Result<ObjectId, StoreError>;

    fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> Result<(), StoreError>;

    fn delete_object(&mut self, id: ObjectId) -> Result<(), StoreError>;
}

/// A mutation the store accepted, in call order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum StoreCall {
    Add { id: ObjectId },
    Update { id: ObjectId, patch: ObjectPatch },
    Delete { id: ObjectId },
}

/// An in-process store that keeps objects in a `Vec` and records every call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Vec<CanvasObject>,
    calls: Vec<StoreCall>,
    loading: bool,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(objects: Vec<CanvasObject>) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// While offline every mutation fails with [`StoreError::Unavailable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unavailable("memory store is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl ObjectStore for MemoryStore {
    fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn add_object(&mut self, draft: ObjectDraft) -> Result<ObjectId, StoreError> {
        self.check_online()?;
        let id = ObjectId::new();
        self.objects.push(CanvasObject::from_draft(id, draft));
        self.calls.push(StoreCall::Add { id });
        Ok(id)
    }

    fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> Result<(), StoreError> {
        self.check_online()?;
        let object = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound(id))?;
        object.apply(patch);
        self.calls.push(StoreCall::Update {
            id,
            patch: patch.clone(),
        });
        Ok(())
    }

    fn delete_object(&mut self, id: ObjectId) -> Result<(), StoreError> {
        self.check_online()?;
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.objects.remove(index);
        self.calls.push(StoreCall::Delete { id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasPoint, ObjectKind};

    #[test]
    fn add_update_delete() {
        let mut store = MemoryStore::new();
        let id = store
            .add_object(ObjectDraft::new(ObjectKind::Text, CanvasPoint::new(1.0, 2.0)))
            .unwrap();
        assert_eq!(store.objects().len(), 1);

        store.update_object(id, &ObjectPatch::size(10.0, 500.0)).unwrap();
        let object = store.get(id).unwrap();
        assert_eq!((object.width(), object.height()), (50.0, 500.0));

        store.delete_object(id).unwrap();
        assert!(store.objects().is_empty());
        assert_eq!(store.calls().len(), 3);
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut store = MemoryStore::new();
        let id = ObjectId::from_u128(3);
        assert!(matches!(store.delete_object(id), Err(StoreError::NotFound(missing)) if missing == id));
        assert!(store.update_object(id, &ObjectPatch::visible(false)).is_err());
        assert!(store.calls().is_empty());
    }

    #[test]
    fn offline_store_rejects_writes() {
        let mut store = MemoryStore::new();
        store.set_offline(true);
        let err = store
            .add_object(ObjectDraft::new(ObjectKind::Note, CanvasPoint::new(0.0, 0.0)))
            .unwrap_err();
        assert!(err.to_string().starts_with("store unavailable"));
    }
}

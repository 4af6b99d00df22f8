//! Which objects a command operates on.

use canvas::Selection;
use node::{CanvasObject, ObjectId, ObjectKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The current selection (most common for user actions).
    #[default]
    Selection,

    /// One object by id.
    Object(ObjectId),

    /// Several objects by id.
    Objects(Vec<ObjectId>),

    /// Every object on the canvas.
    All,

    /// Every object of a kind.
    Kind(ObjectKind),
}

impl Target {
    /// Resolve to ids of existing objects, in collection order.
    pub fn resolve(&self, objects: &[CanvasObject], selection: &Selection) -> Vec<ObjectId> {
        objects
            .iter()
            .filter(|o| match self {
                Target::Selection => selection.contains(&o.id),
                Target::Object(id) => o.id == *id,
                Target::Objects(ids) => ids.contains(&o.id),
                Target::All => true,
                Target::Kind(kind) => o.kind() == *kind,
            })
            .map(|o| o.id)
            .collect()
    }
}

impl From<ObjectId> for Target {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

impl From<Vec<ObjectId>> for Target {
    fn from(ids: Vec<ObjectId>) -> Self {
        Self::Objects(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::CanvasPoint;

    #[test]
    fn resolves_against_existing_objects_only() {
        let note = CanvasObject::new(ObjectKind::Note, CanvasPoint::new(0.0, 0.0));
        let text = CanvasObject::new(ObjectKind::Text, CanvasPoint::new(0.0, 0.0));
        let objects = vec![note.clone(), text.clone()];
        let selection = Selection::single(text.id);

        assert_eq!(Target::Selection.resolve(&objects, &selection), vec![text.id]);
        assert_eq!(Target::All.resolve(&objects, &selection), vec![note.id, text.id]);
        assert_eq!(
            Target::Kind(ObjectKind::Note).resolve(&objects, &selection),
            vec![note.id]
        );
        let gone = ObjectId::from_u128(42);
        assert_eq!(
            Target::Objects(vec![gone, note.id]).resolve(&objects, &selection),
            vec![note.id]
        );
    }
}

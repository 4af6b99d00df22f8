//! Layer list over the object forest.
//!
//! Rows are produced fresh from the object collection on every call; the
//! panel itself only keeps its collapse state and search query.

use canvas::Selection;
use node::{CanvasObject, ObjectId, ObjectKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One line in the layer list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerRow {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub label: String,
    /// Nesting depth; always 0 while searching.
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub visible: bool,
    pub locked: bool,
    pub selected: bool,
}

/// What a layer row interaction asks the workspace to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerIntent {
    Select { id: ObjectId, additive: bool },
    ToggleVisibility(ObjectId),
    ToggleLock(ObjectId),
}

/// Name shown for an object: its label, then heading, then numbered title,
/// then the type name with a short id.
pub fn display_label(object: &CanvasObject) -> String {
    if let Some(label) = object.data.label() {
        return label.to_string();
    }
    if let Some(heading) = object.data.heading() {
        return heading.to_string();
    }
    if let Some(title) = object.data.numbered_title() {
        return title;
    }
    format!("{} {}", object.kind().title(), object.id.short())
}

#[derive(Debug, Default)]
pub struct LayersPanel {
    collapsed: HashSet<ObjectId>,
    query: String,
}

impl LayersPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn is_expanded(&self, id: ObjectId) -> bool {
        !self.collapsed.contains(&id)
    }

    pub fn toggle_expanded(&mut self, id: ObjectId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    pub fn click(&self, id: ObjectId, shift: bool) -> LayerIntent {
        LayerIntent::Select {
            id,
            additive: shift,
        }
    }

    /// Rows to display: the hierarchy, or a flat filtered list while searching.
    pub fn rows(&self, objects: &[CanvasObject], selection: &Selection) -> Vec<LayerRow> {
        if self.is_searching() {
            self.search_rows(objects, selection)
        } else {
            self.tree_rows(objects, selection)
        }
    }

    fn search_rows(&self, objects: &[CanvasObject], selection: &Selection) -> Vec<LayerRow> {
        let needle = self.query.trim().to_lowercase();
        top_first(objects.iter().enumerate().collect())
            .into_iter()
            .filter_map(|object| {
                let label = display_label(object);
                label
                    .to_lowercase()
                    .contains(&needle)
                    .then(|| row(object, label, 0, false, false, selection))
            })
            .collect()
    }

    fn tree_rows(&self, objects: &[CanvasObject], selection: &Selection) -> Vec<LayerRow> {
        let ids: HashSet<ObjectId> = objects.iter().map(|o| o.id).collect();
        let mut roots = Vec::new();
        let mut children: HashMap<ObjectId, Vec<(usize, &CanvasObject)>> = HashMap::new();
        for (index, object) in objects.iter().enumerate() {
            match object.parent_id {
                // Orphans, whose parent no longer exists, show as roots.
                Some(parent) if parent != object.id && ids.contains(&parent) => {
                    children.entry(parent).or_default().push((index, object));
                }
                _ => roots.push((index, object)),
            }
        }

        let mut rows = Vec::with_capacity(objects.len());
        let mut visited = HashSet::new();
        for root in top_first(roots) {
            self.push_subtree(root, 0, &children, selection, &mut visited, &mut rows);
        }

        // Members of a parent cycle have no root; list them at the top level.
        for object in objects {
            if !visited.contains(&object.id) {
                log::debug!("layer {:?} is part of a parent cycle", object.id);
                self.push_subtree(object, 0, &children, selection, &mut visited, &mut rows);
            }
        }
        rows
    }

    fn push_subtree<'a>(
        &self,
        object: &'a CanvasObject,
        depth: usize,
        children: &HashMap<ObjectId, Vec<(usize, &'a CanvasObject)>>,
        selection: &Selection,
        visited: &mut HashSet<ObjectId>,
        rows: &mut Vec<LayerRow>,
    ) {
        if !visited.insert(object.id) {
            return;
        }
        let kids = children.get(&object.id);
        let has_children = kids.is_some_and(|k| !k.is_empty());
        let expanded = self.is_expanded(object.id);
        rows.push(row(
            object,
            display_label(object),
            depth,
            has_children,
            expanded,
            selection,
        ));
        if let (Some(kids), true) = (kids, expanded) {
            for child in top_first(kids.clone()) {
                self.push_subtree(child, depth + 1, children, selection, visited, rows);
            }
        }
    }
}

/// Topmost first: higher z-index, then later insertion.
fn top_first(mut objects: Vec<(usize, &CanvasObject)>) -> Vec<&CanvasObject> {
    objects.sort_by(|(ia, a), (ib, b)| b.z_index.cmp(&a.z_index).then(ib.cmp(ia)));
    objects.into_iter().map(|(_, o)| o).collect()
}

fn row(
    object: &CanvasObject,
    label: String,
    depth: usize,
    has_children: bool,
    expanded: bool,
    selection: &Selection,
) -> LayerRow {
    LayerRow {
        id: object.id,
        kind: object.kind(),
        label,
        depth,
        has_children,
        expanded,
        visible: object.visible,
        locked: object.locked,
        selected: selection.contains(&object.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasPoint, ObjectData};

    fn object(kind: ObjectKind, n: u128) -> CanvasObject {
        let mut object = CanvasObject::new(kind, CanvasPoint::new(0.0, 0.0));
        object.id = ObjectId::from_u128(n);
        object
    }

    fn labels(rows: &[LayerRow]) -> Vec<(String, usize)> {
        rows.iter().map(|r| (r.label.clone(), r.depth)).collect()
    }

    #[test]
    fn label_resolution_order() {
        let section = object(ObjectKind::Section, 1);
        assert_eq!(display_label(&section), "Section");

        let script = object(ObjectKind::Script, 2).with_data(ObjectData::Script {
            heading: Some("INT. KITCHEN".into()),
            scene_number: Some(3),
            content: String::new(),
        });
        assert_eq!(display_label(&script), "INT. KITCHEN");

        let shot = object(ObjectKind::Shot, 3).with_data(ObjectData::Shot {
            label: None,
            shot_number: Some(12),
            description: String::new(),
        });
        assert_eq!(display_label(&shot), "Shot 12");

        let note = object(ObjectKind::Note, 0xabcdef12_0000_0000_0000_000000000000);
        assert_eq!(display_label(&note), "Note abcdef12");
    }

    #[test]
    fn tree_nests_children_under_parents() {
        let frame = object(ObjectKind::Section, 1);
        let child = object(ObjectKind::Shot, 2)
            .with_parent(frame.id)
            .with_data(ObjectData::Shot {
                label: Some("Opening".into()),
                shot_number: None,
                description: String::new(),
            });
        let loose = object(ObjectKind::Group, 3).with_data(ObjectData::Group {
            label: Some("Loose".into()),
        });
        let objects = vec![frame.clone(), child, loose];

        let mut panel = LayersPanel::new();
        let rows = panel.rows(&objects, &Selection::new());
        assert_eq!(
            labels(&rows),
            vec![
                ("Loose".to_string(), 0),
                ("Section".to_string(), 0),
                ("Opening".to_string(), 1),
            ]
        );
        assert!(rows[1].has_children);

        panel.toggle_expanded(frame.id);
        let rows = panel.rows(&objects, &Selection::new());
        assert_eq!(rows.len(), 2);
        assert!(!rows[1].expanded);
    }

    #[test]
    fn orphans_show_as_roots() {
        let orphan = object(ObjectKind::Note, 5).with_parent(ObjectId::from_u128(999));
        let rows = LayersPanel::new().rows(std::slice::from_ref(&orphan), &Selection::new());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].depth, 0);
    }

    #[test]
    fn parent_cycles_still_list_every_object() {
        let a = object(ObjectKind::Group, 1).with_parent(ObjectId::from_u128(2));
        let b = object(ObjectKind::Group, 2).with_parent(ObjectId::from_u128(1));
        let rows = LayersPanel::new().rows(&[a, b], &Selection::new());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn search_flattens_and_filters() {
        let frame = object(ObjectKind::Section, 1).with_data(ObjectData::Section {
            label: "Act One".into(),
            background_color: String::new(),
            border_color: String::new(),
        });
        let child = object(ObjectKind::Section, 2)
            .with_parent(frame.id)
            .with_data(ObjectData::Section {
                label: "Act One, scene b".into(),
                background_color: String::new(),
                border_color: String::new(),
            });
        let other = object(ObjectKind::Note, 3);
        let objects = vec![frame, child.clone(), other];

        let mut panel = LayersPanel::new();
        panel.set_query("  act ONE ");
        let selection = Selection::single(child.id);
        let rows = panel.rows(&objects, &selection);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.depth == 0));
        assert!(rows.iter().any(|r| r.id == child.id && r.selected));
    }

    #[test]
    fn click_carries_shift() {
        let panel = LayersPanel::new();
        let id = ObjectId::from_u128(1);
        assert_eq!(
            panel.click(id, true),
            LayerIntent::Select { id, additive: true }
        );
    }
}

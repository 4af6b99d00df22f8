//! Command and query execution against a [`Workspace`].
//!
//! Connects the serializable [`Command`] / [`Query`] language to the
//! workspace operations that implement it.

use crate::Workspace;
use api::{Command, CommandResult, ObjectStore, Query, QueryResult, Target};
use canvas::RenderSurface;
use glam::Vec2;
use node::{bounds_of, CanvasPoint, CanvasSize, ObjectDraft, ObjectKind};

/// Execute a command against a workspace.
pub fn execute_command<S: RenderSurface, St: ObjectStore>(
    workspace: &mut Workspace<S, St>,
    command: Command,
) -> CommandResult {
    match command {
        Command::Create {
            kind,
            position,
            size,
            data,
            parent,
        } => {
            if let Some(data) = &data {
                if data.kind() != kind {
                    return CommandResult::error(format!(
                        "payload is a {} but the object is a {kind}",
                        data.kind()
                    ));
                }
            }
            if let Some(parent) = parent {
                if workspace.object(parent).is_none() {
                    return CommandResult::error(format!("parent {parent:?} not found"));
                }
            }

            let created = if position.is_none() && size.is_none() && data.is_none() && parent.is_none() {
                workspace.create_object(kind)
            } else {
                let draft = draft_for(workspace, kind, position, size, data, parent);
                workspace.add_object(draft)
            };
            match created {
                Some(id) => CommandResult::created(vec![id]),
                None => CommandResult::error(format!("store refused to create {kind}")),
            }
        }

        Command::Duplicate { target, offset } => {
            let ids = resolve(workspace, &target);
            if ids.is_empty() {
                return CommandResult::success();
            }
            let offset = offset.unwrap_or(Vec2::splat(workspace.config().duplicate_offset));
            CommandResult::created(workspace.duplicate(&ids, offset))
        }

        Command::Delete { target } => {
            let ids = resolve(workspace, &target);
            let deleted = workspace.delete(&ids);
            if target == Target::Selection {
                workspace.deselect();
            }
            CommandResult::deleted(deleted)
        }

        Command::Update { id, patch } => {
            if workspace.object(id).is_none() {
                return CommandResult::error(format!("object {id:?} not found"));
            }
            if workspace.update_object(id, &patch) {
                CommandResult::modified(vec![id])
            } else {
                CommandResult::success()
            }
        }

        Command::Move { target, delta } => {
            let ids = resolve(workspace, &target);
            CommandResult::modified(workspace.move_by(&ids, delta))
        }

        Command::SetPosition { target, position } => {
            let ids = resolve(workspace, &target);
            CommandResult::modified(workspace.set_position(&ids, CanvasPoint(position)))
        }

        Command::SetSize { target, size } => {
            let ids = resolve(workspace, &target);
            CommandResult::modified(workspace.set_size(&ids, size))
        }

        Command::ToggleVisibility { id } => toggled(id, workspace.toggle_visibility(id)),

        Command::ToggleLock { id } => toggled(id, workspace.toggle_lock(id)),

        Command::SetParent { target, parent } => {
            if let Some(parent) = parent {
                if workspace.object(parent).is_none() {
                    return CommandResult::error(format!("parent {parent:?} not found"));
                }
            }
            let ids = resolve(workspace, &target);
            CommandResult::modified(workspace.set_parent(&ids, parent))
        }

        Command::EditField { field, value } => match workspace.edit_field(field, &value) {
            Some(id) => CommandResult::modified(vec![id]),
            None => CommandResult::success(),
        },

        Command::Select {
            target,
            add_to_selection,
        } => {
            let ids = resolve(workspace, &target);
            workspace.select(&ids, add_to_selection);
            CommandResult::success()
        }

        Command::ClickLayer { id, shift } => {
            if workspace.object(id).is_none() {
                return CommandResult::error(format!("object {id:?} not found"));
            }
            workspace.layer_click(id, shift);
            CommandResult::success()
        }

        Command::ClearSelection => {
            workspace.deselect();
            CommandResult::success()
        }

        Command::SelectAll => {
            workspace.select_all();
            CommandResult::success()
        }

        Command::SearchLayers { query } => {
            workspace.set_layer_query(query);
            CommandResult::success()
        }

        Command::ToggleExpanded { id } => {
            workspace.toggle_layer_expanded(id);
            CommandResult::success()
        }

        Command::ZoomIn => {
            workspace.zoom_in();
            CommandResult::success()
        }

        Command::ZoomOut => {
            workspace.zoom_out();
            CommandResult::success()
        }

        Command::SetZoom { zoom } => {
            workspace.set_zoom(zoom);
            CommandResult::success()
        }

        Command::ZoomToFit => {
            workspace.zoom_to_fit();
            CommandResult::success()
        }

        Command::ZoomTo100 => {
            workspace.zoom_to_100();
            CommandResult::success()
        }

        Command::ZoomToSelection => {
            workspace.zoom_to_selection();
            CommandResult::success()
        }

        Command::SetPan { pan } => {
            workspace.set_pan(pan);
            CommandResult::success()
        }

        Command::Pan { delta } => {
            workspace.pan_by(delta);
            CommandResult::success()
        }

        Command::CenterOn { point } => {
            workspace.center_on(CanvasPoint(point));
            CommandResult::success()
        }

        Command::MinimapJump { pixel } => {
            workspace.minimap_pointer_down(pixel);
            workspace.minimap_pointer_up();
            CommandResult::success()
        }

        Command::SetTool { tool } => {
            workspace.set_tool(tool);
            CommandResult::success()
        }

        Command::Batch { commands } => {
            let mut result = CommandResult::success();
            for command in commands {
                result = result.merge(execute_command(workspace, command));
                if !result.is_success() {
                    break;
                }
            }
            result
        }
    }
}

/// Execute a read-only query against a workspace.
pub fn execute_query<S: RenderSurface, St: ObjectStore>(
    workspace: &Workspace<S, St>,
    query: &Query,
) -> QueryResult {
    match query {
        Query::GetSelection => QueryResult::Selection {
            ids: workspace.selection().ids(),
        },

        Query::GetAllObjects => QueryResult::Objects {
            objects: workspace.objects().to_vec(),
        },

        Query::GetObjects { target } => {
            let ids = resolve(workspace, target);
            QueryResult::Objects {
                objects: workspace
                    .objects()
                    .iter()
                    .filter(|o| ids.contains(&o.id))
                    .cloned()
                    .collect(),
            }
        }

        Query::GetObject { id } => QueryResult::Object {
            object: workspace.object(*id).cloned(),
        },

        Query::GetCanvasBounds => {
            let bounds = bounds_of(workspace.objects());
            if bounds.is_empty() {
                QueryResult::Bounds { min: None, max: None }
            } else {
                QueryResult::Bounds {
                    min: Some(bounds.min),
                    max: Some(bounds.max),
                }
            }
        }

        Query::GetViewport => {
            let viewport = workspace.viewport();
            QueryResult::Viewport {
                zoom: viewport.zoom,
                pan: viewport.pan,
            }
        }

        Query::GetTool => QueryResult::Tool { tool: workspace.tool() },

        Query::GetObjectCount => QueryResult::Count {
            count: workspace.objects().len(),
        },

        Query::GetLayers => QueryResult::Layers {
            rows: workspace.layer_rows(),
        },

        Query::GetInspector => QueryResult::Inspector {
            view: workspace.inspector(),
        },
    }
}

fn resolve<S: RenderSurface, St: ObjectStore>(workspace: &Workspace<S, St>, target: &Target) -> Vec<node::ObjectId> {
    target.resolve(workspace.objects(), workspace.selection())
}

fn toggled(id: node::ObjectId, changed: bool) -> CommandResult {
    if changed {
        CommandResult::modified(vec![id])
    } else {
        CommandResult::error(format!("object {id:?} not found"))
    }
}

/// A draft for an explicit create. Missing pieces fall back to the kind's
/// defaults, and a missing position centers the object in the viewport.
fn draft_for<S: RenderSurface, St: ObjectStore>(
    workspace: &Workspace<S, St>,
    kind: ObjectKind,
    position: Option<Vec2>,
    size: Option<Vec2>,
    data: Option<node::ObjectData>,
    parent: Option<node::ObjectId>,
) -> ObjectDraft {
    let size = size.map(CanvasSize).unwrap_or_else(|| kind.default_size());
    let position = position.unwrap_or_else(|| {
        let center = workspace
            .viewport()
            .screen_to_world(node::ScreenPoint(workspace.viewport_size() * 0.5));
        center.0 - size.0 * 0.5
    });

    let mut draft = ObjectDraft::new(kind, CanvasPoint(position));
    draft.size = size;
    draft.z_index = workspace.next_z_index();
    draft.parent_id = parent;
    if let Some(data) = data {
        draft.data = data;
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkspaceConfig;
    use api::MemoryStore;
    use canvas::{HeadlessSurface, Tool};
    use node::{ObjectData, ObjectPatch};

    fn workspace() -> Workspace<HeadlessSurface, MemoryStore> {
        Workspace::new(HeadlessSurface::new(), MemoryStore::new(), WorkspaceConfig::default()).unwrap()
    }

    fn create(workspace: &mut Workspace<HeadlessSurface, MemoryStore>, kind: ObjectKind, at: Vec2) -> node::ObjectId {
        let result = execute_command(
            workspace,
            Command::Create {
                kind,
                position: Some(at),
                size: None,
                data: None,
                parent: None,
            },
        );
        let CommandResult::Success { created, .. } = result else {
            panic!("create failed");
        };
        created[0]
    }

    #[test]
    fn create_with_position_uses_default_size() {
        let mut ws = workspace();
        let id = create(&mut ws, ObjectKind::Note, Vec2::new(10.0, 20.0));
        let note = ws.object(id).unwrap();
        assert_eq!(note.position, CanvasPoint::new(10.0, 20.0));
        assert_eq!(note.size, ObjectKind::Note.default_size());
    }

    #[test]
    fn create_rejects_mismatched_payload() {
        let mut ws = workspace();
        let result = execute_command(
            &mut ws,
            Command::Create {
                kind: ObjectKind::Note,
                position: None,
                size: None,
                data: Some(ObjectData::default_for(ObjectKind::Text)),
                parent: None,
            },
        );
        assert!(!result.is_success());
        assert!(ws.objects().is_empty());
    }

    #[test]
    fn move_skips_locked_objects() {
        let mut ws = workspace();
        let free = create(&mut ws, ObjectKind::Note, Vec2::ZERO);
        let pinned = create(&mut ws, ObjectKind::Note, Vec2::ZERO);
        execute_command(&mut ws, Command::ToggleLock { id: pinned });

        let result = execute_command(
            &mut ws,
            Command::Move {
                target: Target::All,
                delta: Vec2::new(5.0, 5.0),
            },
        );
        assert_eq!(result, CommandResult::modified(vec![free]));
        assert_eq!(ws.object(pinned).unwrap().position, CanvasPoint::new(0.0, 0.0));
    }

    #[test]
    fn batch_stops_at_first_error() {
        let mut ws = workspace();
        let missing = node::ObjectId::from_u128(9);
        let result = execute_command(
            &mut ws,
            Command::Batch {
                commands: vec![
                    Command::SetTool { tool: Tool::Hand },
                    Command::Update {
                        id: missing,
                        patch: ObjectPatch::visible(false),
                    },
                    Command::SetTool { tool: Tool::Zoom },
                ],
            },
        );
        assert!(!result.is_success());
        assert_eq!(ws.tool(), Tool::Hand);
    }

    #[test]
    fn canvas_bounds_ignore_hidden_objects() {
        let mut ws = workspace();
        assert_eq!(
            execute_query(&ws, &Query::GetCanvasBounds),
            QueryResult::Bounds { min: None, max: None }
        );

        create(&mut ws, ObjectKind::Note, Vec2::new(0.0, 0.0));
        let far = create(&mut ws, ObjectKind::Note, Vec2::new(5000.0, 5000.0));
        execute_command(&mut ws, Command::ToggleVisibility { id: far });

        let size = ObjectKind::Note.default_size();
        assert_eq!(
            execute_query(&ws, &Query::GetCanvasBounds),
            QueryResult::Bounds {
                min: Some(Vec2::ZERO),
                max: Some(size.0),
            }
        );
    }

    #[test]
    fn delete_of_selection_clears_it() {
        let mut ws = workspace();
        let a = create(&mut ws, ObjectKind::Shot, Vec2::ZERO);
        create(&mut ws, ObjectKind::Shot, Vec2::new(400.0, 0.0));
        execute_command(&mut ws, Command::SelectAll);

        let result = execute_command(&mut ws, Command::Delete { target: Target::Selection });
        let CommandResult::Success { deleted, .. } = result else {
            panic!("delete failed");
        };
        assert_eq!(deleted.len(), 2);
        assert!(deleted.contains(&a));
        assert_eq!(execute_query(&ws, &Query::GetSelection), QueryResult::Selection { ids: vec![] });
        assert_eq!(execute_query(&ws, &Query::GetObjectCount), QueryResult::Count { count: 0 });
    }
}

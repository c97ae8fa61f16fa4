//! Host event handlers: scroll, resize, keyboard and pointer

use crate::commands::Cmd;
use crate::geometry::Size;
use crate::messages::{CloseReason, HostMsg, Key};
use crate::model::{EngineModel, OverlayId};

use super::lifecycle::{close_overlay, reposition};

/// Handle events from the host's global listeners
pub fn update_host(model: &mut EngineModel, msg: HostMsg) -> Option<Cmd> {
    match msg {
        HostMsg::Scroll => schedule_reposition(model),

        HostMsg::Resize { width, height } => {
            model.viewport_size = Size::new(width.max(0.0), height.max(0.0));
            schedule_reposition(model)
        }

        HostMsg::Reposition => {
            model.reposition_scheduled = false;
            reposition_all(model)
        }

        HostMsg::KeyDown(Key::Escape) => {
            let id = model.registry.topmost(|e| e.flags.close_on_escape)?;
            close_overlay(model, id, CloseReason::Escape)
        }
        HostMsg::KeyDown(_) => None,

        HostMsg::PointerDown { x, y } => {
            let id = outside_click_target(model, x, y)?;
            close_overlay(model, id, CloseReason::OutsideClick)
        }
    }
}

/// Queue one reposition task; further scrolls before it runs coalesce into it
fn schedule_reposition(model: &mut EngineModel) -> Option<Cmd> {
    if model.registry.is_empty() || model.reposition_scheduled {
        return None;
    }
    model.reposition_scheduled = true;
    Some(Cmd::ScheduleReposition)
}

/// Recompute every open overlay, bottom of the stack first
fn reposition_all(model: &mut EngineModel) -> Option<Cmd> {
    let cmds: Vec<Cmd> = model
        .open_overlays()
        .into_iter()
        .filter_map(|id| reposition(model, id))
        .collect();
    if cmds.is_empty() {
        None
    } else {
        Some(Cmd::batch(cmds))
    }
}

/// The overlay a pointer-down at `(x, y)` dismisses, if any.
///
/// Only the topmost backdrop-closable overlay is a candidate. A press on it,
/// or on anything stacked above it, counts as inside.
fn outside_click_target(model: &EngineModel, x: f32, y: f32) -> Option<OverlayId> {
    let target = model.registry.topmost(|e| e.flags.close_on_backdrop_click)?;

    let hit = |id: OverlayId| {
        model
            .position(id)
            .is_some_and(|p| p.is_visible() && p.rect().contains(x, y))
    };

    if hit(target) || model.registry.above(target).any(|e| hit(e.id)) {
        return None;
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::messages::OverlayMsg;
    use crate::model::Visibility;
    use crate::surface::Modal;
    use crate::update::update;

    fn open_modal(model: &mut EngineModel) -> OverlayId {
        let id = model.allocate_id();
        let spec = Modal::new("dialog")
            .content_size(Size::new(200.0, 100.0))
            .spec();
        update(model, crate::messages::Msg::Overlay(OverlayMsg::Open { id, spec }));
        id
    }

    #[test]
    fn test_scroll_without_overlays_schedules_nothing() {
        let mut model = EngineModel::new(EngineConfig::default(), 800.0, 600.0);
        assert!(update_host(&mut model, HostMsg::Scroll).is_none());
        assert!(!model.reposition_scheduled);
    }

    #[test]
    fn test_repeated_scroll_coalesces() {
        let mut model = EngineModel::new(EngineConfig::default(), 800.0, 600.0);
        open_modal(&mut model);

        assert_eq!(
            update_host(&mut model, HostMsg::Scroll),
            Some(Cmd::ScheduleReposition)
        );
        assert!(update_host(&mut model, HostMsg::Scroll).is_none());
        assert!(update_host(&mut model, HostMsg::Reposition).is_none());
        assert!(!model.reposition_scheduled);
    }

    #[test]
    fn test_resize_recenters_modal() {
        let mut model = EngineModel::new(EngineConfig::default(), 800.0, 600.0);
        let id = open_modal(&mut model);
        assert_eq!(model.position(id).unwrap().left, 300.0);

        update_host(
            &mut model,
            HostMsg::Resize {
                width: 1000.0,
                height: 600.0,
            },
        );
        update_host(&mut model, HostMsg::Reposition);

        assert_eq!(model.position(id).unwrap().left, 400.0);
    }

    #[test]
    fn test_click_inside_modal_keeps_it_open() {
        let mut model = EngineModel::new(EngineConfig::default(), 800.0, 600.0);
        let id = open_modal(&mut model);

        update_host(&mut model, HostMsg::PointerDown { x: 400.0, y: 300.0 });
        assert_eq!(model.visibility(id), Visibility::Open);

        update_host(&mut model, HostMsg::PointerDown { x: 10.0, y: 10.0 });
        assert_eq!(model.visibility(id), Visibility::Closed);
    }

    #[test]
    fn test_non_escape_keys_are_ignored() {
        let mut model = EngineModel::new(EngineConfig::default(), 800.0, 600.0);
        let id = open_modal(&mut model);
        assert!(update_host(&mut model, HostMsg::KeyDown(Key::Enter)).is_none());
        assert_eq!(model.visibility(id), Visibility::Open);
    }
}

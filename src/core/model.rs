use crate::action::Action;
use crate::action::ActionCode;
use crate::binding;
use crate::common::Direction;
use crate::config::Configuration;
use crate::frame::FrameId;
use crate::frame::SplitAxis;
use crate::monitor::Monitors;
use crate::registry::Registry;
use crate::util::Util;
use crate::window::WindowState;

use winsys::connection::Connection;
use winsys::event::Event;
use winsys::event::PropertyKind;
use winsys::event::ToggleAction;
use winsys::geometry::Dim;
use winsys::geometry::Edge;
use winsys::geometry::Padding;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::keysyms;
use winsys::input::ButtonEvent;
use winsys::input::KeyEvent;
use winsys::window::IcccmWindowState;
use winsys::window::Window as XWindow;
use winsys::Result;

use std::cell::Cell;

use anyhow::anyhow;

/// An in-progress pointer drag on a popup window.
#[derive(Debug, Copy, Clone)]
struct Drag {
    window: XWindow,
    operation: DragOperation,
    start: Region,
    last_pointer: Pos,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DragOperation {
    Move,
    Resize(Edge),
}

pub struct Model<'model> {
    conn: &'model mut dyn Connection,
    config: Configuration,
    monitors: Monitors,
    registry: Registry,
    focus: Cell<Option<XWindow>>,
    drag: Option<Drag>,
    running: bool,
}

impl<'model> Model<'model> {
    pub fn new(
        conn: &'model mut dyn Connection,
        config: Configuration,
    ) -> Self {
        info!("initializing window manager");

        let monitors = Monitors::new(conn.connected_outputs());

        let mut model = Self {
            config,
            monitors,
            registry: Registry::new(),
            focus: Cell::new(None),
            drag: None,
            running: true,
            conn,
        };

        binding::grab_bindings(model.conn, &model.config);

        for window in model.conn.top_level_windows() {
            model.manage(window);
        }

        model.conn.flush();

        model
    }

    pub fn run(&mut self) {
        while self.running {
            match self.conn.step() {
                Some(event) => {
                    trace!("received event: {:?}", event);
                    self.handle_event(event);
                },
                None => break,
            }

            self.conn.flush();
        }

        self.conn.cleanup();
        self.conn.flush();
    }

    pub fn handle_event(
        &mut self,
        event: Event,
    ) {
        match event {
            Event::Key {
                event,
            } => self.handle_key(event),
            Event::Button {
                event,
            } => self.handle_button(event),
            Event::Motion {
                root_pos,
            } => self.handle_motion(root_pos),
            Event::MapRequest {
                window,
            } => self.handle_map_request(window),
            Event::ConfigureRequest {
                window,
                pos,
                dim,
                border_width,
            } => self.handle_configure_request(window, pos, dim, border_width),
            Event::Unmap {
                window,
            } => self.handle_unmap(window),
            Event::Destroy {
                window,
            } => self.handle_destroy(window),
            Event::Property {
                window,
                kind,
            } => self.handle_property(window, kind),
            Event::FullscreenRequest {
                window,
                action,
            } => self.handle_fullscreen_request(window, action),
            Event::ScreenChange => self.handle_screen_change(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn focused_window(&self) -> Option<XWindow> {
        self.focus.get()
    }

    #[inline]
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    #[cfg(test)]
    pub fn monitors(&self) -> &Monitors {
        &self.monitors
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn focus_window(
        &self,
        window: Option<XWindow>,
    ) {
        match window {
            Some(window) => self.conn.focus_window(window),
            None => self.conn.unfocus(),
        }

        self.focus.set(window);
    }

    /// Wrap @window into an internal record and put it on screen in its
    /// predicted state.
    fn manage(
        &mut self,
        window: XWindow,
    ) {
        let record = match self.registry.manage(self.conn, window) {
            Ok(record) => record,
            Err(err) => {
                warn!("{}", err);
                return;
            },
        };

        debug!("managing window {:#0x} ({})", window, record.name());

        let state = record.predicted_state(self.monitors.focused_monitor().region());
        let override_redirect = record.is_override_redirect();

        self.conn
            .set_window_border_width(window, self.config.border.size);
        self.set_window_state(window, state);

        if !override_redirect {
            self.focus_window(Some(window));
        }
    }

    /* Map requests are where new windows first appear; they are also
     * re-sent by clients that want a hidden window back on screen. */
    fn handle_map_request(
        &mut self,
        window: XWindow,
    ) {
        debug!("MAP_REQUEST for window {:#0x}", window);

        match self.registry.window(window) {
            None => self.manage(window),
            Some(record) => {
                if record.state() == WindowState::Hidden {
                    let restored = record.previous_state();
                    self.set_window_state(window, restored);
                }
            },
        }
    }

    /* Unmap notifications tell us a window decided not to be seen
     * anymore; our own unmaps arrive with the state already switched. */
    fn handle_unmap(
        &mut self,
        window: XWindow,
    ) {
        let state = match self.registry.window(window) {
            Some(record) => record.state(),
            None => return,
        };

        debug!("UNMAP for window {:#0x}", window);

        if state != WindowState::Hidden {
            self.set_window_state(window, WindowState::Hidden);
        }
    }

    /* Destroy notifications are sent when a window leaves the X server.
     * Good bye to that window! */
    fn handle_destroy(
        &mut self,
        window: XWindow,
    ) {
        let record = match self.registry.forget(window) {
            Some(record) => record,
            None => return,
        };

        debug!("DESTROY for window {:#0x}", window);

        if let Some(drag) = self.drag {
            if drag.window == window {
                self.conn.ungrab_pointer();
                self.drag = None;
            }
        }

        if let Some(frame) = record.frame() {
            let auto_remove_void = self.config.tiling.auto_remove_void;

            if let Some(monitor) = self.monitors.monitor_containing_mut(frame) {
                let tree = monitor.tree_mut();
                tree.vacate(window);

                if auto_remove_void && tree.leaves().len() > 1 {
                    tree.set_focus(frame);
                    let evicted = tree.remove(true);

                    debug_assert!(evicted.is_empty(), "vacated frame still held windows");
                }
            }

            self.apply_tiling();
        }

        if self.focus.get() == Some(window) {
            let next = self.focused_leaf_window();
            self.focus_window(next);
        }
    }

    /* Property notifications may flip the predicted state, for example
     * when a window gains WM_TRANSIENT_FOR after mapping. */
    fn handle_property(
        &mut self,
        window: XWindow,
        kind: PropertyKind,
    ) {
        let record = match self.registry.window(window) {
            Some(record) => record,
            None => {
                trace!("property change of unmanaged window: {:#0x}", window);
                return;
            },
        };

        debug!("PROPERTY {:?} for window {:#0x}", kind, window);

        match kind {
            PropertyKind::Name => record.set_name(self.conn.get_window_name(window)),
            PropertyKind::SizeHints => {
                record.set_size_hints(self.conn.get_window_size_hints(window))
            },
            PropertyKind::WmHints => record.set_hints(self.conn.get_window_hints(window)),
            PropertyKind::Protocols => {
                record.set_supports_delete(self.conn.window_supports_delete(window))
            },
            PropertyKind::TransientFor => {
                record.set_transient_for(self.conn.get_window_transient_for(window))
            },
        }

        let state = record.state();
        let predicted = record.predicted_state(self.monitors.focused_monitor().region());

        if matches!(state, WindowState::Tiling | WindowState::Popup) && state != predicted {
            self.set_window_state(window, predicted);
        }
    }

    /* Configure requests of unmanaged windows are honored verbatim;
     * tiling windows are pinned to their frame; popups may move, their
     * size clamped to the hints. */
    fn handle_configure_request(
        &mut self,
        window: XWindow,
        pos: Option<Pos>,
        dim: Option<Dim>,
        border_width: Option<u32>,
    ) {
        let record = match self.registry.window(window) {
            Some(record) => record,
            None => {
                let region = Region {
                    pos: pos.unwrap_or_default(),
                    dim: dim.unwrap_or(Dim {
                        w: 1,
                        h: 1,
                    }),
                };

                match (pos, dim) {
                    (_, Some(_)) => self.conn.place_window(window, &region),
                    (Some(pos), None) => self.conn.move_window(window, pos),
                    _ => {},
                }

                if let Some(border_width) = border_width {
                    self.conn.set_window_border_width(window, border_width);
                }

                return;
            },
        };

        match record.state() {
            WindowState::Tiling | WindowState::Fullscreen => {
                // tiling geometry wins; re-send it so the client converges
                let geometry = record.geometry();
                self.conn.place_window(window, &geometry);
            },
            WindowState::Popup => {
                let mut region = record.popup_geometry();

                if let Some(pos) = pos {
                    region.pos = pos;
                }

                if let Some(dim) = dim {
                    region.dim = dim;
                }

                let region = region.with_size_hints(&record.size_hints());

                record.set_popup_geometry(region);
                record.set_geometry(region);
                self.conn.place_window(window, &region);
            },
            WindowState::Hidden => {},
        }
    }

    fn handle_fullscreen_request(
        &mut self,
        window: XWindow,
        action: ToggleAction,
    ) {
        let state = match self.registry.window(window) {
            Some(record) => record.state(),
            None => return,
        };

        debug!(
            "FULLSCREEN_REQUEST for window {:#0x} with action {:?}",
            window, action
        );

        match (action, state) {
            (ToggleAction::Add, state) if state != WindowState::Fullscreen => {
                self.set_window_state(window, WindowState::Fullscreen);
            },
            (ToggleAction::Remove, WindowState::Fullscreen)
            | (ToggleAction::Toggle, WindowState::Fullscreen) => {
                let previous = self.registry.window(window).unwrap().previous_state();
                self.set_window_state(window, previous);
            },
            (ToggleAction::Toggle, _) => {
                self.set_window_state(window, WindowState::Fullscreen);
            },
            _ => {},
        }
    }

    /* Screen change notifications arrive whenever the output layout
     * shifts; the monitor set is re-queried and merged. */
    fn handle_screen_change(&mut self) {
        debug!("SCREEN_CHANGE");

        let displaced = self.monitors.merge(self.conn.connected_outputs());

        for window in displaced {
            if let Some(record) = self.registry.window(window) {
                record.set_frame(None);
            }
        }

        let rehome: Vec<XWindow> = self
            .registry
            .iter()
            .filter(|record| {
                record.state() == WindowState::Tiling && record.frame().is_none()
            })
            .map(|record| record.window())
            .collect();

        for window in rehome {
            self.assign_to_tree(window, true);
        }

        self.apply_tiling();
    }

    fn handle_key(
        &mut self,
        event: KeyEvent,
    ) {
        if self.drag.is_some() {
            if event.press && event.keysym == keysyms::XK_ESCAPE {
                self.cancel_drag();
            }

            return;
        }

        let effective = event.modifiers & !self.config.keyboard.ignore_modifiers;
        let flags = if event.press {
            0
        } else {
            binding::BINDING_FLAG_RELEASE
        };

        let actions = match binding::find_key_binding(
            &self.config.keyboard.keys,
            effective,
            event.keysym,
            flags,
        ) {
            Some(found) => found.actions.clone(),
            None => {
                trace!("unbound key {:#x} with modifiers {:#x}", event.keysym, effective);
                return;
            },
        };

        self.run_actions(&actions, None);
    }

    fn handle_button(
        &mut self,
        event: ButtonEvent,
    ) {
        if !event.press {
            self.stop_drag();
            return;
        }

        let effective = event.modifiers & !self.config.mouse.ignore_modifiers;

        let actions = match binding::find_button_binding(
            &self.config.mouse.buttons,
            effective,
            event.button,
            0,
        ) {
            Some(found) => found.actions.clone(),
            None => return,
        };

        self.run_actions(&actions, Some(&event));
    }

    fn handle_motion(
        &mut self,
        root_pos: Pos,
    ) {
        let mut drag = match self.drag {
            Some(drag) => drag,
            None => return,
        };

        let record = match self.registry.window(drag.window) {
            Some(record) => record,
            None => return,
        };

        let delta = drag.last_pointer.dist(root_pos);
        drag.last_pointer = root_pos;

        let mut region = record.popup_geometry();

        match drag.operation {
            DragOperation::Move => {
                region.pos += delta;
            },
            DragOperation::Resize(edge) => {
                match edge {
                    Edge::Left => {
                        region.pos.x += delta.dx;
                        region.dim.w -= delta.dx;
                    },
                    Edge::Right => region.dim.w += delta.dx,
                    Edge::Top => {
                        region.pos.y += delta.dy;
                        region.dim.h -= delta.dy;
                    },
                    Edge::Bottom => region.dim.h += delta.dy,
                }

                let constrained = region.with_size_hints(&record.size_hints());

                if edge == Edge::Left {
                    region.pos.x += region.dim.w - constrained.dim.w;
                }

                if edge == Edge::Top {
                    region.pos.y += region.dim.h - constrained.dim.h;
                }

                region.dim = constrained.dim;
            },
        }

        record.set_popup_geometry(region);
        record.set_geometry(region);
        self.conn.place_window(drag.window, &region);

        self.drag = Some(drag);
    }

    fn start_drag(
        &mut self,
        resize: bool,
        pointer: Option<&ButtonEvent>,
    ) {
        if self.drag.is_some() {
            return;
        }

        let pos = pointer.map_or_else(|| self.conn.get_pointer_position(), |e| e.root_pos);
        let window = pointer
            .and_then(|event| event.child)
            .or_else(|| self.focus.get());

        let window = match window {
            Some(window) => window,
            None => return,
        };

        let record = match self.registry.window(window) {
            Some(record) => record,
            None => return,
        };

        if record.state() != WindowState::Popup {
            return;
        }

        let start = record.popup_geometry();

        // near an edge the press resizes, elsewhere it moves
        let operation = if resize {
            match start.grabbed_edge(pos, self.config.mouse.resize_tolerance) {
                Some(edge) => DragOperation::Resize(edge),
                None => DragOperation::Move,
            }
        } else {
            DragOperation::Move
        };

        if !self.conn.grab_pointer() {
            warn!("unable to grab the pointer for window {:#0x}", window);
            return;
        }

        self.drag = Some(Drag {
            window,
            operation,
            start,
            last_pointer: pos,
        });
    }

    fn stop_drag(&mut self) {
        if self.drag.take().is_some() {
            self.conn.ungrab_pointer();
        }
    }

    /// Escape puts the window back where the drag started.
    fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(record) = self.registry.window(drag.window) {
                record.set_popup_geometry(drag.start);
                record.set_geometry(drag.start);
                self.conn.place_window(drag.window, &drag.start);
            }

            self.conn.ungrab_pointer();
        }
    }

    /// Switch a window between the tiling, popup, fullscreen and hidden
    /// modes, updating the frame tree and the server side to match.
    fn set_window_state(
        &mut self,
        window: XWindow,
        state: WindowState,
    ) {
        let current = match self.registry.window(window) {
            Some(record) => record.state(),
            None => return,
        };

        if current == state {
            return;
        }

        debug!(
            "window {:#0x} transitions {:?} -> {:?}",
            window, current, state
        );

        match state {
            WindowState::Tiling => {
                self.registry.window(window).unwrap().set_state(state);

                let frame = self.registry.window(window).unwrap().frame();
                let has_valid_frame = frame
                    .map_or(false, |frame| self.monitors.monitor_containing(frame).is_some());

                if !has_valid_frame {
                    self.assign_to_tree(window, false);
                }

                self.show_window(window);
            },
            WindowState::Popup => {
                // leaving the tiling frees the frame slot
                self.vacate_frame(window);

                self.registry.window(window).unwrap().set_state(state);
                self.show_window(window);
                self.conn.raise_window(window);
            },
            WindowState::Fullscreen => {
                self.registry.window(window).unwrap().set_state(state);
                self.conn.set_window_fullscreen(window, true);
                self.show_window(window);
                self.conn.raise_window(window);
            },
            WindowState::Hidden => {
                let record = self.registry.window(window).unwrap();
                record.set_state(state);

                if record.is_mapped() {
                    record.set_mapped(false);
                    self.conn.unmap_window(window);
                }

                self.conn
                    .set_icccm_window_state(window, IcccmWindowState::Iconic);

                if self.focus.get() == Some(window) {
                    let next = self.focused_leaf_window();
                    self.focus_window(next);
                }
            },
        }

        if current == WindowState::Fullscreen {
            self.conn.set_window_fullscreen(window, false);
        }
    }

    /// The placement rule for a window entering the tiling: the first
    /// empty leaf of the tree in pre-order, or the focused leaf, whose
    /// occupant is then displaced into hiding.
    fn assign_to_tree(
        &mut self,
        window: XWindow,
        prefer_primary: bool,
    ) {
        let auto_fill_void = self.config.tiling.auto_fill_void;

        let monitor = if prefer_primary {
            self.monitors.primary_mut()
        } else {
            self.monitors.focused_monitor_mut()
        };

        let tree = monitor.tree_mut();

        if tree.find_window(window).is_some() {
            return;
        }

        let leaf = if auto_fill_void {
            tree.first_empty_leaf().unwrap_or_else(|| tree.focused_leaf())
        } else {
            tree.focused_leaf()
        };

        let displaced = tree.assign(leaf, window);
        tree.set_focus(leaf);

        if let Some(record) = self.registry.window(window) {
            record.set_frame(Some(leaf));
        }

        if let Some(displaced) = displaced {
            if let Some(record) = self.registry.window(displaced) {
                record.set_frame(None);
            }

            self.set_window_state(displaced, WindowState::Hidden);
        }
    }

    fn vacate_frame(
        &mut self,
        window: XWindow,
    ) {
        let frame = match self.registry.window(window).and_then(|record| record.frame()) {
            Some(frame) => frame,
            None => return,
        };

        if let Some(monitor) = self.monitors.monitor_containing_mut(frame) {
            monitor.tree_mut().vacate(window);
        }

        if let Some(record) = self.registry.window(window) {
            record.set_frame(None);
        }
    }

    /// Map the window if need be and push its target rectangle. The
    /// configure request is skipped when the last known geometry
    /// already matches.
    fn show_window(
        &mut self,
        window: XWindow,
    ) {
        let record = match self.registry.window(window) {
            Some(record) => record,
            None => return,
        };

        let target = match record.state() {
            WindowState::Tiling => {
                match record.frame().and_then(|frame| {
                    self.monitors.monitor_containing(frame).map(|monitor| {
                        monitor
                            .tree()
                            .window_region(frame, self.config.gaps.inner)
                    })
                }) {
                    Some(region) => region,
                    None => return,
                }
            },
            WindowState::Popup => record
                .popup_geometry()
                .with_size_hints(&record.size_hints()),
            WindowState::Fullscreen => {
                let frame = record.frame();

                frame
                    .and_then(|frame| self.monitors.monitor_containing(frame))
                    .map_or_else(
                        || self.monitors.focused_monitor().region(),
                        |monitor| monitor.region(),
                    )
            },
            WindowState::Hidden => return,
        };

        if !record.is_mapped() {
            record.set_mapped(true);
            self.conn.map_window(window);
            self.conn
                .set_icccm_window_state(window, IcccmWindowState::Normal);
        }

        if record.geometry() != target {
            record.set_geometry(target);
            self.conn.place_window(window, &target);
        }
    }

    /// Push the rectangle of every tiling and fullscreen window on
    /// every monitor; geometry application stays idempotent.
    fn apply_tiling(&self) {
        let inner = self.config.gaps.inner;

        for monitor in self.monitors.iter() {
            let tree = monitor.tree();

            for leaf in tree.leaves() {
                let window = match tree.frame(leaf).unwrap().window() {
                    Some(window) => window,
                    None => continue,
                };

                let record = match self.registry.window(window) {
                    Some(record) => record,
                    None => continue,
                };

                record.set_frame(Some(leaf));

                let target = match record.state() {
                    WindowState::Tiling => tree.window_region(leaf, inner),
                    WindowState::Fullscreen => monitor.region(),
                    _ => continue,
                };

                if record.geometry() != target {
                    record.set_geometry(target);
                    self.conn.place_window(window, &target);
                }
            }
        }
    }

    /// Re-root every partition in its monitor rectangle less the outer
    /// gaps, then push the resulting rectangles.
    fn retile(&mut self) {
        let outer = self.config.gaps.outer;

        for monitor in self.monitors.iter_mut() {
            let usable = monitor.region().with_padding(Padding::new(
                outer[0], outer[2], outer[1], outer[3],
            ));

            monitor.tree_mut().resize_root(usable);
        }

        self.apply_tiling();
    }

    fn focused_leaf_window(&self) -> Option<XWindow> {
        let tree = self.monitors.focused_monitor().tree();

        tree.frame(tree.focused_leaf())
            .and_then(|frame| frame.window())
            .filter(|&window| {
                self.registry
                    .window(window)
                    .map_or(false, |record| record.state() != WindowState::Hidden)
            })
    }

    fn focus_frame_window(&self) {
        let window = self.focused_leaf_window();
        self.focus_window(window);
    }

    fn run_actions(
        &mut self,
        actions: &[Action],
        pointer: Option<&ButtonEvent>,
    ) {
        for action in actions {
            debug!("performing action: {}", action.code);

            if let Err(err) = self.do_action(action, pointer) {
                warn!("action {} failed: {}", action.code, err);
                break;
            }
        }
    }

    /// Interpret one parameterized action against the current state.
    pub fn do_action(
        &mut self,
        action: &Action,
        pointer: Option<&ButtonEvent>,
    ) -> Result<()> {
        let target = pointer
            .and_then(|event| event.child)
            .filter(|window| self.registry.contains(*window))
            .or_else(|| self.focus.get());

        match action.code {
            ActionCode::ReloadConfiguration => self.reload_configuration(),
            ActionCode::ParentFrame => {
                self.monitors.focused_monitor_mut().tree_mut().focus_parent();
                Ok(())
            },
            ActionCode::ChildFrame => {
                self.monitors.focused_monitor_mut().tree_mut().focus_child();
                self.focus_frame_window();
                Ok(())
            },
            ActionCode::RootFrame => {
                self.monitors.focused_monitor_mut().tree_mut().focus_root();
                Ok(())
            },
            ActionCode::CloseWindow => {
                if let Some(window) = target {
                    let supports_delete = self
                        .registry
                        .window(window)
                        .map_or(false, |record| record.supports_delete());

                    if supports_delete {
                        self.conn.close_window(window);
                    } else {
                        self.conn.kill_window(window);
                    }
                }

                Ok(())
            },
            ActionCode::MinimizeWindow => {
                if let Some(window) = target {
                    self.set_window_state(window, WindowState::Hidden);
                }

                Ok(())
            },
            ActionCode::NextWindow => {
                self.cycle_window(Direction::Forward);
                Ok(())
            },
            ActionCode::PreviousWindow => {
                self.cycle_window(Direction::Backward);
                Ok(())
            },
            ActionCode::RemoveFrame => {
                let auto_remove_void = self.config.tiling.auto_remove_void;
                let evicted = self
                    .monitors
                    .focused_monitor_mut()
                    .tree_mut()
                    .remove(auto_remove_void);

                for window in evicted {
                    if let Some(record) = self.registry.window(window) {
                        record.set_frame(None);
                    }

                    self.set_window_state(window, WindowState::Hidden);
                }

                self.apply_tiling();
                self.focus_frame_window();
                Ok(())
            },
            ActionCode::ToggleTiling => {
                if let Some(window) = target {
                    let record = self.registry.window(window).unwrap();
                    let state = record.state();
                    let previous = record.previous_state();

                    let next = if state == WindowState::Tiling {
                        if previous == WindowState::Tiling {
                            WindowState::Popup
                        } else {
                            previous
                        }
                    } else {
                        WindowState::Tiling
                    };

                    self.set_window_state(window, next);
                    self.apply_tiling();
                }

                Ok(())
            },
            ActionCode::ToggleFullscreen => {
                if let Some(window) = target {
                    let record = self.registry.window(window).unwrap();

                    let next = if record.state() == WindowState::Fullscreen {
                        record.previous_state()
                    } else {
                        WindowState::Fullscreen
                    };

                    self.set_window_state(window, next);
                }

                Ok(())
            },
            ActionCode::ToggleFocus => {
                self.toggle_focus();
                Ok(())
            },
            ActionCode::SplitHorizontally => {
                self.monitors
                    .focused_monitor_mut()
                    .tree_mut()
                    .split(SplitAxis::Horizontal);
                self.apply_tiling();
                Ok(())
            },
            ActionCode::SplitVertically => {
                self.monitors
                    .focused_monitor_mut()
                    .tree_mut()
                    .split(SplitAxis::Vertical);
                self.apply_tiling();
                Ok(())
            },
            ActionCode::FocusUp => self.focus_direction(Edge::Top),
            ActionCode::FocusLeft => self.focus_direction(Edge::Left),
            ActionCode::FocusRight => self.focus_direction(Edge::Right),
            ActionCode::FocusDown => self.focus_direction(Edge::Bottom),
            ActionCode::ExchangeUp => self.exchange(Edge::Top),
            ActionCode::ExchangeLeft => self.exchange(Edge::Left),
            ActionCode::ExchangeRight => self.exchange(Edge::Right),
            ActionCode::ExchangeDown => self.exchange(Edge::Bottom),
            ActionCode::ResizeBy => {
                let quad = action
                    .parameter
                    .as_quad()
                    .ok_or_else(|| anyhow!("resize-by requires a quad parameter"))?;

                self.resize_by(quad);
                Ok(())
            },
            ActionCode::ShowWindowList => {
                self.show_window_list();
                Ok(())
            },
            ActionCode::Run => {
                let command = action
                    .parameter
                    .as_string()
                    .ok_or_else(|| anyhow!("run requires a command string"))?;

                Util::spawn_shell(command);
                Ok(())
            },
            ActionCode::Quit => {
                self.running = false;
                Ok(())
            },
            ActionCode::InitiateMove => {
                self.start_drag(false, pointer);
                Ok(())
            },
            ActionCode::InitiateResize => {
                self.start_drag(true, pointer);
                Ok(())
            },
        }
    }

    fn focus_direction(
        &mut self,
        edge: Edge,
    ) -> Result<()> {
        if self
            .monitors
            .focused_monitor_mut()
            .tree_mut()
            .focus_direction(edge)
            .is_some()
        {
            self.focus_frame_window();
        }

        Ok(())
    }

    fn exchange(
        &mut self,
        edge: Edge,
    ) -> Result<()> {
        if self
            .monitors
            .focused_monitor_mut()
            .tree_mut()
            .exchange(edge)
            .is_some()
        {
            self.apply_tiling();
        }

        Ok(())
    }

    fn resize_by(
        &mut self,
        quad: [i32; 4],
    ) {
        let focused_popup = self
            .focus
            .get()
            .and_then(|window| self.registry.window(window))
            .filter(|record| record.state() == WindowState::Popup);

        if let Some(record) = focused_popup {
            let [left, top, right, bottom] = quad;
            let mut region = record.popup_geometry();

            region.pos.x -= left;
            region.dim.w += left + right;
            region.pos.y -= top;
            region.dim.h += top + bottom;

            let region = region.with_size_hints(&record.size_hints());
            let window = record.window();

            record.set_popup_geometry(region);
            record.set_geometry(region);
            self.conn.place_window(window, &region);

            return;
        }

        match self
            .monitors
            .focused_monitor_mut()
            .tree_mut()
            .resize_by(quad)
        {
            Ok(()) => self.apply_tiling(),
            Err(err) => warn!("resize rejected: {:?}", err),
        }
    }

    /// Move the focus between the tiling and popup focus classes.
    fn toggle_focus(&mut self) {
        let focused_state = self
            .focus
            .get()
            .and_then(|window| self.registry.window(window))
            .map(|record| record.state());

        match focused_state {
            Some(WindowState::Popup) | Some(WindowState::Fullscreen) => {
                self.focus_frame_window();
            },
            _ => {
                let popup = self
                    .registry
                    .iter()
                    .find(|record| {
                        record.state() == WindowState::Popup && record.is_mapped()
                    })
                    .map(|record| record.window());

                if let Some(popup) = popup {
                    self.conn.raise_window(popup);
                    self.focus_window(Some(popup));
                }
            },
        }
    }

    /// Move the frame focus to the next or previous occupied leaf in
    /// tree order.
    fn cycle_window(
        &mut self,
        direction: Direction,
    ) {
        let tree = self.monitors.focused_monitor_mut().tree_mut();
        let current = tree.focused_leaf();

        let occupied: Vec<FrameId> = tree
            .leaves()
            .into_iter()
            .filter(|&leaf| tree.frame(leaf).unwrap().window().is_some())
            .collect();

        if occupied.is_empty() {
            return;
        }

        let position = occupied.iter().position(|&leaf| leaf == current);
        let next = match (position, direction) {
            (Some(index), Direction::Forward) => occupied[(index + 1) % occupied.len()],
            (Some(index), Direction::Backward) => {
                occupied[(index + occupied.len() - 1) % occupied.len()]
            },
            (None, _) => occupied[0],
        };

        tree.set_focus(next);
        self.focus_frame_window();
    }

    /// The overlay rendering is an external concern; the list itself is
    /// assembled here.
    fn show_window_list(&self) {
        let mut names: Vec<String> = self
            .registry
            .iter()
            .map(|record| {
                format!(
                    "{}{} {}",
                    match record.state() {
                        WindowState::Hidden => '-',
                        WindowState::Fullscreen => 'F',
                        WindowState::Popup => '=',
                        WindowState::Tiling => '+',
                    },
                    if record.is_urgent() { '!' } else { ' ' },
                    record.name()
                )
            })
            .collect();

        names.sort();

        for name in names {
            info!("{}", name);
        }
    }

    /// Swap in a freshly parsed configuration; a malformed file leaves
    /// the previous one in force.
    fn reload_configuration(&mut self) -> Result<()> {
        let loaded = match Configuration::default_path() {
            Some(path) if path.exists() => match Configuration::load(&path) {
                Ok(configuration) => configuration,
                Err(err) => {
                    warn!("configuration reload rejected: {}", err);
                    return Ok(());
                },
            },
            _ => Configuration::default(),
        };

        let mut configuration = loaded;
        binding::merge_default_key_bindings(&mut configuration);
        binding::merge_default_button_bindings(&mut configuration);

        self.config = configuration;
        binding::grab_bindings(self.conn, &self.config);

        for record in self.registry.iter() {
            self.conn
                .set_window_border_width(record.window(), self.config.border.size);
        }

        self.retile();

        info!("configuration reloaded");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::binding::merge_default_button_bindings;
    use crate::binding::merge_default_key_bindings;

    use winsys::hints::Hints;
    use winsys::hints::SizeHints;
    use winsys::input::Button;
    use winsys::input::Keysym;
    use winsys::screen::Screen;

    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use x11rb::protocol::xproto::ModMask;

    #[derive(Default, Clone)]
    struct WindowFacts {
        geometry: Option<Region>,
        size_hints: Option<SizeHints>,
        hints: Option<Hints>,
        transient_for: Option<XWindow>,
        override_redirect: bool,
        supports_delete: bool,
    }

    /// A recording stand-in for the display server.
    struct TestConnection {
        events: RefCell<VecDeque<Event>>,
        facts: RefCell<HashMap<XWindow, WindowFacts>>,
        outputs: Rc<RefCell<Vec<Screen>>>,
        placements: RefCell<HashMap<XWindow, Region>>,
        mapped: RefCell<HashMap<XWindow, bool>>,
        closed: RefCell<Vec<XWindow>>,
        killed: RefCell<Vec<XWindow>>,
        grabbed_keys: RefCell<Vec<(u16, Keysym)>>,
        grabbed_buttons: RefCell<Vec<(u16, Button)>>,
        ungrab_rounds: Cell<usize>,
        pointer_grabbed: Cell<bool>,
        focused: Cell<Option<XWindow>>,
    }

    impl TestConnection {
        fn new(outputs: Vec<Screen>) -> Self {
            Self {
                events: RefCell::new(VecDeque::new()),
                facts: RefCell::new(HashMap::new()),
                outputs: Rc::new(RefCell::new(outputs)),
                placements: RefCell::new(HashMap::new()),
                mapped: RefCell::new(HashMap::new()),
                closed: RefCell::new(Vec::new()),
                killed: RefCell::new(Vec::new()),
                grabbed_keys: RefCell::new(Vec::new()),
                grabbed_buttons: RefCell::new(Vec::new()),
                ungrab_rounds: Cell::new(0),
                pointer_grabbed: Cell::new(false),
                focused: Cell::new(None),
            }
        }

        fn add_window(
            &self,
            window: XWindow,
            facts: WindowFacts,
        ) {
            self.facts.borrow_mut().insert(window, facts);
        }

        fn placement(
            &self,
            window: XWindow,
        ) -> Option<Region> {
            self.placements.borrow().get(&window).copied()
        }
    }

    impl Connection for TestConnection {
        fn flush(&self) -> bool {
            true
        }

        fn step(&self) -> Option<Event> {
            self.events.borrow_mut().pop_front()
        }

        fn connected_outputs(&self) -> Vec<Screen> {
            self.outputs.borrow().clone()
        }

        fn top_level_windows(&self) -> Vec<XWindow> {
            Vec::new()
        }

        fn get_pointer_position(&self) -> Pos {
            Pos::default()
        }

        fn grab_pointer(&self) -> bool {
            if self.pointer_grabbed.get() {
                return false;
            }

            self.pointer_grabbed.set(true);
            true
        }

        fn ungrab_pointer(&self) {
            self.pointer_grabbed.set(false);
        }

        fn cleanup(&self) {}

        fn grab_key(
            &self,
            modifiers: u16,
            keysym: Keysym,
        ) {
            self.grabbed_keys.borrow_mut().push((modifiers, keysym));
        }

        fn grab_button(
            &self,
            modifiers: u16,
            button: Button,
        ) {
            self.grabbed_buttons.borrow_mut().push((modifiers, button));
        }

        fn ungrab_bindings(&self) {
            self.ungrab_rounds.set(self.ungrab_rounds.get() + 1);
            self.grabbed_keys.borrow_mut().clear();
            self.grabbed_buttons.borrow_mut().clear();
        }

        fn init_window(
            &self,
            _window: XWindow,
        ) {
        }

        fn map_window(
            &self,
            window: XWindow,
        ) {
            self.mapped.borrow_mut().insert(window, true);
        }

        fn unmap_window(
            &self,
            window: XWindow,
        ) {
            self.mapped.borrow_mut().insert(window, false);
        }

        fn place_window(
            &self,
            window: XWindow,
            region: &Region,
        ) {
            self.placements.borrow_mut().insert(window, *region);
        }

        fn move_window(
            &self,
            window: XWindow,
            pos: Pos,
        ) {
            let mut placements = self.placements.borrow_mut();
            let region = placements.entry(window).or_default();
            region.pos = pos;
        }

        fn set_window_border_width(
            &self,
            _window: XWindow,
            _width: u32,
        ) {
        }

        fn focus_window(
            &self,
            window: XWindow,
        ) {
            self.focused.set(Some(window));
        }

        fn unfocus(&self) {
            self.focused.set(None);
        }

        fn raise_window(
            &self,
            _window: XWindow,
        ) {
        }

        fn close_window(
            &self,
            window: XWindow,
        ) -> bool {
            self.closed.borrow_mut().push(window);
            true
        }

        fn kill_window(
            &self,
            window: XWindow,
        ) -> bool {
            self.killed.borrow_mut().push(window);
            true
        }

        fn get_window_geometry(
            &self,
            window: XWindow,
        ) -> Result<Region> {
            Ok(self
                .facts
                .borrow()
                .get(&window)
                .and_then(|facts| facts.geometry)
                .unwrap_or_else(|| Region::new(10, 10, 300, 200)))
        }

        fn get_window_name(
            &self,
            window: XWindow,
        ) -> String {
            format!("window-{}", window)
        }

        fn get_window_size_hints(
            &self,
            window: XWindow,
        ) -> Option<SizeHints> {
            self.facts
                .borrow()
                .get(&window)
                .and_then(|facts| facts.size_hints)
        }

        fn get_window_hints(
            &self,
            window: XWindow,
        ) -> Option<Hints> {
            self.facts.borrow().get(&window).and_then(|facts| facts.hints)
        }

        fn get_window_transient_for(
            &self,
            window: XWindow,
        ) -> Option<XWindow> {
            self.facts
                .borrow()
                .get(&window)
                .and_then(|facts| facts.transient_for)
        }

        fn window_supports_delete(
            &self,
            window: XWindow,
        ) -> bool {
            self.facts
                .borrow()
                .get(&window)
                .map_or(false, |facts| facts.supports_delete)
        }

        fn window_is_override_redirect(
            &self,
            window: XWindow,
        ) -> bool {
            self.facts
                .borrow()
                .get(&window)
                .map_or(false, |facts| facts.override_redirect)
        }

        fn set_window_fullscreen(
            &self,
            _window: XWindow,
            _on: bool,
        ) {
        }

        fn set_icccm_window_state(
            &self,
            _window: XWindow,
            _state: IcccmWindowState,
        ) {
        }
    }

    fn monitor_screen() -> Screen {
        Screen::new(Region::new(0, 0, 1920, 1080), 0, 1)
    }

    fn configuration() -> Configuration {
        let mut configuration = Configuration::default();
        merge_default_key_bindings(&mut configuration);
        merge_default_button_bindings(&mut configuration);

        configuration
    }

    fn key_event(
        modifiers: u16,
        keysym: Keysym,
    ) -> Event {
        Event::Key {
            event: KeyEvent {
                modifiers,
                keysym,
                press: true,
            },
        }
    }

    #[test]
    fn first_window_fills_the_whole_monitor() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });

            assert_eq!(model.focused_window(), Some(0x1));
        }

        assert_eq!(conn.placement(0x1), Some(Region::new(0, 0, 1920, 1080)));
        assert_eq!(conn.mapped.borrow().get(&0x1), Some(&true));
    }

    #[test]
    fn split_then_map_yields_side_by_side_leaves() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(0x2, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model
                .do_action(&Action::new(ActionCode::SplitVertically), None)
                .unwrap();
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });
        }

        assert_eq!(conn.placement(0x1), Some(Region::new(0, 0, 960, 1080)));
        assert_eq!(conn.placement(0x2), Some(Region::new(960, 0, 960, 1080)));
    }

    #[test]
    fn resize_by_action_moves_the_shared_edge() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(0x2, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model
                .do_action(&Action::new(ActionCode::SplitVertically), None)
                .unwrap();
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            // back to the left leaf
            model.do_action(&Action::new(ActionCode::FocusLeft), None).unwrap();
            model
                .do_action(
                    &Action::with_quad(ActionCode::ResizeBy, [0, 0, -100, 0]),
                    None,
                )
                .unwrap();
        }

        assert_eq!(conn.placement(0x1), Some(Region::new(0, 0, 860, 1080)));
        assert_eq!(conn.placement(0x2), Some(Region::new(860, 0, 1060, 1080)));
    }

    #[test]
    fn exchange_swaps_window_rectangles() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(0x2, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model
                .do_action(&Action::new(ActionCode::SplitVertically), None)
                .unwrap();
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            model.do_action(&Action::new(ActionCode::FocusLeft), None).unwrap();
            model
                .do_action(&Action::new(ActionCode::ExchangeRight), None)
                .unwrap();
        }

        assert_eq!(conn.placement(0x1), Some(Region::new(960, 0, 960, 1080)));
        assert_eq!(conn.placement(0x2), Some(Region::new(0, 0, 960, 1080)));
    }

    #[test]
    fn destroyed_sibling_collapses_the_split_when_voids_are_removed() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(0x2, WindowFacts::default());

        let mut config = configuration();
        config.tiling.auto_remove_void = true;

        {
            let mut model = Model::new(&mut conn, config);
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model
                .do_action(&Action::new(ActionCode::SplitVertically), None)
                .unwrap();
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            model.handle_event(Event::Destroy {
                window: 0x1,
            });

            let tree = model.monitors().focused_monitor().tree();
            assert_eq!(tree.leaves().len(), 1);
            assert!(model.registry().window(0x1).is_none());
        }

        assert_eq!(conn.placement(0x2), Some(Region::new(0, 0, 1920, 1080)));
    }

    #[test]
    fn super_shift_r_triggers_a_reload() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);

        {
            let mut model = Model::new(&mut conn, configuration());

            // lock-state modifiers are masked out before the lookup
            let modifiers =
                u16::from(ModMask::M4 | ModMask::SHIFT | ModMask::LOCK | ModMask::M2);
            model.handle_event(key_event(modifiers, keysyms::XK_R));
        }

        // one grab round at startup, exactly one more for the reload
        assert_eq!(conn.ungrab_rounds.get(), 2);
    }

    #[test]
    fn identical_event_sequences_produce_identical_layouts() {
        let drive = |conn: &mut TestConnection| -> Vec<(XWindow, Region)> {
            conn.add_window(0x1, WindowFacts::default());
            conn.add_window(0x2, WindowFacts::default());
            conn.add_window(0x3, WindowFacts::default());

            let mut model = Model::new(conn, configuration());

            for event in [
                Event::MapRequest {
                    window: 0x1,
                },
                key_event(u16::from(ModMask::M4), keysyms::XK_V),
                Event::MapRequest {
                    window: 0x2,
                },
                key_event(u16::from(ModMask::M4), keysyms::XK_S),
                Event::MapRequest {
                    window: 0x3,
                },
                key_event(u16::from(ModMask::M4), keysyms::XK_H),
                key_event(
                    u16::from(ModMask::M4 | ModMask::SHIFT),
                    keysyms::XK_L,
                ),
            ] {
                model.handle_event(event);
            }

            let mut placements: Vec<(XWindow, Region)> = model
                .registry()
                .iter()
                .map(|record| (record.window(), record.geometry()))
                .collect();
            placements.sort_by_key(|&(window, _)| window);

            placements
        };

        let mut first = TestConnection::new(vec![monitor_screen()]);
        let mut second = TestConnection::new(vec![monitor_screen()]);

        assert_eq!(drive(&mut first), drive(&mut second));
    }

    #[test]
    fn transient_windows_come_up_as_popups() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(
            0x2,
            WindowFacts {
                transient_for: Some(0x1),
                geometry: Some(Region::new(400, 300, 320, 240)),
                ..Default::default()
            },
        );

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            let record = model.registry().window(0x2).unwrap();
            assert_eq!(record.state(), WindowState::Popup);
            assert_eq!(record.frame(), None);
            assert_eq!(record.geometry(), Region::new(400, 300, 320, 240));

            // the tiling window keeps the whole monitor
            let tree = model.monitors().focused_monitor().tree();
            assert_eq!(tree.leaves().len(), 1);
        }

        // the popup sat where it asked to be, so no configure was sent
        assert_eq!(conn.placement(0x2), None);
        assert_eq!(conn.mapped.borrow().get(&0x2), Some(&true));
    }

    #[test]
    fn popup_drag_translates_and_escape_restores() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(
            0x2,
            WindowFacts {
                transient_for: Some(0x1),
                geometry: Some(Region::new(400, 300, 320, 240)),
                ..Default::default()
            },
        );

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            // Super+Button3 starts the move
            model.handle_event(Event::Button {
                event: ButtonEvent {
                    modifiers: u16::from(ModMask::M4),
                    button: 3,
                    press: true,
                    root_pos: Pos {
                        x: 500,
                        y: 400,
                    },
                    child: Some(0x2),
                },
            });

            model.handle_event(Event::Motion {
                root_pos: Pos {
                    x: 550,
                    y: 430,
                },
            });

            let record = model.registry().window(0x2).unwrap();
            assert_eq!(record.geometry(), Region::new(450, 330, 320, 240));

            // Escape puts the drag back where it started
            model.handle_event(key_event(0, keysyms::XK_ESCAPE));

            let record = model.registry().window(0x2).unwrap();
            assert_eq!(record.geometry(), Region::new(400, 300, 320, 240));
        }

        assert!(!conn.pointer_grabbed.get());
        assert_eq!(conn.placement(0x2), Some(Region::new(400, 300, 320, 240)));
    }

    #[test]
    fn configure_requests_cannot_move_tiling_windows() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });

            model.handle_event(Event::ConfigureRequest {
                window: 0x1,
                pos: Some(Pos {
                    x: 50,
                    y: 50,
                }),
                dim: Some(Dim {
                    w: 640,
                    h: 480,
                }),
                border_width: None,
            });
        }

        // the tiling geometry was re-sent instead
        assert_eq!(conn.placement(0x1), Some(Region::new(0, 0, 1920, 1080)));
    }

    #[test]
    fn configure_requests_move_popups_and_respect_hints() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(
            0x2,
            WindowFacts {
                transient_for: Some(0x1),
                geometry: Some(Region::new(0, 0, 320, 240)),
                size_hints: Some(SizeHints {
                    pos: None,
                    min_width: Some(200),
                    min_height: Some(100),
                    max_width: Some(400),
                    max_height: Some(300),
                    base_width: None,
                    base_height: None,
                    inc_width: None,
                    inc_height: None,
                    min_ratio: None,
                    max_ratio: None,
                }),
                ..Default::default()
            },
        );

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            model.handle_event(Event::ConfigureRequest {
                window: 0x2,
                pos: Some(Pos {
                    x: 700,
                    y: 500,
                }),
                dim: Some(Dim {
                    w: 1000,
                    h: 50,
                }),
                border_width: None,
            });
        }

        // the position is honored, the size clamps to the hints
        assert_eq!(conn.placement(0x2), Some(Region::new(700, 500, 400, 100)));
    }

    #[test]
    fn hidden_windows_restore_their_previous_state_on_remap() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });

            model
                .do_action(&Action::new(ActionCode::MinimizeWindow), None)
                .unwrap();

            let record = model.registry().window(0x1).unwrap();
            assert_eq!(record.state(), WindowState::Hidden);
            assert!(!record.is_mapped());

            model.handle_event(Event::MapRequest {
                window: 0x1,
            });

            let record = model.registry().window(0x1).unwrap();
            assert_eq!(record.state(), WindowState::Tiling);
            assert!(record.is_mapped());
        }

        assert_eq!(conn.mapped.borrow().get(&0x1), Some(&true));
    }

    #[test]
    fn close_prefers_the_delete_protocol() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(
            0x1,
            WindowFacts {
                supports_delete: true,
                ..Default::default()
            },
        );
        conn.add_window(0x2, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model
                .do_action(&Action::new(ActionCode::CloseWindow), None)
                .unwrap();

            model.handle_event(Event::MapRequest {
                window: 0x2,
            });
            model
                .do_action(&Action::new(ActionCode::CloseWindow), None)
                .unwrap();
        }

        assert_eq!(*conn.closed.borrow(), vec![0x1]);
        assert_eq!(*conn.killed.borrow(), vec![0x2]);
    }

    #[test]
    fn fullscreen_toggle_raises_to_the_monitor_rectangle_and_back() {
        let mut conn = TestConnection::new(vec![monitor_screen()]);
        conn.add_window(0x1, WindowFacts::default());
        conn.add_window(0x2, WindowFacts::default());

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });
            model
                .do_action(&Action::new(ActionCode::SplitVertically), None)
                .unwrap();
            model.handle_event(Event::MapRequest {
                window: 0x2,
            });

            model
                .do_action(&Action::new(ActionCode::ToggleFullscreen), None)
                .unwrap();

            let record = model.registry().window(0x2).unwrap();
            assert_eq!(record.state(), WindowState::Fullscreen);
            assert_eq!(record.geometry(), Region::new(0, 0, 1920, 1080));

            model
                .do_action(&Action::new(ActionCode::ToggleFullscreen), None)
                .unwrap();

            let record = model.registry().window(0x2).unwrap();
            assert_eq!(record.state(), WindowState::Tiling);
            assert_eq!(record.geometry(), Region::new(960, 0, 960, 1080));
        }
    }

    #[test]
    fn vanished_monitors_migrate_their_windows_to_the_primary() {
        let second_screen = Screen::new(Region::new(1920, 0, 1280, 1024), 1, 2);

        let mut conn = TestConnection::new(vec![monitor_screen(), second_screen]);
        conn.add_window(0x1, WindowFacts::default());

        let outputs = Rc::clone(&conn.outputs);

        {
            let mut model = Model::new(&mut conn, configuration());
            model.handle_event(Event::MapRequest {
                window: 0x1,
            });

            // the output carrying the window disappears
            *outputs.borrow_mut() = vec![second_screen];
            model.handle_event(Event::ScreenChange);

            assert_eq!(model.monitors().len(), 1);

            let record = model.registry().window(0x1).unwrap();
            assert!(record.frame().is_some());
            assert_eq!(record.geometry(), Region::new(1920, 0, 1280, 1024));
        }
    }
}

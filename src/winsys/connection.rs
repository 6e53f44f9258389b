use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::hints::Hints;
use crate::hints::SizeHints;
use crate::input::Button;
use crate::input::Keysym;
use crate::screen::Screen;
use crate::window::IcccmWindowState;
use crate::window::Window;
use crate::Result;

/// The seam between the manager and the display server. One
/// implementation speaks X11 through x11rb; tests substitute a
/// recording double.
pub trait Connection {
    fn flush(&self) -> bool;
    fn step(&self) -> Option<Event>;
    fn connected_outputs(&self) -> Vec<Screen>;
    fn top_level_windows(&self) -> Vec<Window>;
    fn get_pointer_position(&self) -> Pos;
    fn grab_pointer(&self) -> bool;
    fn ungrab_pointer(&self);
    fn cleanup(&self);

    // input bindings
    fn grab_key(
        &self,
        modifiers: u16,
        keysym: Keysym,
    );
    fn grab_button(
        &self,
        modifiers: u16,
        button: Button,
    );
    fn ungrab_bindings(&self);

    // window manipulation
    fn init_window(
        &self,
        window: Window,
    );
    fn map_window(
        &self,
        window: Window,
    );
    fn unmap_window(
        &self,
        window: Window,
    );
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    );
    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    );
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn unfocus(&self);
    fn raise_window(
        &self,
        window: Window,
    );
    fn close_window(
        &self,
        window: Window,
    ) -> bool;
    fn kill_window(
        &self,
        window: Window,
    ) -> bool;

    // properties
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region>;
    fn get_window_name(
        &self,
        window: Window,
    ) -> String;
    fn get_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints>;
    fn get_window_hints(
        &self,
        window: Window,
    ) -> Option<Hints>;
    fn get_window_transient_for(
        &self,
        window: Window,
    ) -> Option<Window>;
    fn window_supports_delete(
        &self,
        window: Window,
    ) -> bool;
    fn window_is_override_redirect(
        &self,
        window: Window,
    ) -> bool;
    fn set_window_fullscreen(
        &self,
        window: Window,
        on: bool,
    );
    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    );
}

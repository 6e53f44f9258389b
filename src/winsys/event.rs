pub use crate::Result;

use crate::geometry::Dim;
use crate::geometry::Pos;
use crate::input::ButtonEvent;
use crate::input::KeyEvent;
use crate::window::Window;

/* Events come in two flavors. A REQUEST has not happened yet; the
 * server redirects it here and nothing happens until the manager acts.
 * A NOTIFICATION reports something that already happened; all that is
 * left to do is to take note of it. */

#[derive(Debug, Clone)]
pub enum Event {
    Key {
        event: KeyEvent,
    },
    Button {
        event: ButtonEvent,
    },
    Motion {
        root_pos: Pos,
    },
    MapRequest {
        window: Window,
    },
    ConfigureRequest {
        window: Window,
        pos: Option<Pos>,
        dim: Option<Dim>,
        border_width: Option<u32>,
    },
    Unmap {
        window: Window,
    },
    Destroy {
        window: Window,
    },
    Property {
        window: Window,
        kind: PropertyKind,
    },
    FullscreenRequest {
        window: Window,
        action: ToggleAction,
    },
    ScreenChange,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum ToggleAction {
    Toggle,
    Add,
    Remove,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq)]
pub enum PropertyKind {
    Name,
    SizeHints,
    WmHints,
    Protocols,
    TransientFor,
}

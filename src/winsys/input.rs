use crate::geometry::Pos;
use crate::window::Window;

/// An X key symbol, as assigned by the keyboard mapping.
pub type Keysym = u32;

/// A core pointer button index.
pub type Button = u8;

/// The key symbols referenced by the default bindings. Latin-1 symbols
/// share their code point with ASCII.
pub mod keysyms {
    use super::Keysym;

    pub const XK_SPACE: Keysym = 0x0020;
    pub const XK_PLUS: Keysym = 0x002b;
    pub const XK_MINUS: Keysym = 0x002d;
    pub const XK_EQUAL: Keysym = 0x003d;
    pub const XK_A: Keysym = 0x0061;
    pub const XK_B: Keysym = 0x0062;
    pub const XK_E: Keysym = 0x0065;
    pub const XK_F: Keysym = 0x0066;
    pub const XK_H: Keysym = 0x0068;
    pub const XK_J: Keysym = 0x006a;
    pub const XK_K: Keysym = 0x006b;
    pub const XK_L: Keysym = 0x006c;
    pub const XK_N: Keysym = 0x006e;
    pub const XK_P: Keysym = 0x0070;
    pub const XK_Q: Keysym = 0x0071;
    pub const XK_R: Keysym = 0x0072;
    pub const XK_S: Keysym = 0x0073;
    pub const XK_V: Keysym = 0x0076;
    pub const XK_W: Keysym = 0x0077;
    pub const XK_RETURN: Keysym = 0xff0d;
    pub const XK_ESCAPE: Keysym = 0xff1b;
    pub const XK_LEFT: Keysym = 0xff51;
    pub const XK_UP: Keysym = 0xff52;
    pub const XK_RIGHT: Keysym = 0xff53;
    pub const XK_DOWN: Keysym = 0xff54;
}

/// A decoded key press or release, with the state mask as delivered by
/// the server and the level-0 symbol of the pressed keycode.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct KeyEvent {
    pub modifiers: u16,
    pub keysym: Keysym,
    pub press: bool,
}

/// A decoded pointer button press or release on the root window.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct ButtonEvent {
    pub modifiers: u16,
    pub button: Button,
    pub press: bool,
    pub root_pos: Pos,
    pub child: Option<Window>,
}

/// Every submask of @mask, the empty mask included. Used to grab a
/// binding once per combination of ignored modifiers.
pub fn mask_subsets(mask: u16) -> Vec<u16> {
    let mut subsets = vec![0u16];

    for bit in (0..u16::BITS).map(|i| 1u16 << i) {
        if mask & bit != 0 {
            for i in 0..subsets.len() {
                let subset = subsets[i];
                subsets.push(subset | bit);
            }
        }
    }

    subsets
}

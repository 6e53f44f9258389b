use crate::action::Action;
use crate::action::ActionCode;
use crate::config::Configuration;

use winsys::connection::Connection;
use winsys::input::keysyms::*;
use winsys::input::mask_subsets;
use winsys::input::Button;
use winsys::input::Keysym;

use serde::Deserialize;
use serde::Serialize;

use x11rb::protocol::xproto::ModMask;

/// The binding fires on release instead of press.
pub const BINDING_FLAG_RELEASE: u16 = 1 << 0;

/// A grabbed key combination and the actions it triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBinding {
    #[serde(default)]
    pub modifiers: u16,
    #[serde(default)]
    pub flags: u16,
    pub keysym: Keysym,
    pub actions: Vec<Action>,
}

/// A grabbed pointer button and the actions it triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonBinding {
    #[serde(default)]
    pub modifiers: u16,
    #[serde(default)]
    pub flags: u16,
    pub index: Button,
    pub actions: Vec<Action>,
}

pub fn find_key_binding(
    keys: &[KeyBinding],
    modifiers: u16,
    keysym: Keysym,
    flags: u16,
) -> Option<&KeyBinding> {
    keys.iter().find(|binding| {
        binding.modifiers == modifiers && binding.keysym == keysym && binding.flags == flags
    })
}

pub fn find_button_binding(
    buttons: &[ButtonBinding],
    modifiers: u16,
    index: Button,
    flags: u16,
) -> Option<&ButtonBinding> {
    buttons.iter().find(|binding| {
        binding.modifiers == modifiers && binding.index == index && binding.flags == flags
    })
}

/// The stock keybindings, relative to the configured main modifier.
fn default_key_bindings() -> Vec<(u16, u16, Keysym, Action)> {
    let shift = u16::from(ModMask::SHIFT);
    let control = u16::from(ModMask::CONTROL);

    vec![
        // reload the configuration
        (shift, 0, XK_R, Action::new(ActionCode::ReloadConfiguration)),
        // move the focus to a child or parent frame
        (0, 0, XK_A, Action::new(ActionCode::ParentFrame)),
        (0, 0, XK_B, Action::new(ActionCode::ChildFrame)),
        (shift, 0, XK_A, Action::new(ActionCode::RootFrame)),
        // close the active window
        (0, 0, XK_Q, Action::new(ActionCode::CloseWindow)),
        // minimize the active window
        (0, 0, XK_MINUS, Action::new(ActionCode::MinimizeWindow)),
        // go to the next window in the tiling
        (0, 0, XK_N, Action::new(ActionCode::NextWindow)),
        (0, 0, XK_P, Action::new(ActionCode::PreviousWindow)),
        // remove the current tiling frame
        (0, 0, XK_R, Action::new(ActionCode::RemoveFrame)),
        // toggle between tiling and the previous mode
        (shift, 0, XK_SPACE, Action::new(ActionCode::ToggleTiling)),
        // toggle between fullscreen and the previous mode
        (0, 0, XK_F, Action::new(ActionCode::ToggleFullscreen)),
        // focus from tiling to non tiling and vice versa
        (0, 0, XK_SPACE, Action::new(ActionCode::ToggleFocus)),
        // split a frame
        (0, 0, XK_V, Action::new(ActionCode::SplitHorizontally)),
        (0, 0, XK_S, Action::new(ActionCode::SplitVertically)),
        // move between frames
        (0, 0, XK_K, Action::new(ActionCode::FocusUp)),
        (0, 0, XK_H, Action::new(ActionCode::FocusLeft)),
        (0, 0, XK_L, Action::new(ActionCode::FocusRight)),
        (0, 0, XK_J, Action::new(ActionCode::FocusDown)),
        // exchange frames
        (shift, 0, XK_K, Action::new(ActionCode::ExchangeUp)),
        (shift, 0, XK_H, Action::new(ActionCode::ExchangeLeft)),
        (shift, 0, XK_L, Action::new(ActionCode::ExchangeRight)),
        (shift, 0, XK_J, Action::new(ActionCode::ExchangeDown)),
        // resizing the top/left edges of a window
        (
            control,
            0,
            XK_LEFT,
            Action::with_quad(ActionCode::ResizeBy, [20, 0, 0, 0]),
        ),
        (
            control,
            0,
            XK_UP,
            Action::with_quad(ActionCode::ResizeBy, [0, 20, 0, 0]),
        ),
        (
            control,
            0,
            XK_RIGHT,
            Action::with_quad(ActionCode::ResizeBy, [-20, 0, 0, 0]),
        ),
        (
            control,
            0,
            XK_DOWN,
            Action::with_quad(ActionCode::ResizeBy, [0, -20, 0, 0]),
        ),
        // resizing the bottom/right edges of a window
        (
            shift,
            0,
            XK_LEFT,
            Action::with_quad(ActionCode::ResizeBy, [0, 0, -20, 0]),
        ),
        (
            shift,
            0,
            XK_UP,
            Action::with_quad(ActionCode::ResizeBy, [0, 0, 0, -20]),
        ),
        (
            shift,
            0,
            XK_RIGHT,
            Action::with_quad(ActionCode::ResizeBy, [0, 0, 20, 0]),
        ),
        (
            shift,
            0,
            XK_DOWN,
            Action::with_quad(ActionCode::ResizeBy, [0, 0, 0, 20]),
        ),
        // move a window
        (
            0,
            0,
            XK_LEFT,
            Action::with_quad(ActionCode::ResizeBy, [20, 0, -20, 0]),
        ),
        (
            0,
            0,
            XK_UP,
            Action::with_quad(ActionCode::ResizeBy, [0, 20, 0, -20]),
        ),
        (
            0,
            0,
            XK_RIGHT,
            Action::with_quad(ActionCode::ResizeBy, [-20, 0, 20, 0]),
        ),
        (
            0,
            0,
            XK_DOWN,
            Action::with_quad(ActionCode::ResizeBy, [0, -20, 0, 20]),
        ),
        // inflate/deflate a window
        (
            control,
            0,
            XK_PLUS,
            Action::with_quad(ActionCode::ResizeBy, [10, 10, 10, 10]),
        ),
        (
            control,
            0,
            XK_MINUS,
            Action::with_quad(ActionCode::ResizeBy, [-10, -10, -10, -10]),
        ),
        (
            control,
            0,
            XK_EQUAL,
            Action::with_quad(ActionCode::ResizeBy, [10, 10, 10, 10]),
        ),
        // show the interactive window list
        (0, 0, XK_W, Action::new(ActionCode::ShowWindowList)),
        // run the terminal or xterm as fall back
        (
            0,
            0,
            XK_RETURN,
            Action::with_string(
                ActionCode::Run,
                "[ -n \"$TERMINAL\" ] && exec \"$TERMINAL\" || exec xterm",
            ),
        ),
        // quit fensterchef
        (control | shift, 0, XK_E, Action::new(ActionCode::Quit)),
    ]
}

/// The stock mousebindings, relative to the configured main modifier.
fn default_button_bindings() -> Vec<(u16, u16, Button, Action)> {
    vec![
        // start moving or resizing a window (depends on the mouse position)
        (0, 0, 1, Action::new(ActionCode::InitiateResize)),
        // minimize (hide) a window
        (0, 0, 2, Action::new(ActionCode::MinimizeWindow)),
        // start moving a window
        (0, 0, 3, Action::new(ActionCode::InitiateMove)),
    ]
}

/// Put the stock keybindings into @configuration without overwriting
/// any user keybinding. User bindings keep their position; defaults are
/// appended in table order.
pub fn merge_default_key_bindings(configuration: &mut Configuration) {
    let section_modifiers = configuration.keyboard.modifiers;

    for (modifiers, flags, keysym, action) in default_key_bindings() {
        let modifiers = modifiers | section_modifiers;

        if find_key_binding(&configuration.keyboard.keys, modifiers, keysym, flags).is_some() {
            continue;
        }

        configuration.keyboard.keys.push(KeyBinding {
            modifiers,
            flags,
            keysym,
            actions: vec![action],
        });
    }
}

/// Put the stock mousebindings into @configuration without overwriting
/// any user mousebinding.
pub fn merge_default_button_bindings(configuration: &mut Configuration) {
    let section_modifiers = configuration.mouse.modifiers;

    for (modifiers, flags, index, action) in default_button_bindings() {
        let modifiers = modifiers | section_modifiers;

        if find_button_binding(&configuration.mouse.buttons, modifiers, index, flags).is_some() {
            continue;
        }

        configuration.mouse.buttons.push(ButtonBinding {
            modifiers,
            flags,
            index,
            actions: vec![action],
        });
    }
}

/// Grab every configured trigger on the root window, once per
/// combination with a subset of the ignored modifiers, so that lock
/// state never suppresses a binding.
pub fn grab_bindings(
    conn: &dyn Connection,
    configuration: &Configuration,
) {
    conn.ungrab_bindings();

    for binding in &configuration.keyboard.keys {
        for subset in mask_subsets(configuration.keyboard.ignore_modifiers) {
            conn.grab_key(binding.modifiers | subset, binding.keysym);
        }
    }

    for binding in &configuration.mouse.buttons {
        for subset in mask_subsets(configuration.mouse.ignore_modifiers) {
            conn.grab_button(binding.modifiers | subset, binding.index);
        }
    }

    conn.flush();
}

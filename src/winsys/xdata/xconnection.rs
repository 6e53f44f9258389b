use crate::connection::Connection;
use crate::event::Event;
use crate::event::PropertyKind;
use crate::event::ToggleAction;
use crate::geometry::Dim;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::hints::Hints;
use crate::hints::SizeHints;
use crate::input::Button;
use crate::input::ButtonEvent;
use crate::input::KeyEvent;
use crate::input::Keysym;
use crate::screen::Screen;
use crate::window::IcccmWindowState;
use crate::window::Window;
use crate::Result;

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::TryFrom;

use x11rb::connection;
use x11rb::cursor::Handle as CursorHandle;
use x11rb::errors::ReplyError;
use x11rb::properties;
use x11rb::protocol::randr;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;
use x11rb::resource_manager::new_from_default;
use x11rb::resource_manager::Database;
use x11rb::wrapper::ConnectionExt as _;

use anyhow::anyhow;
use log::warn;

type Atom = u32;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        ATOM,
        CARDINAL,
        WINDOW,
        UTF8_STRING,

        // ICCCM client properties
        WM_NAME,
        WM_CLASS,
        WM_PROTOCOLS,
        WM_NORMAL_HINTS,
        WM_HINTS,
        WM_DELETE_WINDOW,
        WM_TRANSIENT_FOR,

        // ICCCM window manager properties
        WM_STATE,

        // EWMH root properties
        _NET_SUPPORTED,
        _NET_SUPPORTING_WM_CHECK,
        _NET_ACTIVE_WINDOW,

        // EWMH application properties
        _NET_WM_NAME,
        _NET_WM_STATE,
        _NET_WM_STATE_FULLSCREEN,
    }
}

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    atoms: Atoms,
    screen: xproto::Screen,
    check_window: Window,
    database: Option<Database>,
    keysyms: RefCell<HashMap<u8, Keysym>>,
    keycodes: RefCell<HashMap<Keysym, Vec<u8>>>,
    pointer_grabbed: Cell<bool>,
    root_event_mask: EventMask,
    window_event_mask: EventMask,
    drag_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    pub fn new(
        conn: &'conn Conn,
        screen_num: usize,
    ) -> Result<Self> {
        let screen = conn.setup().roots[screen_num].clone();
        let root = screen.root;

        let root_event_mask: EventMask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::PROPERTY_CHANGE;

        let window_event_mask: EventMask =
            EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY;

        let drag_event_mask: EventMask =
            EventMask::BUTTON_RELEASE | EventMask::BUTTON_MOTION | EventMask::POINTER_MOTION;

        let aux = xproto::ChangeWindowAttributesAux::default().event_mask(root_event_mask);

        let res = conn.change_window_attributes(root, &aux)?.check();
        if let Err(ReplyError::X11Error(err)) = res {
            if err.error_kind == ErrorKind::Access {
                return Err(anyhow!("another window manager is already running"));
            } else {
                return Err(anyhow!("unable to set up window manager"));
            }
        }

        let atoms = Atoms::new(conn)?.reply()?;
        let check_window = conn.generate_id()?;

        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check_window,
            root,
            -1,
            -1,
            1,
            1,
            0,
            xproto::WindowClass::INPUT_ONLY,
            x11rb::COPY_FROM_PARENT,
            &xproto::CreateWindowAux::default().override_redirect(1),
        )?;

        randr::select_input(conn, root, randr::NotifyMask::SCREEN_CHANGE)?;

        let database = new_from_default(conn).ok();
        if let Some(ref database) = database {
            drop(CursorHandle::new(conn, screen_num, database).map(|cookie| {
                cookie.reply().map(|reply| {
                    let aux = xproto::ChangeWindowAttributesAux::default()
                        .cursor(reply.load_cursor(conn, "left_ptr").ok());

                    drop(conn.change_window_attributes(root, &aux));
                })
            }));
        }

        let connection = Self {
            conn,
            atoms,
            screen,
            check_window,
            database,
            keysyms: RefCell::new(HashMap::new()),
            keycodes: RefCell::new(HashMap::new()),
            pointer_grabbed: Cell::new(false),
            root_event_mask,
            window_event_mask,
            drag_event_mask,
        };

        connection.init_keyboard_mapping()?;
        connection.init_wm_properties();

        Ok(connection)
    }

    /// Mirror the level-0 column of the server keyboard mapping in both
    /// directions, keycode to symbol and symbol to keycodes.
    fn init_keyboard_mapping(&self) -> Result<()> {
        let setup = self.conn.setup();
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;

        let reply = self
            .conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
            .reply()?;

        let keysyms_per_keycode = reply.keysyms_per_keycode as usize;

        let mut keysyms = self.keysyms.borrow_mut();
        let mut keycodes = self.keycodes.borrow_mut();

        keysyms.clear();
        keycodes.clear();

        for (i, symbols) in reply.keysyms.chunks(keysyms_per_keycode).enumerate() {
            let keycode = min_keycode + i as u8;
            let keysym = symbols[0];

            if keysym == 0 {
                continue;
            }

            keysyms.insert(keycode, keysym);
            keycodes.entry(keysym).or_insert_with(Vec::new).push(keycode);
        }

        Ok(())
    }

    fn init_wm_properties(&self) {
        let wm_name = "fensterchef";

        drop(self.conn.change_property8(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            wm_name.as_bytes(),
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms.WINDOW,
            &[self.check_window],
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.check_window,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            self.atoms.WINDOW,
            &[self.check_window],
        ));

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_SUPPORTED,
            self.atoms.ATOM,
            &[
                self.atoms._NET_SUPPORTING_WM_CHECK,
                self.atoms._NET_ACTIVE_WINDOW,
                self.atoms._NET_WM_NAME,
                self.atoms._NET_WM_STATE,
                self.atoms._NET_WM_STATE_FULLSCREEN,
            ],
        ));
    }

    fn keysym_of(
        &self,
        keycode: u8,
    ) -> Keysym {
        self.keysyms.borrow().get(&keycode).copied().unwrap_or(0)
    }

    fn get_property32(
        &self,
        window: Window,
        property: Atom,
        property_type: Atom,
    ) -> Option<Vec<u32>> {
        self.conn
            .get_property(false, window, property, property_type, 0, std::u32::MAX)
            .ok()?
            .reply()
            .ok()
            .and_then(|reply| Some(reply.value32()?.collect()))
    }

    fn window_has_any_of_protocols(
        &self,
        window: Window,
        protocols: &[Atom],
    ) -> bool {
        self.get_property32(window, self.atoms.WM_PROTOCOLS, self.atoms.ATOM)
            .map_or(false, |value| {
                value.iter().any(|protocol| protocols.contains(protocol))
            })
    }

    fn send_protocol_client_message(
        &self,
        window: Window,
        atom: Atom,
    ) -> Result<()> {
        let event = xproto::ClientMessageEvent::new(
            32,
            window,
            self.atoms.WM_PROTOCOLS,
            [atom, x11rb::CURRENT_TIME, 0, 0, 0],
        );

        self.conn
            .send_event(false, window, EventMask::NO_EVENT, event)?;

        Ok(())
    }

    #[inline]
    fn on_key_press(
        &self,
        event: &xproto::KeyPressEvent,
        press: bool,
    ) -> Option<Event> {
        Some(Event::Key {
            event: KeyEvent {
                modifiers: u16::from(event.state),
                keysym: self.keysym_of(event.detail),
                press,
            },
        })
    }

    #[inline]
    fn on_button_press(
        &self,
        event: &xproto::ButtonPressEvent,
        press: bool,
    ) -> Option<Event> {
        Some(Event::Button {
            event: ButtonEvent {
                modifiers: u16::from(event.state),
                button: event.detail,
                press,
                root_pos: Pos {
                    x: event.root_x as i32,
                    y: event.root_y as i32,
                },
                child: if event.child != x11rb::NONE {
                    Some(event.child)
                } else {
                    None
                },
            },
        })
    }

    #[inline]
    fn on_motion_notify(
        &self,
        event: &xproto::MotionNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Motion {
            root_pos: Pos {
                x: event.root_x as i32,
                y: event.root_y as i32,
            },
        })
    }

    #[inline]
    fn on_map_request(
        &self,
        event: &xproto::MapRequestEvent,
    ) -> Option<Event> {
        Some(Event::MapRequest {
            window: event.window,
        })
    }

    #[inline]
    fn on_unmap_notify(
        &self,
        event: &xproto::UnmapNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Unmap {
            window: event.window,
        })
    }

    #[inline]
    fn on_destroy_notify(
        &self,
        event: &xproto::DestroyNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Destroy {
            window: event.window,
        })
    }

    #[inline]
    fn on_configure_request(
        &self,
        event: &xproto::ConfigureRequestEvent,
    ) -> Option<Event> {
        let value_mask = u16::from(event.value_mask);

        let mut x = None;
        let mut y = None;
        let mut w = None;
        let mut h = None;
        let mut border_width = None;

        if value_mask & u16::from(xproto::ConfigWindow::X) != 0 {
            x = Some(event.x as i32);
        }

        if value_mask & u16::from(xproto::ConfigWindow::Y) != 0 {
            y = Some(event.y as i32);
        }

        if value_mask & u16::from(xproto::ConfigWindow::WIDTH) != 0 {
            w = Some(event.width as i32);
        }

        if value_mask & u16::from(xproto::ConfigWindow::HEIGHT) != 0 {
            h = Some(event.height as i32);
        }

        if value_mask & u16::from(xproto::ConfigWindow::BORDER_WIDTH) != 0 {
            border_width = Some(event.border_width as u32);
        }

        let geometry = self.get_window_geometry(event.window).ok()?;

        let pos = match (x, y) {
            (None, None) => None,
            _ => Some(Pos {
                x: x.unwrap_or(geometry.pos.x),
                y: y.unwrap_or(geometry.pos.y),
            }),
        };

        let dim = match (w, h) {
            (None, None) => None,
            _ => Some(Dim {
                w: w.unwrap_or(geometry.dim.w),
                h: h.unwrap_or(geometry.dim.h),
            }),
        };

        Some(Event::ConfigureRequest {
            window: event.window,
            pos,
            dim,
            border_width,
        })
    }

    #[inline]
    fn on_property_notify(
        &self,
        event: &xproto::PropertyNotifyEvent,
    ) -> Option<Event> {
        let kind = if event.atom == self.atoms.WM_NAME || event.atom == self.atoms._NET_WM_NAME {
            PropertyKind::Name
        } else if event.atom == self.atoms.WM_NORMAL_HINTS {
            PropertyKind::SizeHints
        } else if event.atom == self.atoms.WM_HINTS {
            PropertyKind::WmHints
        } else if event.atom == self.atoms.WM_PROTOCOLS {
            PropertyKind::Protocols
        } else if event.atom == self.atoms.WM_TRANSIENT_FOR {
            PropertyKind::TransientFor
        } else {
            return None;
        };

        Some(Event::Property {
            window: event.window,
            kind,
        })
    }

    #[inline]
    fn on_client_message(
        &self,
        event: &xproto::ClientMessageEvent,
    ) -> Option<Event> {
        if event.type_ != self.atoms._NET_WM_STATE || event.format != 32 {
            return None;
        }

        let data = event.data.as_data32();

        if data[1] != self.atoms._NET_WM_STATE_FULLSCREEN
            && data[2] != self.atoms._NET_WM_STATE_FULLSCREEN
        {
            return None;
        }

        Some(Event::FullscreenRequest {
            window: event.window,
            action: match data[0] {
                0 => ToggleAction::Remove,
                1 => ToggleAction::Add,
                2 => ToggleAction::Toggle,
                _ => return None,
            },
        })
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    #[inline]
    fn step(&self) -> Option<Event> {
        self.conn
            .wait_for_event()
            .ok()
            .and_then(|event| match event {
                XEvent::KeyPress(e) => self.on_key_press(&e, true),
                XEvent::KeyRelease(e) => self.on_key_press(&e, false),
                XEvent::ButtonPress(e) => self.on_button_press(&e, true),
                XEvent::ButtonRelease(e) => self.on_button_press(&e, false),
                XEvent::MotionNotify(e) => self.on_motion_notify(&e),
                XEvent::MapRequest(e) => self.on_map_request(&e),
                XEvent::UnmapNotify(e) => self.on_unmap_notify(&e),
                XEvent::DestroyNotify(e) => self.on_destroy_notify(&e),
                XEvent::ConfigureRequest(e) => self.on_configure_request(&e),
                XEvent::PropertyNotify(e) => self.on_property_notify(&e),
                XEvent::ClientMessage(e) => self.on_client_message(&e),
                XEvent::RandrScreenChangeNotify(_) => Some(Event::ScreenChange),
                XEvent::RandrNotify(_) => Some(Event::ScreenChange),
                XEvent::Error(e) => {
                    warn!("X protocol error: {:?}", e);
                    None
                },
                _ => None,
            })
    }

    fn connected_outputs(&self) -> Vec<Screen> {
        let resources = self
            .conn
            .randr_get_screen_resources_current(self.screen.root);

        if let Ok(resources) = resources {
            if let Ok(reply) = resources.reply() {
                return reply
                    .crtcs
                    .into_iter()
                    .flat_map(|crtc| {
                        randr::get_crtc_info(self.conn, crtc, 0)
                            .map(|cookie| (crtc, cookie.reply()))
                    })
                    .filter_map(|(crtc, reply)| reply.ok().map(|reply| (crtc, reply)))
                    .filter(|(_, reply)| reply.width > 0 && reply.height > 0)
                    .enumerate()
                    .map(|(i, (crtc, reply))| {
                        Screen::new(
                            Region::new(
                                reply.x as i32,
                                reply.y as i32,
                                reply.width as i32,
                                reply.height as i32,
                            ),
                            i,
                            crtc,
                        )
                    })
                    .collect();
            }
        }

        // fall back to the core screen geometry
        vec![Screen::new(
            Region::new(
                0,
                0,
                self.screen.width_in_pixels as i32,
                self.screen.height_in_pixels as i32,
            ),
            0,
            0,
        )]
    }

    fn top_level_windows(&self) -> Vec<Window> {
        self.conn
            .query_tree(self.screen.root)
            .map_or(Vec::with_capacity(0), |cookie| {
                cookie.reply().map_or(Vec::with_capacity(0), |reply| {
                    reply
                        .children
                        .into_iter()
                        .filter(|&window| {
                            self.conn.get_window_attributes(window).map_or(
                                false,
                                |cookie| {
                                    cookie.reply().map_or(false, |reply| {
                                        reply.map_state == xproto::MapState::VIEWABLE
                                            && !reply.override_redirect
                                    })
                                },
                            )
                        })
                        .collect()
                })
            })
    }

    #[inline]
    fn get_pointer_position(&self) -> Pos {
        self.conn
            .query_pointer(self.screen.root)
            .map_or(Pos::default(), |cookie| {
                cookie.reply().map_or(Pos::default(), |reply| Pos {
                    x: reply.root_x as i32,
                    y: reply.root_y as i32,
                })
            })
    }

    #[inline]
    fn grab_pointer(&self) -> bool {
        if self.pointer_grabbed.get() {
            return false;
        }

        let grabbed = self
            .conn
            .grab_pointer(
                false,
                self.screen.root,
                self.drag_event_mask,
                xproto::GrabMode::ASYNC,
                xproto::GrabMode::ASYNC,
                self.screen.root,
                x11rb::NONE,
                x11rb::CURRENT_TIME,
            )
            .map_or(false, |cookie| {
                cookie.reply().map_or(false, |reply| {
                    reply.status == xproto::GrabStatus::SUCCESS
                })
            });

        if grabbed {
            drop(self.conn.grab_keyboard(
                false,
                self.screen.root,
                x11rb::CURRENT_TIME,
                xproto::GrabMode::ASYNC,
                xproto::GrabMode::ASYNC,
            ));

            self.pointer_grabbed.set(true);
        }

        grabbed
    }

    #[inline]
    fn ungrab_pointer(&self) {
        if self.pointer_grabbed.get() {
            drop(self.conn.ungrab_pointer(x11rb::CURRENT_TIME));
            drop(self.conn.ungrab_keyboard(x11rb::CURRENT_TIME));

            self.pointer_grabbed.set(false);
        }
    }

    fn cleanup(&self) {
        self.ungrab_pointer();
        self.ungrab_bindings();

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_ACTIVE_WINDOW),
        );

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_SUPPORTING_WM_CHECK),
        );

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_SUPPORTED),
        );

        drop(self.conn.destroy_window(self.check_window));

        self.flush();
    }

    fn grab_key(
        &self,
        modifiers: u16,
        keysym: Keysym,
    ) {
        let keycodes = self.keycodes.borrow();

        for &keycode in keycodes.get(&keysym).map_or(&[] as &[u8], Vec::as_slice) {
            drop(self.conn.grab_key(
                false,
                self.screen.root,
                xproto::ModMask::from(modifiers),
                keycode,
                xproto::GrabMode::ASYNC,
                xproto::GrabMode::ASYNC,
            ));
        }
    }

    fn grab_button(
        &self,
        modifiers: u16,
        button: Button,
    ) {
        if let Ok(button) = xproto::ButtonIndex::try_from(button) {
            drop(self.conn.grab_button(
                false,
                self.screen.root,
                EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
                xproto::GrabMode::ASYNC,
                xproto::GrabMode::ASYNC,
                x11rb::NONE,
                x11rb::NONE,
                button,
                xproto::ModMask::from(modifiers),
            ));
        }
    }

    fn ungrab_bindings(&self) {
        drop(
            self.conn
                .ungrab_key(xproto::Grab::ANY, self.screen.root, xproto::ModMask::ANY),
        );

        drop(self.conn.ungrab_button(
            xproto::ButtonIndex::ANY,
            self.screen.root,
            xproto::ModMask::ANY,
        ));
    }

    #[inline]
    fn init_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().event_mask(self.window_event_mask),
        ));
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.map_window(window));
    }

    #[inline]
    fn unmap_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.unmap_window(window));
    }

    #[inline]
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(region.pos.x)
                    .y(region.pos.y)
                    .width(region.dim.w as u32)
                    .height(region.dim.h as u32),
            ),
        );
    }

    #[inline]
    fn move_window(
        &self,
        window: Window,
        pos: Pos,
    ) {
        drop(
            self.conn.configure_window(
                window,
                &xproto::ConfigureWindowAux::default().x(pos.x).y(pos.y),
            ),
        );
    }

    #[inline]
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    ) {
        drop(self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().border_width(width),
        ));
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) {
        drop(
            self.conn
                .set_input_focus(xproto::InputFocus::PARENT, window, x11rb::CURRENT_TIME),
        );

        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_ACTIVE_WINDOW,
            xproto::AtomEnum::WINDOW,
            &[window],
        ));
    }

    #[inline]
    fn unfocus(&self) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::PARENT,
            self.check_window,
            x11rb::CURRENT_TIME,
        ));

        drop(
            self.conn
                .delete_property(self.screen.root, self.atoms._NET_ACTIVE_WINDOW),
        );
    }

    #[inline]
    fn raise_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::ABOVE),
        ));
    }

    #[inline]
    fn close_window(
        &self,
        window: Window,
    ) -> bool {
        self.send_protocol_client_message(window, self.atoms.WM_DELETE_WINDOW)
            .map_or(false, |_| self.flush())
    }

    #[inline]
    fn kill_window(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .kill_client(window)
            .map_or(false, |_| self.flush())
    }

    #[inline]
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region> {
        Ok(self.conn.get_geometry(window)?.reply().map(|reply| {
            Region::new(
                reply.x as i32,
                reply.y as i32,
                reply.width as i32,
                reply.height as i32,
            )
        })?)
    }

    fn get_window_name(
        &self,
        window: Window,
    ) -> String {
        static NO_NAME: &str = "n/a";

        let net_name = self
            .conn
            .get_property(
                false,
                window,
                self.atoms._NET_WM_NAME,
                self.atoms.UTF8_STRING,
                0,
                std::u32::MAX,
            )
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| {
                let value = reply.value8()?.collect::<Vec<u8>>();
                String::from_utf8(value).ok()
            })
            .filter(|name| !name.is_empty());

        if let Some(name) = net_name {
            return name;
        }

        self.conn
            .get_property(
                false,
                window,
                self.atoms.WM_NAME,
                xproto::AtomEnum::ANY,
                0,
                std::u32::MAX,
            )
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| {
                let value = reply.value8()?.collect::<Vec<u8>>();
                String::from_utf8(value).ok()
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| NO_NAME.to_owned())
    }

    fn get_window_size_hints(
        &self,
        window: Window,
    ) -> Option<SizeHints> {
        let size_hints = properties::WmSizeHints::get_normal_hints(self.conn, window)
            .ok()?
            .reply()
            .ok()?;

        let pos = size_hints.position.and_then(|(_, x, y)| {
            if x > 0 || y > 0 {
                Some(Pos {
                    x,
                    y,
                })
            } else {
                None
            }
        });

        let positive = |value: i32| if value > 0 { Some(value) } else { None };

        let (sh_min_width, sh_min_height) = size_hints
            .min_size
            .map_or((None, None), |(width, height)| {
                (positive(width), positive(height))
            });

        let (sh_base_width, sh_base_height) = size_hints
            .base_size
            .map_or((None, None), |(width, height)| {
                (positive(width), positive(height))
            });

        let (max_width, max_height) = size_hints
            .max_size
            .map_or((None, None), |(width, height)| {
                (positive(width), positive(height))
            });

        // min and base default to one another when only one is set
        let min_width = sh_min_width.or(sh_base_width);
        let min_height = sh_min_height.or(sh_base_height);
        let base_width = sh_base_width.or(sh_min_width);
        let base_height = sh_base_height.or(sh_min_height);

        let (inc_width, inc_height) = size_hints
            .size_increment
            .map_or((None, None), |(inc_width, inc_height)| {
                (
                    positive(inc_width).filter(|&inc| inc < 0xFFFF),
                    positive(inc_height).filter(|&inc| inc < 0xFFFF),
                )
            });

        let (min_ratio, max_ratio) = size_hints
            .aspect
            .map_or((None, None), |(min_ratio, max_ratio)| {
                (
                    if min_ratio.numerator > 0 && min_ratio.denominator > 0 {
                        Some(min_ratio.numerator as f64 / min_ratio.denominator as f64)
                    } else {
                        None
                    },
                    if max_ratio.numerator > 0 && max_ratio.denominator > 0 {
                        Some(max_ratio.numerator as f64 / max_ratio.denominator as f64)
                    } else {
                        None
                    },
                )
            });

        Some(SizeHints {
            pos,
            min_width,
            min_height,
            max_width,
            max_height,
            base_width,
            base_height,
            inc_width,
            inc_height,
            min_ratio,
            max_ratio,
        })
    }

    fn get_window_hints(
        &self,
        window: Window,
    ) -> Option<Hints> {
        let hints = properties::WmHints::get(self.conn, window)
            .ok()?
            .reply()
            .ok()?;

        Some(Hints {
            urgent: hints.urgent,
            input: hints.input,
            initial_state: hints.initial_state.map(|state| match state {
                properties::WmHintsState::Normal => IcccmWindowState::Normal,
                properties::WmHintsState::Iconic => IcccmWindowState::Iconic,
            }),
            group: hints.window_group,
        })
    }

    #[inline]
    fn get_window_transient_for(
        &self,
        window: Window,
    ) -> Option<Window> {
        self.get_property32(window, self.atoms.WM_TRANSIENT_FOR, self.atoms.WINDOW)
            .and_then(|value| value.first().copied())
            .filter(|&transient_for| transient_for != x11rb::NONE)
    }

    #[inline]
    fn window_supports_delete(
        &self,
        window: Window,
    ) -> bool {
        self.window_has_any_of_protocols(window, &[self.atoms.WM_DELETE_WINDOW])
    }

    #[inline]
    fn window_is_override_redirect(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .get_window_attributes(window)
            .map_or(false, |cookie| {
                cookie
                    .reply()
                    .map_or(false, |reply| reply.override_redirect)
            })
    }

    #[inline]
    fn set_window_fullscreen(
        &self,
        window: Window,
        on: bool,
    ) {
        if on {
            drop(self.conn.change_property32(
                xproto::PropMode::REPLACE,
                window,
                self.atoms._NET_WM_STATE,
                self.atoms.ATOM,
                &[self.atoms._NET_WM_STATE_FULLSCREEN],
            ));
        } else {
            drop(self.conn.change_property32(
                xproto::PropMode::REPLACE,
                window,
                self.atoms._NET_WM_STATE,
                self.atoms.ATOM,
                &[],
            ));
        }
    }

    #[inline]
    fn set_icccm_window_state(
        &self,
        window: Window,
        state: IcccmWindowState,
    ) {
        drop(self.conn.change_property32(
            xproto::PropMode::REPLACE,
            window,
            self.atoms.WM_STATE,
            self.atoms.CARDINAL,
            &[
                match state {
                    IcccmWindowState::Withdrawn => 0,
                    IcccmWindowState::Normal => 1,
                    IcccmWindowState::Iconic => 3,
                },
                0,
            ],
        ));
    }
}

use crate::window::Window;

use winsys::connection::Connection;
use winsys::geometry::Region;
use winsys::window::Window as XWindow;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyManaged(XWindow),
}

impl fmt::Display for RegistryError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::AlreadyManaged(window) => {
                write!(f, "window {:#0x} is already managed", window)
            },
        }
    }
}

impl std::error::Error for RegistryError {}

/// Owns the record of every managed window, keyed by X window id.
#[derive(Default)]
pub struct Registry {
    windows: HashMap<XWindow, Window>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull the initial property snapshot off the server and take the
    /// window into management.
    pub fn manage(
        &mut self,
        conn: &dyn Connection,
        window: XWindow,
    ) -> Result<&Window, RegistryError> {
        match self.windows.entry(window) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyManaged(window)),
            Entry::Vacant(vacant) => {
                let geometry = conn
                    .get_window_geometry(window)
                    .unwrap_or_else(|_| Region::new(0, 0, 1, 1));

                let record = Window::new(
                    window,
                    conn.get_window_name(window),
                    geometry,
                    conn.window_is_override_redirect(window),
                );

                record.set_size_hints(conn.get_window_size_hints(window));
                record.set_hints(conn.get_window_hints(window));
                record.set_supports_delete(conn.window_supports_delete(window));
                record.set_transient_for(conn.get_window_transient_for(window));

                conn.init_window(window);

                Ok(vacant.insert(record))
            },
        }
    }

    #[inline]
    pub fn window(
        &self,
        window: XWindow,
    ) -> Option<&Window> {
        self.windows.get(&window)
    }

    #[inline]
    pub fn forget(
        &mut self,
        window: XWindow,
    ) -> Option<Window> {
        self.windows.remove(&window)
    }

    #[inline]
    pub fn contains(
        &self,
        window: XWindow,
    ) -> bool {
        self.windows.contains_key(&window)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

use crate::frame::FrameId;

use winsys::geometry::Region;
use winsys::hints::Hints;
use winsys::hints::SizeHints;
use winsys::window::Window as XWindow;

use std::cell::Cell;
use std::cell::RefCell;

/// The mode a managed window is in. `Fullscreen` and `Hidden` remember
/// the mode to come back to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindowState {
    Tiling,
    Popup,
    Fullscreen,
    Hidden,
}

/// The internal record kept for every managed X window.
pub struct Window {
    window: XWindow,
    name: RefCell<String>,
    state: Cell<WindowState>,
    previous_state: Cell<WindowState>,
    geometry: Cell<Region>,
    popup_geometry: Cell<Region>,
    frame: Cell<Option<FrameId>>,
    size_hints: Cell<Option<SizeHints>>,
    hints: Cell<Option<Hints>>,
    supports_delete: Cell<bool>,
    transient_for: Cell<Option<XWindow>>,
    override_redirect: bool,
    mapped: Cell<bool>,
}

impl Window {
    pub fn new(
        window: XWindow,
        name: impl Into<String>,
        geometry: Region,
        override_redirect: bool,
    ) -> Self {
        Self {
            window,
            name: RefCell::new(name.into()),
            state: Cell::new(WindowState::Hidden),
            previous_state: Cell::new(WindowState::Hidden),
            geometry: Cell::new(geometry),
            popup_geometry: Cell::new(geometry),
            frame: Cell::new(None),
            size_hints: Cell::new(None),
            hints: Cell::new(None),
            supports_delete: Cell::new(false),
            transient_for: Cell::new(None),
            override_redirect,
            mapped: Cell::new(false),
        }
    }

    #[inline]
    pub fn window(&self) -> XWindow {
        self.window
    }

    #[inline]
    pub fn set_name(
        &self,
        name: impl Into<String>,
    ) {
        self.name.replace(name.into());
    }

    #[inline]
    pub fn name(&self) -> String {
        self.name.borrow().to_owned()
    }

    #[inline]
    pub fn state(&self) -> WindowState {
        self.state.get()
    }

    #[inline]
    pub fn previous_state(&self) -> WindowState {
        self.previous_state.get()
    }

    /// Record a state switch, remembering the state to restore.
    #[inline]
    pub fn set_state(
        &self,
        state: WindowState,
    ) {
        if self.state.get() != state {
            self.previous_state.replace(self.state.replace(state));
        }
    }

    #[inline]
    pub fn geometry(&self) -> Region {
        self.geometry.get()
    }

    #[inline]
    pub fn set_geometry(
        &self,
        geometry: Region,
    ) {
        self.geometry.replace(geometry);
    }

    /// The free-floating rectangle restored when the window shows up
    /// outside the tiling again.
    #[inline]
    pub fn popup_geometry(&self) -> Region {
        self.popup_geometry.get()
    }

    #[inline]
    pub fn set_popup_geometry(
        &self,
        geometry: Region,
    ) {
        self.popup_geometry.replace(geometry);
    }

    #[inline]
    pub fn frame(&self) -> Option<FrameId> {
        self.frame.get()
    }

    #[inline]
    pub fn set_frame(
        &self,
        frame: Option<FrameId>,
    ) {
        self.frame.replace(frame);
    }

    #[inline]
    pub fn size_hints(&self) -> Option<SizeHints> {
        self.size_hints.get()
    }

    #[inline]
    pub fn set_size_hints(
        &self,
        size_hints: Option<SizeHints>,
    ) {
        self.size_hints.replace(size_hints);
    }

    #[inline]
    pub fn hints(&self) -> Option<Hints> {
        self.hints.get()
    }

    #[inline]
    pub fn set_hints(
        &self,
        hints: Option<Hints>,
    ) {
        self.hints.replace(hints);
    }

    #[inline]
    pub fn is_urgent(&self) -> bool {
        self.hints.get().map_or(false, |hints| hints.urgent)
    }

    #[inline]
    pub fn supports_delete(&self) -> bool {
        self.supports_delete.get()
    }

    #[inline]
    pub fn set_supports_delete(
        &self,
        supports_delete: bool,
    ) {
        self.supports_delete.replace(supports_delete);
    }

    #[inline]
    pub fn transient_for(&self) -> Option<XWindow> {
        self.transient_for.get()
    }

    #[inline]
    pub fn set_transient_for(
        &self,
        transient_for: Option<XWindow>,
    ) {
        self.transient_for.replace(transient_for);
    }

    #[inline]
    pub fn is_override_redirect(&self) -> bool {
        self.override_redirect
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.mapped.get()
    }

    #[inline]
    pub fn set_mapped(
        &self,
        mapped: bool,
    ) {
        self.mapped.replace(mapped);
    }

    /// The state a window with these properties belongs in. Transients,
    /// fixed-size windows smaller than the monitor and override
    /// redirect windows float; everything else tiles.
    pub fn predicted_state(
        &self,
        monitor_region: Region,
    ) -> WindowState {
        if self.override_redirect || self.transient_for.get().is_some() {
            return WindowState::Popup;
        }

        if let Some(size_hints) = self.size_hints.get() {
            if size_hints.is_fixed() {
                let fixed_w = size_hints.max_width.unwrap_or(0);
                let fixed_h = size_hints.max_height.unwrap_or(0);

                if fixed_w < monitor_region.dim.w && fixed_h < monitor_region.dim.h {
                    return WindowState::Popup;
                }
            }
        }

        WindowState::Tiling
    }
}

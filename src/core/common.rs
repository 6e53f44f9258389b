use winsys::geometry::Dim;

pub type Color = u32;

#[macro_export]
macro_rules! WM_NAME (
    () => { "fensterchef" };
);

/// No frame may ever be squeezed below this size.
pub const MIN_FRAME_DIM: Dim = Dim {
    w: 1,
    h: 1,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn rev(&self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

use crate::render::Pixel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: Pixel,
    pub height: Pixel,
}

/// Position from the top left of the screen.
/// Signed, since rows scrolling out of the text area start above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub origin: Position,
    pub size: Size,
}

impl Rect {
    pub fn top(&self) -> i32 {
        self.origin.y
    }

    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.height as i32
    }

    pub fn left(&self) -> i32 {
        self.origin.x
    }

    pub fn right(&self) -> i32 {
        self.origin.x + self.size.width as i32
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.left()..self.right()).contains(&position.x) && (self.top()..self.bottom()).contains(&position.y)
    }

    /// A `percent_width` × `percent_height` share of `outer`, centered in it.
    pub fn centered_share(outer: Size, percent_width: u8, percent_height: u8) -> Self {
        let size = Size {
            width: outer.width * usize::from(percent_width.min(100)) / 100,
            height: outer.height * usize::from(percent_height.min(100)) / 100,
        };
        Self::centered(outer, size)
    }

    /// A `size` box centered in `outer`.  It may stick out on every side when it is the larger one.
    pub fn centered(outer: Size, size: Size) -> Self {
        Self {
            origin: Position {
                x: (outer.width as i32 - size.width as i32) / 2,
                y: (outer.height as i32 - size.height as i32) / 2,
            },
            size,
        }
    }
}

/// Horizontal placement of each row inside the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
}

impl Alignment {
    pub fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Center,
            Self::Center => Self::Left,
        }
    }

    /// Left edge of a row `width` pixels wide.
    /// Rows wider than the area start at its left edge either way.
    pub fn x_in(self, area: Rect, width: Pixel) -> i32 {
        match self {
            Self::Left => area.left(),
            Self::Center => area.left() + (area.size.width.saturating_sub(width) / 2) as i32,
        }
    }
}

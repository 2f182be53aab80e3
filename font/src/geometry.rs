use core::ops::{Add, Sub};

/// A struct for raster pixel position. Coordinates may be negative while a glyph is being placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos2D {
    pub x: i32,
    pub y: i32,
}

impl Pos2D {
    pub const ORIGIN: Pos2D = Pos2D { x: 0, y: 0 };
}

impl From<(i32, i32)> for Pos2D {
    fn from((x, y): (i32, i32)) -> Self {
        Pos2D { x, y }
    }
}

impl From<Pos2D> for (i32, i32) {
    fn from(pos: Pos2D) -> Self {
        (pos.x, pos.y)
    }
}

impl Add<Disp2D> for Pos2D {
    type Output = Pos2D;

    fn add(self, rhs: Disp2D) -> Self::Output {
        Pos2D::from((self.x + rhs.dx, self.y + rhs.dy))
    }
}

impl Sub<Pos2D> for Pos2D {
    type Output = Disp2D;

    fn sub(self, rhs: Pos2D) -> Self::Output {
        Disp2D::from((self.x - rhs.x, self.y - rhs.y))
    }
}

/// A struct for raster displacement.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Disp2D {
    pub dx: i32,
    pub dy: i32,
}

impl From<(i32, i32)> for Disp2D {
    fn from((dx, dy): (i32, i32)) -> Self {
        Disp2D { dx, dy }
    }
}

/// A struct for rectangular raster area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect2D {
    pub left_top: Pos2D,
    pub diag: Disp2D,
}

impl Rect2D {
    pub fn from_lefttop_diag(left_top: Pos2D, diag: Disp2D) -> Self {
        debug_assert!(diag.dx >= 0);
        debug_assert!(diag.dy >= 0);
        Rect2D { left_top, diag }
    }

    pub fn right_bot(&self) -> Pos2D {
        self.left_top + self.diag
    }

    /// Intersection with `other`. Disjoint rectangles yield an empty rectangle.
    pub fn bound(&self, other: Rect2D) -> Rect2D {
        let (a, b) = (self.right_bot(), other.right_bot());
        let left_top = Pos2D::from((
            self.left_top.x.max(other.left_top.x),
            self.left_top.y.max(other.left_top.y),
        ));
        let right_bot = Pos2D::from((
            a.x.min(b.x).max(left_top.x),
            a.y.min(b.y).max(left_top.y),
        ));
        Rect2D::from_lefttop_diag(left_top, right_bot - left_top)
    }

    pub fn is_empty(&self) -> bool {
        self.diag.dx == 0 || self.diag.dy == 0
    }

    pub fn iterate_abs<F: FnMut(Pos2D)>(&self, mut f: F) {
        let left_top = self.left_top;
        let right_bot = self.right_bot();
        for y in left_top.y..right_bot.y {
            for x in left_top.x..right_bot.x {
                f((x, y).into());
            }
        }
    }
}

/// Horizontal extent of a glyph outline relative to the pen origin, in whole pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphBounds {
    pub min_x: i32,
    pub max_x: i32,
}

impl GlyphBounds {
    pub fn new(min_x: i32, max_x: i32) -> Self {
        Self { min_x, max_x }
    }

    /// Round a 26.6 fixed point value to the nearest pixel, halves going up.
    pub fn round_26_6(v: i64) -> i32 {
        ((v + 32) >> 6) as i32
    }

    /// Bounds from unrounded 26.6 bearing and width.
    pub fn from_26_6(bearing_x: i64, width: i64) -> Self {
        Self::new(Self::round_26_6(bearing_x), Self::round_26_6(bearing_x + width))
    }
}

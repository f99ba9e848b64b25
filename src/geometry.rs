//!
//! Placement of popup windows.
//!
//! All coordinates are physical screen pixels. Logical offsets are
//! converted with the scale factor of the [DisplayContext] before they
//! are applied, so a gap of N logical pixels looks the same on every
//! monitor.
//!
//! [resolve] is a pure function. It needs no window handle, only
//! the anchor, the size of the popup and the display snapshot.
//!

use crate::dpi::{normalize_scale, scale_up};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// Position in physical pixels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Size in physical pixels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Rectangle in physical pixels.
///
/// The right and bottom edges are exclusive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero sized rect at the given point.
    pub const fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0, 0)
    }

    /// Rect from origin and size.
    pub const fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Point inside the rect.
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Is the other rect completely inside this one.
    pub const fn contains_rect(&self, other: Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Move by the given amount.
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Snapshot of the display a menu chain opens on.
///
/// The work area excludes taskbars and docks. It is taken once
/// when the menu is triggered and is used for the whole chain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayContext {
    /// Physical pixels per logical pixel.
    pub scale: f64,
    pub left: i32,
    pub top: i32,
    /// Exclusive.
    pub right: i32,
    /// Exclusive.
    pub bottom: i32,
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self {
            scale: 1.0,
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        }
    }
}

impl DisplayContext {
    /// New display snapshot.
    ///
    /// An unusable scale is replaced by 1.0.
    pub fn new(scale: f64, work_area: Rect) -> Self {
        Self {
            scale: normalize_scale(scale),
            left: work_area.left(),
            top: work_area.top(),
            right: work_area.right(),
            bottom: work_area.bottom(),
        }
    }

    /// Work area as Rect.
    pub fn work_area(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.right - self.left,
            self.bottom - self.top,
        )
    }

    /// Convert a logical offset to physical pixels.
    pub fn scale_offset(&self, offset: (i32, i32)) -> (i32, i32) {
        (scale_up(offset.0, self.scale), scale_up(offset.1, self.scale))
    }
}

/// Where the popup goes relative to its anchor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Top-left corner at the bottom-left of the anchor.
    /// With a point as anchor, this is the point itself.
    ///
    /// Used for the root menu.
    #[default]
    Below,
    /// Top-left corner at the top-right of the anchor.
    ///
    /// Used for submenus.
    RightOf,
    /// Top-right corner at the top-left of the anchor.
    ///
    /// Used for submenus of a submenu that already opens leftward.
    LeftOf,
}

/// Axes that needed a correction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Axes {
    /// Neither axis.
    pub const NONE: Axes = Axes {
        horizontal: false,
        vertical: false,
    };

    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Result of [resolve].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlacementResult {
    /// Final area of the popup.
    pub area: Rect,
    /// The popup opens leftward / upward of its anchor.
    pub flipped: Axes,
    /// The popup was pushed back to the left / top edge of the work area.
    pub clamped: Axes,
}

impl PlacementResult {
    pub fn origin(&self) -> Point {
        self.area.origin()
    }
}

/// Place a popup of the given size next to its anchor.
///
/// * anchor: trigger point as zero sized rect or the area of the
///   menu entry that opens a submenu.
/// * size: physical size of the popup.
/// * context: display snapshot.
/// * side: preferred side of the anchor.
/// * offset: extra logical offset, scaled with the display scale.
///   It is mirrored on an axis that flips.
///
/// Each axis is corrected independently. If the popup spills over
/// the right/bottom edge it flips to the other side of the anchor.
/// With [Side::LeftOf] the popup flips if it spills over the left
/// edge instead.
/// Whatever still spills is shifted back into the work area, and
/// finally clamped to the left/top edge. A popup larger than the
/// work area stays clamped to the left/top edge and overflows
/// at the other end.
pub fn resolve(
    anchor: Rect,
    size: Size,
    context: &DisplayContext,
    side: Side,
    offset: (i32, i32),
) -> PlacementResult {
    let (dx, dy) = context.scale_offset(offset);

    let (y, y_flip) = match side {
        Side::Below => (anchor.bottom(), anchor.top() - size.height),
        Side::RightOf | Side::LeftOf => (anchor.top(), anchor.bottom() - size.height),
    };

    let (x, h_flipped, h_clamped) = match side {
        Side::Below => fit_axis(
            anchor.left() + dx,
            anchor.right() - size.width - dx,
            size.width,
            context.left,
            context.right,
        ),
        Side::RightOf => fit_axis(
            anchor.right() + dx,
            anchor.left() - size.width - dx,
            size.width,
            context.left,
            context.right,
        ),
        Side::LeftOf => fit_axis_rev(
            anchor.left() - size.width - dx,
            anchor.right() + dx,
            size.width,
            context.left,
            context.right,
        ),
    };
    let (y, v_flipped, v_clamped) = fit_axis(
        y + dy,
        y_flip - dy,
        size.height,
        context.top,
        context.bottom,
    );

    let result = PlacementResult {
        area: Rect::new(x, y, size.width, size.height),
        flipped: Axes {
            horizontal: h_flipped,
            vertical: v_flipped,
        },
        clamped: Axes {
            horizontal: h_clamped,
            vertical: v_clamped,
        },
    };
    log::trace!("resolve {:?} {:?} {:?} -> {:?}", anchor, size, side, result);
    result
}

/// Fit one axis. Returns (pos, flipped, clamped).
fn fit_axis(pos: i32, flipped_pos: i32, len: i32, start: i32, end: i32) -> (i32, bool, bool) {
    let mut pos = pos;
    let mut flipped = false;
    let mut clamped = false;

    if pos + len > end {
        pos = flipped_pos;
        flipped = true;
    }
    // anchor itself is beyond the end
    if pos + len > end {
        pos = end - len;
    }
    if pos < start {
        pos = start;
        clamped = true;
    }

    (pos, flipped, clamped)
}

/// Fit one axis for a popup that prefers the start side.
/// Returns (pos, flipped, clamped).
fn fit_axis_rev(pos: i32, flipped_pos: i32, len: i32, start: i32, end: i32) -> (i32, bool, bool) {
    let mut pos = pos;
    let mut flipped = false;
    let mut clamped = false;

    if pos < start {
        pos = flipped_pos;
        flipped = true;
    }
    if pos + len > end {
        pos = end - len;
    }
    if pos < start {
        pos = start;
        clamped = true;
    }

    (pos, flipped, clamped)
}
